//! Data transfer objects.

mod auth_dto;

pub use auth_dto::{LoginRequest, LoginResponse, SessionSource};
