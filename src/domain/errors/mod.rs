//! Domain error types.

mod messenger_error;

pub use messenger_error::MessengerError;
