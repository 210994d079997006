//! Termgram - a keyboard-driven terminal messaging client.
//!
//! This crate provides the UI core of a terminal messenger with clean
//! architecture: a bounded conversation window, cached history paging,
//! a focus and mode router, an event dispatcher that returns effects,
//! overlays, debounced search and a bounded notification bridge.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing UI components and event handling.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "termgram";
