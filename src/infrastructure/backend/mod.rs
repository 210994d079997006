//! Adapters for the messaging backend bridge.

mod client;
mod dto;
mod feed;

pub use client::HttpMessengerClient;
pub use feed::WebSocketNotificationFeed;
