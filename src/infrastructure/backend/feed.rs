//! Push notification feed over WebSocket.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tracing::{debug, info, trace, warn};

use super::dto::FeedEvent;
use crate::domain::entities::SessionToken;
use crate::domain::errors::MessengerError;
use crate::domain::notification::Notification;
use crate::domain::ports::{NotificationFeedPort, NotificationSink};

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(15);

/// Reads backend events from a WebSocket and hands them to the UI.
pub struct WebSocketNotificationFeed {
    url: String,
    token: SessionToken,
}

impl WebSocketNotificationFeed {
    #[must_use]
    pub fn new(url: impl Into<String>, token: SessionToken) -> Self {
        Self {
            url: url.into(),
            token,
        }
    }
}

/// Decodes one text frame. Unknown or malformed events are skipped.
fn decode_event(text: &str) -> Option<Notification> {
    match serde_json::from_str::<FeedEvent>(text) {
        Ok(event) => Some(event.into()),
        Err(e) => {
            debug!(error = %e, "Ignoring unrecognized feed event");
            None
        }
    }
}

#[async_trait]
impl NotificationFeedPort for WebSocketNotificationFeed {
    async fn run(&self, sink: Arc<dyn NotificationSink>) -> Result<(), MessengerError> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|e| MessengerError::session("invalid feed URL").with_source(e))?;
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token.as_str()))
            .map_err(|e| MessengerError::session("invalid session token").with_source(e))?;
        request.headers_mut().insert("Authorization", auth);

        let (ws_stream, _) = timeout(CONNECTION_TIMEOUT, connect_async(request))
            .await
            .map_err(|_| MessengerError::session("feed connection timed out"))?
            .map_err(|e| MessengerError::session("failed to connect to feed").with_source(e))?;
        info!(url = %self.url, "Connected to notification feed");

        let (mut writer, mut reader) = ws_stream.split();

        while let Some(frame) = reader.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => {
                    trace!(len = text.len(), "Feed frame received");
                    if let Some(notification) = decode_event(&text) {
                        sink.deliver(notification);
                    }
                }
                Ok(WsMessage::Ping(data)) => {
                    let _ = writer.send(WsMessage::Pong(data)).await;
                }
                Ok(WsMessage::Close(frame)) => {
                    let reason = frame.map_or_else(String::new, |f| f.reason.to_string());
                    info!(reason = %reason, "Notification feed closed by backend");
                    return Ok(());
                }
                Ok(WsMessage::Binary(_) | WsMessage::Pong(_) | WsMessage::Frame(_)) => {}
                Err(e) => {
                    warn!(error = %e, "Notification feed failed");
                    return Err(MessengerError::session("notification feed dropped").with_source(e));
                }
            }
        }

        info!("Notification feed ended");
        Ok(())
    }
}
