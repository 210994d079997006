//! Messaging backend HTTP client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{
    AccountResponse, ChannelsResponse, DeleteBody, EditBody, ErrorResponse, FlagResponse,
    ForwardBody, HistoryResponse, PeerBody, SearchResponse, SendTextBody, SentResponse,
    UsersResponse,
};
use crate::domain::entities::{
    ChatKind, FormattedMessage, MessageId, Peer, SessionToken, StoryItem, UserInfo,
};
use crate::domain::errors::MessengerError;
use crate::domain::notification::SearchHits;
use crate::domain::ports::{AuthPort, DialogList, MessengerPort, SendMediaRequest, SendTextRequest};

const USER_AGENT: &str = concat!("termgram/", env!("CARGO_PKG_VERSION"));

type ErrorKind = fn(String) -> MessengerError;

/// JSON-over-HTTP adapter for the messaging backend.
pub struct HttpMessengerClient {
    client: Client,
    base_url: String,
    token: Option<SessionToken>,
}

impl HttpMessengerClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MessengerError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| MessengerError::session("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Authenticates every request with `token`.
    #[must_use]
    pub fn with_session(mut self, token: SessionToken) -> Self {
        self.token = Some(token);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        kind: ErrorKind,
    ) -> Result<T, MessengerError> {
        let response = self
            .authorize(request)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach messaging backend");
                let message = if e.is_timeout() {
                    "request timed out"
                } else if e.is_connect() {
                    "failed to connect to backend"
                } else {
                    "request failed"
                };
                kind(message.to_string()).with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response, kind).await);
        }

        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "Failed to parse backend response");
            kind("malformed response".to_string()).with_source(e)
        })
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        kind: ErrorKind,
    ) -> Result<T, MessengerError> {
        self.execute(self.client.post(self.url(path)).json(body), kind)
            .await
    }

    async fn handle_error_response(
        status: StatusCode,
        response: reqwest::Response,
        kind: ErrorKind,
    ) -> MessengerError {
        let error = response.json::<ErrorResponse>().await.ok();
        let message = error
            .as_ref()
            .map_or_else(|| format!("HTTP {status}"), |e| e.message.clone());
        let code = error.as_ref().and_then(|e| e.code.as_deref());

        match (status, code) {
            (StatusCode::UNAUTHORIZED, _) => MessengerError::authentication("session expired or revoked"),
            (_, Some("PEER_ID_INVALID")) => MessengerError::invalid_peer(message),
            (_, Some("USER_NOT_FOUND" | "USERNAME_NOT_OCCUPIED")) => {
                MessengerError::user_not_found(message)
            }
            (StatusCode::TOO_MANY_REQUESTS, _) => kind(format!("rate limited: {message}")),
            _ => kind(message),
        }
    }
}

#[async_trait]
impl AuthPort for HttpMessengerClient {
    async fn validate_session(&self, token: &SessionToken) -> Result<UserInfo, MessengerError> {
        debug!("Validating session against backend");
        let request = self.client.get(self.url("/me")).bearer_auth(token.as_str());
        let account: AccountResponse = self
            .execute(request, MessengerError::authentication)
            .await?;
        Ok(account.user)
    }
}

#[async_trait]
impl MessengerPort for HttpMessengerClient {
    async fn get_dialogs(&self, kind: ChatKind) -> Result<DialogList, MessengerError> {
        debug!(kind = %kind, "Fetching dialogs");
        let request = self
            .client
            .get(self.url("/dialogs"))
            .query(&[("kind", kind.as_str())]);

        if kind.is_direct() {
            let response: UsersResponse = self.execute(request, MessengerError::fetch_history).await?;
            Ok(DialogList::Users(response.users))
        } else {
            let response: ChannelsResponse =
                self.execute(request, MessengerError::fetch_history).await?;
            Ok(DialogList::Channels(response.channels))
        }
    }

    async fn get_history(
        &self,
        peer: Peer,
        limit: usize,
        offset_id: MessageId,
    ) -> Result<Vec<FormattedMessage>, MessengerError> {
        debug!(peer = %peer, limit, offset_id = %offset_id, "Fetching history");
        let request = self.client.get(self.url("/history")).query(&[
            ("kind", peer.kind.as_str().to_string()),
            ("id", peer.id.to_string()),
            ("access_hash", peer.access_hash.to_string()),
            ("limit", limit.to_string()),
            ("offset_id", offset_id.to_string()),
        ]);
        let response: HistoryResponse = self.execute(request, MessengerError::fetch_history).await?;
        Ok(response.messages.into_iter().map(Into::into).collect())
    }

    async fn send_text(&self, request: SendTextRequest) -> Result<FormattedMessage, MessengerError> {
        let body = SendTextBody {
            peer: &request.peer,
            text: &request.text,
            reply_to: request.reply_to,
            random_id: uuid::Uuid::new_v4().to_string(),
        };
        let response: SentResponse = self
            .post("/messages/send", &body, MessengerError::send)
            .await?;
        Ok(response.message.into())
    }

    async fn send_media(&self, request: SendMediaRequest) -> Result<FormattedMessage, MessengerError> {
        let bytes = tokio::fs::read(&request.path).await.map_err(|e| {
            MessengerError::upload(format!("cannot read {}", request.path.display())).with_source(e)
        })?;
        let file_name = file_name(&request.path);
        debug!(peer = %request.peer, file = %file_name, size = bytes.len(), "Uploading media");

        let peer_json = serde_json::to_string(&request.peer)
            .map_err(|e| MessengerError::upload("invalid peer").with_source(e))?;
        let mut form = Form::new()
            .text("peer", peer_json)
            .text("caption", request.caption)
            .text("random_id", uuid::Uuid::new_v4().to_string())
            .part("file", Part::bytes(bytes).file_name(file_name));
        if let Some(reply_to) = request.reply_to {
            form = form.text("reply_to", reply_to.to_string());
        }

        let http = self.client.post(self.url("/messages/send_media")).multipart(form);
        let response: SentResponse = self.execute(http, MessengerError::upload).await?;
        Ok(response.message.into())
    }

    async fn edit_message(
        &self,
        peer: Peer,
        message_id: MessageId,
        text: String,
    ) -> Result<bool, MessengerError> {
        let body = EditBody {
            peer: &peer,
            message_id,
            text: &text,
        };
        let response: FlagResponse = self
            .post("/messages/edit", &body, MessengerError::edit)
            .await?;
        Ok(response.ok)
    }

    async fn delete_message(&self, peer: Peer, message_id: MessageId) -> Result<(), MessengerError> {
        let body = DeleteBody {
            peer: &peer,
            message_ids: [message_id],
        };
        let _: FlagResponse = self
            .post("/messages/delete", &body, MessengerError::delete)
            .await?;
        Ok(())
    }

    async fn forward_messages(
        &self,
        from: Peer,
        to: Peer,
        message_ids: Vec<MessageId>,
    ) -> Result<(), MessengerError> {
        let body = ForwardBody {
            from: &from,
            to: &to,
            message_ids: &message_ids,
            random_id: uuid::Uuid::new_v4().to_string(),
        };
        let _: FlagResponse = self
            .post("/messages/forward", &body, MessengerError::forward)
            .await?;
        Ok(())
    }

    async fn mark_read(&self, peer: Peer) -> Result<bool, MessengerError> {
        let response: FlagResponse = self
            .post("/messages/read", &PeerBody { peer: &peer }, MessengerError::fetch_history)
            .await?;
        Ok(response.ok)
    }

    async fn set_typing(&self, peer: Peer) -> Result<(), MessengerError> {
        let _: FlagResponse = self
            .post("/messages/typing", &PeerBody { peer: &peer }, MessengerError::send)
            .await?;
        Ok(())
    }

    async fn search(&self, query: String) -> Result<SearchHits, MessengerError> {
        let request = self.client.get(self.url("/search")).query(&[("q", query.as_str())]);
        let response: SearchResponse = self
            .execute(request, MessengerError::user_not_found)
            .await?;
        Ok(response.into())
    }

    async fn get_stories(&self, peer: Peer) -> Result<Vec<StoryItem>, MessengerError> {
        let request = self.client.get(self.url("/stories")).query(&[
            ("id", peer.id.to_string()),
            ("access_hash", peer.access_hash.to_string()),
        ]);
        self.execute(request, MessengerError::fetch_history).await
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned())
}
