//! HttpGateway -- concrete [`Gateway`] implementation over the backend's JSON API.
//!
//! Every endpoint lives under one base URL fixed at construction time
//! (`http://localhost:5000/api` by default). Requests carry no timeout: a
//! call resolves only when the backend answers or the transport fails.

use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use ethica_core::gateway::Gateway;
use ethica_types::chat::{
    ChatReply, ChatRequest, ConversationDetail, ConversationId, ConversationList,
    SaveConversationRequest, SaveConversationResponse, SavedConversation,
};
use ethica_types::error::GatewayError;
use ethica_types::status::ServiceStatus;

/// `{error}` body the backend sends with non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Backend gateway over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway for the API rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// The API root, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for `segments` under the base URL.
    ///
    /// Segments are percent-encoded, so ids are always a single path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GatewayError::Transport(format!("invalid base URL '{}': {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| {
                GatewayError::Transport(format!("base URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, GatewayError> {
        Ok(self.client.request(method, self.url(segments)?))
    }

    /// Send `request`; non-2xx responses become [`GatewayError::Service`].
    async fn send(&self, request: RequestBuilder, label: &str) -> Result<Response, GatewayError> {
        debug!(call = label, "gateway request");

        let response = request.send().await.map_err(|e| {
            warn!(call = label, error = %e, "gateway request failed");
            GatewayError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(call = label, status = status.as_u16(), "gateway response");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = service_message(status, &body);
        warn!(call = label, status = status.as_u16(), error = %message, "gateway returned an error");
        Err(GatewayError::Service {
            status: status.as_u16(),
            message,
        })
    }
}

/// The server's error text: `{error}` when present, else the raw body, else the HTTP reason.
fn service_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

async fn decode<T: DeserializeOwned>(response: Response, label: &str) -> Result<T, GatewayError> {
    response.json::<T>().await.map_err(|e| {
        warn!(call = label, error = %e, "unreadable response body");
        GatewayError::Transport(format!("invalid response body: {e}"))
    })
}

impl Gateway for HttpGateway {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, GatewayError> {
        let builder = self.request(Method::POST, &["chat"])?.json(request);
        let response = self.send(builder, "POST /chat").await?;
        decode(response, "POST /chat").await
    }

    async fn clear(&self) -> Result<(), GatewayError> {
        let builder = self.request(Method::POST, &["clear"])?;
        self.send(builder, "POST /clear").await?;
        Ok(())
    }

    async fn create_conversation(
        &self,
        request: &SaveConversationRequest,
    ) -> Result<ConversationId, GatewayError> {
        let builder = self.request(Method::POST, &["conversations"])?.json(request);
        let response = self.send(builder, "POST /conversations").await?;
        let created: SaveConversationResponse = decode(response, "POST /conversations").await?;
        Ok(created.id)
    }

    async fn list_conversations(&self) -> Result<Vec<SavedConversation>, GatewayError> {
        let builder = self.request(Method::GET, &["conversations"])?;
        let response = self.send(builder, "GET /conversations").await?;
        let list: ConversationList = decode(response, "GET /conversations").await?;
        Ok(list.conversations)
    }

    async fn get_conversation(
        &self,
        id: &ConversationId,
    ) -> Result<ConversationDetail, GatewayError> {
        let builder = self.request(Method::GET, &["conversations", id.as_str()])?;
        let response = self.send(builder, "GET /conversations/{id}").await?;
        decode(response, "GET /conversations/{id}").await
    }

    async fn delete_conversation(&self, id: &ConversationId) -> Result<(), GatewayError> {
        let builder = self.request(Method::DELETE, &["conversations", id.as_str()])?;
        self.send(builder, "DELETE /conversations/{id}").await?;
        Ok(())
    }

    async fn status(&self) -> Result<ServiceStatus, GatewayError> {
        let builder = self.request(Method::GET, &["status"])?;
        let response = self.send(builder, "GET /status").await?;
        decode(response, "GET /status").await
    }
}
