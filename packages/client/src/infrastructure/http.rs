//! HTTP access to the message store.

use std::time::Duration;

use async_trait::async_trait;
use kokuban_shared::dto::{ErrorResponse, MessageDto, PostMessageRequest};
use reqwest::StatusCode;

use super::conversion::messages_from_dtos;
use crate::domain::{GatewayError, Message, MessageContent, MessageGateway};

/// Per-request limit; a store that never answers surfaces as a transport error
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// `GET /api/messages` and `POST /api/messages` over reqwest
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to a default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{}/api/messages", self.base_url)
    }
}

fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::Transport(e.to_string())
}

#[async_trait]
impl MessageGateway for HttpGateway {
    async fn fetch_recent(&self) -> Result<Vec<Message>, GatewayError> {
        let response = self
            .client
            .get(self.messages_url())
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(GatewayError::Transport(format!(
                "GET /api/messages returned {}",
                response.status()
            )));
        }

        let dtos: Vec<MessageDto> = response.json().await.map_err(transport)?;
        Ok(messages_from_dtos(dtos))
    }

    async fn submit(&self, content: &MessageContent) -> Result<Message, GatewayError> {
        let request = PostMessageRequest {
            content: content.as_str().to_string(),
        };
        let response = self
            .client
            .post(self.messages_url())
            .json(&request)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            let dto: MessageDto = response.json().await.map_err(transport)?;
            return Message::try_from(dto).map_err(|e| GatewayError::Transport(e.to_string()));
        }

        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
            let reason = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => format!("Rejected with status {}", status),
            };
            return Err(GatewayError::Rejected(reason));
        }

        Err(GatewayError::Transport(format!(
            "POST /api/messages returned {}",
            status
        )))
    }
}
