use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::AskError;

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

/// Fields of an `/ask` response body that the chat cares about.
///
/// Missing fields, or a body that is not an object at all, come through as
/// `Value::Null` so that truthiness checks treat them as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AskResponse {
    pub status: Value,
    pub final_data: Value,
    pub message: Value,
}

impl From<Value> for AskResponse {
    fn from(body: Value) -> Self {
        let mut response = AskResponse::default();
        if let Value::Object(mut fields) = body {
            response.status = fields.remove("_status").unwrap_or_default();
            response.final_data = fields.remove("_finalData").unwrap_or_default();
            response.message = fields.remove("_message").unwrap_or_default();
        }
        response
    }
}

/// HTTP client for the chat backend's `/ask` endpoint
#[derive(Clone, Debug)]
pub struct AskClient {
    client: Client,
    base_url: String,
}

impl AskClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn ask_url(&self) -> String {
        format!("{}/ask", self.base_url)
    }

    /// POST one question and return the decoded body of a 2xx response.
    pub async fn ask(&self, question: &str) -> Result<AskResponse, AskError> {
        let url = self.ask_url();
        debug!(%url, chars = question.chars().count(), "sending question");

        let response = self
            .client
            .post(&url)
            .json(&AskRequest { question })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, "ask request failed");
            return Err(AskError::Status { status, body });
        }

        let value: Value = serde_json::from_str(&body)?;
        Ok(AskResponse::from(value))
    }
}
