//! Turning an `/ask` result into the text of a bot message.

use serde_json::Value;

use crate::client::AskResponse;
use crate::error::AskError;
use crate::state::ChatMessage;

pub const NO_RESPONSE: &str = "No response";
pub const REQUEST_FAILED: &str = "Request failed";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// How a settled request is shown in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The server answered with a truthy `_status`
    Answer(String),
    /// The server answered, but flagged the request as failed
    Rejected(String),
    /// No usable answer came back
    ServerError(String),
}

impl Reply {
    pub fn from_result(result: Result<AskResponse, AskError>) -> Self {
        match result {
            Ok(response) => Self::from_response(response),
            Err(err) => Self::from_error(&err),
        }
    }

    pub fn from_response(response: AskResponse) -> Self {
        if is_truthy(&response.status) {
            Reply::Answer(display_or(&response.final_data, NO_RESPONSE))
        } else {
            Reply::Rejected(display_or(&response.message, REQUEST_FAILED))
        }
    }

    /// Prefers whatever the server sent back, then the error's own description.
    pub fn from_error(err: &AskError) -> Self {
        let body = err.server_body().map(|body| {
            serde_json::from_str::<Value>(body).unwrap_or_else(|_| Value::String(body.to_string()))
        });
        let diagnostic = match body {
            Some(body) if is_truthy(&body) => body,
            // A falsy body (`null`, `false`, `0`, `""`) counts as no body
            _ => Value::String(err.to_string()),
        };
        Reply::server_error(diagnostic)
    }

    /// Used when the request never settled normally (e.g. the task died).
    pub fn from_description(description: impl Into<String>) -> Self {
        Reply::server_error(Value::String(description.into()))
    }

    fn server_error(diagnostic: Value) -> Self {
        let diagnostic = if is_truthy(&diagnostic) {
            diagnostic
        } else {
            Value::String(UNKNOWN_ERROR.to_string())
        };
        Reply::ServerError(diagnostic.to_string())
    }

    pub fn text(&self) -> String {
        match self {
            Reply::Answer(text) => text.clone(),
            Reply::Rejected(message) => format!("Error: {}", message),
            Reply::ServerError(diagnostic) => format!("Server error: {}", diagnostic),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Reply::Answer(_))
    }

    pub fn into_message(self) -> ChatMessage {
        ChatMessage::bot(self.text())
    }
}

/// `null`, `false`, `0` and `""` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_or(value: &Value, fallback: &str) -> String {
    if !is_truthy(value) {
        return fallback.to_string();
    }
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
