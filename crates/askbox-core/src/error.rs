use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to get a usable body back from `/ask`
#[derive(Debug, Error)]
pub enum AskError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with status code {}", .status.as_u16())]
    Status { status: StatusCode, body: String },

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AskError {
    /// Body the server sent along with a failure, if any
    pub fn server_body(&self) -> Option<&str> {
        match self {
            AskError::Status { body, .. } if !body.trim().is_empty() => Some(body),
            _ => None,
        }
    }
}

/// Why a prompt was not sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("prompt is empty")]
    Empty,

    #[error("a request is already in flight")]
    Busy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
