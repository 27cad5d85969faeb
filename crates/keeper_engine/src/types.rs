use keeper_core::JobHandle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Transport(String),
    #[error("http status {status}: {detail}")]
    HttpStatus { status: u16, detail: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Background processing started; the job should be polled.
    Processing,
    /// Accepted and queued; polled like `Processing`.
    Prepared,
    /// The URL was registered before; nothing new to poll.
    AlreadyExists,
    Other(String),
}

impl SubmitStatus {
    pub(crate) fn from_wire(status: &str) -> Self {
        match status {
            "processing" => Self::Processing,
            "prepared" => Self::Prepared,
            "already_exists" => Self::AlreadyExists,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn needs_polling(&self) -> bool {
        matches!(self, Self::Processing | Self::Prepared)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub job: JobHandle,
    pub status: SubmitStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProcessUrlBody<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProcessUrlReply {
    pub status: String,
    pub page_id: u64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusReply {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorReply {
    pub detail: Option<serde_json::Value>,
}
