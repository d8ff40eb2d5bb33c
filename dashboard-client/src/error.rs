use dashboard_core::DashboardError;
use thiserror::Error;

/// Errors surfaced by admin API calls. Nothing is retried or recovered.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Admin API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Response has no data envelope")]
    Envelope,

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Request(#[from] DashboardError),

    #[error("Config error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of a rejected call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
