use thiserror::Error;

/// Unified error type for the dashboard core.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<figment::Error> for DashboardError {
    fn from(e: figment::Error) -> Self {
        DashboardError::Config(e.to_string())
    }
}
