use thiserror::Error;

#[derive(Error, Debug)]
pub enum KumiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl KumiError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, KumiError>;

impl From<anyhow::Error> for KumiError {
    fn from(err: anyhow::Error) -> Self {
        KumiError::Config(err.to_string())
    }
}
