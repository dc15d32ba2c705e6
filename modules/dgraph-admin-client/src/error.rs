use thiserror::Error;

pub type Result<T> = std::result::Result<T, DgraphError>;

#[derive(Debug, Error)]
pub enum DgraphError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Schema rejected: {}", .0.join("; "))]
    SchemaRejected(Vec<String>),
}
