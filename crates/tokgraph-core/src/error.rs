//! Error types for tokgraph-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Metric name outside sessions/tokens/interactions
    #[error("unknown metric '{0}' (expected sessions, tokens or interactions)")]
    InvalidMetric(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
