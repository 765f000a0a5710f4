//! CLI error types

use thiserror::Error;

use sieve_dom::DomError;
use sieve_select::SelectorError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tree construction failed: {0}")]
    Dom(#[from] DomError),
}
