//! Domain-specific errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid line range '{0}': expected N or N-M with 1 <= N <= M")]
    InvalidLineRange(String),
    #[error("Unsupported Git provider: {domain}")]
    UnsupportedProvider { domain: String },
}
