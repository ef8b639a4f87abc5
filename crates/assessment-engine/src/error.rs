//! Error taxonomy for the assessment engine
//!
//! The engine performs no retries and no logging; errors are returned for
//! the boundary layer to log and translate into user-facing responses.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or malformed required input. Caller-visible, never retried.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Inference response did not match the expected shape. Surfaced
    /// distinctly so callers can offer "try again".
    #[error("Inference response did not match expected shape: {0}")]
    UpstreamParse(String),

    /// Reconciliation status count does not cover the original violation
    /// list. Data-integrity fault; must not silently proceed.
    #[error("Reconciliation mismatch: expected {expected} status entries, got {actual}")]
    ReconciliationMismatch { expected: usize, actual: usize },

    /// Referenced record absent.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
