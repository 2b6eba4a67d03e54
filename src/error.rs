// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

/// Hard failures an upstream adapter can surface.
///
/// Field-level absence or shape drift inside an otherwise well-formed payload
/// is absorbed by the adapters' candidate-key fallbacks and never becomes an
/// error; this type covers only the cases where the fetch itself failed or
/// the body is unusable as a whole.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The network call to the upstream failed outright.
    #[error("request to {endpoint} failed")]
    Upstream {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    /// The body is not JSON, or its top-level shape is not the expected
    /// list/object at all.
    #[error("malformed response from {endpoint}: {reason}")]
    Malformed {
        endpoint: &'static str,
        reason: String,
    },
}

impl SourceError {
    pub fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        SourceError::Malformed {
            endpoint,
            reason: reason.into(),
        }
    }

    /// Name of the upstream the failure came from.
    pub fn endpoint(&self) -> &'static str {
        match self {
            SourceError::Upstream { endpoint, .. }
            | SourceError::Status { endpoint, .. }
            | SourceError::Malformed { endpoint, .. } => endpoint,
        }
    }
}
