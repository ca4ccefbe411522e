//! Error types shared across the workspace.

use thiserror::Error;

/// A failed call against the remote workspace API.
///
/// `method` is the remote method name (e.g. `"conversations.archive"`) so
/// log lines and report entries say which call broke.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS, …).
    #[error("{method}: request failed: {message}")]
    Http { method: String, message: String },

    /// Non-success HTTP status.
    #[error("{method}: HTTP {status}")]
    Status { method: String, status: u16 },

    /// The API answered `ok: false`.
    #[error("{method}: {error}")]
    Remote { method: String, error: String },

    /// The response body did not have the expected shape.
    #[error("{method}: unexpected response: {message}")]
    Decode { method: String, message: String },

    /// Still rate limited after all retries were spent.
    #[error("{method}: rate limited after {attempts} attempts")]
    RateLimited { method: String, attempts: u32 },
}

impl ApiError {
    pub fn method(&self) -> &str {
        match self {
            ApiError::Http { method, .. }
            | ApiError::Status { method, .. }
            | ApiError::Remote { method, .. }
            | ApiError::Decode { method, .. }
            | ApiError::RateLimited { method, .. } => method,
        }
    }
}

/// Failure that aborts a whole sweep.
///
/// Per-channel failures never surface here; they are recorded in the run
/// report and the scan moves on.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("could not list channels: {0}")]
    ListChannels(#[source] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        let err = ApiError::Remote {
            method: "conversations.archive".into(),
            error: "not_in_channel".into(),
        };
        assert_eq!(err.to_string(), "conversations.archive: not_in_channel");
        assert_eq!(err.method(), "conversations.archive");
    }

    #[test]
    fn test_sweep_error_wraps_source() {
        let err = SweepError::ListChannels(ApiError::Status {
            method: "conversations.list".into(),
            status: 500,
        });
        assert_eq!(
            err.to_string(),
            "could not list channels: conversations.list: HTTP 500"
        );
        assert!(std::error::Error::source(&err).is_some());
    }
}
