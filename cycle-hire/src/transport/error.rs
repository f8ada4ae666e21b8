//! Transport error types.

/// Errors reported by a [`Transport`](super::Transport).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP request failed (network error, timeout, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// A header value could not be sent (e.g. contains a newline)
    #[error("invalid value for header {name}")]
    InvalidHeader { name: String },
}

impl TransportError {
    /// The HTTP status, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
            TransportError::Status { status, .. } => Some(*status),
            TransportError::InvalidHeader { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TransportError::Status {
            status: 500,
            body: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "HTTP status 500: Internal Server Error");
        assert_eq!(err.status(), Some(500));

        let err = TransportError::InvalidHeader {
            name: "c3-encoding".into(),
        };
        assert_eq!(err.to_string(), "invalid value for header c3-encoding");
        assert_eq!(err.status(), None);
    }
}
