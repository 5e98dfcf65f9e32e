use std::fmt;

/// Failure class of a remote API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// The request never produced a response (connect, timeout, TLS).
    Transport,
    /// The service answered with an error status.
    Http,
    /// The response body could not be decoded.
    Decode,
}

/// Error from the remote API, carrying the HTTP status when one was received.
#[derive(Debug, Clone)]
pub struct RemoteError {
    kind: RemoteErrorKind,
    status_code: Option<u16>,
    reason: String,
}

impl RemoteError {
    pub fn transport(reason: impl fmt::Display) -> Self {
        Self {
            kind: RemoteErrorKind::Transport,
            status_code: None,
            reason: reason.to_string(),
        }
    }

    pub fn http(status_code: u16, reason: impl Into<String>) -> Self {
        Self {
            kind: RemoteErrorKind::Http,
            status_code: Some(status_code),
            reason: reason.into(),
        }
    }

    pub fn decode(reason: impl fmt::Display) -> Self {
        Self {
            kind: RemoteErrorKind::Decode,
            status_code: None,
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> RemoteErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// The service reports name collisions (directory or file already
    /// exists) as 400.
    pub fn is_conflict(&self) -> bool {
        self.status_code == Some(400)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.status_code) {
            (RemoteErrorKind::Http, Some(status)) => {
                write!(f, "HTTP {status}: {}", self.reason)
            }
            (RemoteErrorKind::Transport, _) => write!(f, "transport failure: {}", self.reason),
            _ => write!(f, "invalid response: {}", self.reason),
        }
    }
}

impl std::error::Error for RemoteError {}

pub type Result<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_is_status_400() {
        assert!(RemoteError::http(400, "Bad Request").is_conflict());
        assert!(!RemoteError::http(404, "Not Found").is_conflict());
        assert!(!RemoteError::transport("connection refused").is_conflict());
    }

    #[test]
    fn test_display_includes_status() {
        let err = RemoteError::http(429, "Too Many Requests");
        assert_eq!(err.to_string(), "HTTP 429: Too Many Requests");
    }
}
