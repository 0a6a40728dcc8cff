//! Error types for the epp-client crate.
//!
//! Transport and timeout errors leave the session unusable. Decode errors
//! only affect the interpretation of one response. `Epp` errors are ordinary
//! protocol outcomes (bad credentials, object not found, policy violations).

use crate::decoder::DecodeError;
use crate::result::{EppResult, ExtValue, ResultCode};
use crate::transport::FrameError;

/// Unified error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] FrameError),

    #[error("Timed out waiting for the server")]
    Timeout,

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("EPP error {code}: {message}")]
    Epp {
        code: ResultCode,
        message: String,
        reasons: Vec<ExtValue>,
    },

    #[error("Session closed")]
    Closed,

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }

    /// Whether the session must be discarded after this error.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout | Self::Closed)
    }

    /// Result code of a protocol failure, if this is one.
    #[must_use]
    pub fn code(&self) -> Option<ResultCode> {
        match self {
            Self::Epp { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<EppResult> for Error {
    fn from(r: EppResult) -> Self {
        Self::Epp {
            code: r.code,
            message: r.message,
            reasons: r.reasons,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Transport(FrameError::Io(e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_epp_result() {
        let result = EppResult {
            code: ResultCode(2303),
            message: "Object does not exist".to_string(),
            reasons: Vec::new(),
        };
        let err: Error = result.into();

        match &err {
            Error::Epp { code, message, .. } => {
                assert_eq!(*code, ResultCode::OBJECT_DOES_NOT_EXIST);
                assert_eq!(message, "Object does not exist");
            }
            _ => panic!("Expected Epp error"),
        }
        assert_eq!(err.to_string(), "EPP error 2303: Object does not exist");
        assert_eq!(err.code(), Some(ResultCode(2303)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset");
        let err: Error = io_err.into();

        assert!(matches!(err, Error::Transport(FrameError::Io(_))));
        assert!(err.to_string().contains("peer reset"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_error_from_frame_error() {
        let err: Error = FrameError::TooLarge {
            size: 999_999_999,
            max: 1024,
        }
        .into();

        assert!(matches!(err, Error::Transport(_)));
        assert!(err.to_string().contains("999999999"));
    }

    #[test]
    fn test_error_from_decode_error() {
        let err: Error = DecodeError::Missing("greeting").into();
        assert!(matches!(err, Error::Decode(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(Error::Timeout.to_string(), "Timed out waiting for the server");
        assert_eq!(Error::Closed.to_string(), "Session closed");
        assert_eq!(
            Error::invalid("period must be 1..=99").to_string(),
            "Invalid parameters: period must be 1..=99"
        );
    }
}
