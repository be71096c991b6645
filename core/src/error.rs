use serde::Serialize;
use thiserror::Error;

/// Why a submission was refused before any network call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// Trimmed text is empty or shorter than the configured minimum
    #[error("email text must contain at least {min_len} characters")]
    EmptyInput { min_len: usize },
    /// File MIME type outside the accepted set
    #[error("unsupported file type '{mime_type}', only .txt and .pdf files are accepted")]
    UnsupportedType { mime_type: String },
    /// File exceeds the upload ceiling
    #[error("file is {size_bytes} bytes, the limit is {max_bytes} bytes")]
    TooLarge { size_bytes: u64, max_bytes: u64 },
}

/// Failure reported by the network collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, DNS, timeout or abort
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response
    #[error("classification service responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// 2xx response whose body is not a classification result
    #[error("malformed classification response: {0}")]
    MalformedBody(String),
}

/// Outcome of a failed `classify`/`submit` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Rejected(#[from] RejectionReason),
    #[error("a classification is already in progress")]
    ConcurrentRequestRejected,
    #[error(transparent)]
    TransportFailure(#[from] TransportError),
    /// Local I/O failure while loading a candidate file
    #[error("failed to read '{path}': {message}")]
    FileRead { path: String, message: String },
}

impl RejectionReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput { .. } => codes::EMPTY_INPUT,
            Self::UnsupportedType { .. } => codes::UNSUPPORTED_TYPE,
            Self::TooLarge { .. } => codes::TOO_LARGE,
        }
    }

    pub fn docs_hint(&self) -> &'static str {
        match self {
            Self::EmptyInput { .. } => "Paste the full email body or select a .txt/.pdf file.",
            Self::UnsupportedType { .. } => "Only text/plain (.txt) and application/pdf (.pdf) are supported.",
            Self::TooLarge { .. } => "Files must be 5 MB or smaller.",
        }
    }
}

impl ClassifyError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected(reason) => reason.code(),
            Self::ConcurrentRequestRejected => codes::CONCURRENT_REQUEST_REJECTED,
            Self::TransportFailure(_) => codes::TRANSPORT_FAILURE,
            Self::FileRead { .. } => codes::FILE_READ,
        }
    }

    /// Rejected before dispatch; the session never touched the network.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::TransportFailure(_))
    }

    pub fn report(&self) -> ErrorReport {
        let docs_hint = match self {
            Self::Rejected(reason) => Some(reason.docs_hint().to_string()),
            Self::ConcurrentRequestRejected => {
                Some("Wait for the current classification to finish.".to_string())
            }
            Self::TransportFailure(_) => Some(
                "Is the classification service running? Check SPARKMAIL_API_URL.".to_string(),
            ),
            Self::FileRead { .. } => None,
        };
        ErrorReport {
            error: self.code().to_string(),
            message: self.to_string(),
            docs_hint,
        }
    }
}

/// Structured error body printed by front ends.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    /// Machine-readable error code (see [`codes`])
    pub error: String,
    /// Human-readable description of what went wrong
    pub message: String,
    /// Hint about how to recover
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_hint: Option<String>,
}

/// Error codes surfaced to front ends
pub mod codes {
    pub const EMPTY_INPUT: &str = "empty_input";
    pub const UNSUPPORTED_TYPE: &str = "unsupported_type";
    pub const TOO_LARGE: &str = "too_large";
    pub const CONCURRENT_REQUEST_REJECTED: &str = "concurrent_request_rejected";
    pub const TRANSPORT_FAILURE: &str = "transport_failure";
    pub const FILE_READ: &str = "file_read";
}

#[cfg(test)]
mod tests {
    use super::{ClassifyError, RejectionReason, TransportError, codes};

    #[test]
    fn rejection_codes_pass_through_classify_error() {
        let err = ClassifyError::from(RejectionReason::TooLarge {
            size_bytes: 6,
            max_bytes: 5,
        });
        assert_eq!(err.code(), codes::TOO_LARGE);
        assert!(err.is_local());
    }

    #[test]
    fn empty_input_message_states_character_threshold() {
        let err = RejectionReason::EmptyInput { min_len: 10 };
        assert_eq!(
            err.to_string(),
            "email text must contain at least 10 characters"
        );
    }

    #[test]
    fn transport_failure_report_keeps_collaborator_message() {
        let err = ClassifyError::from(TransportError::Network("connection refused".into()));
        let report = err.report();
        assert_eq!(report.error, codes::TRANSPORT_FAILURE);
        assert!(report.message.contains("connection refused"));
        assert!(!err.is_local());
    }
}
