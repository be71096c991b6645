pub mod classification;
pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod submission;
pub mod transport;

pub use classification::ClassificationResult;
pub use config::{HistorySeed, SessionConfig};
pub use error::{ClassifyError, RejectionReason, TransportError};
pub use history::{HistoryEntry, HistoryStats};
pub use session::{ClassificationSession, Phase, SessionSnapshot};
pub use submission::{FileCandidate, InputResolver, SourceKind, Submission, SubmissionDraft};
pub use transport::{HttpTransport, Transport};
