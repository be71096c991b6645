use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, RejectionReason};

pub const ACCEPTED_MIME_TYPES: [&str; 2] = ["text/plain", "application/pdf"];
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_MIN_TEXT_LEN: usize = 10;

/// Where a submission came from. Recorded on every history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Text,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSubmission {
    /// Trimmed email body
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSubmission {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub bytes: Vec<u8>,
}

/// A validated payload, ready for dispatch. Exactly one variant is ever active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Text(TextSubmission),
    File(FileSubmission),
}

impl Submission {
    pub fn source_kind(&self) -> SourceKind {
        match self {
            Self::Text(_) => SourceKind::Text,
            Self::File(_) => SourceKind::File,
        }
    }

    pub fn payload_len(&self) -> u64 {
        match self {
            Self::Text(text) => text.body.len() as u64,
            Self::File(file) => file.size_bytes,
        }
    }
}

/// A file the user picked, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    /// Stat `path`, check type and size against `resolver`, then read the bytes.
    /// Nothing is read from a file that would be rejected.
    pub fn load(path: &Path, resolver: &InputResolver) -> Result<Self, ClassifyError> {
        let file_read = |e: std::io::Error| ClassifyError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let metadata = std::fs::metadata(path).map_err(file_read)?;
        let mime_type = mime_type_for_path(path).to_string();
        let size_bytes = metadata.len();
        resolver.check_file(&mime_type, size_bytes)?;

        let bytes = std::fs::read(path).map_err(file_read)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            mime_type,
            size_bytes: bytes.len() as u64,
            bytes,
        })
    }
}

/// Infer the declared MIME type from the file extension.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Stateless validation of a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputResolver {
    min_text_len: usize,
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TEXT_LEN)
    }
}

impl InputResolver {
    /// `min_text_len` counts characters of the trimmed body; 0 and 1 both
    /// accept any non-empty text.
    pub fn new(min_text_len: usize) -> Self {
        Self {
            min_text_len: min_text_len.max(1),
        }
    }

    pub fn min_text_len(&self) -> usize {
        self.min_text_len
    }

    /// Whether `raw` would pass [`resolve_text`](Self::resolve_text).
    pub fn text_is_acceptable(&self, raw: &str) -> bool {
        raw.trim().chars().count() >= self.min_text_len
    }

    pub fn resolve_text(&self, raw: &str) -> Result<Submission, RejectionReason> {
        if !self.text_is_acceptable(raw) {
            return Err(RejectionReason::EmptyInput {
                min_len: self.min_text_len,
            });
        }
        Ok(Submission::Text(TextSubmission {
            body: raw.trim().to_string(),
        }))
    }

    /// Type and size checks, run on declared metadata only.
    pub fn check_file(&self, mime_type: &str, size_bytes: u64) -> Result<(), RejectionReason> {
        if !ACCEPTED_MIME_TYPES.contains(&mime_type) {
            return Err(RejectionReason::UnsupportedType {
                mime_type: mime_type.to_string(),
            });
        }
        if size_bytes > MAX_UPLOAD_BYTES {
            return Err(RejectionReason::TooLarge {
                size_bytes,
                max_bytes: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }

    pub fn resolve_file(&self, candidate: FileCandidate) -> Result<Submission, RejectionReason> {
        self.check_file(&candidate.mime_type, candidate.size_bytes)?;
        Ok(Submission::File(FileSubmission {
            name: candidate.name,
            mime_type: candidate.mime_type,
            size_bytes: candidate.size_bytes,
            bytes: candidate.bytes,
        }))
    }
}

/// Borrowed view of whichever input would be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveInput<'a> {
    Text(&'a str),
    File(&'a FileCandidate),
}

/// Pending input before dispatch. Text and file are mutually exclusive:
/// picking one discards the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionDraft {
    text: String,
    file: Option<FileCandidate>,
}

impl SubmissionDraft {
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if !self.text.trim().is_empty() {
            self.file = None;
        }
    }

    pub fn select_file(&mut self, file: FileCandidate) {
        self.file = Some(file);
        self.text.clear();
    }

    pub fn remove_file(&mut self) {
        self.file = None;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.file = None;
    }

    /// The input a submit would use. A selected file always wins over text.
    pub fn active(&self) -> Option<ActiveInput<'_>> {
        if let Some(file) = &self.file {
            return Some(ActiveInput::File(file));
        }
        if self.text.trim().is_empty() {
            None
        } else {
            Some(ActiveInput::Text(&self.text))
        }
    }

    /// Submit affordance: something to send and nothing in flight.
    pub fn can_submit(&self, loading: bool) -> bool {
        !loading && self.active().is_some()
    }

    pub fn resolve(&self, resolver: &InputResolver) -> Result<Submission, RejectionReason> {
        match self.active() {
            Some(ActiveInput::File(file)) => resolver.resolve_file(file.clone()),
            Some(ActiveInput::Text(text)) => resolver.resolve_text(text),
            None => Err(RejectionReason::EmptyInput {
                min_len: resolver.min_text_len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn candidate(mime_type: &str, size_bytes: u64) -> FileCandidate {
        FileCandidate {
            name: "email.txt".to_string(),
            mime_type: mime_type.to_string(),
            size_bytes,
            bytes: b"Prezados, segue o relatorio".to_vec(),
        }
    }

    #[test]
    fn whitespace_only_text_is_empty_input() {
        let resolver = InputResolver::new(1);
        for raw in ["", "   ", "\n\t  \r\n"] {
            assert_eq!(
                resolver.resolve_text(raw),
                Err(RejectionReason::EmptyInput { min_len: 1 })
            );
        }
    }

    #[test]
    fn text_below_minimum_length_is_rejected() {
        let resolver = InputResolver::default();
        assert!(resolver.resolve_text("  oi tudo  ").is_err());
        assert!(resolver.resolve_text("Bom dia, equipe").is_ok());
    }

    #[test]
    fn minimum_length_counts_characters_not_bytes() {
        let resolver = InputResolver::new(10);
        assert!(resolver.resolve_text("ééééééééé é").is_ok());
        assert!(!resolver.text_is_acceptable("ééééééééé"));
    }

    #[test]
    fn inner_spaces_count_toward_minimum_length() {
        let resolver = InputResolver::new(10);
        assert!(resolver.resolve_text("  a b c d e  ").is_err());
        assert!(resolver.resolve_text("  a b c d ef  ").is_ok());
    }

    #[test]
    fn resolved_text_is_trimmed() {
        let resolver = InputResolver::default();
        let submission = resolver
            .resolve_text("  Obrigado pela ajuda, tudo certo!\n")
            .expect("text should resolve");
        assert_eq!(
            submission,
            Submission::Text(TextSubmission {
                body: "Obrigado pela ajuda, tudo certo!".to_string()
            })
        );
    }

    #[test]
    fn unsupported_mime_type_is_rejected() {
        let resolver = InputResolver::default();
        for mime in ["image/png", "application/msword", "text/html", ""] {
            let err = resolver
                .resolve_file(candidate(mime, 10))
                .expect_err("mime type should be rejected");
            assert!(matches!(err, RejectionReason::UnsupportedType { .. }));
        }
    }

    #[test]
    fn size_limit_is_inclusive() {
        let resolver = InputResolver::default();
        assert!(resolver.resolve_file(candidate("application/pdf", MAX_UPLOAD_BYTES)).is_ok());
        assert_eq!(
            resolver.resolve_file(candidate("text/plain", MAX_UPLOAD_BYTES + 1)),
            Err(RejectionReason::TooLarge {
                size_bytes: MAX_UPLOAD_BYTES + 1,
                max_bytes: MAX_UPLOAD_BYTES,
            })
        );
    }

    #[test]
    fn type_is_checked_before_size() {
        let resolver = InputResolver::default();
        let err = resolver
            .resolve_file(candidate("image/png", MAX_UPLOAD_BYTES * 2))
            .expect_err("should be rejected");
        assert!(matches!(err, RejectionReason::UnsupportedType { .. }));
    }

    #[test]
    fn mime_type_is_inferred_from_extension() {
        assert_eq!(mime_type_for_path(Path::new("a/b/email.TXT")), "text/plain");
        assert_eq!(mime_type_for_path(Path::new("report.pdf")), "application/pdf");
        assert_eq!(
            mime_type_for_path(Path::new("notes.docx")),
            "application/octet-stream"
        );
        assert_eq!(mime_type_for_path(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn file_wins_when_both_inputs_are_present() {
        let mut draft = SubmissionDraft::default();
        draft.set_text("Reuniao amanha as 14h, confirme presenca");
        draft.select_file(candidate("text/plain", 27));

        assert!(matches!(draft.active(), Some(ActiveInput::File(_))));
        let submission = draft
            .resolve(&InputResolver::default())
            .expect("file should resolve");
        assert_eq!(submission.source_kind(), SourceKind::File);
    }

    #[test]
    fn typing_text_discards_selected_file() {
        let mut draft = SubmissionDraft::default();
        draft.select_file(candidate("text/plain", 27));
        draft.set_text("Reuniao amanha as 14h, confirme presenca");
        assert!(matches!(draft.active(), Some(ActiveInput::Text(_))));

        draft.remove_file();
        assert!(matches!(draft.active(), Some(ActiveInput::Text(_))));
    }

    #[test]
    fn empty_draft_cannot_submit() {
        let mut draft = SubmissionDraft::default();
        assert!(!draft.can_submit(false));
        assert_eq!(
            draft.resolve(&InputResolver::new(10)),
            Err(RejectionReason::EmptyInput { min_len: 10 })
        );

        draft.set_text("Relatorio mensal em anexo");
        assert!(draft.can_submit(false));
        assert!(!draft.can_submit(true));

        draft.clear();
        assert_eq!(draft.active(), None);
    }

    #[test]
    fn load_rejects_oversized_file_from_metadata() {
        let path = std::env::temp_dir().join(format!(
            "sparkmail-oversized-{}.txt",
            std::process::id()
        ));
        let file = std::fs::File::create(&path).expect("create temp file");
        file.set_len(MAX_UPLOAD_BYTES + 1024 * 1024)
            .expect("extend temp file");
        drop(file);

        let err = FileCandidate::load(&path, &InputResolver::default())
            .expect_err("6 MiB file should be rejected");
        std::fs::remove_file(&path).ok();
        assert!(matches!(
            err,
            ClassifyError::Rejected(RejectionReason::TooLarge { .. })
        ));
    }

    #[test]
    fn load_reads_accepted_file() {
        let path = std::env::temp_dir().join(format!(
            "sparkmail-accepted-{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, "Servidor fora do ar, preciso de suporte").expect("write temp file");

        let loaded = FileCandidate::load(&path, &InputResolver::default());
        std::fs::remove_file(&path).ok();
        let loaded = loaded.expect("file should load");
        assert_eq!(loaded.mime_type, "text/plain");
        assert_eq!(loaded.size_bytes, loaded.bytes.len() as u64);
        assert!(loaded.name.starts_with("sparkmail-accepted-"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FileCandidate::load(
            Path::new("/nonexistent/sparkmail/email.txt"),
            &InputResolver::default(),
        )
        .expect_err("missing file should fail");
        assert!(matches!(err, ClassifyError::FileRead { .. }));
    }
}
