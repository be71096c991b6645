use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use crate::classification::ClassificationResult;
use crate::config::SessionConfig;
use crate::error::ClassifyError;
use crate::history::{History, HistoryEntry, HistoryStats};
use crate::submission::{
    ActiveInput, FileCandidate, InputResolver, SourceKind, Submission, SubmissionDraft,
};
use crate::transport::Transport;

/// Where the session is in its request lifecycle.
///
/// A failed request goes straight back to `Idle`; `clear` always lands on `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Pending,
    Resolved,
}

/// Consistent copy of the session state, taken under one lock.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub loading: bool,
    pub result: Option<ClassificationResult>,
    pub history: Vec<HistoryEntry>,
}

struct SessionState {
    phase: Phase,
    result: Option<ClassificationResult>,
    history: History,
    draft: SubmissionDraft,
    /// Bumped by every dispatch and every clear; a response whose epoch no
    /// longer matches is returned to its caller but never applied.
    epoch: u64,
}

/// Owns the classification state for one user session and drives at most
/// one request at a time against a [`Transport`].
pub struct ClassificationSession<T> {
    transport: T,
    resolver: InputResolver,
    state: Mutex<SessionState>,
}

impl<T: Transport> ClassificationSession<T> {
    pub fn new(transport: T, config: &SessionConfig) -> Self {
        Self::with_history(
            transport,
            config.resolver(),
            History::new(config.history_seed.entries(), config.history_cap),
        )
    }

    pub fn with_history(transport: T, resolver: InputResolver, history: History) -> Self {
        Self {
            transport,
            resolver,
            state: Mutex::new(SessionState {
                phase: Phase::Idle,
                result: None,
                history,
                draft: SubmissionDraft::default(),
                epoch: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Dispatch a validated submission and wait for the outcome.
    ///
    /// Fails with `ConcurrentRequestRejected` without touching state when a
    /// request is already pending. On transport failure `result` and
    /// `history` are left exactly as they were.
    pub async fn classify(
        &self,
        submission: Submission,
    ) -> Result<ClassificationResult, ClassifyError> {
        let epoch = self.begin()?;
        let source = submission.source_kind();
        tracing::debug!(
            source = ?source,
            payload_bytes = submission.payload_len(),
            "dispatching classification"
        );

        let mut pending = PendingGuard {
            state: &self.state,
            epoch,
            armed: true,
        };
        let outcome = match &submission {
            Submission::Text(text) => self.transport.classify_text(&text.body).await,
            Submission::File(file) => self.transport.classify_file(file).await,
        };
        pending.armed = false;

        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!("session cleared while pending, discarding response");
            return outcome.map_err(ClassifyError::from);
        }

        match outcome {
            Ok(result) => {
                tracing::info!(
                    category = %result.category,
                    confidence = result.confidence,
                    is_urgent = result.is_urgent,
                    source = ?source,
                    "classification resolved"
                );
                state
                    .history
                    .prepend(HistoryEntry::from_result(&result, source));
                state.result = Some(result.clone());
                state.phase = Phase::Resolved;
                Ok(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, source = ?source, "classification failed");
                state.phase = Phase::Idle;
                Err(e.into())
            }
        }
    }

    fn begin(&self) -> Result<u64, ClassifyError> {
        let mut state = self.lock();
        if state.phase == Phase::Pending {
            tracing::warn!("rejected classification while another is pending");
            return Err(ClassifyError::ConcurrentRequestRejected);
        }
        state.phase = Phase::Pending;
        state.epoch += 1;
        Ok(state.epoch)
    }

    /// Resolve the current draft and classify it.
    pub async fn submit(&self) -> Result<ClassificationResult, ClassifyError> {
        let submission = {
            let state = self.lock();
            state.draft.resolve(&self.resolver)?
        };
        self.classify(submission).await
    }

    /// Back to `Idle`: drops the current result and the draft. History is kept.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.phase = Phase::Idle;
        state.result = None;
        state.draft.clear();
        state.epoch += 1;
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.lock().draft.set_text(text);
    }

    pub fn select_file(&self, file: FileCandidate) {
        self.lock().draft.select_file(file);
    }

    /// Load and select a file from disk. A file that fails validation is
    /// never selected and the draft stays as it was.
    pub fn select_file_path(&self, path: &Path) -> Result<(), ClassifyError> {
        let candidate = FileCandidate::load(path, &self.resolver)?;
        self.select_file(candidate);
        Ok(())
    }

    pub fn remove_file(&self) {
        self.lock().draft.remove_file();
    }

    /// Source kind of the input a `submit` would dispatch.
    pub fn active_source(&self) -> Option<SourceKind> {
        match self.lock().draft.active()? {
            ActiveInput::Text(_) => Some(SourceKind::Text),
            ActiveInput::File(_) => Some(SourceKind::File),
        }
    }

    pub fn can_submit(&self) -> bool {
        let state = self.lock();
        state.draft.can_submit(state.phase == Phase::Pending)
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == Phase::Pending
    }

    pub fn current_result(&self) -> Option<ClassificationResult> {
        self.lock().result.clone()
    }

    /// Most recent first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.lock().history.to_vec()
    }

    pub fn stats(&self) -> HistoryStats {
        self.lock().history.stats()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        SessionSnapshot {
            phase: state.phase,
            loading: state.phase == Phase::Pending,
            result: state.result.clone(),
            history: state.history.to_vec(),
        }
    }
}

/// Returns the session to `Idle` if a pending `classify` future is dropped
/// before its response arrives.
struct PendingGuard<'a> {
    state: &'a Mutex<SessionState>,
    epoch: u64,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.epoch == self.epoch && state.phase == Phase::Pending {
            tracing::debug!("pending classification dropped");
            state.phase = Phase::Idle;
        }
    }
}
