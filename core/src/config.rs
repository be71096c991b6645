use std::time::Duration;

use crate::error::TransportError;
use crate::history::{HistoryEntry, demo_entries};
use crate::submission::{DEFAULT_MIN_TEXT_LEN, InputResolver};
use crate::transport::HttpTransport;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// What a fresh session's history starts with.
#[derive(Debug, Clone, Default)]
pub enum HistorySeed {
    #[default]
    Empty,
    /// Built-in sample entries
    Demo,
    Entries(Vec<HistoryEntry>),
}

impl HistorySeed {
    pub fn entries(&self) -> Vec<HistoryEntry> {
        match self {
            Self::Empty => Vec::new(),
            Self::Demo => demo_entries(),
            Self::Entries(entries) => entries.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub api_url: String,
    /// Minimum trimmed text length, in characters
    pub min_text_len: usize,
    pub request_timeout: Duration,
    /// `None` keeps every entry for the life of the session
    pub history_cap: Option<usize>,
    pub history_seed: HistorySeed,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            history_cap: None,
            history_seed: HistorySeed::Empty,
        }
    }
}

impl SessionConfig {
    pub fn resolver(&self) -> InputResolver {
        InputResolver::new(self.min_text_len)
    }

    pub fn http_transport(&self) -> Result<HttpTransport, TransportError> {
        HttpTransport::new(&self.api_url, self.request_timeout)
    }
}
