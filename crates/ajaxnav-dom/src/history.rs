//! Session history and location

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::HistoryError;

/// Whether `push_state` is usable in this document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryApi {
    #[default]
    Available,
    Unavailable,
}

/// How an entry entered the session history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Initial document load
    Load,
    /// `history.pushState`
    PushState,
    /// Same-document fragment change
    Fragment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: Url,
    pub kind: EntryKind,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(url: Url, kind: EntryKind) -> Self {
        Self {
            url,
            kind,
            recorded_at: Utc::now(),
        }
    }
}

/// Append-only session history; the last entry is the current location.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    api: HistoryApi,
}

impl SessionHistory {
    pub fn new(url: Url) -> Self {
        Self {
            entries: vec![HistoryEntry::new(url, EntryKind::Load)],
            api: HistoryApi::Available,
        }
    }

    /// The URL shown in the address bar
    pub fn current(&self) -> &Url {
        // `new` seeds one entry and nothing removes entries.
        &self.entries[self.entries.len() - 1].url
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn api(&self) -> HistoryApi {
        self.api
    }

    pub fn set_api(&mut self, api: HistoryApi) {
        self.api = api;
    }

    /// Push a new entry without reloading, the way `pushState(null, null, url)` does.
    pub fn push_state(&mut self, url: &str) -> Result<(), HistoryError> {
        if self.api == HistoryApi::Unavailable {
            return Err(HistoryError::Unsupported);
        }

        let current = self.current();
        let resolved = current
            .join(url)
            .map_err(|e| HistoryError::InvalidUrl(format!("{url}: {e}")))?;

        if resolved.origin() != current.origin() {
            return Err(HistoryError::SecurityError {
                url: resolved.to_string(),
                origin: current.origin().ascii_serialization(),
            });
        }

        tracing::debug!(url = %resolved, "History push");
        self.entries
            .push(HistoryEntry::new(resolved, EntryKind::PushState));
        Ok(())
    }

    /// Assign `location.hash`. One leading `#` is stripped.
    ///
    /// Returns `true` when the location changed and an entry was recorded.
    pub fn set_hash(&mut self, hash: &str) -> bool {
        let fragment = hash.strip_prefix('#').unwrap_or(hash);
        let mut next = self.current().clone();
        next.set_fragment(Some(fragment));

        if &next == self.current() {
            return false;
        }

        tracing::debug!(url = %next, "Location hash change");
        self.entries.push(HistoryEntry::new(next, EntryKind::Fragment));
        true
    }
}
