//! Address bar updates after a swap

use ajaxnav_dom::{Document, HistoryError};
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum AddressUpdate {
    /// New history entry at the link URL
    Pushed { location: Url },
    /// History push refused; the link URL was written into the fragment
    HashFallback {
        location: Url,
        #[serde(skip)]
        reason: HistoryError,
    },
}

impl AddressUpdate {
    /// What the address bar shows afterwards
    pub fn location(&self) -> &Url {
        match self {
            AddressUpdate::Pushed { location } | AddressUpdate::HashFallback { location, .. } => {
                location
            }
        }
    }
}

/// Point the address bar at `target` without reloading.
///
/// Tries a history push first. Any history fault falls back to
/// `#<target>`; the fault is only reported back in the return value.
pub fn set_location(document: &Document, target: &Url) -> AddressUpdate {
    match document.push_state(target.as_str()) {
        Ok(()) => AddressUpdate::Pushed {
            location: document.url(),
        },
        Err(reason) => {
            document.set_location_hash(&format!("#{target}"));
            AddressUpdate::HashFallback {
                location: document.url(),
                reason,
            }
        }
    }
}
