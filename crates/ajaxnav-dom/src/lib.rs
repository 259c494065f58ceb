//! ajaxnav Document Model
//!
//! A headless stand-in for the live page: an HTML tree that can be queried
//! with CSS selectors and rewritten through `innerHTML`, click dispatch with
//! listeners and default actions, and the session history behind the
//! address bar.

mod document;
mod error;
mod event;
mod history;

pub use document::{parse_selector, Document};
pub use error::{DomError, HistoryError};
pub use event::{ClickEvent, DispatchOutcome, Listener};
pub use history::{EntryKind, HistoryApi, HistoryEntry, SessionHistory};

pub use ego_tree::NodeId;

pub type Result<T> = std::result::Result<T, DomError>;
