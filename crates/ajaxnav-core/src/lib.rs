//! ajaxnav Core
//!
//! Application layer over the document model and the navigator: loads a page,
//! installs partial-page navigation on it, and owns configuration and logging.

mod config;
mod error;
mod page;

pub use config::Config;
pub use error::CoreError;
pub use page::Page;

// Re-export core components
pub use ajaxnav_dom::{
    ClickEvent, DispatchOutcome, Document, DomError, EntryKind, HistoryApi, HistoryEntry,
    HistoryError, NodeId,
};
pub use ajaxnav_navigation::{
    AddressUpdate, AjaxNavigator, FetchError, FetchRequest, Fetcher, HttpFetcher,
    HttpFetcherOptions, LinkSelection, NavigationError, NavigationPhase, NavigationReport,
    NavigatorConfig, PartialHeader, StalePolicy,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging() -> bool {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
