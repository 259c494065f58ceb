//! ajaxnav Navigation
//!
//! Partial-page navigation:
//!   1. Clicks on qualifying links are intercepted
//!   2. The link is fetched with `X-Requested-With: XMLHttpRequest`
//!   3. The response replaces the target container's content
//!   4. The address bar moves to the link (history push, else `#<url>`)
//!
//! Qualifying links are chosen either by container (`#nav_main a`) or by a
//! marker attribute, which may also name a per-link target.

mod address;
mod config;
mod error;
mod fetch;
mod navigator;
mod state;

pub use address::{set_location, AddressUpdate};
pub use config::{LinkSelection, NavigatorConfig, PartialHeader, StalePolicy};
pub use error::NavigationError;
pub use fetch::{FetchError, FetchRequest, Fetcher, HttpFetcher, HttpFetcherOptions};
pub use navigator::{AjaxNavigator, NavigationReport};
pub use state::NavigationPhase;

pub type Result<T> = std::result::Result<T, NavigationError>;
