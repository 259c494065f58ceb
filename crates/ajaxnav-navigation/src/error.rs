//! Navigation error types

use thiserror::Error;

use crate::fetch::FetchError;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("No element matches target selector: {0}")]
    MissingTarget(String),

    #[error("Document error: {0}")]
    Dom(#[from] ajaxnav_dom::DomError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No async runtime available to run navigations")]
    NoRuntime,

    #[error("Navigation task aborted: {0}")]
    TaskAborted(String),
}
