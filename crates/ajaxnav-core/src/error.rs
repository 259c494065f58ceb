//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Navigation error: {0}")]
    Navigation(#[from] ajaxnav_navigation::NavigationError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] ajaxnav_navigation::FetchError),

    #[error("Document error: {0}")]
    Dom(#[from] ajaxnav_dom::DomError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
