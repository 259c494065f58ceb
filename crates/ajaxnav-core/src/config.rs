//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use ajaxnav_navigation::{HttpFetcherOptions, NavigatorConfig};

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page loaded by `Page::open`
    pub start_url: String,
    /// Link selection and target settings
    pub navigator: NavigatorConfig,
    /// User agent sent with every request
    pub user_agent: String,
    /// Abandon requests after this many seconds; unset waits indefinitely
    pub request_timeout_secs: Option<u64>,
    pub max_redirects: usize,
}

impl Config {
    /// Environment variable naming a JSON config file
    pub const ENV_VAR: &'static str = "AJAXNAV_CONFIG";

    pub fn new(start_url: impl Into<String>) -> Self {
        let http = HttpFetcherOptions::default();

        Self {
            start_url: start_url.into(),
            navigator: NavigatorConfig::default(),
            user_agent: http.user_agent,
            request_timeout_secs: None,
            max_redirects: http.max_redirects,
        }
    }

    /// Read and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded config");
        Ok(config)
    }

    /// Load the file named by `AJAXNAV_CONFIG`, or fall back to defaults.
    pub fn discover() -> Result<Self> {
        match std::env::var(Self::ENV_VAR) {
            Ok(path) => Self::load(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.start_url()?;
        self.navigator.validate()?;
        Ok(())
    }

    pub fn start_url(&self) -> Result<Url> {
        Url::parse(&self.start_url).map_err(|e| CoreError::Config(format!("start_url: {e}")))
    }

    pub fn http_options(&self) -> HttpFetcherOptions {
        HttpFetcherOptions {
            user_agent: self.user_agent.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
            max_redirects: self.max_redirects,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8080/")
    }
}
