//! Navigator configuration
//!
//! The two historical flavours of link interception are expressed as presets
//! over the same three knobs: which anchors qualify, which element is the
//! default target, and which attribute (if any) names a per-link target.

use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::NavigationError;
use crate::Result;

/// Which anchors get a click handler at install time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkSelection {
    /// Every `<a>` below the element with this id
    Container { id: String },
    /// Every `<a>` carrying this attribute, anywhere in the document
    Marked { attribute: String },
}

impl LinkSelection {
    /// Selector matched against the container's descendants, or the whole
    /// document for marked links.
    pub fn anchor_selector(&self) -> String {
        match self {
            LinkSelection::Container { .. } => "a".to_string(),
            LinkSelection::Marked { attribute } => format!("a[{attribute}]"),
        }
    }
}

/// Header telling the server to answer with a fragment instead of a full page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialHeader {
    pub name: String,
    pub value: String,
}

impl Default for PartialHeader {
    fn default() -> Self {
        Self {
            name: "X-Requested-With".to_string(),
            value: "XMLHttpRequest".to_string(),
        }
    }
}

/// What to do with a response that arrives after a newer click on the same target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Apply every response; whichever resolves last is displayed
    #[default]
    LastResponseWins,
    /// Drop responses superseded by a newer click on the same target
    IgnoreStale,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    pub links: LinkSelection,
    /// Selector for the container replaced when a link names no target
    pub default_target: String,
    /// Attribute whose non-empty value is a per-link target selector
    #[serde(default)]
    pub target_attribute: Option<String>,
    #[serde(default)]
    pub partial_header: PartialHeader,
    #[serde(default)]
    pub stale_responses: StalePolicy,
}

impl NavigatorConfig {
    /// Links inside `#nav_main` replace `<main>` directly under `<body>`.
    pub fn nav_container() -> Self {
        Self {
            links: LinkSelection::Container {
                id: "nav_main".to_string(),
            },
            default_target: "body > main".to_string(),
            target_attribute: None,
            partial_header: PartialHeader::default(),
            stale_responses: StalePolicy::default(),
        }
    }

    /// Links marked with `data-ajax-nav` replace the `<main>` inside
    /// `#wrapper`, or the element selected by the attribute value.
    pub fn marked_links() -> Self {
        Self {
            links: LinkSelection::Marked {
                attribute: "data-ajax-nav".to_string(),
            },
            default_target: "#wrapper main".to_string(),
            target_attribute: Some("data-ajax-nav".to_string()),
            partial_header: PartialHeader::default(),
            stale_responses: StalePolicy::default(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| NavigationError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check selectors and the header before anything is installed.
    pub fn validate(&self) -> Result<()> {
        match &self.links {
            LinkSelection::Container { id } if id.trim().is_empty() => {
                return Err(NavigationError::Config(
                    "link container id cannot be empty".to_string(),
                ));
            }
            LinkSelection::Container { .. } => {}
            LinkSelection::Marked { .. } => {
                check_selector(&self.links.anchor_selector())?;
            }
        }

        check_selector(&self.default_target)?;

        if let Some(attribute) = &self.target_attribute {
            check_selector(&format!("[{attribute}]"))?;
        }

        HeaderName::from_bytes(self.partial_header.name.as_bytes())
            .map_err(|e| NavigationError::Config(format!("header name: {e}")))?;
        HeaderValue::from_str(&self.partial_header.value)
            .map_err(|e| NavigationError::Config(format!("header value: {e}")))?;

        Ok(())
    }
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self::nav_container()
    }
}

fn check_selector(selector: &str) -> Result<()> {
    ajaxnav_dom::parse_selector(selector)
        .map(|_| ())
        .map_err(|e| NavigationError::Config(e.to_string()))
}
