//! A loaded page with AJAX navigation installed

use std::sync::Arc;

use ajaxnav_dom::{DispatchOutcome, Document, DomError};
use ajaxnav_navigation::{
    AjaxNavigator, FetchRequest, Fetcher, HttpFetcher, NavigationReport, NavigatorConfig,
};
use url::Url;

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

pub struct Page {
    document: Document,
    navigator: AjaxNavigator,
}

impl Page {
    /// Load `start_url` as a full document and install the navigator on it.
    ///
    /// The initial load is a plain GET; only link clicks ask for fragments.
    pub async fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let url = config.start_url()?;
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(config.http_options())?);

        let markup = fetcher.fetch(&FetchRequest::document(url.clone())).await?;
        tracing::info!(url = %url, bytes = markup.len(), "Loaded page");

        Self::from_markup(url, &markup, fetcher, config.navigator.clone())
    }

    /// Build a page from markup that is already at hand.
    pub fn from_markup(
        url: Url,
        markup: &str,
        fetcher: Arc<dyn Fetcher>,
        navigator: NavigatorConfig,
    ) -> Result<Self> {
        let document = Document::parse(url, markup);
        let navigator = AjaxNavigator::install(document.clone(), fetcher, navigator)?;

        Ok(Self {
            document,
            navigator,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn navigator(&self) -> &AjaxNavigator {
        &self.navigator
    }

    pub fn url(&self) -> Url {
        self.document.url()
    }

    /// Click the first element matching `selector`.
    pub fn click(&self, selector: &str) -> Result<DispatchOutcome> {
        let node = self
            .document
            .query_selector(selector)?
            .ok_or(CoreError::Dom(DomError::NodeNotFound))?;

        Ok(self.document.click(node)?)
    }

    /// Wait for all navigations started so far.
    pub async fn settle(&self) -> Vec<ajaxnav_navigation::Result<NavigationReport>> {
        self.navigator.settle().await
    }
}
