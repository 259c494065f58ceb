//! Click interception and content swap
//!
//! `AjaxNavigator::install` wires one click listener per qualifying anchor.
//! Each click prevents the default load and spawns its own task that fetches
//! the link, replaces the target container's content and moves the address
//! bar. Tasks are never coordinated with each other: with the default policy
//! the response that lands last is what stays on screen.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use ajaxnav_dom::{ClickEvent, Document, NodeId};
use futures_util::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::address::{set_location, AddressUpdate};
use crate::config::{LinkSelection, NavigatorConfig, StalePolicy};
use crate::error::NavigationError;
use crate::fetch::{FetchRequest, Fetcher};
use crate::state::NavigationPhase;
use crate::Result;

/// Outcome of one click task that ran to completion
#[derive(Debug, Clone, Serialize)]
pub struct NavigationReport {
    pub id: Uuid,
    pub url: Url,
    #[serde(skip)]
    pub target: NodeId,
    pub phase: NavigationPhase,
    /// `None` when the response was dropped as stale
    pub address: Option<AddressUpdate>,
}

/// Everything captured synchronously when the click happens
#[derive(Debug, Clone)]
struct PendingNavigation {
    id: Uuid,
    /// Resolved against the document URL at click time
    url: std::result::Result<Url, String>,
    target_override: Option<String>,
    target_key: String,
    generation: u64,
}

struct Inner {
    document: Document,
    fetcher: Arc<dyn Fetcher>,
    config: NavigatorConfig,
    default_target: Option<NodeId>,
    runtime: Handle,
    in_flight: Mutex<Vec<JoinHandle<Result<NavigationReport>>>>,
    /// Newest click per target selector
    generations: Mutex<HashMap<String, u64>>,
}

/// Partial-page navigation for one document.
///
/// Listeners only hold a weak reference: dropping the navigator turns them
/// into no-ops and links go back to loading full pages.
pub struct AjaxNavigator {
    inner: Arc<Inner>,
    links: Vec<NodeId>,
}

impl AjaxNavigator {
    /// Find the qualifying anchors and the default target, and attach a
    /// click listener to each anchor.
    ///
    /// Must be called from within a tokio runtime; click tasks are spawned
    /// onto it.
    pub fn install(
        document: Document,
        fetcher: Arc<dyn Fetcher>,
        config: NavigatorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| NavigationError::NoRuntime)?;

        let links = find_links(&document, &config.links)?;
        let default_target = document.query_selector(&config.default_target)?;
        if default_target.is_none() {
            tracing::debug!(
                selector = %config.default_target,
                "Default target not found; links without their own target will fail"
            );
        }

        let inner = Arc::new(Inner {
            document: document.clone(),
            fetcher,
            config,
            default_target,
            runtime,
            in_flight: Mutex::new(Vec::new()),
            generations: Mutex::new(HashMap::new()),
        });

        for &anchor in &links {
            let weak: Weak<Inner> = Arc::downgrade(&inner);
            document.add_event_listener(
                anchor,
                Arc::new(move |event: &mut ClickEvent| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_click(anchor, event);
                    }
                }),
            )?;
        }

        tracing::info!(
            links = links.len(),
            url = %document.url(),
            "AJAX navigation installed"
        );

        Ok(Self { inner, links })
    }

    /// Anchors captured at install time
    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    pub fn intercepts(&self, node: NodeId) -> bool {
        self.links.contains(&node)
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.inner.config
    }

    /// Click tasks that have not finished yet
    pub fn in_flight(&self) -> usize {
        self.inner
            .in_flight
            .lock()
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Wait for the click tasks still tracked and collect their results in
    /// click order.
    ///
    /// Tasks that had already finished when a later click came in are
    /// forgotten at that point; their outcome was logged when they ended.
    pub async fn settle(&self) -> Vec<Result<NavigationReport>> {
        let handles = std::mem::take(&mut *self.inner.in_flight.lock());

        join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(NavigationError::TaskAborted(e.to_string())),
            })
            .collect()
    }
}

impl Inner {
    fn on_click(self: Arc<Self>, anchor: NodeId, event: &mut ClickEvent) {
        event.prevent_default();

        let href = self.document.attr(anchor, "href").unwrap_or_default();
        let url = self.document.resolve(&href).map_err(|e| e.to_string());
        let target_override = self
            .config
            .target_attribute
            .as_deref()
            .and_then(|attribute| self.document.attr(anchor, attribute))
            .filter(|value| !value.trim().is_empty());
        let target_key = target_override
            .clone()
            .unwrap_or_else(|| self.config.default_target.clone());
        let generation = self.next_generation(&target_key);

        let pending = PendingNavigation {
            id: Uuid::new_v4(),
            url,
            target_override,
            target_key,
            generation,
        };

        tracing::debug!(
            navigation_id = %pending.id,
            href = %href,
            target = %pending.target_key,
            "Intercepted link click"
        );

        let task = Arc::clone(&self);
        let handle = self.runtime.spawn(task.navigate(pending));

        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|spawned| !spawned.is_finished());
        in_flight.push(handle);
    }

    fn next_generation(&self, target_key: &str) -> u64 {
        let mut generations = self.generations.lock();
        let generation = generations.entry(target_key.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }

    fn is_stale(&self, pending: &PendingNavigation) -> bool {
        self.config.stale_responses == StalePolicy::IgnoreStale
            && self.generations.lock().get(&pending.target_key) != Some(&pending.generation)
    }

    async fn navigate(self: Arc<Self>, pending: PendingNavigation) -> Result<NavigationReport> {
        let span = tracing::info_span!("navigation", navigation_id = %pending.id);
        let mut phase = NavigationPhase::Idle;
        let result = self.run(&pending, &mut phase).instrument(span).await;

        if let Err(err) = &result {
            let failed_in = phase;
            advance(&mut phase, NavigationPhase::Failed);
            // Nothing upstream handles these; the click simply did nothing.
            tracing::error!(
                navigation_id = %pending.id,
                phase = %phase,
                failed_in = %failed_in,
                error = %err,
                "Unhandled navigation failure"
            );
        }

        result
    }

    async fn run(
        &self,
        pending: &PendingNavigation,
        phase: &mut NavigationPhase,
    ) -> Result<NavigationReport> {
        advance(phase, NavigationPhase::NavigationSuppressed);

        let url = pending
            .url
            .clone()
            .map_err(NavigationError::InvalidUrl)?;

        advance(phase, NavigationPhase::Fetching);
        let request = FetchRequest::partial(url.clone(), &self.config.partial_header);
        let body = self.fetcher.fetch(&request).await?;

        let target = self.resolve_target(pending)?;

        if self.is_stale(pending) {
            advance(phase, NavigationPhase::Superseded);
            return Ok(NavigationReport {
                id: pending.id,
                url,
                target,
                phase: *phase,
                address: None,
            });
        }

        self.document.set_inner_html(target, &body)?;
        let address = set_location(&self.document, &url);
        advance(phase, NavigationPhase::Applied);

        tracing::info!(
            url = %url,
            location = %address.location(),
            bytes = body.len(),
            "Swapped content"
        );

        Ok(NavigationReport {
            id: pending.id,
            url,
            target,
            phase: *phase,
            address: Some(address),
        })
    }

    /// The per-link selector is looked up after the response arrives, so it
    /// sees whatever the document looks like by then.
    fn resolve_target(&self, pending: &PendingNavigation) -> Result<NodeId> {
        match &pending.target_override {
            Some(selector) => self
                .document
                .query_selector(selector)?
                .ok_or_else(|| NavigationError::MissingTarget(selector.clone())),
            None => self
                .default_target
                .ok_or_else(|| NavigationError::MissingTarget(self.config.default_target.clone())),
        }
    }
}

fn advance(phase: &mut NavigationPhase, next: NavigationPhase) {
    debug_assert!(phase.can_transition_to(next), "{phase} -> {next}");
    tracing::debug!(from = %phase, to = %next, "Navigation phase");
    *phase = next;
}

fn find_links(document: &Document, links: &LinkSelection) -> Result<Vec<NodeId>> {
    match links {
        LinkSelection::Container { id } => match document.element_by_id(id) {
            Some(container) => {
                Ok(document.query_selector_all_within(container, &links.anchor_selector())?)
            }
            None => {
                tracing::warn!(container = %id, "Link container not found; no links intercepted");
                Ok(Vec::new())
            }
        },
        LinkSelection::Marked { .. } => Ok(document.query_selector_all(&links.anchor_selector())?),
    }
}
