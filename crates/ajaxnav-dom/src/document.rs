//! Shared document handle
//!
//! The document is the only mutable state shared between click handlers, so it
//! lives behind one lock. No lock guard ever escapes a method, which keeps
//! callers free to hold a `Document` across `.await` points.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ego_tree::{NodeId, NodeRef, Tree};
use parking_lot::Mutex;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::error::{DomError, HistoryError};
use crate::event::{ClickEvent, DispatchOutcome, Listener};
use crate::history::{HistoryApi, HistoryEntry, SessionHistory};
use crate::Result;

/// Parse a CSS selector list.
pub fn parse_selector(selectors: &str) -> Result<Selector> {
    Selector::parse(selectors)
        .map_err(|e| DomError::InvalidSelector(format!("{selectors}: {e}")))
}

struct DocumentState {
    html: Html,
    history: SessionHistory,
    listeners: HashMap<NodeId, Vec<Listener>>,
    full_loads: Vec<Url>,
}

impl DocumentState {
    fn element(&self, id: NodeId) -> Result<ElementRef<'_>> {
        let node = self.html.tree.get(id).ok_or(DomError::NodeNotFound)?;
        ElementRef::wrap(node).ok_or(DomError::NotAnElement)
    }

    /// Target first, then every element ancestor up to the root.
    fn propagation_path(&self, target: NodeId) -> Result<Vec<NodeId>> {
        let element = self.element(target)?;
        let node: &NodeRef<'_, Node> = &element;

        Ok(std::iter::once(*node)
            .chain(node.ancestors())
            .filter(|n| n.value().is_element())
            .map(|n| n.id())
            .collect())
    }

    fn link_href(&self, id: NodeId) -> Option<String> {
        let element = self.element(id).ok()?;
        if element.value().name() != "a" {
            return None;
        }
        element.value().attr("href").map(str::to_string)
    }
}

/// Cheaply cloneable handle to a live document.
#[derive(Clone)]
pub struct Document {
    state: Arc<Mutex<DocumentState>>,
}

impl Document {
    /// Parse a full HTML document loaded from `url`.
    pub fn parse(url: Url, markup: &str) -> Self {
        let html = Html::parse_document(markup);
        tracing::debug!(url = %url, "Parsed document");

        Self {
            state: Arc::new(Mutex::new(DocumentState {
                html,
                history: SessionHistory::new(url),
                listeners: HashMap::new(),
                full_loads: Vec::new(),
            })),
        }
    }

    /// Current address bar URL
    pub fn url(&self) -> Url {
        self.state.lock().history.current().clone()
    }

    /// Resolve a possibly relative reference against the current URL.
    pub fn resolve(&self, href: &str) -> Result<Url> {
        self.state
            .lock()
            .history
            .current()
            .join(href)
            .map_err(|e| DomError::InvalidUrl(format!("{href}: {e}")))
    }

    pub fn query_selector(&self, selectors: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selectors)?.into_iter().next())
    }

    /// All matching elements in document order.
    pub fn query_selector_all(&self, selectors: &str) -> Result<Vec<NodeId>> {
        let selector = parse_selector(selectors)?;
        let state = self.state.lock();

        Ok(state.html.select(&selector).map(element_id).collect())
    }

    /// Matching descendants of `scope`, excluding `scope` itself.
    pub fn query_selector_all_within(&self, scope: NodeId, selectors: &str) -> Result<Vec<NodeId>> {
        let selector = parse_selector(selectors)?;
        let state = self.state.lock();
        let scope = state.element(scope)?;

        Ok(scope.select(&selector).map(element_id).collect())
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let state = self.state.lock();
        let found = state
            .html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(id))
            .map(element_id);
        found
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        let state = self.state.lock();
        let value = state
            .element(node)
            .ok()
            .and_then(|el| el.value().attr(name).map(str::to_string));
        value
    }

    pub fn tag_name(&self, node: NodeId) -> Result<String> {
        let state = self.state.lock();
        let name = state.element(node)?.value().name().to_string();
        Ok(name)
    }

    pub fn inner_html(&self, node: NodeId) -> Result<String> {
        let state = self.state.lock();
        let html = state.element(node)?.inner_html();
        Ok(html)
    }

    pub fn text_content(&self, node: NodeId) -> Result<String> {
        let state = self.state.lock();
        let text = state.element(node)?.text().collect::<String>();
        Ok(text)
    }

    /// Serialize the whole document
    pub fn html(&self) -> String {
        self.state.lock().html.html()
    }

    /// Replace every child of `node` with the parsed markup. The markup is
    /// inserted as-is; nothing is escaped or sanitized.
    pub fn set_inner_html(&self, node: NodeId, markup: &str) -> Result<()> {
        let fragment = Html::parse_fragment(markup);
        let mut state = self.state.lock();
        state.element(node)?;

        let children: Vec<NodeId> = state
            .html
            .tree
            .get(node)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default();
        for child in children {
            if let Some(mut child) = state.html.tree.get_mut(child) {
                child.detach();
            }
        }

        graft_fragment(&mut state.html.tree, node, &fragment);
        Ok(())
    }

    /// Append the parsed markup after the existing children of `node`.
    pub fn append_html(&self, node: NodeId, markup: &str) -> Result<()> {
        let fragment = Html::parse_fragment(markup);
        let mut state = self.state.lock();
        state.element(node)?;

        graft_fragment(&mut state.html.tree, node, &fragment);
        Ok(())
    }

    pub fn add_event_listener(&self, node: NodeId, listener: Listener) -> Result<()> {
        let mut state = self.state.lock();
        state.element(node)?;
        state.listeners.entry(node).or_default().push(listener);
        Ok(())
    }

    pub fn has_listeners(&self, node: NodeId) -> bool {
        self.state
            .lock()
            .listeners
            .get(&node)
            .is_some_and(|l| !l.is_empty())
    }

    /// Dispatch a user click on `target`.
    ///
    /// Listeners run on the target and then on each ancestor. When none of
    /// them prevents the default and the click is inside a link, the link is
    /// followed as a full document load.
    pub fn click(&self, target: NodeId) -> Result<DispatchOutcome> {
        let path = self.state.lock().propagation_path(target)?;
        let mut event = ClickEvent::new(target);

        for &node in &path {
            // Listeners may touch the document, so run them unlocked.
            let listeners = self
                .state
                .lock()
                .listeners
                .get(&node)
                .cloned()
                .unwrap_or_default();

            event.current_target = node;
            for listener in listeners {
                listener(&mut event);
            }

            if event.propagation_stopped() {
                break;
            }
        }

        if event.default_prevented() {
            return Ok(DispatchOutcome::Prevented);
        }

        let mut state = self.state.lock();
        let Some(href) = path.iter().find_map(|&node| state.link_href(node)) else {
            return Ok(DispatchOutcome::NoDefaultAction);
        };

        let url = state
            .history
            .current()
            .join(&href)
            .map_err(|e| DomError::InvalidUrl(format!("{href}: {e}")))?;

        tracing::debug!(url = %url, "Following link with a full load");
        state.full_loads.push(url.clone());
        Ok(DispatchOutcome::FullLoad(url))
    }

    /// Links that were followed as full document loads.
    pub fn full_loads(&self) -> Vec<Url> {
        self.state.lock().full_loads.clone()
    }

    pub fn push_state(&self, url: &str) -> std::result::Result<(), HistoryError> {
        self.state.lock().history.push_state(url)
    }

    pub fn set_location_hash(&self, hash: &str) -> bool {
        self.state.lock().history.set_hash(hash)
    }

    pub fn set_history_api(&self, api: HistoryApi) {
        self.state.lock().history.set_api(api);
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().history.entries().to_vec()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url().as_str())
            .finish_non_exhaustive()
    }
}

fn element_id(element: ElementRef<'_>) -> NodeId {
    let node: &NodeRef<'_, Node> = &element;
    node.id()
}

/// Copy the top-level nodes of a parsed fragment under `parent`.
fn graft_fragment(tree: &mut Tree<Node>, parent: NodeId, fragment: &Html) {
    for child in fragment.root_element().children() {
        graft(tree, parent, child);
    }
}

fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) {
    let Some(mut parent_node) = tree.get_mut(parent) else {
        return;
    };
    let id = parent_node.append(source.value().clone()).id();

    for child in source.children() {
        graft(tree, id, child);
    }
}
