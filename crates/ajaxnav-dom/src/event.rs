//! Click events and listeners

use std::sync::Arc;

use ego_tree::NodeId;
use url::Url;

/// A click listener. Listeners run synchronously during dispatch and must not block.
pub type Listener = Arc<dyn Fn(&mut ClickEvent) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ClickEvent {
    /// Element the click landed on
    pub target: NodeId,
    /// Element whose listeners are currently running
    pub current_target: NodeId,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl ClickEvent {
    pub(crate) fn new(target: NodeId) -> Self {
        Self {
            target,
            current_target: target,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// What happened after listeners ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A listener called `prevent_default`
    Prevented,
    /// Nothing to do by default (not inside a link)
    NoDefaultAction,
    /// The browser would have loaded this URL as a new document
    FullLoad(Url),
}

impl DispatchOutcome {
    pub fn is_prevented(&self) -> bool {
        matches!(self, DispatchOutcome::Prevented)
    }
}
