//! Per-click navigation phases
//!
//! ```text
//! Idle
//!   ↓ click
//! NavigationSuppressed
//!   ↓ request sent
//! Fetching
//!   ↓ response applied      ↓ fault          ↓ newer click on same target
//! Applied                  Failed           Superseded
//! ```
//!
//! Nothing returns to `Idle`; every click runs its own instance.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPhase {
    Idle,
    /// Default action prevented, nothing sent yet
    NavigationSuppressed,
    /// Waiting for the response body
    Fetching,
    /// Content replaced and address bar updated
    Applied,
    /// Dropped because a newer click targets the same container
    Superseded,
    /// Unhandled fault; content left as it was
    Failed,
}

impl NavigationPhase {
    pub fn can_transition_to(&self, target: NavigationPhase) -> bool {
        use NavigationPhase::*;

        match (self, target) {
            (Idle, NavigationSuppressed) => true,
            (NavigationSuppressed, Fetching) => true,
            // An unresolvable href fails before anything is sent
            (NavigationSuppressed, Failed) => true,
            (Fetching, Applied) | (Fetching, Failed) | (Fetching, Superseded) => true,
            _ => false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NavigationPhase::Applied | NavigationPhase::Superseded | NavigationPhase::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationPhase::Idle => "idle",
            NavigationPhase::NavigationSuppressed => "navigation_suppressed",
            NavigationPhase::Fetching => "fetching",
            NavigationPhase::Applied => "applied",
            NavigationPhase::Superseded => "superseded",
            NavigationPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for NavigationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        use NavigationPhase::*;

        assert!(Idle.can_transition_to(NavigationSuppressed));
        assert!(NavigationSuppressed.can_transition_to(Fetching));
        assert!(NavigationSuppressed.can_transition_to(Failed));
        assert!(Fetching.can_transition_to(Applied));
        assert!(Fetching.can_transition_to(Failed));
        assert!(Fetching.can_transition_to(Superseded));
    }

    #[test]
    fn test_invalid_transitions() {
        use NavigationPhase::*;

        // Fetching never starts before the default is suppressed
        assert!(!Idle.can_transition_to(Fetching));
        // No way back
        assert!(!Applied.can_transition_to(Idle));
        assert!(!Failed.can_transition_to(Fetching));
        assert!(!Applied.can_transition_to(Applied));
        assert!(Applied.is_terminal());
        assert!(!Fetching.is_terminal());
    }
}
