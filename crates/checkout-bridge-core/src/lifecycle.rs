//! Component lifecycle state machine

use serde::{Deserialize, Serialize};

/// Lifecycle of the single active payment component
///
/// State transitions:
/// ```text
/// Idle → Opening → Presented → Completing ─┐
///           │          │    └─→ Dismissing ─┤
///           │          └──────→ Failing ────┼─→ Idle
///           ├─────────────────→ Failing ────┤
///           └─────────────────→ Dismissing ─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentState {
    /// No component and no session exist
    #[default]
    Idle,
    /// `open` accepted; configuration, session and availability checks in progress
    Opening,
    /// The native component is rendering and may receive actions
    Presented,
    /// The component reported completion; teardown in progress
    Completing,
    /// The component or bridge reported a failure; teardown in progress
    Failing,
    /// The host requested `hide`; teardown in progress
    Dismissing,
}

impl ComponentState {
    /// Check if this state can transition to the target state
    pub fn can_transition_to(&self, target: ComponentState) -> bool {
        use ComponentState::*;
        matches!(
            (self, target),
            (Idle, Opening)
                | (Opening, Presented)
                | (Opening, Failing)
                | (Opening, Dismissing)
                | (Presented, Completing)
                | (Presented, Failing)
                | (Presented, Dismissing)
                | (Completing, Idle)
                | (Failing, Idle)
                | (Dismissing, Idle)
        )
    }

    /// Whether a component slot is reserved (opening or presented)
    pub fn is_active(&self) -> bool {
        matches!(self, ComponentState::Opening | ComponentState::Presented)
    }

    /// Whether actions may be delivered in this state
    pub fn can_handle_actions(&self) -> bool {
        matches!(self, ComponentState::Presented)
    }

    /// Whether a teardown is already running
    pub fn is_tearing_down(&self) -> bool {
        matches!(
            self,
            ComponentState::Completing | ComponentState::Failing | ComponentState::Dismissing
        )
    }
}

impl std::fmt::Display for ComponentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentState::Idle => write!(f, "Idle"),
            ComponentState::Opening => write!(f, "Opening"),
            ComponentState::Presented => write!(f, "Presented"),
            ComponentState::Completing => write!(f, "Completing"),
            ComponentState::Failing => write!(f, "Failing"),
            ComponentState::Dismissing => write!(f, "Dismissing"),
        }
    }
}
