use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::View;
use crate::breathing::Phase;

/// Every state change in the system produces an Event.
/// Hosting views render from state; the CLI prints these with `--json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    BreathingStarted {
        phase: Phase,
        at: DateTime<Utc>,
    },
    PhaseAdvanced {
        phase: Phase,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
    /// The session hit its cycle limit and reset itself.
    BreathingFinished {
        cycles: u32,
        at: DateTime<Utc>,
    },
    /// The user stopped the session before it finished.
    BreathingStopped {
        phase: Phase,
        seconds_into_phase: u32,
        cycles_completed: u32,
        at: DateTime<Utc>,
    },
    ItemAdded {
        id: String,
        title: String,
        quantity: u32,
        at: DateTime<Utc>,
    },
    QuantityChanged {
        id: String,
        from: u32,
        to: u32,
        at: DateTime<Utc>,
    },
    ItemRemoved {
        id: String,
        at: DateTime<Utc>,
    },
    CartCleared {
        at: DateTime<Utc>,
    },
    ViewChanged {
        from: View,
        to: View,
        at: DateTime<Utc>,
    },
    CheckoutStarted {
        items: u32,
        total: f64,
        at: DateTime<Utc>,
    },
    CheckoutCompleted {
        total: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short kind string, used for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::BreathingStarted { .. } => "breathing_started",
            Event::PhaseAdvanced { .. } => "phase_advanced",
            Event::CycleCompleted { .. } => "cycle_completed",
            Event::BreathingFinished { .. } => "breathing_finished",
            Event::BreathingStopped { .. } => "breathing_stopped",
            Event::ItemAdded { .. } => "item_added",
            Event::QuantityChanged { .. } => "quantity_changed",
            Event::ItemRemoved { .. } => "item_removed",
            Event::CartCleared { .. } => "cart_cleared",
            Event::ViewChanged { .. } => "view_changed",
            Event::CheckoutStarted { .. } => "checkout_started",
            Event::CheckoutCompleted { .. } => "checkout_completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::ItemRemoved {
            id: "calm-journal".into(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "item_removed");
        assert_eq!(json["id"], "calm-journal");
        assert_eq!(event.kind(), "item_removed");
    }
}
