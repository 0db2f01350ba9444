use serde::{Deserialize, Serialize};

/// Full inhale→hold→exhale cycles before a session ends on its own.
pub const MAX_CYCLES: u32 = 3;

/// Seconds in one complete cycle.
pub const CYCLE_SECS: u32 = Phase::Inhale.duration_secs()
    + Phase::Hold.duration_secs()
    + Phase::Exhale.duration_secs();

/// One segment of a breathing cycle (the 4-7-8 pattern).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Phase; 3] = [Phase::Inhale, Phase::Hold, Phase::Exhale];

    /// Fixed duration of the phase in seconds.
    pub const fn duration_secs(self) -> u32 {
        match self {
            Phase::Inhale => 4,
            Phase::Hold => 7,
            Phase::Exhale => 8,
        }
    }

    /// Next phase in the cycle. Exhale wraps to Inhale.
    pub const fn next(self) -> Phase {
        match self {
            Phase::Inhale => Phase::Hold,
            Phase::Hold => Phase::Exhale,
            Phase::Exhale => Phase::Inhale,
        }
    }

    /// Text shown to the user while the phase runs.
    pub const fn prompt(self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe in...",
            Phase::Hold => "Hold...",
            Phase::Exhale => "Breathe out...",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Phase::Inhale => "inhale",
            Phase::Hold => "hold",
            Phase::Exhale => "exhale",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_follow_four_seven_eight() {
        assert_eq!(Phase::Inhale.duration_secs(), 4);
        assert_eq!(Phase::Hold.duration_secs(), 7);
        assert_eq!(Phase::Exhale.duration_secs(), 8);
        assert_eq!(CYCLE_SECS, 19);
    }

    #[test]
    fn next_is_cyclic() {
        let mut phase = Phase::Inhale;
        for expected in [Phase::Hold, Phase::Exhale, Phase::Inhale] {
            phase = phase.next();
            assert_eq!(phase, expected);
        }
    }

    #[test]
    fn prompts_match_display_copy() {
        assert_eq!(Phase::Inhale.prompt(), "Breathe in...");
        assert_eq!(Phase::Hold.prompt(), "Hold...");
        assert_eq!(Phase::Exhale.prompt(), "Breathe out...");
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Exhale).unwrap(), "\"exhale\"");
    }
}
