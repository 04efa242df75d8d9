use engine_core::Timestamp;

/// Pre-match countdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    /// Next number to announce. Zero means the match starts on the next step.
    pub remaining: u32,
    /// When the previous number was announced (or the countdown began).
    pub last_tick: Timestamp,
}

/// State of a running match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveMatch {
    /// 1-based elimination round.
    pub round: u32,
    pub last_elimination: Timestamp,
    pub last_announcement: Timestamp,
    /// Set until the first elimination cycle completes; idle checks are skipped meanwhile.
    pub first_interval: bool,
}

impl ActiveMatch {
    pub fn starting(now: Timestamp, last_announcement: Timestamp) -> Self {
        Self {
            round: 1,
            last_elimination: now,
            last_announcement,
            first_interval: true,
        }
    }
}

/// Where the controller is in the match lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPhase {
    #[default]
    Idle,
    Countdown(Countdown),
    Active(ActiveMatch),
}

impl MatchPhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, MatchPhase::Idle)
    }

    pub fn is_countdown(&self) -> bool {
        matches!(self, MatchPhase::Countdown(_))
    }

    pub fn is_active(&self) -> bool {
        matches!(self, MatchPhase::Active(_))
    }

    /// Countdown or active.
    pub fn in_progress(&self) -> bool {
        !self.is_idle()
    }

    /// Round number used when recording eliminations. A countdown counts as round 1.
    pub fn round(&self) -> u32 {
        match self {
            MatchPhase::Idle => 0,
            MatchPhase::Countdown(_) => 1,
            MatchPhase::Active(a) => a.round,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MatchPhase::Idle => "idle",
            MatchPhase::Countdown(_) => "countdown",
            MatchPhase::Active(_) => "active",
        }
    }
}
