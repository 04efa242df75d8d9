use serde::Serialize;
use session::PlayerRecord;

/// Why a player left the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationReason {
    LowScore,
    IdleTime,
    Forfeit,
    ForcedRemoval,
    Winner,
}

impl EliminationReason {
    /// Suffix shown after the score on the leaderboard.
    pub fn annotation(self) -> &'static str {
        match self {
            EliminationReason::IdleTime | EliminationReason::Forfeit => " [Forfeit]",
            EliminationReason::ForcedRemoval => " [Disqualified]",
            EliminationReason::LowScore | EliminationReason::Winner => "",
        }
    }
}

/// Snapshot taken when a player left the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EliminationRecord {
    pub callsign: String,
    pub reason: EliminationReason,
    pub round: u32,
    pub score: i32,
}

impl EliminationRecord {
    pub fn capture(player: &PlayerRecord, reason: EliminationReason, round: u32) -> Self {
        Self {
            callsign: player.callsign.clone(),
            reason,
            round,
            score: player.score(),
        }
    }
}

/// Match history in elimination order. Rendered newest first, so the
/// winner heads the scoreboard.
#[derive(Debug, Clone, Default)]
pub struct EliminationLedger {
    records: Vec<EliminationRecord>,
}

impl EliminationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: EliminationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[EliminationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Scoreboard lines, header included.
    pub fn render(&self) -> Vec<String> {
        let mut lines = vec![
            "Last Tank Standing Scoreboard".to_string(),
            "-----------------------------".to_string(),
        ];
        for (rank, r) in self.records.iter().rev().enumerate() {
            lines.push(format!("{:02}. {}", rank + 1, r.callsign));
            lines.push(format!(
                "    Rounds: {}, Elimination Score: {}{}",
                r.round,
                r.score,
                r.reason.annotation()
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session::{PlayerId, Team};

    fn entry(callsign: &str, reason: EliminationReason, round: u32, score: i32) -> EliminationRecord {
        EliminationRecord {
            callsign: callsign.into(),
            reason,
            round,
            score,
        }
    }

    #[test]
    fn capture_takes_score_from_snapshot() {
        let player = PlayerRecord {
            id: PlayerId(3),
            callsign: "bravo".into(),
            team: Team::Rogue,
            wins: 4,
            losses: 6,
        };
        let r = EliminationRecord::capture(&player, EliminationReason::LowScore, 2);
        assert_eq!(r, entry("bravo", EliminationReason::LowScore, 2, -2));
    }

    #[test]
    fn render_lists_newest_first_with_annotations() {
        let mut ledger = EliminationLedger::new();
        ledger.record(entry("gone", EliminationReason::Forfeit, 1, 0));
        ledger.record(entry("kicked", EliminationReason::ForcedRemoval, 1, 2));
        ledger.record(entry("sleepy", EliminationReason::IdleTime, 2, 1));
        ledger.record(entry("low", EliminationReason::LowScore, 2, -1));
        ledger.record(entry("champ", EliminationReason::Winner, 3, 7));

        assert_eq!(
            ledger.render(),
            vec![
                "Last Tank Standing Scoreboard",
                "-----------------------------",
                "01. champ",
                "    Rounds: 3, Elimination Score: 7",
                "02. low",
                "    Rounds: 2, Elimination Score: -1",
                "03. sleepy",
                "    Rounds: 2, Elimination Score: 1 [Forfeit]",
                "04. kicked",
                "    Rounds: 1, Elimination Score: 2 [Disqualified]",
                "05. gone",
                "    Rounds: 1, Elimination Score: 0 [Forfeit]",
            ]
        );
    }

    #[test]
    fn empty_ledger_renders_header_only() {
        let mut ledger = EliminationLedger::new();
        ledger.record(entry("x", EliminationReason::LowScore, 1, 0));
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.render().len(), 2);
    }
}
