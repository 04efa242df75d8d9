use std::collections::BTreeSet;

use engine_core::Timestamp;
use plugin_runtime::{HostApi, Recipient};
use session::{PlayerId, PlayerRecord, Team};

use crate::config::{ConfigKey, MatchConfig};
use crate::ledger::{EliminationLedger, EliminationReason, EliminationRecord};
use crate::movement::MovementGate;
use crate::phase::{ActiveMatch, Countdown, MatchPhase};
use crate::ranking;
use crate::recorder::MatchRecorder;

/// Seconds between "N seconds until the next player elimination." reminders.
const REMINDER_EVERY: i64 = 15;
/// Final seconds before an elimination that are counted down aloud.
const FINAL_COUNT: i64 = 5;

/// Name used in announcements when the invoking player can't be resolved.
pub(crate) const SERVER_NAME: &str = "The server";

/// The Last Tank Standing match controller.
///
/// Owns all match state. Every entry point takes the host explicitly and
/// re-resolves players by id, so nothing here outlives a single call.
#[derive(Debug, Default)]
pub struct MatchController {
    pub(crate) config: MatchConfig,
    pub(crate) phase: MatchPhase,
    pub(crate) ledger: EliminationLedger,
    pub(crate) gate: MovementGate,
    pub(crate) recorder: MatchRecorder,
    /// Players kicked this match; their following departure is not recorded again.
    pub(crate) removed: BTreeSet<PlayerId>,
}

impl MatchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn phase(&self) -> &MatchPhase {
        &self.phase
    }

    pub fn ledger(&self) -> &EliminationLedger {
        &self.ledger
    }

    pub fn movement(&self) -> &MovementGate {
        &self.gate
    }

    /// Apply a changed server variable if it is one of ours.
    pub fn update_setting(&mut self, key: &str, value: &str) {
        let Some(key) = ConfigKey::from_var_name(key) else {
            return;
        };
        if self.config.apply(key, value) {
            tracing::info!(var = key.var_name(), value, "setting updated");
        } else {
            tracing::warn!(
                var = key.var_name(),
                value,
                default = key.default_value(),
                "invalid setting, using default"
            );
        }
    }

    /// Advance the match by wall-clock time. Safe to call at any rate; every
    /// transition is decided from elapsed seconds, so a late call catches up.
    pub fn tick(&mut self, host: &mut dyn HostApi) {
        let now = host.now();
        if let MatchPhase::Countdown(countdown) = self.phase {
            self.tick_countdown(host, countdown, now);
        }
        if let MatchPhase::Active(active) = self.phase {
            self.tick_active(host, active, now);
        }
    }

    /// Enter the countdown. Callers check preconditions.
    pub(crate) fn start_countdown(&mut self, host: &mut dyn HostApi, invoker: PlayerId, seconds: u32) {
        let now = host.now();
        self.phase = MatchPhase::Countdown(Countdown {
            remaining: seconds,
            last_tick: now,
        });
        self.ledger.clear();
        self.removed.clear();
        self.recorder.start(host, self.config.record_matches);

        let name = host.callsign(invoker).unwrap_or_else(|| SERVER_NAME.to_string());
        tracing::info!(invoker = %name, seconds, "countdown started");
        host.broadcast(&format!("{} started a new game of Last Tank Standing", name));
        self.reset_scores(host);
        host.broadcast("All scores have been reset.");

        if let Err(e) = self.gate.freeze(host) {
            tracing::warn!(error = %e, "could not freeze movement for the countdown");
        }
    }

    /// Announces at most one number per tick, so a stalled countdown
    /// resumes at one second per number instead of skipping ahead.
    fn tick_countdown(&mut self, host: &mut dyn HostApi, countdown: Countdown, now: Timestamp) {
        if now.seconds_since(countdown.last_tick) < 1 {
            return;
        }
        if countdown.remaining > 0 {
            host.broadcast(&countdown.remaining.to_string());
            self.phase = MatchPhase::Countdown(Countdown {
                remaining: countdown.remaining - 1,
                last_tick: now,
            });
            return;
        }

        host.set_var_bool("_mapchangeDisable", true);
        self.gate.unfreeze(host);
        self.reset_scores(host);
        self.phase = MatchPhase::Active(ActiveMatch::starting(now, countdown.last_tick));
        tracing::info!(interval = self.config.elimination_interval, "match started");

        host.broadcast("The game has started. Good luck!");
        host.broadcast(&format!(
            "The player at the bottom of the scoreboard will be removed every {} seconds.",
            self.config.elimination_interval
        ));
    }

    fn tick_active(&mut self, host: &mut dyn HostApi, mut active: ActiveMatch, now: Timestamp) {
        let participants = ranking::participant_count(&host.players());
        if participants == 0 {
            host.broadcast("The current match was ended automatically with no winner.");
            self.end_match(host);
            return;
        }
        if participants == 1 {
            self.declare_winner(host, active.round);
            return;
        }

        if !active.first_interval {
            self.check_idle(host, active.round);
            // The winner or no-winner ending is decided on the next tick.
            if ranking::participant_count(&host.players()) < 2 {
                return;
            }
        }

        let interval = i64::from(self.config.elimination_interval);
        let elapsed = now.seconds_since(active.last_elimination);
        let since_announcement = now.seconds_since(active.last_announcement);

        if elapsed >= interval {
            if !self.eliminate_lowest(host, active.round) {
                return;
            }
            active.last_elimination = now;
            active.round += 1;
            active.first_interval = false;
        } else if elapsed != 0 && elapsed % REMINDER_EVERY == 0 && since_announcement > 1 {
            host.broadcast(&format!(
                "{} seconds until the next player elimination.",
                interval - elapsed
            ));
            active.last_announcement = now;
        } else if elapsed >= interval - FINAL_COUNT && since_announcement >= 1 {
            host.broadcast(&format!("{}...", interval - elapsed));
            active.last_announcement = now;
        }

        self.phase = MatchPhase::Active(active);
    }

    /// One elimination cycle. Returns false if the pick vanished before it
    /// could be removed; the caller then leaves the timer alone.
    fn eliminate_lowest(&mut self, host: &mut dyn HostApi, round: u32) -> bool {
        let players = host.players();
        let interval = self.config.elimination_interval;

        let Some(id) = ranking::pick_lowest_scorer(&players) else {
            tracing::info!(round, "tie at the bottom, nobody eliminated");
            host.broadcast("Multiple players with lowest score ... nobody gets eliminated");
            host.broadcast(&format!("Next elimination in {} seconds ... ", interval));
            return true;
        };

        let Some(loser) = host.player(id) else {
            tracing::warn!(player = %id, "player picked for elimination is gone");
            host.broadcast("Wait. Where'd the player go? Player to be eliminated not found!");
            return false;
        };

        if ranking::participant_count(&players) == 2 {
            host.broadcast(&format!(
                "Player \"{}\" (score: {}) eliminated!",
                loser.callsign,
                loser.score()
            ));
        } else {
            host.broadcast(&format!(
                "Player \"{}\" (score: {}) eliminated! - next elimination in {} seconds",
                loser.callsign,
                loser.score(),
                interval
            ));
        }

        self.record_elimination(&loser, EliminationReason::LowScore, round);
        if self.config.reset_score_on_elimination {
            self.reset_scores(host);
        }
        host.set_team(loser.id, Team::Observer);
        true
    }

    fn declare_winner(&mut self, host: &mut dyn HostApi, round: u32) {
        let players = host.players();
        let winner = ranking::find_sole_survivor(&players).and_then(|id| host.player(id));

        match winner {
            Some(winner) => {
                host.broadcast(&format!(
                    "Last Tank Standing is over! The winner is \"{}\".",
                    winner.callsign
                ));
                self.record_elimination(&winner, EliminationReason::Winner, round);
            }
            None => {
                tracing::warn!(round, "winner vanished before the match could end");
                host.broadcast("What happened to our winner...?");
            }
        }

        for line in self.ledger.render() {
            host.broadcast(&line);
        }
        self.end_match(host);
    }

    /// Return to idle and undo everything a match changed on the server.
    pub(crate) fn end_match(&mut self, host: &mut dyn HostApi) {
        host.set_var_bool("_mapchangeDisable", false);
        let ended = std::mem::take(&mut self.phase);
        self.ledger.clear();
        self.removed.clear();
        self.gate.unfreeze(host);
        self.recorder.finish(host);
        tracing::info!(phase = ended.name(), round = ended.round(), "match ended");
    }

    fn check_idle(&mut self, host: &mut dyn HostApi, round: u32) {
        let limit = f64::from(self.config.idle_kick_time);
        for player in host.players() {
            if player.is_spectator() {
                continue;
            }
            let Some(idle) = host.idle_seconds(player.id) else {
                continue;
            };
            if idle < limit {
                continue;
            }

            tracing::info!(player = %player.callsign, idle, "eliminated for idling");
            host.set_team(player.id, Team::Observer);
            self.record_elimination(&player, EliminationReason::IdleTime, round);
            host.send_message(
                Recipient::Player(player.id),
                "You have been automatically eliminated for idling too long.",
            );
        }
    }

    pub(crate) fn record_elimination(&mut self, player: &PlayerRecord, reason: EliminationReason, round: u32) {
        tracing::debug!(player = %player.callsign, ?reason, round, score = player.score(), "elimination recorded");
        self.ledger
            .record(EliminationRecord::capture(player, reason, round));
    }

    /// Zero every player's wins and losses.
    pub(crate) fn reset_scores(&self, host: &mut dyn HostApi) {
        for id in host.player_ids() {
            host.set_wins(id, 0);
            host.set_losses(id, 0);
        }
    }
}
