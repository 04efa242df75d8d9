//! Shared fixtures for the unit tests in this crate.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use engine_core::{ManualClock, Timestamp};
use plugin_runtime::{
    EventReply, GameStyle, HostApi, HostEvent, HostSettings, LocalHost, PluginError, Recipient,
};
use session::{PlayerId, PlayerRecord, Team};

use crate::config::MatchConfig;
use crate::controller::MatchController;

const START: Timestamp = Timestamp(1_700_000_000);

/// A controller wired to an in-memory host and a hand-driven clock.
/// Players `p0..pN` are connected as rogues with start and end rights.
pub(crate) struct Harness {
    pub host: LocalHost,
    pub clock: ManualClock,
    pub controller: MatchController,
    idle: BTreeSet<PlayerId>,
}

impl Harness {
    pub fn with_players(n: u32) -> Self {
        Self::with_config(MatchConfig::default(), n)
    }

    pub fn with_config(config: MatchConfig, n: u32) -> Self {
        let clock = ManualClock::new(START);
        let host = LocalHost::new(Arc::new(clock.clone()), HostSettings::default());
        let mut h = Self {
            host,
            clock,
            controller: MatchController::with_config(config),
            idle: BTreeSet::new(),
        };
        for i in 0..n {
            h.join(&format!("p{}", i));
        }
        h
    }

    pub fn active_with_players(n: u32) -> Self {
        let mut h = Self::with_players(n);
        h.make_active();
        h
    }

    pub fn join(&mut self, callsign: &str) -> PlayerId {
        self.join_with_perms(callsign, &["vote", "endgame"])
    }

    pub fn join_with_perms(&mut self, callsign: &str, perms: &[&str]) -> PlayerId {
        let now = self.host.now();
        self.host.roster_mut().connect(
            callsign,
            Team::Rogue,
            perms.iter().map(|p| p.to_string()),
            now,
        )
    }

    pub fn join_as(&mut self, callsign: &str, team: Team) -> PlayerId {
        let now = self.host.now();
        self.host
            .roster_mut()
            .connect(callsign, team, Vec::new(), now)
    }

    /// Begin a countdown invoked by `p0`, skipping the command checks.
    pub fn start(&mut self, seconds: u32) {
        self.controller
            .start_countdown(&mut self.host, PlayerId(0), seconds);
    }

    /// Run the countdown (starting one if needed) until the match is active.
    pub fn make_active(&mut self) {
        if self.controller.phase().is_idle() {
            let seconds = self.controller.config().countdown;
            self.start(seconds);
        }
        while self.controller.phase().is_countdown() {
            self.advance(1);
        }
        self.take_texts();
    }

    pub fn tick(&mut self) {
        self.controller.tick(&mut self.host);
    }

    /// Step the clock one second at a time, keeping everyone not marked
    /// idle active, and tick after each step.
    pub fn advance(&mut self, seconds: u32) {
        for _ in 0..seconds {
            self.clock.advance(1);
            self.touch_all();
            self.tick();
        }
    }

    pub fn touch_all(&mut self) {
        let now = self.host.now();
        for id in self.host.player_ids() {
            if !self.idle.contains(&id) {
                self.host.roster_mut().touch(id, now);
            }
        }
    }

    /// Stop refreshing this player's activity.
    pub fn idle_player(&mut self, id: u32) {
        self.idle.insert(PlayerId(id));
    }

    pub fn event(&mut self, event: HostEvent) -> EventReply {
        self.controller.handle_event(&mut self.host, &event)
    }

    pub fn command(&mut self, player: u32, name: &str, params: &[String]) -> bool {
        self.controller
            .handle_command(&mut self.host, PlayerId(player), name, params)
    }

    pub fn set_score(&mut self, id: u32, wins: i32, losses: i32) {
        self.host.set_wins(PlayerId(id), wins);
        self.host.set_losses(PlayerId(id), losses);
    }

    pub fn team_of(&self, id: u32) -> Team {
        self.host
            .player(PlayerId(id))
            .map(|p| p.team)
            .unwrap_or(Team::Observer)
    }

    /// Drain the outbox, returning every message text.
    pub fn take_texts(&mut self) -> Vec<String> {
        self.host.take_outbox().into_iter().map(|m| m.text).collect()
    }

    /// Drain the outbox, returning texts sent directly to `id`.
    pub fn take_texts_for(&mut self, id: u32) -> Vec<String> {
        self.host
            .take_outbox()
            .into_iter()
            .filter(|m| m.to == Recipient::Player(PlayerId(id)))
            .map(|m| m.text)
            .collect()
    }
}

/// Host view in which one player shows up in listings but can't be looked up,
/// as when a player drops between two host calls.
pub(crate) struct HiddenPlayer<'a> {
    pub inner: &'a mut LocalHost,
    pub hidden: PlayerId,
}

impl HostApi for HiddenPlayer<'_> {
    fn now(&self) -> Timestamp {
        self.inner.now()
    }

    fn local_time(&self) -> NaiveDateTime {
        self.inner.local_time()
    }

    fn send_message(&mut self, to: Recipient, text: &str) {
        self.inner.send_message(to, text)
    }

    fn player_ids(&self) -> Vec<PlayerId> {
        self.inner.player_ids()
    }

    fn player(&self, id: PlayerId) -> Option<PlayerRecord> {
        if id == self.hidden {
            return None;
        }
        self.inner.player(id)
    }

    fn players(&self) -> Vec<PlayerRecord> {
        self.inner.players()
    }

    fn set_team(&mut self, id: PlayerId, team: Team) -> bool {
        self.inner.set_team(id, team)
    }

    fn set_wins(&mut self, id: PlayerId, wins: i32) -> bool {
        self.inner.set_wins(id, wins)
    }

    fn set_losses(&mut self, id: PlayerId, losses: i32) -> bool {
        self.inner.set_losses(id, losses)
    }

    fn idle_seconds(&self, id: PlayerId) -> Option<f64> {
        self.inner.idle_seconds(id)
    }

    fn has_permission(&self, id: PlayerId, permission: &str) -> bool {
        self.inner.has_permission(id, permission)
    }

    fn var(&self, name: &str) -> Option<String> {
        self.inner.var(name)
    }

    fn set_var(&mut self, name: &str, value: &str) {
        self.inner.set_var(name, value)
    }

    fn register_var(&mut self, name: &str, default: &str) -> String {
        self.inner.register_var(name, default)
    }

    fn game_style(&self) -> GameStyle {
        self.inner.game_style()
    }

    fn team_player_limit(&self, team: Team) -> u32 {
        self.inner.team_player_limit(team)
    }

    fn time_manual_start(&self) -> bool {
        self.inner.time_manual_start()
    }

    fn start_recording(&mut self) -> bool {
        self.inner.start_recording()
    }

    fn save_recording(&mut self, file_name: &str) -> Result<PathBuf, PluginError> {
        self.inner.save_recording(file_name)
    }

    fn stop_recording(&mut self) {
        self.inner.stop_recording()
    }
}
