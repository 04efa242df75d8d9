use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;
use engine_core::{Clock, Timestamp};
use serde::Deserialize;
use session::{PlayerId, PlayerRecord, Roster, Team};

use crate::error::PluginError;
use crate::host_api::{GameStyle, HostApi, OutboundMessage, Recipient};
use crate::plugin::HostEvent;
use crate::recording::{validate_file_name, RecordingBuffer};

/// Physics variables every arena starts with.
const DEFAULT_VARS: &[(&str, &str)] = &[
    ("_gravity", "-9.8"),
    ("_jumpVelocity", "19"),
    ("_reloadTime", "3.5"),
    ("_tankSpeed", "25"),
    ("_tankAngVel", "0.785398"),
];

/// Static arena settings for [`LocalHost`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    pub game_style: GameStyle,
    pub time_manual_start: bool,
    pub recording_dir: PathBuf,
    /// Per-team player slots. Teams not listed have no slots.
    pub team_limits: HashMap<Team, u32>,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            game_style: GameStyle::FreeForAll,
            time_manual_start: false,
            recording_dir: PathBuf::from("recordings"),
            team_limits: HashMap::from([(Team::Rogue, 50), (Team::Observer, 10)]),
        }
    }
}

/// In-memory arena server implementing [`HostApi`].
///
/// Outgoing messages collect in an outbox and variable changes queue up
/// as [`HostEvent::VarChanged`] notifications for the caller to deliver.
pub struct LocalHost {
    clock: Arc<dyn Clock>,
    settings: HostSettings,
    roster: Roster,
    vars: BTreeMap<String, String>,
    outbox: Vec<OutboundMessage>,
    pending_events: Vec<HostEvent>,
    recording: Option<RecordingBuffer>,
}

impl LocalHost {
    pub fn new(clock: Arc<dyn Clock>, settings: HostSettings) -> Self {
        let vars = DEFAULT_VARS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            clock,
            settings,
            roster: Roster::new(),
            vars,
            outbox: Vec::new(),
            pending_events: Vec::new(),
            recording: None,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn settings(&self) -> &HostSettings {
        &self.settings
    }

    /// Take every message sent since the last call.
    pub fn take_outbox(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.outbox)
    }

    /// Take notifications produced by host-side changes since the last call.
    pub fn take_pending_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_some()
    }
}

impl HostApi for LocalHost {
    fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn local_time(&self) -> NaiveDateTime {
        self.clock.local_time()
    }

    fn send_message(&mut self, to: Recipient, text: &str) {
        if let Recipient::Player(id) = to {
            if self.roster.get(id).is_none() {
                tracing::trace!(player = %id, "message to disconnected player dropped");
                return;
            }
        }
        tracing::debug!(to = %to, "{}", text);
        if let Some(ref mut buffer) = self.recording {
            buffer.push(self.clock.now(), to, text);
        }
        self.outbox.push(OutboundMessage {
            to,
            text: text.to_string(),
        });
    }

    fn player_ids(&self) -> Vec<PlayerId> {
        self.roster.ids()
    }

    fn player(&self, id: PlayerId) -> Option<PlayerRecord> {
        self.roster.record(id)
    }

    fn players(&self) -> Vec<PlayerRecord> {
        self.roster.records()
    }

    fn set_team(&mut self, id: PlayerId, team: Team) -> bool {
        self.roster.set_team(id, team)
    }

    fn set_wins(&mut self, id: PlayerId, wins: i32) -> bool {
        self.roster.set_wins(id, wins)
    }

    fn set_losses(&mut self, id: PlayerId, losses: i32) -> bool {
        self.roster.set_losses(id, losses)
    }

    fn idle_seconds(&self, id: PlayerId) -> Option<f64> {
        self.roster.idle_seconds(id, self.clock.now())
    }

    fn has_permission(&self, id: PlayerId, permission: &str) -> bool {
        self.roster.has_permission(id, permission)
    }

    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set_var(&mut self, name: &str, value: &str) {
        let changed = self.vars.get(name).map(String::as_str) != Some(value);
        self.vars.insert(name.to_string(), value.to_string());
        if changed {
            self.pending_events.push(HostEvent::VarChanged {
                key: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    fn register_var(&mut self, name: &str, default: &str) -> String {
        self.vars
            .entry(name.to_string())
            .or_insert_with(|| default.to_string())
            .clone()
    }

    fn game_style(&self) -> GameStyle {
        self.settings.game_style
    }

    fn team_player_limit(&self, team: Team) -> u32 {
        self.settings.team_limits.get(&team).copied().unwrap_or(0)
    }

    fn time_manual_start(&self) -> bool {
        self.settings.time_manual_start
    }

    fn start_recording(&mut self) -> bool {
        if self.recording.is_none() {
            self.recording = Some(RecordingBuffer::new(self.clock.now()));
        }
        true
    }

    fn save_recording(&mut self, file_name: &str) -> Result<PathBuf, PluginError> {
        validate_file_name(file_name)?;
        let buffer = self.recording.as_ref().ok_or(PluginError::RecordingInactive)?;

        std::fs::create_dir_all(&self.settings.recording_dir)?;
        let path = self.settings.recording_dir.join(file_name);
        buffer.write_to(&path)?;
        tracing::info!(path = %path.display(), messages = buffer.len(), "recording saved");
        Ok(path)
    }

    fn stop_recording(&mut self) {
        self.recording = None;
    }
}
