use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use engine_core::Timestamp;
use serde::{Deserialize, Serialize};
use session::{PlayerId, PlayerRecord, Team};

use crate::error::PluginError;

/// Destination of a text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    All,
    Player(PlayerId),
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recipient::All => f.write_str("all"),
            Recipient::Player(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: Recipient,
    pub text: String,
}

/// Game mode the arena server was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStyle {
    #[default]
    FreeForAll,
    OpenFreeForAll,
    CaptureTheFlag,
    RabbitChase,
}

impl GameStyle {
    pub fn is_free_for_all(self) -> bool {
        matches!(self, GameStyle::FreeForAll | GameStyle::OpenFreeForAll)
    }
}

/// Everything a plugin may ask of the arena server.
///
/// Player data is always handed out as value snapshots; a plugin must
/// re-resolve players by id instead of holding on to a record.
pub trait HostApi {
    // --- time ---

    fn now(&self) -> Timestamp;
    fn local_time(&self) -> NaiveDateTime;

    // --- messaging ---

    fn send_message(&mut self, to: Recipient, text: &str);

    fn broadcast(&mut self, text: &str) {
        self.send_message(Recipient::All, text);
    }

    // --- players ---

    fn player_ids(&self) -> Vec<PlayerId>;
    fn player(&self, id: PlayerId) -> Option<PlayerRecord>;

    /// Snapshots of every player still resolvable at call time.
    fn players(&self) -> Vec<PlayerRecord> {
        self.player_ids()
            .into_iter()
            .filter_map(|id| self.player(id))
            .collect()
    }

    fn callsign(&self, id: PlayerId) -> Option<String> {
        self.player(id).map(|p| p.callsign)
    }

    fn set_team(&mut self, id: PlayerId, team: Team) -> bool;
    fn set_wins(&mut self, id: PlayerId, wins: i32) -> bool;
    fn set_losses(&mut self, id: PlayerId, losses: i32) -> bool;
    fn idle_seconds(&self, id: PlayerId) -> Option<f64>;
    fn has_permission(&self, id: PlayerId, permission: &str) -> bool;

    // --- server variables ---

    fn var(&self, name: &str) -> Option<String>;
    fn set_var(&mut self, name: &str, value: &str);

    /// Create `name` with `default` unless it already exists; returns the current value.
    fn register_var(&mut self, name: &str, default: &str) -> String;

    fn var_f64(&self, name: &str) -> Option<f64> {
        self.var(name)?.trim().parse().ok()
    }

    fn set_var_f64(&mut self, name: &str, value: f64) {
        self.set_var(name, &value.to_string());
    }

    fn set_var_bool(&mut self, name: &str, value: bool) {
        self.set_var(name, if value { "1" } else { "0" });
    }

    // --- server setup ---

    fn game_style(&self) -> GameStyle;
    fn team_player_limit(&self, team: Team) -> u32;
    fn time_manual_start(&self) -> bool;

    // --- recording ---

    /// Begin buffering a server-side recording. Returns false when recording is unavailable.
    fn start_recording(&mut self) -> bool;

    /// Write the current buffer to `file_name` inside the host's recording directory.
    fn save_recording(&mut self, file_name: &str) -> Result<PathBuf, PluginError>;

    fn stop_recording(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_for_all_styles() {
        assert!(GameStyle::FreeForAll.is_free_for_all());
        assert!(GameStyle::OpenFreeForAll.is_free_for_all());
        assert!(!GameStyle::CaptureTheFlag.is_free_for_all());
        assert!(!GameStyle::RabbitChase.is_free_for_all());
    }

    #[test]
    fn recipient_display() {
        assert_eq!(Recipient::All.to_string(), "all");
        assert_eq!(Recipient::Player(PlayerId(7)).to_string(), "#7");
    }
}
