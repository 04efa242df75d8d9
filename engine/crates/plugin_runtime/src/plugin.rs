use std::path::Path;

use session::{PlayerId, PlayerRecord, Team};

use crate::host_api::HostApi;
use crate::registry::CommandRegistry;

/// Notifications the host delivers to plugins. One variant per kind; each is
/// handled on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Server heartbeat. Carries no payload; plugins read the clock themselves.
    Tick,
    /// A server variable changed value.
    VarChanged { key: String, value: String },
    /// The host is about to place a new player on `team` and asks for approval.
    AutoTeam { player: PlayerId, team: Team },
    PlayerJoined { player: PlayerId, team: Team },
    PlayerPaused { player: PlayerId, paused: bool },
    /// The player has left; `record` is the last snapshot taken before removal.
    PlayerParted { record: PlayerRecord },
    /// The player is being forcibly removed by an administrator.
    PlayerKicked { player: PlayerId, reason: String },
}

impl HostEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            HostEvent::Tick => "tick",
            HostEvent::VarChanged { .. } => "var_changed",
            HostEvent::AutoTeam { .. } => "auto_team",
            HostEvent::PlayerJoined { .. } => "player_joined",
            HostEvent::PlayerPaused { .. } => "player_paused",
            HostEvent::PlayerParted { .. } => "player_parted",
            HostEvent::PlayerKicked { .. } => "player_kicked",
        }
    }
}

/// A plugin's answer to a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventReply {
    #[default]
    Continue,
    /// Override the team proposed in an `AutoTeam` notification.
    AssignTeam(Team),
}

/// A game-logic extension hosted by the arena server.
pub trait Plugin {
    fn name(&self) -> &str;

    /// Called once after loading. `config` is the optional path given on the server command line.
    fn init(&mut self, host: &mut dyn HostApi, commands: &mut CommandRegistry, config: Option<&Path>);

    /// Called once before unloading.
    fn cleanup(&mut self, host: &mut dyn HostApi, commands: &mut CommandRegistry);

    fn on_event(&mut self, host: &mut dyn HostApi, event: &HostEvent) -> EventReply;

    /// Handle a slash command this plugin registered. Returns true when handled.
    fn on_command(
        &mut self,
        host: &mut dyn HostApi,
        player: PlayerId,
        command: &str,
        params: &[String],
    ) -> bool;
}
