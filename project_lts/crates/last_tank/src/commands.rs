use plugin_runtime::{HostApi, Recipient};
use session::PlayerId;

use crate::config::{parse_leading_int, MIN_COUNTDOWN};
use crate::controller::{MatchController, SERVER_NAME};
use crate::error::CommandError;
use crate::phase::MatchPhase;
use crate::ranking;

/// Slash commands this plugin registers.
pub const COMMANDS: [&str; 3] = ["start", "end", "gameover"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    End,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "end" | "gameover" => Some(Command::End),
            _ => None,
        }
    }
}

impl MatchController {
    /// Handle `/start [seconds]`, `/end` and `/gameover`. Returns false for
    /// anything else. Refusals are sent back to the invoker.
    pub fn handle_command(
        &mut self,
        host: &mut dyn HostApi,
        player: PlayerId,
        name: &str,
        params: &[String],
    ) -> bool {
        let Some(command) = Command::parse(name) else {
            return false;
        };
        let result = match command {
            Command::Start => self.start_command(host, player, name, params),
            Command::End => self.end_command(host, player, name),
        };
        if let Err(e) = result {
            tracing::debug!(player = %player, command = name, error = %e, "command refused");
            host.send_message(Recipient::Player(player), &e.to_string());
        }
        true
    }

    fn start_command(
        &mut self,
        host: &mut dyn HostApi,
        player: PlayerId,
        name: &str,
        params: &[String],
    ) -> Result<(), CommandError> {
        if !host.has_permission(player, &self.config.start_permission) {
            return Err(CommandError::PermissionDenied(name.to_string()));
        }
        match self.phase {
            MatchPhase::Countdown(_) => return Err(CommandError::CountdownInProgress),
            MatchPhase::Active(_) => return Err(CommandError::MatchInProgress),
            MatchPhase::Idle => {}
        }
        if ranking::participant_count(&host.players()) <= 2 {
            return Err(CommandError::NotEnoughPlayers);
        }

        let seconds = params
            .first()
            .and_then(|p| parse_leading_int(p))
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= MIN_COUNTDOWN)
            .unwrap_or(self.config.countdown);
        self.start_countdown(host, player, seconds);
        Ok(())
    }

    fn end_command(&mut self, host: &mut dyn HostApi, player: PlayerId, name: &str) -> Result<(), CommandError> {
        if !host.has_permission(player, &self.config.end_permission) {
            return Err(CommandError::PermissionDenied(name.to_string()));
        }
        if self.phase.is_idle() {
            return Err(CommandError::NoActiveMatch);
        }

        let invoker = host.callsign(player).unwrap_or_else(|| SERVER_NAME.to_string());
        tracing::info!(invoker = %invoker, phase = self.phase.name(), "match ended by command");
        host.broadcast(&format!(
            "{} has ended the current game of Last Tank Standing.",
            invoker
        ));
        self.end_match(host);
        Ok(())
    }
}
