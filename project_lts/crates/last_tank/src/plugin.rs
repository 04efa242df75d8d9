use std::path::Path;

use plugin_runtime::{CommandRegistry, EventReply, HostApi, HostEvent, Plugin};
use session::{PlayerId, Team};

use crate::commands::COMMANDS;
use crate::config::{ConfigKey, FileSettings};
use crate::controller::MatchController;

pub const PLUGIN_NAME: &str = "Last Tank Standing";

impl Plugin for MatchController {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn init(&mut self, host: &mut dyn HostApi, commands: &mut CommandRegistry, config: Option<&Path>) {
        let file = FileSettings::load(config);
        self.config.apply_file_settings(&file);

        host.set_var_bool("_speedChecksLogOnly", true);
        for key in ConfigKey::ALL {
            let current = host.register_var(key.var_name(), key.default_value());
            self.update_setting(key.var_name(), &current);
        }

        for command in COMMANDS {
            if let Err(e) = commands.register(command, PLUGIN_NAME) {
                tracing::warn!(command, error = %e, "could not register command");
            }
        }

        check_server_setup(host);
        tracing::info!(
            interval = self.config.elimination_interval,
            countdown = self.config.countdown,
            idle_kick_time = self.config.idle_kick_time,
            record_matches = self.config.record_matches,
            "{} ready",
            PLUGIN_NAME
        );
    }

    fn cleanup(&mut self, host: &mut dyn HostApi, commands: &mut CommandRegistry) {
        if self.phase.in_progress() {
            self.end_match(host);
        }
        for command in COMMANDS {
            commands.unregister(command, PLUGIN_NAME);
        }
    }

    fn on_event(&mut self, host: &mut dyn HostApi, event: &HostEvent) -> EventReply {
        self.handle_event(host, event)
    }

    fn on_command(&mut self, host: &mut dyn HostApi, player: PlayerId, command: &str, params: &[String]) -> bool {
        self.handle_command(host, player, command, params)
    }
}

/// Warn about server settings that break the game. Nothing is changed.
fn check_server_setup(host: &dyn HostApi) {
    let style = host.game_style();
    if !style.is_free_for_all() {
        tracing::warn!(?style, "Last Tank Standing is designed for free-for-all servers");
    } else {
        for team in [Team::Red, Team::Green, Team::Blue, Team::Purple] {
            let limit = host.team_player_limit(team);
            if limit > 0 {
                tracing::warn!(%team, limit, "team slots are open on a free-for-all server, set them to 0");
            }
        }
    }
    if host.time_manual_start() {
        tracing::warn!("manual time start is enabled and will interfere with matches");
    }
}
