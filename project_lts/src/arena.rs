use std::path::Path;
use std::sync::Arc;

use engine_core::{Clock, TickHandler};
use plugin_runtime::{
    EventReply, HostApi, HostEvent, HostSettings, LocalHost, OutboundMessage, Plugin, PluginRuntime,
};
use session::{PlayerId, Team};

/// An in-memory arena: the host state plus the plugins running on it.
///
/// Player changes are applied to the roster immediately. Their
/// notifications are queued and reach plugins on the next tick, except
/// team assignment and kicks, which the host asks about synchronously.
pub struct Arena {
    host: LocalHost,
    runtime: PluginRuntime,
}

impl Arena {
    pub fn new(clock: Arc<dyn Clock>, settings: HostSettings) -> Self {
        Self {
            host: LocalHost::new(clock, settings),
            runtime: PluginRuntime::new(),
        }
    }

    pub fn load_plugin(&mut self, plugin: Box<dyn Plugin>, config: Option<&Path>) {
        self.runtime.load(plugin, &mut self.host, config);
    }

    pub fn host(&self) -> &LocalHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut LocalHost {
        &mut self.host
    }

    pub fn find(&self, callsign: &str) -> Option<PlayerId> {
        self.host.roster().find_by_callsign(callsign)
    }

    /// Connect a player. Plugins may move them to another team before they spawn.
    pub fn join(&mut self, callsign: &str, team: Team, permissions: Vec<String>) -> PlayerId {
        let now = self.host.now();
        let id = self
            .host
            .roster_mut()
            .connect(callsign, team, permissions, now);

        let event = HostEvent::AutoTeam { player: id, team };
        let team = match self.runtime.dispatch_event(&mut self.host, &event) {
            EventReply::AssignTeam(assigned) => {
                self.host.set_team(id, assigned);
                assigned
            }
            EventReply::Continue => team,
        };

        tracing::info!(player = %id, callsign, %team, "player joined");
        self.runtime.queue_event(HostEvent::PlayerJoined { player: id, team });
        id
    }

    pub fn part(&mut self, id: PlayerId) -> bool {
        match self.host.roster_mut().disconnect(id) {
            Some(record) => {
                tracing::info!(player = %id, callsign = %record.callsign, "player left");
                self.runtime.queue_event(HostEvent::PlayerParted { record });
                true
            }
            None => false,
        }
    }

    /// Forcibly remove a player. Plugins hear about the kick while the
    /// player is still connected; the departure follows on the next tick.
    pub fn kick(&mut self, id: PlayerId, reason: &str) -> bool {
        if self.host.player(id).is_none() {
            return false;
        }
        let event = HostEvent::PlayerKicked {
            player: id,
            reason: reason.to_string(),
        };
        self.runtime.dispatch_event(&mut self.host, &event);
        self.part(id)
    }

    pub fn pause(&mut self, id: PlayerId, paused: bool) -> bool {
        let now = self.host.now();
        if !self.host.roster_mut().set_paused(id, paused, now) {
            return false;
        }
        self.runtime
            .queue_event(HostEvent::PlayerPaused { player: id, paused });
        true
    }

    /// Mark a player as active (moved, turned or fired).
    pub fn touch(&mut self, id: PlayerId) {
        let now = self.host.now();
        self.host.roster_mut().touch(id, now);
    }

    pub fn kill(&mut self, killer: PlayerId, victim: PlayerId) {
        let now = self.host.now();
        self.host.roster_mut().record_kill(killer, victim, now);
    }

    pub fn set_score(&mut self, id: PlayerId, wins: i32, losses: i32) -> bool {
        self.host.set_wins(id, wins) && self.host.set_losses(id, losses)
    }

    /// Change a server variable. Plugins see the change on the next tick.
    pub fn set_var(&mut self, name: &str, value: &str) {
        self.host.set_var(name, value);
    }

    /// Route a `/command` line typed by `player`.
    pub fn command(&mut self, player: PlayerId, line: &str) -> bool {
        self.runtime.dispatch_command(&mut self.host, player, line)
    }

    /// Deliver pending notifications and the tick to every plugin.
    pub fn tick(&mut self) -> usize {
        for event in self.host.take_pending_events() {
            self.runtime.queue_event(event);
        }
        self.runtime.run_tick(&mut self.host)
    }

    pub fn take_messages(&mut self) -> Vec<OutboundMessage> {
        self.host.take_outbox()
    }

    /// Unload every plugin.
    pub fn shutdown(&mut self) {
        self.runtime.unload_all(&mut self.host);
    }
}

impl TickHandler for Arena {
    fn on_tick(&mut self, _tick: u64) -> usize {
        self.tick()
    }

    fn player_count(&self) -> usize {
        self.host.roster().len()
    }
}
