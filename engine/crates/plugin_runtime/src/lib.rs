pub mod config;
pub mod error;
pub mod host_api;
pub mod local_host;
pub mod plugin;
pub mod recording;
pub mod registry;

use std::path::Path;

use engine_core::EventQueue;
use session::PlayerId;

pub use crate::config::PluginConfig;
pub use crate::error::PluginError;
pub use crate::host_api::{GameStyle, HostApi, OutboundMessage, Recipient};
pub use crate::local_host::{HostSettings, LocalHost};
pub use crate::plugin::{EventReply, HostEvent, Plugin};
pub use crate::registry::{parse_slash_command, CommandRegistry};

/// Hosts plugins: loads them, queues notifications between ticks and
/// delivers events and slash commands serially.
pub struct PluginRuntime {
    plugins: Vec<Box<dyn Plugin>>,
    pub commands: CommandRegistry,
    queue: EventQueue<HostEvent>,
}

impl Default for PluginRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginRuntime {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            commands: CommandRegistry::new(),
            queue: EventQueue::new(),
        }
    }

    /// Initialise and take ownership of a plugin.
    pub fn load(&mut self, mut plugin: Box<dyn Plugin>, host: &mut dyn HostApi, config: Option<&Path>) {
        plugin.init(host, &mut self.commands, config);
        tracing::info!(plugin = plugin.name(), "plugin loaded");
        self.plugins.push(plugin);
    }

    /// Run every plugin's cleanup and drop them.
    pub fn unload_all(&mut self, host: &mut dyn HostApi) {
        for mut plugin in self.plugins.drain(..) {
            plugin.cleanup(host, &mut self.commands);
            tracing::info!(plugin = plugin.name(), "plugin unloaded");
        }
        self.queue.clear();
    }

    /// Queue a notification for delivery on the next tick.
    pub fn queue_event(&mut self, event: HostEvent) {
        self.queue.push(event);
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Deliver one notification to every plugin right away.
    /// The first team override wins; later plugins still see the event.
    pub fn dispatch_event(&mut self, host: &mut dyn HostApi, event: &HostEvent) -> EventReply {
        let mut reply = EventReply::Continue;
        for plugin in &mut self.plugins {
            let r = plugin.on_event(host, event);
            if reply == EventReply::Continue {
                reply = r;
            }
        }
        reply
    }

    /// Deliver queued notifications in arrival order, then the tick itself.
    /// Returns the number of notifications delivered, the tick included.
    pub fn run_tick(&mut self, host: &mut dyn HostApi) -> usize {
        let events = self.queue.drain();
        let count = events.len() + 1;
        for event in &events {
            self.dispatch_event(host, event);
        }
        self.dispatch_event(host, &HostEvent::Tick);
        count
    }

    /// Route a `/command` line typed by `player`. Returns true when a plugin handled it;
    /// otherwise the player is told the command is unknown.
    pub fn dispatch_command(&mut self, host: &mut dyn HostApi, player: PlayerId, line: &str) -> bool {
        let Some((name, params)) = parse_slash_command(line) else {
            return false;
        };

        let handled = match self.commands.owner_of(&name) {
            Some(owner) => {
                let owner = owner.to_string();
                self.plugins
                    .iter_mut()
                    .find(|p| p.name() == owner)
                    .is_some_and(|p| p.on_command(host, player, &name, &params))
            }
            None => false,
        };

        if !handled {
            host.send_message(Recipient::Player(player), &format!("Unknown command [/{}]", name));
        }
        handled
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }
}
