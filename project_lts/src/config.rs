use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use engine_core::tick::TickConfig;
use plugin_runtime::{GameStyle, HostSettings};
use session::Team;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickSection {
    pub tps: u32,
}

impl Default for TickSection {
    fn default() -> Self {
        Self { tps: 10 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PluginSection {
    /// Path handed to the plugin's own config loader.
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordingSection {
    pub dir: PathBuf,
}

impl Default for RecordingSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("recordings"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArenaSection {
    pub game_style: GameStyle,
    pub time_manual_start: bool,
    pub team_limits: HashMap<Team, u32>,
}

impl Default for ArenaSection {
    fn default() -> Self {
        let host = HostSettings::default();
        Self {
            game_style: host.game_style,
            time_manual_start: host.time_manual_start,
            team_limits: host.team_limits,
        }
    }
}

/// Top-level arena server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub tick: TickSection,
    pub plugin: PluginSection,
    pub recording: RecordingSection,
    pub arena: ArenaSection,
}

impl ServerConfig {
    /// Load configuration from an optional TOML file path. A path that does
    /// not exist gives the defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            _ => Self::default(),
        };
        Ok(config)
    }

    pub fn to_tick_config(&self) -> TickConfig {
        TickConfig {
            tps: self.tick.tps,
            max_ticks: 0,
        }
    }

    pub fn to_host_settings(&self) -> HostSettings {
        HostSettings {
            game_style: self.arena.game_style,
            time_manual_start: self.arena.time_manual_start,
            recording_dir: self.recording.dir.clone(),
            team_limits: self.arena.team_limits.clone(),
        }
    }
}

/// Parse CLI arguments and load config.
/// Supports: --config <path>, --plugin-config <path>
pub fn parse_cli_args() -> ServerConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut plugin_config: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        let target = match args[i].as_str() {
            "--config" => &mut config_path,
            "--plugin-config" => &mut plugin_config,
            other => {
                eprintln!("Unknown argument: {}", other);
                std::process::exit(1);
            }
        };
        match args.get(i + 1) {
            Some(val) => *target = Some(PathBuf::from(val)),
            None => {
                eprintln!("{} requires a path argument", args[i]);
                std::process::exit(1);
            }
        }
        i += 2;
    }

    let mut config = match ServerConfig::load(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    if plugin_config.is_some() {
        config.plugin.config_path = plugin_config;
    }
    config
}
