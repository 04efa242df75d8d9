use std::path::Path;

use plugin_runtime::PluginConfig;

/// Section of the plugin configuration file read at load time.
pub const CONFIG_SECTION: &str = "lastTankStanding";

pub const DEFAULT_ELIMINATION_INTERVAL: u32 = 60;
pub const MIN_ELIMINATION_INTERVAL: u32 = 45;
pub const DEFAULT_COUNTDOWN: u32 = 15;
pub const MIN_COUNTDOWN: u32 = 15;
pub const DEFAULT_IDLE_KICK_TIME: u32 = 30;
pub const MIN_IDLE_KICK_TIME: u32 = 15;
pub const MAX_IDLE_KICK_TIME: u32 = 45;

pub const DEFAULT_START_PERMISSION: &str = "vote";
pub const DEFAULT_END_PERMISSION: &str = "endgame";

/// Runtime-tunable settings, each backed by a server variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    EliminationInterval,
    Countdown,
    IdleKickTime,
    ResetScoreOnElimination,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::EliminationInterval,
        ConfigKey::Countdown,
        ConfigKey::IdleKickTime,
        ConfigKey::ResetScoreOnElimination,
    ];

    pub fn var_name(self) -> &'static str {
        match self {
            ConfigKey::EliminationInterval => "_ltsKickTime",
            ConfigKey::Countdown => "_ltsCountdown",
            ConfigKey::IdleKickTime => "_ltsIdleKickTime",
            ConfigKey::ResetScoreOnElimination => "_ltsResetScoreOnElimination",
        }
    }

    pub fn from_var_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.var_name() == name)
    }

    /// Value the server variable is registered with.
    pub fn default_value(self) -> &'static str {
        match self {
            ConfigKey::EliminationInterval => "60",
            ConfigKey::Countdown => "15",
            ConfigKey::IdleKickTime => "30",
            ConfigKey::ResetScoreOnElimination => "false",
        }
    }
}

/// Effective match settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    /// Seconds between eliminations.
    pub elimination_interval: u32,
    /// Seconds counted down before a match becomes active.
    pub countdown: u32,
    /// Seconds of inactivity before a participant is eliminated.
    pub idle_kick_time: u32,
    pub reset_score_on_elimination: bool,
    pub start_permission: String,
    pub end_permission: String,
    pub record_matches: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            elimination_interval: DEFAULT_ELIMINATION_INTERVAL,
            countdown: DEFAULT_COUNTDOWN,
            idle_kick_time: DEFAULT_IDLE_KICK_TIME,
            reset_score_on_elimination: false,
            start_permission: DEFAULT_START_PERMISSION.to_string(),
            end_permission: DEFAULT_END_PERMISSION.to_string(),
            record_matches: false,
        }
    }
}

impl MatchConfig {
    /// Apply a new raw value for `key`.
    ///
    /// Out-of-range or unparsable numbers fall back to the key's default.
    /// Returns false when that happened.
    pub fn apply(&mut self, key: ConfigKey, raw: &str) -> bool {
        match key {
            ConfigKey::EliminationInterval => {
                let (value, ok) = bounded(raw, MIN_ELIMINATION_INTERVAL, u32::MAX, DEFAULT_ELIMINATION_INTERVAL);
                self.elimination_interval = value;
                ok
            }
            ConfigKey::Countdown => {
                let (value, ok) = bounded(raw, MIN_COUNTDOWN, u32::MAX, DEFAULT_COUNTDOWN);
                self.countdown = value;
                ok
            }
            ConfigKey::IdleKickTime => {
                let (value, ok) = bounded(raw, MIN_IDLE_KICK_TIME, MAX_IDLE_KICK_TIME, DEFAULT_IDLE_KICK_TIME);
                self.idle_kick_time = value;
                ok
            }
            ConfigKey::ResetScoreOnElimination => {
                self.reset_score_on_elimination = parse_flag(raw);
                true
            }
        }
    }

    /// Overlay settings read from the configuration file.
    pub fn apply_file_settings(&mut self, file: &FileSettings) {
        self.record_matches = file.record_matches;
        self.start_permission = file.start_permission.clone();
        self.end_permission = file.end_permission.clone();
    }
}

fn bounded(raw: &str, min: u32, max: u32, default: u32) -> (u32, bool) {
    match parse_leading_int(raw).and_then(|n| u32::try_from(n).ok()) {
        Some(n) if (min..=max).contains(&n) => (n, true),
        _ => (default, false),
    }
}

/// Parse the integer prefix of `raw`, ignoring anything after the digits.
/// `"75s"` parses as 75; `"abc"` and `""` do not parse.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let n: i64 = digits[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

/// Server variable flag: "1", "true" and "on" are set, anything else is clear.
pub fn parse_flag(raw: &str) -> bool {
    let raw = raw.trim();
    raw == "1" || raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("on")
}

/// Config file boolean: "true" in any case, or any non-zero integer.
pub fn parse_truthy(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case("true") || parse_leading_int(raw).is_some_and(|n| n != 0)
}

/// Values read from the `[lastTankStanding]` section of the plugin config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSettings {
    pub record_matches: bool,
    pub start_permission: String,
    pub end_permission: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            record_matches: false,
            start_permission: DEFAULT_START_PERMISSION.to_string(),
            end_permission: DEFAULT_END_PERMISSION.to_string(),
        }
    }
}

impl FileSettings {
    /// Read settings from `path`. A missing path gives defaults; an unreadable
    /// or malformed file is logged and also gives defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("no plugin config file given, using defaults");
            return Self::default();
        };

        match PluginConfig::load(path) {
            Ok(config) => Self::from_config(&config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read plugin config, using defaults");
                Self::default()
            }
        }
    }

    pub fn from_config(config: &PluginConfig) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: String| match config.item(CONFIG_SECTION, key) {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => default,
        };

        let settings = Self {
            record_matches: config
                .item(CONFIG_SECTION, "RECORD_MATCHES")
                .is_some_and(parse_truthy),
            start_permission: text("GAME_START_PERM", defaults.start_permission),
            end_permission: text("GAME_END_PERM", defaults.end_permission),
        };

        tracing::debug!(
            record_matches = settings.record_matches,
            start_permission = %settings.start_permission,
            end_permission = %settings.end_permission,
            "plugin config loaded"
        );
        settings
    }
}
