use std::io;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config value [{section}] {key} must be a string, number or boolean")]
    InvalidValue { section: String, key: String },

    #[error("command /{command} is already registered by {owner}")]
    CommandTaken { command: String, owner: String },

    #[error("no recording in progress")]
    RecordingInactive,

    #[error("invalid recording file name: {0}")]
    RecordingName(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
