//! Last Tank Standing: a timed elimination match for free-for-all arenas.
//!
//! Every elimination interval the participant at the bottom of the
//! scoreboard is moved to the observers until one tank is left. The
//! controller runs as a [`plugin_runtime::Plugin`] and touches the server
//! only through [`plugin_runtime::HostApi`].

pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
mod events;
pub mod ledger;
pub mod movement;
pub mod phase;
pub mod plugin;
pub mod ranking;
pub mod recorder;

#[cfg(test)]
mod test_support;

pub use crate::config::{ConfigKey, FileSettings, MatchConfig};
pub use crate::controller::MatchController;
pub use crate::error::{CommandError, MatchError};
pub use crate::ledger::{EliminationLedger, EliminationReason, EliminationRecord};
pub use crate::movement::{MovementGate, MovementParams};
pub use crate::phase::{ActiveMatch, Countdown, MatchPhase};
pub use crate::plugin::PLUGIN_NAME;
pub use crate::recorder::{replay_file_name, MatchRecorder};
