//! Arena server hosting the Last Tank Standing plugin, driven from an
//! operator console.

pub mod arena;
pub mod config;
pub mod console;
pub mod server;
pub mod shutdown;

pub use crate::arena::Arena;
pub use crate::config::ServerConfig;
pub use crate::server::ConsoleServer;
