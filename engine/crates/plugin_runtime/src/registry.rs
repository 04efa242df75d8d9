use std::collections::BTreeMap;

use crate::error::PluginError;

/// Maps slash-command names to the plugin that registered them.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    owners: BTreeMap<String, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `command` for `owner`. Names are case-insensitive.
    pub fn register(&mut self, command: &str, owner: &str) -> Result<(), PluginError> {
        let key = command.to_lowercase();
        if let Some(existing) = self.owners.get(&key) {
            if existing != owner {
                return Err(PluginError::CommandTaken {
                    command: key,
                    owner: existing.clone(),
                });
            }
            return Ok(());
        }
        tracing::debug!(command = %key, owner, "slash command registered");
        self.owners.insert(key, owner.to_string());
        Ok(())
    }

    /// Release `command` if `owner` holds it. Returns true when removed.
    pub fn unregister(&mut self, command: &str, owner: &str) -> bool {
        let key = command.to_lowercase();
        if self.owners.get(&key).is_some_and(|o| o == owner) {
            self.owners.remove(&key);
            return true;
        }
        false
    }

    pub fn owner_of(&self, command: &str) -> Option<&str> {
        self.owners.get(&command.to_lowercase()).map(String::as_str)
    }

    pub fn commands(&self) -> Vec<&str> {
        self.owners.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Split `/name arg1 arg2` into a lowercase command name and its parameters.
pub fn parse_slash_command(line: &str) -> Option<(String, Vec<String>)> {
    let body = line.trim().strip_prefix('/')?;
    let mut parts = body.split_whitespace();
    let name = parts.next()?.to_lowercase();
    let params = parts.map(str::to_string).collect();
    Some((name, params))
}
