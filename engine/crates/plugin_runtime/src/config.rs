use std::collections::BTreeMap;
use std::path::Path;

use crate::error::PluginError;

/// Section/key string pairs read from a plugin's configuration file.
///
/// The file is TOML; every scalar is kept as its string form so plugins
/// can apply their own parsing rules. Section and key lookups ignore case.
#[derive(Debug, Clone, Default)]
pub struct PluginConfig {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl PluginConfig {
    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, PluginError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, PluginError> {
        let table: toml::Table = content.parse()?;
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();

        for (name, value) in table {
            match value {
                toml::Value::Table(items) => {
                    let section = sections.entry(name.to_lowercase()).or_default();
                    for (key, item) in items {
                        let text = scalar_to_string(&item).ok_or_else(|| {
                            PluginError::InvalidValue {
                                section: name.clone(),
                                key: key.clone(),
                            }
                        })?;
                        section.insert(key.to_lowercase(), text);
                    }
                }
                // Top-level keys live in the unnamed section.
                other => {
                    let text = scalar_to_string(&other).ok_or_else(|| PluginError::InvalidValue {
                        section: String::new(),
                        key: name.clone(),
                    })?;
                    sections
                        .entry(String::new())
                        .or_default()
                        .insert(name.to_lowercase(), text);
                }
            }
        }

        Ok(Self { sections })
    }

    /// Look up a value. `None` when either the section or the key is absent.
    pub fn item(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_lowercase())?
            .get(&key.to_lowercase())
            .map(String::as_str)
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(&section.to_lowercase())
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(d) => Some(d.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}
