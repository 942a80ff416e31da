use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub command: Option<String>,
}

// Top-level keys win over the same keys under an explicit `[DEFAULT]` table.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    command: Option<String>,
    #[serde(default, rename = "DEFAULT")]
    default_section: Option<RawSection>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSection {
    #[serde(default)]
    command: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read config at {}", path.display()));
            }
        };
        Self::parse(&raw).with_context(|| format!("failed to parse config at {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(raw)?;
        let command = non_blank(raw.command).or_else(|| {
            raw.default_section
                .and_then(|section| non_blank(section.command))
        });
        Ok(Self { command })
    }
}

fn non_blank(command: Option<String>) -> Option<String> {
    command.filter(|command| !command.trim().is_empty())
}
