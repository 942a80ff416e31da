use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Config;

pub(crate) const FILENAMES_PLACEHOLDER: &str = "{filenames}";

pub(crate) const OPEN_COMMANDS: &[&str] = &["xdg-open", "open", "cygstart", "cygstart.exe"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandTemplate(String);

impl CommandTemplate {
    pub(crate) fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub(crate) fn has_placeholder(&self) -> bool {
        self.0.contains(FILENAMES_PLACEHOLDER)
    }

    pub(crate) fn render<P: AsRef<Path>>(&self, files: &[P]) -> String {
        let quoted = files
            .iter()
            .map(|file| shell_quote(&file.as_ref().to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ");
        if self.has_placeholder() {
            self.0.replace(FILENAMES_PLACEHOLDER, &quoted)
        } else {
            format!("{} {quoted}", self.0.trim_end())
        }
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(unix)]
pub(crate) fn shell_quote(raw: &str) -> String {
    let is_plain = !raw.is_empty()
        && raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./,:=@%+".contains(c));
    if is_plain {
        return raw.to_string();
    }
    format!("'{}'", raw.replace('\'', r"'\''"))
}

#[cfg(not(unix))]
pub(crate) fn shell_quote(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

pub(crate) trait PlayerResolver {
    fn resolve_player_command(&self) -> Option<CommandTemplate>;
}

impl<F> PlayerResolver for F
where
    F: Fn() -> Option<CommandTemplate>,
{
    fn resolve_player_command(&self) -> Option<CommandTemplate> {
        self()
    }
}

pub(crate) struct SystemPlayerResolver<'a> {
    config: &'a Config,
}

impl<'a> SystemPlayerResolver<'a> {
    pub(crate) fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl PlayerResolver for SystemPlayerResolver<'_> {
    fn resolve_player_command(&self) -> Option<CommandTemplate> {
        resolve_player_command_with(self.config, |name| which::which(name).ok())
    }
}

pub(crate) fn resolve_player_command_with<F>(config: &Config, locate: F) -> Option<CommandTemplate>
where
    F: Fn(&str) -> Option<PathBuf>,
{
    if let Some(command) = config.command.as_deref() {
        return Some(CommandTemplate::new(command));
    }
    OPEN_COMMANDS
        .iter()
        .find(|name| locate(name).is_some())
        .map(|name| CommandTemplate::new(format!("{name} {FILENAMES_PLACEHOLDER}")))
}
