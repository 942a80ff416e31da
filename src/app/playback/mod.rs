mod player;
mod process;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

pub(crate) use player::*;
pub(crate) use process::*;

use super::selection::Pick;
use crate::paths::CONSUMED_DIR_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandOutput {
    pub(crate) success: bool,
    pub(crate) status: String,
    pub(crate) output: String,
}

pub(crate) trait CommandRunner {
    fn run(&self, command: &str) -> io::Result<CommandOutput>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, command: &str) -> io::Result<CommandOutput> {
        (**self).run(command)
    }
}

#[derive(Debug, Error)]
pub(crate) enum PlaybackFailure {
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed with {status}\n{output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Archive {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub(crate) struct PlaybackDriver<R> {
    template: CommandTemplate,
    runner: R,
    root: PathBuf,
    archive_dir: PathBuf,
}

impl<R: CommandRunner> PlaybackDriver<R> {
    pub(crate) fn new(template: CommandTemplate, runner: R, root: &Path) -> Self {
        Self {
            template,
            runner,
            root: root.to_path_buf(),
            archive_dir: root.join(CONSUMED_DIR_NAME),
        }
    }

    pub(crate) fn prepare_archive(&self) -> Result<()> {
        fs::create_dir_all(&self.archive_dir).with_context(|| {
            format!(
                "failed to create archive directory {}",
                self.archive_dir.display()
            )
        })
    }

    pub(crate) fn play(&self, pick: &Pick) -> Result<(), PlaybackFailure> {
        let files = pick
            .playlist()
            .into_iter()
            .map(|filename| self.root.join(filename))
            .collect::<Vec<_>>();
        let command = self.template.render(&files);
        debug!(%command, "starting player");

        let outcome = self
            .runner
            .run(&command)
            .map_err(|source| PlaybackFailure::Launch {
                command: command.clone(),
                source,
            })?;
        if !outcome.success {
            return Err(PlaybackFailure::CommandFailed {
                command,
                status: outcome.status,
                output: outcome.output,
            });
        }

        self.archive(&pick.episode.filename)
    }

    fn archive(&self, filename: &str) -> Result<(), PlaybackFailure> {
        let from = self.root.join(filename);
        let to = self.archive_dir.join(filename);
        fs::rename(&from, &to).map_err(|source| PlaybackFailure::Archive {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;
        debug!(from = %from.display(), to = %to.display(), "archived episode");
        Ok(())
    }
}
