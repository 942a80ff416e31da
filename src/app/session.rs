use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::debug;

use super::catalog::{build_catalog, scan_directory};
use super::display::{banner, catalog_lines, emit_warnings};
use super::playback::{
    CommandRunner, FILENAMES_PLACEHOLDER, PlaybackDriver, PlayerResolver, with_interrupt_exiting,
};
use super::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionEnd {
    Finished,
    Cancelled,
}

pub(crate) struct SessionSetup<'a, P, R, G> {
    pub(crate) resolver: &'a P,
    pub(crate) runner: R,
    pub(crate) root: &'a Path,
    pub(crate) rng: G,
    pub(crate) config_hint: &'a Path,
}

pub(crate) struct Session<R, G> {
    driver: PlaybackDriver<R>,
    selection: Selection<G>,
}

impl<R: CommandRunner, G: Rng> Session<R, G> {
    pub(crate) fn start<P, W>(setup: SessionSetup<'_, P, R, G>, out: &mut W) -> Result<Self>
    where
        P: PlayerResolver,
        W: Write,
    {
        let template = setup.resolver.resolve_player_command().with_context(|| {
            format!(
                "no player available: set `command = \"<player> {FILENAMES_PLACEHOLDER}\"` in {} \
                 or install one of xdg-open, open, cygstart",
                setup.config_hint.display()
            )
        })?;
        debug!(%template, "resolved player command");
        if !template.has_placeholder() {
            emit_warnings(&[format!(
                "player command `{template}` has no {FILENAMES_PLACEHOLDER}; files will be appended"
            )]);
        }

        let driver = PlaybackDriver::new(template, setup.runner, setup.root);
        driver.prepare_archive()?;

        let (entries, scan_warnings) = scan_directory(setup.root)?;
        emit_warnings(&scan_warnings);
        let build = build_catalog(entries);
        emit_warnings(&build.warnings);

        writeln!(out, "{}", banner(build.catalog.total_episodes()))?;
        for line in catalog_lines(&build.catalog) {
            writeln!(out, "{line}")?;
        }
        out.flush()?;

        Ok(Self {
            driver,
            selection: Selection::new(build.catalog, setup.rng),
        })
    }

    pub(crate) fn run<I, W>(&mut self, input: &mut I, out: &mut W) -> Result<SessionEnd>
    where
        I: BufRead,
        W: Write,
    {
        let total = self.selection.total();
        let mut position = 0;

        while self.selection.has_next() {
            if !wait_for_go(input)? {
                writeln!(out)?;
                return Ok(SessionEnd::Cancelled);
            }
            let Some(pick) = self.selection.next() else {
                break;
            };
            position += 1;

            write!(out, "\r -- playing...")?;
            out.flush()?;
            self.driver.play(&pick).with_context(|| {
                format!(
                    "playback of {} failed; it has been left in place",
                    pick.episode.filename
                )
            })?;
            write!(out, "\r{position}/{total} - {} - {}", pick.series, pick.episode.number)?;
            out.flush()?;
        }

        writeln!(out)?;
        Ok(SessionEnd::Finished)
    }
}

pub(crate) fn wait_for_go<I: BufRead>(input: &mut I) -> Result<bool> {
    let mut line = String::new();
    let read = with_interrupt_exiting(|| input.read_line(&mut line))
        .context("failed to read from stdin")?;
    Ok(read > 0)
}
