mod catalog;
mod display;
mod episode;
mod legacy;
mod playback;
mod selection;
mod session;


use std::env;
use std::io;

use anyhow::{Context, Result};

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::paths::config_file_path;

use self::legacy::run_legacy;
use self::playback::{ShellRunner, SystemPlayerResolver};
use self::session::{Session, SessionSetup};

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Legacy) => run_manual()?,
        None => run_automatic()?,
    }

    Ok(())
}

fn run_automatic() -> Result<()> {
    let config_path = config_file_path()?;
    let config = Config::load(&config_path)?;
    let root = env::current_dir().context("unable to resolve current directory")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut session = Session::start(
        SessionSetup {
            resolver: &SystemPlayerResolver::new(&config),
            runner: ShellRunner,
            root: &root,
            rng: rand::thread_rng(),
            config_hint: &config_path,
        },
        &mut out,
    )?;
    session.run(&mut io::stdin().lock(), &mut out)?;
    Ok(())
}

fn run_manual() -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_legacy(&mut io::stdin().lock(), &mut out, &mut rand::thread_rng())?;
    Ok(())
}
