use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "pseudomyth",
    version,
    about = "Decide what order to watch the episodes in this directory, then play them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shuffle a list of show names typed on stdin instead of scanning files
    Legacy,
}
