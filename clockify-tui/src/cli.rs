use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "clockify-tui")]
#[command(about = "Terminal UI for Clockify time tracking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Run against the Clockify API (default)
    Run,
    /// Run with seeded in-memory data, no account needed
    Dev,
    /// Print config path and create default file if missing
    ConfigPath,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }
}
