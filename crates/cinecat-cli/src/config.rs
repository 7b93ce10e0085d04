use clap::{Parser, Subcommand};

use crate::commands::{migrate::MigrateCmd, seed::SeedCmd};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for cinecat - maintenance of the movie catalog database."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Creates the database if needed and applies pending migrations
    Migrate(MigrateCmd),
    /// Loads SQL fixture file into the database
    Seed(SeedCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Migrate(cmd) => cmd.run().await,
            Command::Seed(cmd) => cmd.run().await,
        }
    }
}
