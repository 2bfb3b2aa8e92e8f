use clap::{Parser, Subcommand};

mod keys;
mod storage;
mod tiers;

#[derive(Debug, Parser)]
#[command(name = "maas-app", about = "MaaS operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Keys(keys::KeysCommand),
    Tiers(tiers::TiersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Keys(command) => keys::run(command).await,
            Commands::Tiers(command) => tiers::run(command),
        }
    }
}
