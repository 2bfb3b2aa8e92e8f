use clap::{Args, Subcommand};

mod invalidate;
mod list;

#[derive(Debug, Args)]
pub(crate) struct KeysCommand {
    #[command(subcommand)]
    command: KeysSubcommand,
}

#[derive(Debug, Subcommand)]
enum KeysSubcommand {
    List(list::ListKeysArgs),
    Invalidate(invalidate::InvalidateKeysArgs),
}

pub(crate) async fn run(command: KeysCommand) -> Result<(), String> {
    match command.command {
        KeysSubcommand::List(args) => list::run(args).await,
        KeysSubcommand::Invalidate(args) => invalidate::run(args).await,
    }
}
