use clap::{Args, Subcommand};

mod lookup;

#[derive(Debug, Args)]
pub(crate) struct TiersCommand {
    #[command(subcommand)]
    command: TiersSubcommand,
}

#[derive(Debug, Subcommand)]
enum TiersSubcommand {
    Lookup(lookup::LookupArgs),
}

pub(crate) fn run(command: TiersCommand) -> Result<(), String> {
    match command.command {
        TiersSubcommand::Lookup(args) => lookup::run(&args),
    }
}
