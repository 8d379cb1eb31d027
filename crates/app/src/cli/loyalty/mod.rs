use clap::{Args, Subcommand};

mod adjust;

#[derive(Debug, Args)]
pub(crate) struct LoyaltyCommand {
    #[command(subcommand)]
    command: LoyaltySubcommand,
}

#[derive(Debug, Subcommand)]
enum LoyaltySubcommand {
    Adjust(adjust::AdjustPointsArgs),
}

pub(crate) async fn run(command: LoyaltyCommand) -> Result<(), String> {
    match command.command {
        LoyaltySubcommand::Adjust(args) => adjust::run(args).await,
    }
}
