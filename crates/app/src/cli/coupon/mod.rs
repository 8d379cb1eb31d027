use clap::{Args, Subcommand};

mod set_active;
mod upsert;

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    Upsert(upsert::UpsertCouponArgs),
    SetActive(set_active::SetCouponActiveArgs),
}

pub(crate) async fn run(command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Upsert(args) => upsert::run(args).await,
        CouponSubcommand::SetActive(args) => set_active::run(args).await,
    }
}
