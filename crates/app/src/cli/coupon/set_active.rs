use clap::{ArgAction, Args};
use sorveteria_app::domain::coupons::{CouponsService, PgCouponsService};

#[derive(Debug, Args)]
pub(crate) struct SetCouponActiveArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Coupon code
    #[arg(long)]
    code: String,

    /// `true` to enable, `false` to disable
    #[arg(long, action = ArgAction::Set)]
    active: bool,
}

pub(crate) async fn run(args: SetCouponActiveArgs) -> Result<(), String> {
    let db = crate::cli::connect(&args.database_url).await?;

    let record = PgCouponsService::new(db)
        .set_active(args.code, args.active)
        .await
        .map_err(|error| format!("failed to update coupon: {error}"))?;

    println!("code: {}", record.coupon.code);
    println!("active: {}", record.coupon.active);

    Ok(())
}
