use clap::Args;
use sorveteria::loyalty::{PointsAdjustment, PointsKind};
use sorveteria_app::domain::loyalty::{LoyaltyService, PgLoyaltyService};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct AdjustPointsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Customer whose balance changes
    #[arg(long)]
    customer_uuid: Uuid,

    /// Points to move; always positive
    #[arg(long)]
    points: u32,

    /// `earn` or `redeem`
    #[arg(long)]
    kind: String,

    /// Ledger note
    #[arg(long)]
    description: Option<String>,
}

pub(crate) async fn run(args: AdjustPointsArgs) -> Result<(), String> {
    let kind: PointsKind = args.kind.parse().map_err(|error| format!("{error}"))?;

    let adjustment =
        PointsAdjustment::new(args.points, kind, args.description).map_err(|error| error.to_string())?;

    let db = crate::cli::connect(&args.database_url).await?;

    let result = PgLoyaltyService::new(db)
        .adjust_points(args.customer_uuid.into(), adjustment)
        .await
        .map_err(|error| format!("failed to adjust points: {error}"))?;

    println!("customer_uuid: {}", result.customer.uuid);
    println!("balance: {}", result.customer.loyalty_points);
    println!("transaction_uuid: {}", result.transaction.uuid);
    println!("delta: {}", result.transaction.points);

    Ok(())
}
