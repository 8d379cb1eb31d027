use clap::Args;
use sorveteria_app::domain::orders::{OrdersService, PgOrdersService};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct SetStatusArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Order to update
    #[arg(long)]
    order_uuid: Uuid,

    /// New status label, e.g. "Em preparo"
    #[arg(long)]
    status: String,

    /// Status for new orders (pendente, em-preparo)
    #[arg(long, env = "ORDER_INITIAL_STATUS", default_value = "pendente")]
    initial_status: String,

    /// Allowed status changes (permissive, strict)
    #[arg(long, env = "ORDER_TRANSITION_POLICY", default_value = "permissive")]
    transition_policy: String,
}

pub(crate) async fn run(args: SetStatusArgs) -> Result<(), String> {
    let config = crate::cli::checkout_config(&args.initial_status, &args.transition_policy)?;
    let db = crate::cli::connect(&args.database_url).await?;

    let order = PgOrdersService::new(db, config)
        .set_status(args.order_uuid.into(), args.status)
        .await
        .map_err(|error| format!("failed to update order status: {error}"))?;

    println!("order_uuid: {}", order.uuid);
    println!("status: {}", order.status);

    Ok(())
}
