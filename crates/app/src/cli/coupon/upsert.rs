use clap::Args;
use jiff::Timestamp;
use rust_decimal::Decimal;
use sorveteria::{
    coupons::{Coupon, CouponCode, CouponValue},
    prices::Price,
};
use sorveteria_app::domain::coupons::{CouponsService, PgCouponsService, data::CouponUpsert};

#[derive(Debug, Args)]
pub(crate) struct UpsertCouponArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Coupon code; stored upper-cased
    #[arg(long)]
    code: String,

    /// Percentage off the subtotal, e.g. 10 or 12.5
    #[arg(long, conflicts_with = "amount", required_unless_present = "amount")]
    percentage: Option<Decimal>,

    /// Fixed amount off the subtotal, in centavos
    #[arg(long)]
    amount: Option<u64>,

    /// Minimum subtotal in centavos
    #[arg(long, default_value_t = 0)]
    minimum: u64,

    /// Maximum number of uses
    #[arg(long)]
    usage_cap: Option<u32>,

    /// Expiry timestamp (RFC 3339)
    #[arg(long)]
    expires_at: Option<String>,

    /// Store the coupon disabled
    #[arg(long)]
    inactive: bool,

    /// Free-form note shown to admins
    #[arg(long)]
    description: Option<String>,
}

pub(crate) async fn run(args: UpsertCouponArgs) -> Result<(), String> {
    let code = CouponCode::parse(&args.code).map_err(|error| error.to_string())?;

    let value = match (args.percentage, args.amount) {
        (Some(percentage), _) => CouponValue::Percentage(percentage),
        (None, Some(amount)) => CouponValue::Fixed(Price::new(amount)),
        (None, None) => return Err("either --percentage or --amount is required".to_string()),
    };

    let expires_at = args
        .expires_at
        .as_deref()
        .map(str::parse::<Timestamp>)
        .transpose()
        .map_err(|error| format!("invalid expires-at timestamp: {error}"))?;

    let mut coupon = Coupon::new(code, value);

    coupon.minimum = Price::new(args.minimum);
    coupon.usage_cap = args.usage_cap;
    coupon.active = !args.inactive;
    coupon.expires_at = expires_at;

    let db = crate::cli::connect(&args.database_url).await?;

    let record = PgCouponsService::new(db)
        .upsert_coupon(CouponUpsert {
            coupon,
            description: args.description,
        })
        .await
        .map_err(|error| format!("failed to save coupon: {error}"))?;

    println!("coupon_uuid: {}", record.uuid);
    println!("code: {}", record.coupon.code);
    println!("type: {}", record.coupon.value.kind());
    println!("active: {}", record.coupon.active);
    println!("usage_count: {}", record.coupon.usage_count);

    Ok(())
}
