use clap::{Parser, Subcommand};
use sorveteria_app::{
    database::{self, Db},
    domain::orders::data::CheckoutConfig,
};

mod coupon;
mod customer;
mod db;
mod loyalty;
mod order;
mod token;

#[derive(Debug, Parser)]
#[command(name = "sorveteria-app", about = "Sorveteria operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Customer(customer::CustomerCommand),
    Token(token::TokenCommand),
    Coupon(coupon::CouponCommand),
    Loyalty(loyalty::LoyaltyCommand),
    Order(order::OrderCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command).await,
            Commands::Customer(command) => customer::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Coupon(command) => coupon::run(command).await,
            Commands::Loyalty(command) => loyalty::run(command).await,
            Commands::Order(command) => order::run(command).await,
        }
    }
}

pub(crate) async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}

/// Order settings used by CLI commands that touch orders.
pub(crate) fn checkout_config(
    initial_status: &str,
    transition_policy: &str,
) -> Result<CheckoutConfig, String> {
    Ok(CheckoutConfig {
        initial_status: initial_status
            .parse()
            .map_err(|error| format!("invalid initial status: {error}"))?,
        transition_policy: transition_policy
            .parse()
            .map_err(|error| format!("invalid transition policy: {error}"))?,
    })
}
