//! Server configuration module

use clap::Parser;

use crate::config::{
    checkout::CheckoutSettings,
    listen::ListenConfig,
    observability::{LoggingConfig, ObservabilityConfig},
};

pub(crate) mod checkout;
pub(crate) mod listen;
pub(crate) mod observability;

/// Sorveteria JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "sorveteria-json", about = "Sorveteria JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Bind address and database.
    #[command(flatten)]
    pub listen: ListenConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Order and loyalty behaviour.
    #[command(flatten)]
    pub checkout: CheckoutSettings,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.listen.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use sorveteria::orders::{InitialStatus, TransitionPolicy};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn checkout_flags_parse_into_app_config() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "sorveteria-json",
            "--database-url",
            "postgres://localhost/sorveteria",
            "--order-initial-status",
            "em-preparo",
            "--order-transition-policy",
            "strict",
            "--loyalty-recent-transactions",
            "3",
        ])?;

        let checkout = config.checkout.checkout_config();

        assert_eq!(checkout.initial_status, InitialStatus::Preparing);
        assert_eq!(checkout.transition_policy, TransitionPolicy::Strict);
        assert_eq!(config.checkout.loyalty_recent_transactions, 3);

        Ok(())
    }

    #[test]
    fn defaults_bind_all_interfaces() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "sorveteria-json",
            "--database-url",
            "postgres://localhost/sorveteria",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.checkout.loyalty_recent_transactions, 5);
        assert_eq!(config.listen.shutdown_grace().as_secs(), 30);

        Ok(())
    }

    #[test]
    fn unknown_initial_status_is_rejected() {
        let result = ServerConfig::try_parse_from([
            "sorveteria-json",
            "--database-url",
            "postgres://localhost/sorveteria",
            "--order-initial-status",
            "entregue",
        ]);

        assert!(result.is_err(), "expected parse error, got {result:?}");
    }
}
