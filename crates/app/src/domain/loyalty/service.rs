//! Loyalty service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sorveteria::loyalty::{LoyaltyError, PointsAdjustment};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        customers::{records::CustomerUuid, repository::PgCustomersRepository},
        loyalty::{
            errors::LoyaltyServiceError,
            records::{
                LoyaltyAccount, LoyaltyAdjustment, LoyaltyTransactionRecord,
                LoyaltyTransactionUuid,
            },
            repository::PgLoyaltyRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgLoyaltyService {
    db: Db,
    repository: PgLoyaltyRepository,
    customers: PgCustomersRepository,
}

impl PgLoyaltyService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgLoyaltyRepository::new(),
            customers: PgCustomersRepository::new(),
        }
    }
}

#[async_trait]
impl LoyaltyService for PgLoyaltyService {
    #[tracing::instrument(
        name = "loyalty.service.adjust_points",
        skip(self, adjustment),
        fields(
            customer_uuid = %customer,
            kind = %adjustment.kind(),
            points = adjustment.points()
        ),
        err
    )]
    async fn adjust_points(
        &self,
        customer: CustomerUuid,
        adjustment: PointsAdjustment,
    ) -> Result<LoyaltyAdjustment, LoyaltyServiceError> {
        let mut tx = self.db.begin().await?;

        let Some(updated) = self
            .repository
            .apply_points(&mut tx, customer, adjustment.delta())
            .await?
        else {
            // Either the customer is missing or the redeem would go below zero.
            let current = self.customers.get_customer(&mut tx, customer).await?;

            return Err(LoyaltyError::InsufficientPoints {
                balance: current.loyalty_points,
                requested: adjustment.points(),
            }
            .into());
        };

        let transaction = self
            .repository
            .create_transaction(&mut tx, LoyaltyTransactionUuid::new(), customer, &adjustment)
            .await?;

        tx.commit().await?;

        info!(
            customer_uuid = %customer,
            delta = transaction.points,
            balance = updated.loyalty_points,
            "adjusted loyalty points"
        );

        Ok(LoyaltyAdjustment {
            customer: updated,
            transaction,
        })
    }

    #[tracing::instrument(name = "loyalty.service.list_accounts", skip(self), err)]
    async fn list_accounts(
        &self,
        recent_transactions: u32,
    ) -> Result<Vec<LoyaltyAccount>, LoyaltyServiceError> {
        let mut tx = self.db.begin().await?;

        let customers = self.repository.list_customers(&mut tx).await?;
        let transactions = self
            .repository
            .recent_transactions(&mut tx, i64::from(recent_transactions))
            .await?;

        tx.commit().await?;

        let mut by_customer: FxHashMap<CustomerUuid, Vec<LoyaltyTransactionRecord>> =
            FxHashMap::default();

        for transaction in transactions {
            by_customer
                .entry(transaction.customer_uuid)
                .or_default()
                .push(transaction);
        }

        Ok(customers
            .into_iter()
            .map(|customer| LoyaltyAccount {
                recent_transactions: by_customer.remove(&customer.uuid).unwrap_or_default(),
                customer,
            })
            .collect())
    }

    #[tracing::instrument(
        name = "loyalty.service.customer_transactions",
        skip(self),
        fields(customer_uuid = %customer),
        err
    )]
    async fn customer_transactions(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<LoyaltyTransactionRecord>, LoyaltyServiceError> {
        let mut tx = self.db.begin().await?;

        self.customers.get_customer(&mut tx, customer).await?;

        let transactions = self
            .repository
            .customer_transactions(&mut tx, customer)
            .await?;

        tx.commit().await?;

        Ok(transactions)
    }
}

#[automock]
#[async_trait]
pub trait LoyaltyService: Send + Sync {
    /// Applies an earn or redeem to a customer's balance and records it.
    ///
    /// A redeem larger than the balance fails with
    /// [`LoyaltyError::InsufficientPoints`] and changes nothing.
    async fn adjust_points(
        &self,
        customer: CustomerUuid,
        adjustment: PointsAdjustment,
    ) -> Result<LoyaltyAdjustment, LoyaltyServiceError>;

    /// Every customer by name, each with up to `recent_transactions` newest entries.
    async fn list_accounts(
        &self,
        recent_transactions: u32,
    ) -> Result<Vec<LoyaltyAccount>, LoyaltyServiceError>;

    /// A customer's full ledger, newest first.
    async fn customer_transactions(
        &self,
        customer: CustomerUuid,
    ) -> Result<Vec<LoyaltyTransactionRecord>, LoyaltyServiceError>;
}

#[cfg(test)]
mod tests {
    use sorveteria::loyalty::{PointsKind, balance_of};
    use testresult::TestResult;
    use tokio::task::JoinSet;

    use crate::{domain::customers::CustomersService, test::TestContext};

    use super::*;

    fn earn(points: u32) -> TestResult<PointsAdjustment> {
        Ok(PointsAdjustment::new(
            points,
            PointsKind::Earn,
            Some("Pedido".to_string()),
        )?)
    }

    fn redeem(points: u32) -> TestResult<PointsAdjustment> {
        Ok(PointsAdjustment::new(points, PointsKind::Redeem, None)?)
    }

    #[tokio::test]
    async fn earn_then_redeem_nets_thirty_with_two_entries() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Iara").await;

        ctx.loyalty.adjust_points(customer, earn(50)?).await?;

        let result = ctx.loyalty.adjust_points(customer, redeem(20)?).await?;

        assert_eq!(result.customer.loyalty_points, 30);
        assert_eq!(result.transaction.points, -20);
        assert_eq!(result.transaction.kind, PointsKind::Redeem);

        let deltas: Vec<i64> = ctx
            .loyalty
            .customer_transactions(customer)
            .await?
            .iter()
            .map(|transaction| transaction.points)
            .collect();

        assert_eq!(deltas, vec![-20, 50]);

        Ok(())
    }

    #[tokio::test]
    async fn redeem_beyond_balance_is_rejected_without_changes() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("João").await;

        ctx.loyalty.adjust_points(customer, earn(10)?).await?;

        let result = ctx.loyalty.adjust_points(customer, redeem(11)?).await;

        assert!(
            matches!(
                result,
                Err(LoyaltyServiceError::Points(LoyaltyError::InsufficientPoints {
                    balance: 10,
                    requested: 11
                }))
            ),
            "expected InsufficientPoints, got {result:?}"
        );

        assert_eq!(ctx.loyalty.customer_transactions(customer).await?.len(), 1);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_earns_are_all_applied() -> TestResult {
        const EARNS: usize = 8;

        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Rita").await;
        let mut tasks = JoinSet::new();

        for _ in 0..EARNS {
            let loyalty = ctx.loyalty.clone();
            let adjustment = earn(1)?;

            tasks.spawn(async move { loyalty.adjust_points(customer, adjustment).await });
        }

        while let Some(result) = tasks.join_next().await {
            result??;
        }

        let balance = ctx.customers.get_customer(customer).await?.loyalty_points;
        let ledger = ctx.loyalty.customer_transactions(customer).await?;

        assert_eq!(balance, 8);
        assert_eq!(ledger.len(), EARNS);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_redeems_never_overdraw() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Otávio").await;

        ctx.loyalty.adjust_points(customer, earn(10)?).await?;

        let mut tasks = JoinSet::new();

        // 6 × 3 = 18 points requested against a balance of 10.
        for _ in 0..6 {
            let loyalty = ctx.loyalty.clone();
            let adjustment = redeem(3)?;

            tasks.spawn(async move { loyalty.adjust_points(customer, adjustment).await });
        }

        let mut applied = 0;

        while let Some(result) = tasks.join_next().await {
            match result? {
                Ok(adjustment) => {
                    assert!(adjustment.customer.loyalty_points >= 0, "balance went negative");
                    applied += 1;
                }
                Err(LoyaltyServiceError::Points(LoyaltyError::InsufficientPoints { .. })) => {}
                Err(other) => return Err(other.into()),
            }
        }

        let balance = ctx.customers.get_customer(customer).await?.loyalty_points;
        let ledger = ctx.loyalty.customer_transactions(customer).await?;

        assert_eq!(applied, 3, "only three redeems of 3 fit in 10 points");
        assert_eq!(balance, 1);
        assert_eq!(ledger.len(), 1 + applied);
        assert_eq!(
            balance_of(ledger.iter().map(|transaction| transaction.points)),
            balance
        );

        Ok(())
    }

    #[tokio::test]
    async fn adjusting_unknown_customer_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .loyalty
            .adjust_points(CustomerUuid::new(), earn(5)?)
            .await;

        assert!(
            matches!(result, Err(LoyaltyServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_accounts_limits_recent_transactions() -> TestResult {
        let ctx = TestContext::new().await;
        let bia = ctx.create_customer("Bia").await;
        let ana = ctx.create_customer("Ana").await;

        for points in [1, 2, 3] {
            ctx.loyalty.adjust_points(bia, earn(points)?).await?;
        }

        let accounts = ctx.loyalty.list_accounts(2).await?;

        let names: Vec<&str> = accounts
            .iter()
            .map(|account| account.customer.name.as_str())
            .collect();

        assert_eq!(names, vec!["Ana", "Bia"]);

        let first = accounts.first().ok_or("expected Ana's account")?;
        let second = accounts.get(1).ok_or("expected Bia's account")?;

        assert_eq!(first.customer.uuid, ana);
        assert!(first.recent_transactions.is_empty());

        let recent: Vec<i64> = second
            .recent_transactions
            .iter()
            .map(|transaction| transaction.points)
            .collect();

        assert_eq!(second.customer.loyalty_points, 6);
        assert_eq!(recent, vec![3, 2]);

        Ok(())
    }
}
