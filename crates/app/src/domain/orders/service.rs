//! Orders service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sorveteria::{
    coupons::CouponError,
    orders::{AssemblyError, CheckoutRequest, OrderStatus, StatusMachine, assemble},
    prices::Price,
};
use tracing::{Span, info, warn};

use crate::{
    database::Db,
    domain::{
        coupons::repository::PgCouponsRepository,
        customers::records::CustomerUuid,
        orders::{
            data::CheckoutConfig,
            errors::OrdersServiceError,
            records::{OrderRecord, OrderStats, OrderUuid},
            repository::PgOrdersRepository,
        },
    },
};

/// Orders shown on the dashboard.
const RECENT_ORDERS: i64 = 10;

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    config: CheckoutConfig,
    repository: PgOrdersRepository,
    coupons: PgCouponsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, config: CheckoutConfig) -> Self {
        Self {
            db,
            config,
            repository: PgOrdersRepository::new(),
            coupons: PgCouponsRepository::new(),
        }
    }
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, request),
        fields(
            customer_uuid = %customer,
            order_uuid = tracing::field::Empty,
            pots = request.pots.len(),
            coupon = request.coupon_code.as_ref().map(|code| code.as_str())
        ),
        err
    )]
    async fn create_order(
        &self,
        customer: CustomerUuid,
        request: CheckoutRequest,
    ) -> Result<OrderRecord, OrdersServiceError> {
        request.check()?;

        let mut tx = self.db.begin().await?;

        // The coupon row stays locked until commit so its usage cannot change underneath us.
        let coupon = match &request.coupon_code {
            Some(code) => self.coupons.lock_coupon(&mut tx, code).await?,
            None => None,
        };

        let draft = assemble(
            &request,
            coupon.as_ref().map(|record| &record.coupon),
            self.config.initial_status,
            Timestamp::now(),
        )?;

        if let Some(code) = draft.coupon_code()
            && !self.coupons.reserve_usage(&mut tx, code).await?
        {
            warn!(code = %code, "coupon usage could not be reserved");

            return Err(AssemblyError::Coupon(CouponError::UsageExceeded).into());
        }

        let uuid = OrderUuid::new();

        Span::current().record("order_uuid", tracing::field::display(uuid));

        let record = self
            .repository
            .create_order(&mut tx, uuid, customer, &draft)
            .await?;

        tx.commit().await?;

        info!(
            order_uuid = %record.uuid,
            total = record.total.minor_units(),
            "created order"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "orders.service.get_order",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "orders.service.list_orders",
        skip(self),
        fields(customer_uuid = customer.map(tracing::field::display)),
        err
    )]
    async fn list_orders(
        &self,
        customer: Option<CustomerUuid>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.repository.list_orders(&mut tx, customer, None).await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "orders.service.set_status",
        skip(self),
        fields(order_uuid = %order),
        err
    )]
    async fn set_status(
        &self,
        order: OrderUuid,
        status: String,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let requested: OrderStatus = status.parse()?;

        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_order_status(&mut tx, order).await?;

        let next = StatusMachine::new(self.config.transition_policy).transition(current, requested)?;

        let record = self
            .repository
            .update_order_status(&mut tx, order, next)
            .await?;

        tx.commit().await?;

        info!(
            order_uuid = %record.uuid,
            from = %current,
            to = %record.status,
            "updated order status"
        );

        Ok(record)
    }

    #[tracing::instrument(name = "orders.service.order_stats", skip(self), err)]
    async fn order_stats(&self) -> Result<OrderStats, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let (total_orders, revenue) = self.repository.order_totals(&mut tx).await?;
        let by_status = self.repository.count_orders_by_status(&mut tx).await?;
        let recent = self
            .repository
            .list_orders(&mut tx, None, Some(RECENT_ORDERS))
            .await?;

        tx.commit().await?;

        Ok(OrderStats {
            total_orders: count(total_orders),
            revenue: Price::new(count(revenue)),
            by_status: by_status
                .into_iter()
                .map(|(status, orders)| (status, count(orders)))
                .collect(),
            recent,
        })
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Prices and stores an order.
    ///
    /// The coupon, if any, is re-validated against the order's own subtotal
    /// and one use is counted in the same transaction as the order.
    async fn create_order(
        &self,
        customer: CustomerUuid,
        request: CheckoutRequest,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: OrderUuid) -> Result<OrderRecord, OrdersServiceError>;

    /// Orders newest first, optionally for one customer.
    async fn list_orders(
        &self,
        customer: Option<CustomerUuid>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Moves an order to the status labelled `status`.
    async fn set_status(
        &self,
        order: OrderUuid,
        status: String,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Totals for the admin dashboard.
    async fn order_stats(&self) -> Result<OrderStats, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use sorveteria::{
        coupons::{Coupon, CouponCode, CouponValue},
        orders::{InitialStatus, StatusError, TransitionPolicy},
        pots::{Pot, Size},
    };
    use testresult::TestResult;
    use tokio::task::JoinSet;
    use uuid::Uuid;

    use crate::{
        domain::coupons::{CouponsService, data::CouponUpsert},
        test::{TestContext, helpers::checkout},
    };

    use super::*;

    async fn capped_coupon(ctx: &TestContext, cap: u32) -> TestResult<CouponCode> {
        let code = CouponCode::parse("PRIMEIRA")?;

        let mut coupon = Coupon::new(code.clone(), CouponValue::Percentage(Decimal::TEN));
        coupon.usage_cap = Some(cap);

        ctx.coupons
            .upsert_coupon(CouponUpsert {
                coupon,
                description: None,
            })
            .await?;

        Ok(code)
    }

    #[tokio::test]
    async fn create_order_prices_pots_and_deduplicates_flavors() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Ana").await;
        let morango = ctx.create_flavor("Morango").await;
        let granola = ctx.create_additional("Granola", 300).await;

        let request = checkout(vec![
            Pot::new(Size::Small)
                .flavor(morango, "Morango")
                .additional(granola, "Granola"),
            Pot::new(Size::Large).flavor(morango, "Morango"),
        ]);

        let order = ctx.orders.create_order(customer, request).await?;

        assert_eq!(order.size_label, "pequeno | grande");
        assert_eq!(order.subtotal, Price::new(7_000));
        assert_eq!(order.discount, Price::ZERO);
        assert_eq!(order.total, Price::new(7_000));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.flavors.uuids(), vec![morango]);
        assert_eq!(order.additionals.uuids(), vec![granola]);

        let fetched = ctx.orders.get_order(order.uuid).await?;

        assert_eq!(fetched, order);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_flavor_rolls_back_whole_order() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Bruno").await;
        let morango = ctx.create_flavor("Morango").await;

        let request = checkout(vec![
            Pot::new(Size::Medium)
                .flavor(morango, "Morango")
                .flavor(Uuid::now_v7(), "Fantasma"),
        ]);

        let result = ctx.orders.create_order(customer, request).await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        assert!(ctx.orders.list_orders(None).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn empty_checkout_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Carla").await;

        let result = ctx.orders.create_order(customer, checkout(Vec::new())).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Assembly(AssemblyError::EmptyPots))
            ),
            "expected EmptyPots, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn coupon_use_is_counted_once_per_order() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Davi").await;
        let code = capped_coupon(&ctx, 1).await?;

        let mut request = checkout(vec![Pot::new(Size::Large), Pot::new(Size::Large)]);
        request.coupon_code = Some(code.clone());

        let order = ctx.orders.create_order(customer, request.clone()).await?;

        assert_eq!(order.coupon_code, Some(code.clone()));
        assert_eq!(order.discount, Price::new(900));
        assert_eq!(order.total, Price::new(8_100));

        let stored = ctx.coupons.get_coupon(code.to_string()).await?;

        assert_eq!(stored.coupon.usage_count, 1);

        let result = ctx.orders.create_order(customer, request).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Assembly(AssemblyError::Coupon(
                    CouponError::UsageExceeded
                )))
            ),
            "expected UsageExceeded, got {result:?}"
        );

        assert_eq!(ctx.orders.list_orders(Some(customer)).await?.len(), 1);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_checkouts_redeem_single_use_coupon_once() -> TestResult {
        let ctx = TestContext::new().await;
        let code = capped_coupon(&ctx, 1).await?;
        let mut tasks = JoinSet::new();

        for name in ["Elisa", "Fábio"] {
            let customer = ctx.create_customer(name).await;
            let orders = ctx.orders.clone();

            let mut request = checkout(vec![Pot::new(Size::Medium)]);
            request.coupon_code = Some(code.clone());

            tasks.spawn(async move { orders.create_order(customer, request).await });
        }

        let mut placed = 0;
        let mut refused = 0;

        while let Some(result) = tasks.join_next().await {
            match result? {
                Ok(order) => {
                    assert_eq!(order.discount, Price::new(350));
                    placed += 1;
                }
                Err(OrdersServiceError::Assembly(AssemblyError::Coupon(
                    CouponError::UsageExceeded,
                ))) => refused += 1,
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!((placed, refused), (1, 1), "exactly one checkout gets the coupon");

        let stored = ctx.coupons.get_coupon(code.to_string()).await?;

        assert_eq!(stored.coupon.usage_count, 1);
        assert_eq!(ctx.orders.list_orders(None).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn set_status_on_unknown_order_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .set_status(OrderUuid::new(), "Entregue".to_string())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn set_status_with_unknown_label_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Elisa").await;

        let order = ctx
            .orders
            .create_order(customer, checkout(vec![Pot::new(Size::Small)]))
            .await?;

        let result = ctx.orders.set_status(order.uuid, "Perdido".to_string()).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Status(StatusError::InvalidStatus(_)))
            ),
            "expected InvalidStatus, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn permissive_policy_allows_reopening_cancelled_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Fábio").await;

        let order = ctx
            .orders
            .create_order(customer, checkout(vec![Pot::new(Size::Small)]))
            .await?;

        ctx.orders.set_status(order.uuid, "Cancelado".to_string()).await?;

        let reopened = ctx.orders.set_status(order.uuid, "Pendente".to_string()).await?;

        assert_eq!(reopened.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn strict_policy_keeps_delivered_orders_final() -> TestResult {
        let ctx = TestContext::with_checkout(CheckoutConfig {
            initial_status: InitialStatus::Preparing,
            transition_policy: TransitionPolicy::Strict,
        })
        .await;

        let customer = ctx.create_customer("Gabi").await;

        let order = ctx
            .orders
            .create_order(customer, checkout(vec![Pot::new(Size::Medium)]))
            .await?;

        assert_eq!(order.status, OrderStatus::Preparing);

        ctx.orders
            .set_status(order.uuid, "Saiu para a entrega".to_string())
            .await?;
        ctx.orders.set_status(order.uuid, "Entregue".to_string()).await?;

        let result = ctx.orders.set_status(order.uuid, "Pendente".to_string()).await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Status(
                    StatusError::TransitionNotAllowed { .. }
                ))
            ),
            "expected TransitionNotAllowed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn order_stats_sum_totals_by_status() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_customer("Hugo").await;

        let first = ctx
            .orders
            .create_order(customer, checkout(vec![Pot::new(Size::Small)]))
            .await?;

        ctx.orders
            .create_order(customer, checkout(vec![Pot::new(Size::Large)]))
            .await?;

        ctx.orders.set_status(first.uuid, "Entregue".to_string()).await?;

        let stats = ctx.orders.order_stats().await?;

        assert_eq!(stats.total_orders, 2);
        assert_eq!(stats.revenue, Price::new(7_000));
        assert_eq!(stats.by_status.get(&OrderStatus::Delivered), Some(&1));
        assert_eq!(stats.by_status.get(&OrderStatus::Pending), Some(&1));
        assert_eq!(stats.recent.len(), 2);

        Ok(())
    }
}
