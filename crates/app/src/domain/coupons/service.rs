//! Coupons service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sorveteria::{
    coupons::{CouponCode, CouponDefinitionError, CouponQuote, validate},
    prices::Price,
};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::coupons::{
        data::CouponUpsert,
        errors::CouponsServiceError,
        records::{CouponRecord, CouponUuid},
        repository::PgCouponsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

fn lookup_code(code: &str) -> Result<CouponCode, CouponsServiceError> {
    CouponCode::parse(code).map_err(|error| match error {
        CouponDefinitionError::EmptyCode => CouponsServiceError::MissingRequiredData,
        other => CouponsServiceError::Definition(other),
    })
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.validate_coupon",
        skip(self),
        fields(code = tracing::field::Empty),
        err
    )]
    async fn validate_coupon(
        &self,
        code: String,
        subtotal: Price,
    ) -> Result<CouponQuote, CouponsServiceError> {
        let code = lookup_code(&code)?;

        Span::current().record("code", code.as_str());

        let mut tx = self.db.begin().await?;

        let record = self.repository.find_coupon(&mut tx, &code).await?;

        tx.commit().await?;

        let quote = validate(
            record.as_ref().map(|record| &record.coupon),
            subtotal,
            Timestamp::now(),
        )?;

        Ok(quote)
    }

    #[tracing::instrument(
        name = "coupons.service.upsert_coupon",
        skip(self, upsert),
        fields(code = %upsert.coupon.code),
        err
    )]
    async fn upsert_coupon(&self, upsert: CouponUpsert) -> Result<CouponRecord, CouponsServiceError> {
        upsert.coupon.check()?;

        let mut tx = self.db.begin().await?;

        let record = self
            .repository
            .upsert_coupon(&mut tx, CouponUuid::new(), &upsert)
            .await?;

        tx.commit().await?;

        info!(
            coupon_uuid = %record.uuid,
            code = %record.coupon.code,
            "saved coupon"
        );

        Ok(record)
    }

    #[tracing::instrument(
        name = "coupons.service.set_active",
        skip(self),
        fields(code = tracing::field::Empty),
        err
    )]
    async fn set_active(
        &self,
        code: String,
        active: bool,
    ) -> Result<CouponRecord, CouponsServiceError> {
        let code = lookup_code(&code)?;

        Span::current().record("code", code.as_str());

        let mut tx = self.db.begin().await?;

        let record = self.repository.set_coupon_active(&mut tx, &code, active).await?;

        tx.commit().await?;

        info!(code = %record.coupon.code, active, "toggled coupon");

        Ok(record)
    }

    #[tracing::instrument(name = "coupons.service.list_coupons", skip(self), err)]
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.repository.list_coupons(&mut tx).await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "coupons.service.get_coupon",
        skip(self),
        fields(code = tracing::field::Empty),
        err
    )]
    async fn get_coupon(&self, code: String) -> Result<CouponRecord, CouponsServiceError> {
        let code = lookup_code(&code)?;

        Span::current().record("code", code.as_str());

        let mut tx = self.db.begin().await?;

        let record = self.repository.find_coupon(&mut tx, &code).await?;

        tx.commit().await?;

        record.ok_or(CouponsServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Prices `subtotal` with the coupon behind `code`. Never counts a use.
    async fn validate_coupon(
        &self,
        code: String,
        subtotal: Price,
    ) -> Result<CouponQuote, CouponsServiceError>;

    /// Creates the coupon, or updates the one with the same code.
    ///
    /// The stored usage count survives updates.
    async fn upsert_coupon(&self, upsert: CouponUpsert) -> Result<CouponRecord, CouponsServiceError>;

    /// Enables or disables a coupon.
    async fn set_active(
        &self,
        code: String,
        active: bool,
    ) -> Result<CouponRecord, CouponsServiceError>;

    /// All coupons, newest first.
    async fn list_coupons(&self) -> Result<Vec<CouponRecord>, CouponsServiceError>;

    /// Retrieve a single coupon by code.
    async fn get_coupon(&self, code: String) -> Result<CouponRecord, CouponsServiceError>;
}
