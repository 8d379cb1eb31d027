//! Pricing

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso};
use thiserror::Error;

use crate::{
    pots::Pot,
    prices::{Price, PriceError},
};

/// Errors that can occur while calculating totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// A price could not be converted to or from [`Money`].
    #[error(transparent)]
    Price(#[from] PriceError),

    /// A percentage calculation could not be represented in minor units.
    #[error("percentage calculation overflowed")]
    PercentConversion,
}

/// The currency every amount in the shop is expressed in.
pub fn currency() -> &'static iso::Currency {
    iso::BRL
}

/// Calculates the pre-discount total of a set of pots.
///
/// An empty slice totals to zero.
///
/// # Errors
///
/// - [`PricingError::Price`]: a unit price exceeds the supported range.
/// - [`PricingError::Money`]: wrapped money arithmetic error.
pub fn subtotal(pots: &[Pot]) -> Result<Money<'static, iso::Currency>, PricingError> {
    let total = pots.iter().try_fold(
        Money::from_minor(0, currency()),
        |acc, pot| -> Result<_, PricingError> { Ok(acc.add(pot.unit_price().to_money()?)?) },
    )?;

    Ok(total)
}

/// Calculates the pre-discount total of a set of pots as a [`Price`].
///
/// # Errors
///
/// See [`subtotal`].
pub fn subtotal_price(pots: &[Pot]) -> Result<Price, PricingError> {
    Ok(Price::from_money(&subtotal(pots)?)?)
}

/// Calculates `percent`% of `amount`, rounded to the nearest centavo.
///
/// Halves round away from zero, so 12.5% of R$ 0.20 is R$ 0.03.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the percentage is negative
/// or the result cannot be represented in minor units.
pub fn percent_of(percent: Decimal, amount: Price) -> Result<Price, PricingError> {
    if percent.is_sign_negative() {
        return Err(PricingError::PercentConversion);
    }

    let applied = Decimal::from(amount.minor_units())
        .checked_mul(percent)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::PercentConversion)?;

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded
        .to_u64()
        .map(Price::new)
        .ok_or(PricingError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::pots::Size;

    use super::*;

    #[test]
    fn test_subtotal() -> TestResult {
        let pots = [
            Pot::new(Size::Small),
            Pot::with_price(Size::Large, Price::new(5_000)),
        ];

        assert_eq!(subtotal(&pots)?, Money::from_minor(7_500, currency()));

        Ok(())
    }

    #[test]
    fn test_subtotal_empty() -> TestResult {
        assert_eq!(subtotal_price(&[])?, Price::ZERO);

        Ok(())
    }

    #[test]
    fn test_subtotal_overflowing_price() {
        let pots = [Pot::with_price(Size::Small, Price::new(u64::MAX))];

        assert!(matches!(
            subtotal(&pots),
            Err(PricingError::Price(PriceError::Overflow(_)))
        ));
    }

    #[test]
    fn percent_of_whole_amount() -> TestResult {
        assert_eq!(percent_of(Decimal::TEN, Price::new(10_000))?, Price::new(1_000));

        Ok(())
    }

    #[test]
    fn percent_of_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(percent_of(Decimal::new(125, 1), Price::new(20))?, Price::new(3));
        assert_eq!(percent_of(Decimal::new(3333, 2), Price::new(1_000))?, Price::new(333));

        Ok(())
    }

    #[test]
    fn percent_of_negative_is_rejected() {
        assert_eq!(
            percent_of(Decimal::NEGATIVE_ONE, Price::new(1_000)),
            Err(PricingError::PercentConversion)
        );
    }
}
