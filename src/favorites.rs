//! Favorites
//!
//! A favorite is a named snapshot of a pot configuration. It is never
//! referenced by a cart or an order; turning it back into a pot makes an
//! independent copy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    pots::{AdditionalRef, FlavorRef, Pot, RefSet, Size},
    prices::Price,
};

/// Errors building a favorite.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FavoriteError {
    /// The name is blank.
    #[error("favorite name is required")]
    MissingName,
}

/// A saved pot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoritePot {
    /// Name given by the customer
    pub name: String,

    /// Pot size
    pub size: Size,

    /// Price at the time it was saved
    pub price: Price,

    /// Flavors
    #[serde(default)]
    pub flavors: RefSet<FlavorRef>,

    /// Additionals
    #[serde(default)]
    pub additionals: RefSet<AdditionalRef>,
}

impl FavoritePot {
    /// Snapshots `pot` under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`FavoriteError::MissingName`] if `name` is blank.
    pub fn from_pot(name: &str, pot: &Pot) -> Result<Self, FavoriteError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(FavoriteError::MissingName);
        }

        Ok(Self {
            name: name.to_string(),
            size: pot.size(),
            price: pot.unit_price(),
            flavors: pot.flavors().clone(),
            additionals: pot.additionals().clone(),
        })
    }

    /// A fresh pot with this configuration.
    pub fn to_pot(&self) -> Pot {
        let mut pot = Pot::with_price(self.size, self.price);

        pot.set_flavors(self.flavors.clone());
        pot.set_additionals(self.additionals.clone());

        pot
    }

    /// Returns true if `pot` has the same size and selections.
    pub fn matches(&self, pot: &Pot) -> bool {
        self.size == pot.size()
            && &self.flavors == pot.flavors()
            && &self.additionals == pot.additionals()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn round_trips_through_pot() -> TestResult {
        let pot = Pot::new(Size::Medium)
            .flavor(Uuid::now_v7(), "Açaí")
            .flavor(Uuid::now_v7(), "Banana")
            .additional(Uuid::now_v7(), "Leite em pó");

        let favorite = FavoritePot::from_pot(" Meu de sempre ", &pot)?;

        assert_eq!(favorite.name, "Meu de sempre");
        assert_eq!(favorite.to_pot(), pot);
        assert!(favorite.matches(&pot));

        Ok(())
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            FavoritePot::from_pot("", &Pot::new(Size::Small)),
            Err(FavoriteError::MissingName)
        );
    }
}
