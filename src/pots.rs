//! Pots
//!
//! A pot is one sized container with its chosen flavors and additionals; it is
//! the unit a cart is built from. Catalog entities are referenced by identifier
//! only, and every reference collection on a pot is a [`RefSet`], so a flavor
//! can never be attached twice.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

use crate::prices::Price;

/// Unknown size label.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown pot size: {0}")]
pub struct UnknownSize(pub String);

/// Pot size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    /// 300ml
    #[serde(rename = "pequeno")]
    Small,

    /// 500ml
    #[serde(rename = "medio")]
    Medium,

    /// 700ml
    #[serde(rename = "grande")]
    Large,
}

impl Size {
    /// Every size, smallest first.
    pub const ALL: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

    /// Wire label for the size.
    pub const fn label(self) -> &'static str {
        match self {
            Size::Small => "pequeno",
            Size::Medium => "medio",
            Size::Large => "grande",
        }
    }

    /// Price charged for a pot of this size unless overridden.
    pub const fn default_price(self) -> Price {
        match self {
            Size::Small => Price::new(2_500),
            Size::Medium => Price::new(3_500),
            Size::Large => Price::new(4_500),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Size {
    type Err = UnknownSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSize(s.to_string()))
    }
}

/// A reference to a catalog entity.
pub trait CatalogRef {
    /// Catalog identifier the reference points at.
    fn uuid(&self) -> Uuid;
}

/// Reference to a flavor in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlavorRef {
    /// Catalog identifier.
    pub uuid: Uuid,

    /// Display name at selection time.
    pub name: String,
}

impl CatalogRef for FlavorRef {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Reference to an additional (topping) in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdditionalRef {
    /// Catalog identifier.
    pub uuid: Uuid,

    /// Display name at selection time.
    pub name: String,
}

impl CatalogRef for AdditionalRef {
    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Insertion-ordered collection of catalog references, unique by identifier.
///
/// Equality is set equality: two sets holding the same identifiers compare
/// equal regardless of insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<T>", into = "Vec<T>")]
pub struct RefSet<T: CatalogRef + Clone> {
    refs: SmallVec<[T; 4]>,
}

impl<T: CatalogRef + Clone> RefSet<T> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            refs: SmallVec::new(),
        }
    }

    /// Inserts a reference, returning `false` if its identifier is already present.
    pub fn insert(&mut self, reference: T) -> bool {
        if self.contains(reference.uuid()) {
            return false;
        }

        self.refs.push(reference);

        true
    }

    /// Removes the reference with the given identifier.
    pub fn remove(&mut self, uuid: Uuid) -> Option<T> {
        let position = self.refs.iter().position(|r| r.uuid() == uuid)?;

        Some(self.refs.remove(position))
    }

    /// Adds every reference from `other` not already present.
    pub fn merge(&mut self, other: &Self) {
        for reference in other.iter() {
            self.insert(reference.clone());
        }
    }

    /// Returns true if the identifier is present.
    pub fn contains(&self, uuid: Uuid) -> bool {
        self.refs.iter().any(|r| r.uuid() == uuid)
    }

    /// Number of distinct references.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Iterate references in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.refs.iter()
    }

    /// Identifiers in insertion order.
    pub fn uuids(&self) -> Vec<Uuid> {
        self.refs.iter().map(CatalogRef::uuid).collect()
    }
}

impl<T: CatalogRef + Clone> Default for RefSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CatalogRef + Clone> PartialEq for RefSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|r| other.contains(r.uuid()))
    }
}

impl<T: CatalogRef + Clone> Eq for RefSet<T> {}

impl<T: CatalogRef + Clone> FromIterator<T> for RefSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();

        for reference in iter {
            set.insert(reference);
        }

        set
    }
}

impl<T: CatalogRef + Clone> From<Vec<T>> for RefSet<T> {
    fn from(refs: Vec<T>) -> Self {
        refs.into_iter().collect()
    }
}

impl<T: CatalogRef + Clone> From<RefSet<T>> for Vec<T> {
    fn from(set: RefSet<T>) -> Self {
        set.refs.into_vec()
    }
}

impl<T: CatalogRef + Clone> IntoIterator for RefSet<T> {
    type Item = T;
    type IntoIter = smallvec::IntoIter<[T; 4]>;

    fn into_iter(self) -> Self::IntoIter {
        self.refs.into_iter()
    }
}

/// One sized container with flavors and additionals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pot {
    size: Size,
    unit_price: Price,
    #[serde(default)]
    flavors: RefSet<FlavorRef>,
    #[serde(default)]
    additionals: RefSet<AdditionalRef>,
}

impl Pot {
    /// Creates an empty pot priced from the size table.
    pub fn new(size: Size) -> Self {
        Self::with_price(size, size.default_price())
    }

    /// Creates an empty pot with an explicit unit price.
    pub fn with_price(size: Size, unit_price: Price) -> Self {
        Self {
            size,
            unit_price,
            flavors: RefSet::new(),
            additionals: RefSet::new(),
        }
    }

    /// Builder-style flavor addition.
    #[must_use]
    pub fn flavor(mut self, uuid: Uuid, name: impl Into<String>) -> Self {
        self.add_flavor(FlavorRef {
            uuid,
            name: name.into(),
        });

        self
    }

    /// Builder-style additional addition.
    #[must_use]
    pub fn additional(mut self, uuid: Uuid, name: impl Into<String>) -> Self {
        self.add_additional(AdditionalRef {
            uuid,
            name: name.into(),
        });

        self
    }

    /// Adds a flavor, ignoring duplicates.
    pub fn add_flavor(&mut self, flavor: FlavorRef) -> bool {
        self.flavors.insert(flavor)
    }

    /// Adds an additional, ignoring duplicates.
    pub fn add_additional(&mut self, additional: AdditionalRef) -> bool {
        self.additionals.insert(additional)
    }

    /// Replaces the selected flavors.
    pub fn set_flavors(&mut self, flavors: RefSet<FlavorRef>) {
        self.flavors = flavors;
    }

    /// Replaces the selected additionals.
    pub fn set_additionals(&mut self, additionals: RefSet<AdditionalRef>) {
        self.additionals = additionals;
    }

    /// Overrides the unit price.
    pub fn set_unit_price(&mut self, unit_price: Price) {
        self.unit_price = unit_price;
    }

    /// Pot size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Unit price.
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Selected flavors.
    pub fn flavors(&self) -> &RefSet<FlavorRef> {
        &self.flavors
    }

    /// Selected additionals.
    pub fn additionals(&self) -> &RefSet<AdditionalRef> {
        &self.additionals
    }
}
