//! Sorveteria prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartSession, CartStorage, CartStorageError, CustomerSnapshot, FileCartStorage,
        MemoryCartStorage, SessionKey,
    },
    coupons::{
        ConfirmedDiscount, Coupon, CouponCode, CouponDefinitionError, CouponError, CouponKind,
        CouponQuote, CouponValue, PendingDiscount, validate,
    },
    favorites::{FavoriteError, FavoritePot},
    loyalty::{LoyaltyError, PointsAdjustment, PointsKind},
    orders::{
        AssemblyError, CheckoutRequest, InitialStatus, OrderDraft, OrderStatus, StatusError,
        StatusMachine, TransitionPolicy, assemble,
    },
    pots::{AdditionalRef, CatalogRef, FlavorRef, Pot, RefSet, Size},
    prices::{Price, PriceError},
    pricing::{PricingError, currency, percent_of, subtotal, subtotal_price},
};
