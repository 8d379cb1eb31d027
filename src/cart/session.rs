//! Cart sessions

use jiff::Timestamp;

use crate::{
    cart::{Cart, CartStorage, CartStorageError, CustomerSnapshot, SessionKey},
    coupons::PendingDiscount,
    pots::Pot,
};

/// A cart bound to its storage; every mutation is persisted before returning.
#[derive(Debug)]
pub struct CartSession<S: CartStorage> {
    key: SessionKey,
    storage: S,
    cart: Cart,
}

impl<S: CartStorage> CartSession<S> {
    /// Loads the last snapshot for `key`, or starts an empty cart at `now`.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if an existing snapshot cannot be read.
    pub fn resume(storage: S, key: SessionKey, now: Timestamp) -> Result<Self, CartStorageError> {
        let cart = storage.load(&key)?.unwrap_or_else(|| Cart::new(now));

        Ok(Self { key, storage, cart })
    }

    /// Current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Session key.
    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    /// See [`Cart::add_pot`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be saved.
    pub fn add_pot(&mut self, pot: Pot) -> Result<(), CartStorageError> {
        self.cart.add_pot(pot);
        self.persist()
    }

    /// See [`Cart::edit_last_pot`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be saved.
    pub fn edit_last_pot(&mut self, edit: impl FnOnce(&mut Pot)) -> Result<bool, CartStorageError> {
        let edited = self.cart.edit_last_pot(edit);

        if edited {
            self.persist()?;
        }

        Ok(edited)
    }

    /// See [`Cart::remove_pot`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be saved.
    pub fn remove_pot(&mut self, index: usize) -> Result<Option<Pot>, CartStorageError> {
        let removed = self.cart.remove_pot(index);

        self.persist()?;

        Ok(removed)
    }

    /// See [`Cart::clear`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be saved.
    pub fn clear(&mut self) -> Result<(), CartStorageError> {
        self.cart.clear();
        self.persist()
    }

    /// See [`Cart::apply_coupon`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be saved.
    pub fn apply_coupon(&mut self, discount: PendingDiscount) -> Result<(), CartStorageError> {
        self.cart.apply_coupon(discount);
        self.persist()
    }

    /// See [`Cart::remove_coupon`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be saved.
    pub fn remove_coupon(&mut self) -> Result<Option<PendingDiscount>, CartStorageError> {
        let removed = self.cart.remove_coupon();

        self.persist()?;

        Ok(removed)
    }

    /// See [`Cart::set_customer`].
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be saved.
    pub fn set_customer(&mut self, customer: CustomerSnapshot) -> Result<(), CartStorageError> {
        self.cart.set_customer(customer);
        self.persist()
    }

    /// Ends the session after checkout, discarding the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`CartStorageError`] if the snapshot cannot be removed.
    pub fn finish(self) -> Result<Cart, CartStorageError> {
        self.storage.discard(&self.key)?;

        Ok(self.cart)
    }

    fn persist(&self) -> Result<(), CartStorageError> {
        self.storage.save(&self.key, &self.cart)
    }
}
