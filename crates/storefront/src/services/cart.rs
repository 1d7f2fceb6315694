//! Cart store.
//!
//! Wraps the [`Cart`] ledger with a persistence slot. Every mutation is
//! applied in memory first and then the full snapshot is written to storage
//! synchronously, so reopening the same storage reconstructs an identical
//! cart. Nothing here talks to the network; the cart is client-owned and is
//! never reconciled against stock levels.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value as JsonValue;
use thiserror::Error;
use tower_sessions::Session;

use cookshop_core::{Cart, CartItem, CartProduct, Money, ProductId};

use crate::middleware::session_keys;

/// Errors from a [`CartStorage`] backend.
#[derive(Debug, Error)]
pub enum CartStorageError {
    /// The persisted blob could not be decoded or encoded.
    #[error("cart snapshot is not valid JSON: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// The storage slot could not be accessed.
    #[error("cart storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for the cart snapshot.
///
/// Both operations are synchronous: the cart store never suspends.
pub trait CartStorage {
    /// Read the last saved snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot is unreadable or holds a corrupt blob.
    fn load(&self) -> Result<Option<Cart>, CartStorageError>;

    /// Replace the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, cart: &Cart) -> Result<(), CartStorageError>;
}

/// A JSON blob slot held in memory.
///
/// Clones share the same slot, so a second store opened on a clone behaves
/// like a page reload reading the same client storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob currently in the slot.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Overwrite the raw blob, bypassing serialization.
    pub fn set_raw(&self, blob: Option<String>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = blob;
        }
    }
}

impl CartStorage for MemoryCartStorage {
    fn load(&self) -> Result<Option<Cart>, CartStorageError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| CartStorageError::Unavailable("cart slot lock poisoned".into()))?;
        slot.as_deref()
            .map(serde_json::from_str::<Cart>)
            .transpose()
            .map_err(CartStorageError::from)
    }

    fn save(&self, cart: &Cart) -> Result<(), CartStorageError> {
        let blob = serde_json::to_string(cart)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| CartStorageError::Unavailable("cart slot lock poisoned".into()))?;
        *slot = Some(blob);
        Ok(())
    }
}

/// The cart snapshot of one shopper's session, for the length of a request.
///
/// The session is async and the cart store is not, so the snapshot read at
/// the start of the request is held here, saves replace it in place, and
/// [`flush`](Self::flush) writes it back once the handler is done. Nothing is
/// written when no mutation saved.
#[derive(Debug, Default)]
pub struct SessionCartStorage {
    snapshot: Mutex<Option<JsonValue>>,
    dirty: AtomicBool,
}

impl SessionCartStorage {
    /// Read the raw cart snapshot from the session.
    ///
    /// The value is not decoded here, so a corrupt snapshot reaches
    /// [`CartStore::open`] and is handled there.
    pub async fn load(session: &Session) -> Self {
        let snapshot = match session.get::<JsonValue>(session_keys::CART).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart from session");
                None
            }
        };
        Self {
            snapshot: Mutex::new(snapshot),
            dirty: AtomicBool::new(false),
        }
    }

    /// Whether a save happened since [`load`](Self::load).
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Write the saved snapshot back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn flush(self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        if !self.is_dirty() {
            return Ok(());
        }
        let snapshot = self.snapshot.into_inner().ok().flatten();
        if let Some(snapshot) = snapshot {
            session.insert(session_keys::CART, snapshot).await?;
        }
        Ok(())
    }
}

impl CartStorage for SessionCartStorage {
    fn load(&self) -> Result<Option<Cart>, CartStorageError> {
        let snapshot = self
            .snapshot
            .lock()
            .map_err(|_| CartStorageError::Unavailable("cart snapshot lock poisoned".into()))?;
        snapshot
            .clone()
            .map(serde_json::from_value::<Cart>)
            .transpose()
            .map_err(CartStorageError::from)
    }

    fn save(&self, cart: &Cart) -> Result<(), CartStorageError> {
        let value = serde_json::to_value(cart)?;
        *self
            .snapshot
            .lock()
            .map_err(|_| CartStorageError::Unavailable("cart snapshot lock poisoned".into()))? =
            Some(value);
        self.dirty.store(true, Ordering::Release);
        Ok(())
    }
}

/// The authoritative cart for one shopper.
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
}

impl<S: CartStorage> CartStore<S> {
    /// Rehydrate the cart from storage.
    ///
    /// A missing snapshot gives an empty cart. An unreadable one is logged and
    /// also treated as empty; the next mutation overwrites it.
    pub fn open(storage: S) -> Self {
        let cart = match storage.load() {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cart snapshot");
                Cart::new()
            }
        };
        Self { cart, storage }
    }

    /// Current cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Add `qty` units of a product. Zero is a no-op.
    pub fn add(&mut self, product: CartProduct, qty: u32) -> bool {
        let changed = self.cart.add(product, qty);
        if changed {
            self.persist();
        }
        changed
    }

    /// Set a line's quantity to `max(1, qty)`. No-op if the product is absent.
    pub fn update_qty(&mut self, id: &ProductId, qty: i64) -> bool {
        let changed = self.cart.update_qty(id, qty);
        if changed {
            self.persist();
        }
        changed
    }

    /// Remove a line. No-op if the product is absent.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let changed = self.cart.remove(id);
        if changed {
            self.persist();
        }
        changed
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.persist();
    }

    /// `Σ unit_price × qty` over the current lines.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.cart.subtotal()
    }

    /// Give back the cart and its storage, e.g. to flush the storage into the
    /// session.
    pub fn into_parts(self) -> (Cart, S) {
        (self.cart, self.storage)
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.cart) {
            tracing::warn!(error = %e, "Failed to persist cart snapshot");
        }
    }
}
