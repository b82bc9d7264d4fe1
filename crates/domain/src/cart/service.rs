//! Cart service: optimistic mutation against the remote cart.

use common::{CartItemId, ProductId};
use rest::{CartApi, SessionContext};

use crate::error::{DomainError, ValidationError};

use super::{Cart, CartTotals, ShippingTier};

/// Maintains the cart mirror and pushes mutations to the remote cart
/// collaborator.
///
/// Quantity edits are applied optimistically and rolled back if the remote
/// rejects them; deletion is two-phase (mark, confirm, purge). Remote calls
/// are async and non-blocking; nothing here serialises concurrent edits to
/// the same line, so the later response wins until the next full load.
pub struct CartService<C: CartApi> {
    api: C,
    session: SessionContext,
    cart: Cart,
}

impl<C: CartApi> CartService<C> {
    /// Creates a service with an empty local mirror.
    pub fn new(api: C, session: SessionContext) -> Self {
        Self {
            api,
            session,
            cart: Cart::new(),
        }
    }

    /// Returns the current cart state.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Returns the session scoping all remote calls.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Recomputes the derived totals.
    pub fn totals(&self) -> CartTotals {
        self.cart.totals()
    }

    /// Selects or deselects a line for checkout. Local only, no remote call.
    pub fn toggle_selection(&mut self, cart_item_id: CartItemId, selected: bool) -> bool {
        self.cart.toggle_selection(cart_item_id, selected)
    }

    /// Clears the checkout selection.
    pub fn clear_selection(&mut self) {
        self.cart.clear_selection();
    }

    /// Picks a shipping tier.
    pub fn set_shipping_tier(&mut self, tier: ShippingTier) {
        self.cart.set_shipping_tier(tier);
    }

    /// Replaces the mirror with the remote snapshot and resets selection.
    ///
    /// On remote failure the mirror is left empty and the error returned;
    /// callers log it and render the empty cart rather than alerting.
    #[tracing::instrument(skip(self), fields(user = %self.session.user_id()))]
    pub async fn load(&mut self) -> Result<(), DomainError> {
        match self.api.items_for_user(&self.session).await {
            Ok(entries) => {
                self.cart.replace_entries(entries);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to load cart, showing empty");
                self.cart.replace_entries(Vec::new());
                Err(err.into())
            }
        }
    }

    /// Adds a product to the cart, then reloads the mirror.
    ///
    /// The backend assigns the cart item id, so there is no client-side
    /// synthesis of the new line.
    #[tracing::instrument(skip(self))]
    pub async fn add_line(
        &mut self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), DomainError> {
        self.api
            .add_to_cart(&self.session, product_id, quantity)
            .await?;
        self.load().await
    }

    /// Increments a line's quantity, optimistically.
    ///
    /// The local quantity and line total change before the remote call
    /// resolves; a rejection reverts both.
    #[tracing::instrument(skip(self))]
    pub async fn increase_quantity(&mut self, cart_item_id: CartItemId) -> Result<(), DomainError> {
        let (product_id, prev_quantity) = self.live_line(cart_item_id)?;

        self.cart.apply_quantity(cart_item_id, prev_quantity + 1);

        if let Err(err) = self.api.increase_quantity(&self.session, product_id).await {
            self.cart.apply_quantity(cart_item_id, prev_quantity);
            metrics::counter!("cart_rollbacks_total").increment(1);
            tracing::warn!(error = %err, %cart_item_id, "increase rejected, rolled back");
            return Err(err.into());
        }
        Ok(())
    }

    /// Decrements a line's quantity, optimistically.
    ///
    /// A no-op (no state change, no remote call) when the quantity is
    /// already at the floor of 1.
    #[tracing::instrument(skip(self))]
    pub async fn decrease_quantity(&mut self, cart_item_id: CartItemId) -> Result<(), DomainError> {
        let (product_id, prev_quantity) = self.live_line(cart_item_id)?;
        if prev_quantity <= 1 {
            return Ok(());
        }

        self.cart.apply_quantity(cart_item_id, prev_quantity - 1);

        if let Err(err) = self.api.decrease_quantity(&self.session, product_id).await {
            self.cart.apply_quantity(cart_item_id, prev_quantity);
            metrics::counter!("cart_rollbacks_total").increment(1);
            tracing::warn!(error = %err, %cart_item_id, "decrease rejected, rolled back");
            return Err(err.into());
        }
        Ok(())
    }

    /// Removes a line, two-phase.
    ///
    /// The line is immediately excluded from totals and deselected but kept
    /// visible as pending; the remote confirmation purges it. On failure
    /// the pending mark is cleared and the previous selection restored, so
    /// a failed delete always leaves a recovery path.
    #[tracing::instrument(skip(self))]
    pub async fn remove_line(&mut self, cart_item_id: CartItemId) -> Result<(), DomainError> {
        // Validate against the mirror before touching anything.
        self.live_line(cart_item_id)?;
        let was_selected = self.cart.is_selected(cart_item_id);

        self.cart.mark_pending_delete(cart_item_id, true);

        match self.api.delete_item(&self.session, cart_item_id).await {
            Ok(()) => {
                self.cart.purge(cart_item_id);
                Ok(())
            }
            Err(err) => {
                self.cart.mark_pending_delete(cart_item_id, false);
                if was_selected {
                    self.cart.restore_selection(cart_item_id);
                }
                metrics::counter!("cart_rollbacks_total").increment(1);
                tracing::warn!(error = %err, %cart_item_id, "delete rejected, line restored");
                Err(err.into())
            }
        }
    }

    fn live_line(&self, cart_item_id: CartItemId) -> Result<(ProductId, u32), ValidationError> {
        match self.cart.line(cart_item_id) {
            Some(line) if !line.pending_delete => Ok((line.product.product_id, line.quantity)),
            _ => Err(ValidationError::LineNotFound { cart_item_id }),
        }
    }
}
