//! Client-side cart aggregate.

mod service;

pub use service::CartService;

use std::collections::HashSet;

use common::{CartItemId, Money};
use rest::{CartEntry, Product};

/// Shipping tiers offered at checkout.
///
/// A fixed, small set with a flat cost each; the default applies until the
/// user picks another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShippingTier {
    #[default]
    Standard,
    Express,
    Priority,
}

impl ShippingTier {
    /// All offered tiers.
    pub const ALL: [ShippingTier; 3] = [
        ShippingTier::Standard,
        ShippingTier::Express,
        ShippingTier::Priority,
    ];

    /// Flat shipping cost for this tier.
    pub fn cost(&self) -> Money {
        match self {
            ShippingTier::Standard => Money::from_cents(4900),
            ShippingTier::Express => Money::from_cents(9900),
            ShippingTier::Priority => Money::from_cents(19900),
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ShippingTier::Standard => "Standard (5-7 days)",
            ShippingTier::Express => "Express (2-3 days)",
            ShippingTier::Priority => "Priority (next day)",
        }
    }
}

/// One product line in the cart mirror.
///
/// `line_total` is always `quantity * product price`, recomputed on every
/// quantity change rather than trusted from an earlier state. A line marked
/// `pending_delete` has been removed optimistically: it stays visible
/// (dimmed) but contributes to no totals until the remote confirms or the
/// deletion fails and the mark is cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub cart_item_id: CartItemId,
    pub product: Product,
    pub quantity: u32,
    pub line_total: Money,
    pub pending_delete: bool,
}

impl CartLine {
    fn from_entry(entry: CartEntry) -> Self {
        let line_total = entry.product.product_price.multiply(entry.product_quantity);
        Self {
            cart_item_id: entry.cart_item_id,
            product: entry.product,
            quantity: entry.product_quantity,
            line_total,
            pending_delete: false,
        }
    }

    fn recompute_total(&mut self) {
        self.line_total = self.product.product_price.multiply(self.quantity);
    }
}

/// Derived cart aggregates, recomputed from the line collection on demand
/// so no stale derived field can survive a mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    /// Sum of quantities across live lines.
    pub total_item_count: u32,
    /// Sum of line totals across live lines.
    pub total_price: Money,
    /// Sum of quantities across selected lines.
    pub selected_item_count: u32,
    /// Sum of line totals across selected lines.
    pub selected_total: Money,
    /// Flat cost of the chosen shipping tier.
    pub shipping_cost: Money,
    /// `selected_total + shipping_cost`.
    pub grand_total: Money,
}

/// In-memory mirror of the user's server-side cart.
///
/// Holds the line collection, the checkout selection (a subset keyed by
/// cart item id, not ownership), and the chosen shipping tier. All
/// mutation with remote effects goes through [`CartService`]; this type
/// only does the pure bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    selected: HashSet<CartItemId>,
    shipping: ShippingTier,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole line collection with a remote snapshot and
    /// resets the selection.
    pub fn replace_entries(&mut self, entries: Vec<CartEntry>) {
        self.lines = entries.into_iter().map(CartLine::from_entry).collect();
        self.selected.clear();
    }

    /// Returns all lines, including any pending deletion.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns a line by id.
    pub fn line(&self, cart_item_id: CartItemId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.cart_item_id == cart_item_id)
    }

    /// Returns true if the cart has no live lines.
    pub fn is_empty(&self) -> bool {
        self.live_lines().next().is_none()
    }

    /// Returns true if the line is currently selected for checkout.
    pub fn is_selected(&self, cart_item_id: CartItemId) -> bool {
        self.selected.contains(&cart_item_id)
    }

    /// Selects or deselects a line for checkout. Pure local operation.
    ///
    /// Returns false (and changes nothing) for unknown or pending-delete
    /// lines.
    pub fn toggle_selection(&mut self, cart_item_id: CartItemId, selected: bool) -> bool {
        let selectable = self
            .lines
            .iter()
            .any(|l| l.cart_item_id == cart_item_id && !l.pending_delete);
        if !selectable {
            return false;
        }

        if selected {
            self.selected.insert(cart_item_id);
        } else {
            self.selected.remove(&cart_item_id);
        }
        true
    }

    /// Clears the checkout selection.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Returns the selected, live lines in cart order.
    pub fn selected_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines
            .iter()
            .filter(|l| !l.pending_delete && self.selected.contains(&l.cart_item_id))
    }

    /// Returns the chosen shipping tier.
    pub fn shipping_tier(&self) -> ShippingTier {
        self.shipping
    }

    /// Picks a shipping tier for checkout.
    pub fn set_shipping_tier(&mut self, tier: ShippingTier) {
        self.shipping = tier;
    }

    /// Recomputes every derived aggregate from the live lines.
    pub fn totals(&self) -> CartTotals {
        let mut totals = CartTotals {
            total_item_count: 0,
            total_price: Money::zero(),
            selected_item_count: 0,
            selected_total: Money::zero(),
            shipping_cost: self.shipping.cost(),
            grand_total: Money::zero(),
        };

        for line in self.live_lines() {
            totals.total_item_count += line.quantity;
            totals.total_price += line.line_total;
            if self.selected.contains(&line.cart_item_id) {
                totals.selected_item_count += line.quantity;
                totals.selected_total += line.line_total;
            }
        }
        totals.grand_total = totals.selected_total + totals.shipping_cost;
        totals
    }

    fn live_lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.iter().filter(|l| !l.pending_delete)
    }

    // Mutators below are crate-private: callers go through CartService so
    // every change with a remote effect carries its rollback.

    pub(crate) fn apply_quantity(&mut self, cart_item_id: CartItemId, quantity: u32) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.cart_item_id == cart_item_id)
        {
            line.quantity = quantity;
            line.recompute_total();
        }
    }

    pub(crate) fn mark_pending_delete(&mut self, cart_item_id: CartItemId, pending: bool) {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.cart_item_id == cart_item_id)
        {
            line.pending_delete = pending;
        }
        if pending {
            self.selected.remove(&cart_item_id);
        }
    }

    pub(crate) fn restore_selection(&mut self, cart_item_id: CartItemId) {
        if self.line(cart_item_id).is_some() {
            self.selected.insert(cart_item_id);
        }
    }

    pub(crate) fn purge(&mut self, cart_item_id: CartItemId) {
        self.lines.retain(|l| l.cart_item_id != cart_item_id);
        self.selected.remove(&cart_item_id);
    }
}
