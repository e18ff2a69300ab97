use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CatalogEntry, ServiceCategory};

/// A catalog entry the user has selected, with its pricing frozen at
/// selection time
///
/// `price`, `has_variable_price` and `min_price` are copies: catalog
/// changes after selection do not retroactively affect the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedService {
    pub id: String,
    pub label: String,
    pub price: Decimal,
    pub quantity: u32,
    /// Explicit price override; `None` means "use the base price".
    ///
    /// An `Option` rather than a zero sentinel, so an override can never be
    /// silently confused with "unset".
    pub custom_price: Option<Decimal>,
    pub has_variable_price: bool,
    pub min_price: Option<Decimal>,
    pub category: ServiceCategory,
    pub added_at: DateTime<Utc>,
}

impl SelectedService {
    /// Create a selection from a catalog entry
    ///
    /// Variable-price entries start with the override initialized to the
    /// price floor (or the base price when no floor is set).
    pub fn from_entry(entry: &CatalogEntry) -> Self {
        let custom_price = if entry.has_variable_price {
            Some(entry.min_price.unwrap_or(entry.price))
        } else {
            None
        };

        Self {
            id: entry.id.clone(),
            label: entry.label.clone(),
            price: entry.price,
            quantity: 1,
            custom_price,
            has_variable_price: entry.has_variable_price,
            min_price: entry.min_price,
            category: entry.category,
            added_at: Utc::now(),
        }
    }

    /// Unit price used in every total: the override when present, else the
    /// base price
    pub fn effective_unit_price(&self) -> Decimal {
        self.custom_price.unwrap_or(self.price)
    }

    /// Line total for this selection
    pub fn line_total(&self) -> Decimal {
        self.effective_unit_price() * Decimal::from(self.quantity)
    }

    /// Set the price override, clamped to the floor
    ///
    /// The stored value is `max(requested, min_price ?? 0)`; no upper bound
    /// is enforced.
    pub fn set_custom_price(&mut self, requested: Decimal) {
        let floor = self.min_price.unwrap_or(Decimal::ZERO);
        self.custom_price = Some(requested.max(floor));
    }
}

/// One category's shopping cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub category: ServiceCategory,
    pub items: Vec<SelectedService>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create a new empty cart for a category
    pub fn new(category: ServiceCategory) -> Self {
        let now = Utc::now();
        Self {
            category,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Toggle a catalog entry's selection
    ///
    /// If an item with the same id is already in the cart it is removed
    /// (any quantity or price edits are discarded with it); otherwise a
    /// fresh selection with quantity 1 is appended. Returns `true` when
    /// the entry is selected after the call. Each id appears at most once.
    pub fn toggle_selection(&mut self, entry: &CatalogEntry) -> bool {
        if self.contains_item(&entry.id) {
            self.items.retain(|item| item.id != entry.id);
            self.updated_at = Utc::now();
            false
        } else {
            self.items.push(SelectedService::from_entry(entry));
            self.updated_at = Utc::now();
            true
        }
    }

    /// Set the quantity of an item
    ///
    /// Quantities below 1 are ignored, not errors: the stored quantity is
    /// left untouched. Returns `true` only when the quantity changed.
    pub fn update_quantity(&mut self, id: &str, new_quantity: u32) -> bool {
        if new_quantity < 1 {
            return false;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = new_quantity;
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    /// Set a price override on a variable-price item
    ///
    /// The stored value is clamped to the item's floor. Fixed-price items
    /// are left untouched. Returns `true` only when an override was stored.
    pub fn update_custom_price(&mut self, id: &str, requested: Decimal) -> bool {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            if !item.has_variable_price {
                return false;
            }
            item.set_custom_price(requested);
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    /// Remove an item from the cart
    pub fn remove_item(&mut self, id: &str) -> bool {
        let original_len = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != original_len;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Remove every item from the cart
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }

    /// Total units across all items
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Cart total: the sum of line totals
    ///
    /// Always derived from current state; never cached.
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|item| item.line_total()).sum()
    }

    /// Check if the cart is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get a specific item
    pub fn get_item(&self, id: &str) -> Option<&SelectedService> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Check whether an id is currently selected
    pub fn contains_item(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }
}

/// Read model for one cart line, with derived totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    pub id: String,
    pub label: String,
    pub quantity: u32,
    pub base_price: Decimal,
    pub custom_price: Option<Decimal>,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub has_variable_price: bool,
    pub min_price: Option<Decimal>,
}

/// Read model for a whole cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartView {
    pub category: ServiceCategory,
    pub items: Vec<CartLineView>,
    pub total_items: u32,
    pub total_price: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let items = cart
            .items
            .iter()
            .map(|item| CartLineView {
                id: item.id.clone(),
                label: item.label.clone(),
                quantity: item.quantity,
                base_price: item.price,
                custom_price: item.custom_price,
                unit_price: item.effective_unit_price(),
                line_total: item.line_total(),
                has_variable_price: item.has_variable_price,
                min_price: item.min_price,
            })
            .collect();

        Self {
            category: cart.category,
            items,
            total_items: cart.total_items(),
            total_price: cart.subtotal(),
            updated_at: cart.updated_at,
        }
    }
}
