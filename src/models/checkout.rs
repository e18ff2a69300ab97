use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Priority, SelectedService, ServiceTag};

/// Pricing flags carried forward from the cart so checkout can still
/// offer price edits on variable-price lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItemDetails {
    pub has_variable_price: bool,
    pub min_price: Option<Decimal>,
}

/// Category-agnostic checkout line item
///
/// `total_price` is frozen when the cart is flattened; later price edits
/// go through [`ServiceItem::set_unit_price`], which refreezes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    #[serde(rename = "type")]
    pub item_type: ServiceTag,
    pub service_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub details: ServiceItemDetails,
}

impl ServiceItem {
    /// Flatten a cart selection into a checkout line
    pub fn from_selection(selection: &SelectedService, tag: ServiceTag) -> Self {
        let unit_price = selection.effective_unit_price();
        Self {
            item_type: tag,
            service_id: selection.id.clone(),
            name: selection.label.clone(),
            quantity: selection.quantity,
            unit_price,
            total_price: unit_price * Decimal::from(selection.quantity),
            details: ServiceItemDetails {
                has_variable_price: selection.has_variable_price,
                min_price: selection.min_price,
            },
        }
    }

    /// Edit the unit price at checkout
    ///
    /// Only variable-price lines accept edits; the value is clamped to the
    /// carried-forward floor and the line total recomputed. Returns `true`
    /// when the price changed.
    pub fn set_unit_price(&mut self, requested: Decimal) -> bool {
        if !self.details.has_variable_price {
            return false;
        }
        let floor = self.details.min_price.unwrap_or(Decimal::ZERO);
        self.unit_price = requested.max(floor);
        self.total_price = self.unit_price * Decimal::from(self.quantity);
        true
    }
}

/// The flattened request written to the shared handoff slot
///
/// Consumed once by the request step: the slot is deleted on read so a
/// repeat navigation cannot duplicate the same pending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub category: ServiceTag,
    pub items: Vec<ServiceItem>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl PendingRequest {
    /// Recompute the total from current line totals
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.total_price).sum()
    }
}

/// Customer identity captured on the request form
///
/// Only required-presence is validated; the backend owns any deeper
/// verification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub tax_id: Option<String>,
}

/// A finalized order, ready for payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Display-only draft token. The backend issues the authoritative
    /// identifier when it accepts the order.
    pub reference_number: String,
    pub customer: CustomerDetails,
    pub category: ServiceTag,
    pub services: Vec<ServiceItem>,
    pub total_amount: Decimal,
    pub priority: Priority,
    pub total_with_fees: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Build an order from a consumed pending request
    ///
    /// `total_amount` is recomputed from the line items (checkout may have
    /// edited variable prices); `total_with_fees` applies the priority
    /// surcharge.
    pub fn from_pending(
        pending: PendingRequest,
        customer: CustomerDetails,
        priority: Priority,
    ) -> Self {
        let total_amount = pending.total();
        let total_with_fees = total_amount * priority.multiplier();
        Self {
            reference_number: generate_reference_number(),
            customer,
            category: pending.category,
            services: pending.items,
            total_amount,
            priority,
            total_with_fees,
            created_at: Utc::now(),
        }
    }

    /// One-line human description used on the payment record
    pub fn description(&self) -> String {
        format!(
            "Service request {} ({} item(s))",
            self.reference_number,
            self.services.len()
        )
    }
}

/// Generate a draft reference number: UTC timestamp plus a random suffix
///
/// Not unique across clients and not cryptographically meaningful; it
/// exists so the user has something to quote before the backend assigns
/// the real identifier.
pub fn generate_reference_number() -> String {
    format!(
        "SR-{}-{}",
        Utc::now().format("%Y%m%d%H%M%S"),
        Uuid::new_v4()
            .simple()
            .to_string()
            .get(0..6)
            .unwrap_or("000000")
            .to_uppercase()
    )
}
