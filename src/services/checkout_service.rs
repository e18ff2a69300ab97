use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{
    CustomerDetails, Order, PendingRequest, Priority, ServiceCategory, ServiceError, ServiceItem,
    ServiceResult, StorageError, Validate,
};
use crate::storage::{CartRepository, HandoffStore};

/// Service for the cart-to-payment handoff
///
/// Translates a category cart into the category-agnostic pending request,
/// builds the finalized order, and moves both through their consumed-once
/// storage slots.
pub struct CheckoutService {
    carts: Arc<dyn CartRepository>,
    handoff: Arc<dyn HandoffStore>,
}

impl CheckoutService {
    /// Create a new CheckoutService
    pub fn new(carts: Arc<dyn CartRepository>, handoff: Arc<dyn HandoffStore>) -> Self {
        Self { carts, handoff }
    }

    /// Flatten a category cart into the shared pending-request slot
    ///
    /// Fails with [`ServiceError::EmptySelection`] before touching storage
    /// when the cart has no items. Line totals are frozen here. The
    /// category cart itself is left intact; only `clear_cart` destroys it.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn finalize_selection(
        &self,
        category: ServiceCategory,
    ) -> ServiceResult<PendingRequest> {
        let cart = match self.carts.load(category).await {
            Ok(Some(cart)) => cart,
            Ok(None) => return Err(ServiceError::EmptySelection),
            Err(StorageError::Serialization { .. }) => return Err(ServiceError::EmptySelection),
            Err(e) => return Err(e.into()),
        };

        if cart.is_empty() {
            return Err(ServiceError::EmptySelection);
        }

        let tag = category.tag();
        let items: Vec<ServiceItem> = cart
            .items
            .iter()
            .map(|item| ServiceItem::from_selection(item, tag))
            .collect();
        let total_amount = items.iter().map(|item| item.total_price).sum();

        let pending = PendingRequest {
            category: tag,
            items,
            total_amount,
            created_at: Utc::now(),
        };

        self.handoff.write_pending(&pending).await?;
        info!(
            "Finalized {} item(s), total {}",
            pending.items.len(),
            pending.total_amount
        );
        Ok(pending)
    }

    /// Consume the pending-request slot (read once, then deleted)
    #[instrument(skip(self))]
    pub async fn take_pending(&self) -> ServiceResult<Option<PendingRequest>> {
        Ok(self.handoff.take_pending().await?)
    }

    /// Build the finalized order and park it in the pre-payment slot
    ///
    /// Customer fields are checked for presence only. The order total is
    /// recomputed from the (possibly price-edited) line items, and the
    /// priority surcharge applied on top.
    #[instrument(skip(self, pending, customer), fields(priority = %priority))]
    pub async fn build_order(
        &self,
        pending: PendingRequest,
        customer: CustomerDetails,
        priority: Priority,
    ) -> ServiceResult<Order> {
        customer.validate()?;

        let order = Order::from_pending(pending, customer, priority);
        self.handoff.write_order(&order).await?;

        info!(
            "Order {} parked for payment, total_with_fees {}",
            order.reference_number, order.total_with_fees
        );
        Ok(order)
    }

    /// Consume the pre-payment order slot (read once, then deleted)
    #[instrument(skip(self))]
    pub async fn take_order_for_payment(&self) -> ServiceResult<Option<Order>> {
        Ok(self.handoff.take_order().await?)
    }

    /// Cache the customer details for prefill on the next request form
    pub async fn remember_customer(&self, customer: &CustomerDetails) -> ServiceResult<()> {
        Ok(self.handoff.cache_profile(customer).await?)
    }

    /// Load the cached customer details, if any
    pub async fn recall_customer(&self) -> ServiceResult<Option<CustomerDetails>> {
        Ok(self.handoff.load_profile().await?)
    }
}
