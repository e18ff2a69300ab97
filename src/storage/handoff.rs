use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::models::{CustomerDetails, Order, PendingRequest, StorageResult};
use crate::storage::KeyValueStore;

/// Shared slot for the flattened cross-category request
pub const PENDING_REQUEST_KEY: &str = "pendingServiceRequest";
/// Shared slot for the finalized pre-payment order
pub const ORDER_FOR_PAYMENT_KEY: &str = "serviceRequestForPayment";
/// Cached customer details for form prefill
pub const CURRENT_PROFILE_KEY: &str = "currentUserProfile";

/// Trait defining the shared handoff slots between checkout steps
///
/// The pending-request and order slots are consumed-once: `take_*` reads
/// the record and deletes it in the same call, so navigating back to a
/// step cannot duplicate the same order.
#[async_trait]
pub trait HandoffStore: Send + Sync {
    async fn write_pending(&self, pending: &PendingRequest) -> StorageResult<()>;
    async fn take_pending(&self) -> StorageResult<Option<PendingRequest>>;

    async fn write_order(&self, order: &Order) -> StorageResult<()>;
    async fn take_order(&self) -> StorageResult<Option<Order>>;

    async fn cache_profile(&self, customer: &CustomerDetails) -> StorageResult<()>;
    async fn load_profile(&self) -> StorageResult<Option<CustomerDetails>>;
}

/// Handoff slots over any [`KeyValueStore`]
pub struct KeyValueHandoffStore {
    store: Arc<dyn KeyValueStore>,
}

impl KeyValueHandoffStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    async fn take<T: serde::de::DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)?;
                self.store.remove(key).await?;
                debug!("Consumed slot {}", key);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl HandoffStore for KeyValueHandoffStore {
    #[instrument(skip(self, pending), fields(item_count = pending.items.len()))]
    async fn write_pending(&self, pending: &PendingRequest) -> StorageResult<()> {
        let raw = serde_json::to_string(pending)?;
        self.store.put(PENDING_REQUEST_KEY, &raw).await
    }

    #[instrument(skip(self))]
    async fn take_pending(&self) -> StorageResult<Option<PendingRequest>> {
        self.take(PENDING_REQUEST_KEY).await
    }

    #[instrument(skip(self, order), fields(reference = %order.reference_number))]
    async fn write_order(&self, order: &Order) -> StorageResult<()> {
        let raw = serde_json::to_string(order)?;
        self.store.put(ORDER_FOR_PAYMENT_KEY, &raw).await
    }

    #[instrument(skip(self))]
    async fn take_order(&self) -> StorageResult<Option<Order>> {
        self.take(ORDER_FOR_PAYMENT_KEY).await
    }

    async fn cache_profile(&self, customer: &CustomerDetails) -> StorageResult<()> {
        let raw = serde_json::to_string(customer)?;
        self.store.put(CURRENT_PROFILE_KEY, &raw).await
    }

    async fn load_profile(&self) -> StorageResult<Option<CustomerDetails>> {
        match self.store.get(CURRENT_PROFILE_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
