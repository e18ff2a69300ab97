use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::models::{Cart, ServiceCategory, StorageResult};
use crate::storage::KeyValueStore;

/// Trait defining the interface for cart persistence
///
/// One storage key per category; loading one category never reads
/// another's key. Implementations are swappable without touching cart
/// logic.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Load the persisted cart for a category, if any was saved
    async fn load(&self, category: ServiceCategory) -> StorageResult<Option<Cart>>;

    /// Persist the full cart under its category key
    async fn save(&self, cart: &Cart) -> StorageResult<()>;

    /// Erase the persisted record entirely, so a future load starts empty
    async fn delete(&self, category: ServiceCategory) -> StorageResult<()>;
}

/// Cart repository over any [`KeyValueStore`]
pub struct KeyValueCartRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KeyValueCartRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CartRepository for KeyValueCartRepository {
    #[instrument(skip(self), fields(key = category.storage_key()))]
    async fn load(&self, category: ServiceCategory) -> StorageResult<Option<Cart>> {
        match self.store.get(category.storage_key()).await? {
            Some(raw) => {
                let cart: Cart = serde_json::from_str(&raw)?;
                debug!("Restored cart with {} items", cart.items.len());
                Ok(Some(cart))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, cart), fields(key = cart.category.storage_key(), item_count = cart.items.len()))]
    async fn save(&self, cart: &Cart) -> StorageResult<()> {
        let raw = serde_json::to_string(cart)?;
        self.store.put(cart.category.storage_key(), &raw).await?;
        debug!("Cart persisted");
        Ok(())
    }

    #[instrument(skip(self), fields(key = category.storage_key()))]
    async fn delete(&self, category: ServiceCategory) -> StorageResult<()> {
        self.store.remove(category.storage_key()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Catalog;
    use crate::storage::MemoryStore;

    fn repository() -> (Arc<MemoryStore>, KeyValueCartRepository) {
        let store = Arc::new(MemoryStore::new());
        let repository = KeyValueCartRepository::new(store.clone());
        (store, repository)
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_cart_and_order() {
        let (_, repository) = repository();
        let catalog = Catalog::kra();

        let mut cart = Cart::new(ServiceCategory::Kra);
        for entry in &catalog.entries {
            cart.toggle_selection(entry);
        }

        repository.save(&cart).await.unwrap();
        let restored = repository.load(ServiceCategory::Kra).await.unwrap().unwrap();

        assert_eq!(restored, cart);
        let original_ids: Vec<_> = cart.items.iter().map(|i| &i.id).collect();
        let restored_ids: Vec<_> = restored.items.iter().map(|i| &i.id).collect();
        assert_eq!(restored_ids, original_ids);
    }

    #[tokio::test]
    async fn test_load_missing_category_is_none() {
        let (_, repository) = repository();
        assert!(repository
            .load(ServiceCategory::Bookkeeping)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_categories_do_not_leak_into_each_other() {
        let (_, repository) = repository();
        let catalog = Catalog::kra();

        let mut cart = Cart::new(ServiceCategory::Kra);
        cart.toggle_selection(&catalog.entries[0]);
        repository.save(&cart).await.unwrap();

        assert!(repository
            .load(ServiceCategory::DataAnalytics)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_erases_record() {
        let (store, repository) = repository();
        let catalog = Catalog::kra();

        let mut cart = Cart::new(ServiceCategory::Kra);
        cart.toggle_selection(&catalog.entries[0]);
        repository.save(&cart).await.unwrap();

        repository.delete(ServiceCategory::Kra).await.unwrap();
        assert!(repository.load(ServiceCategory::Kra).await.unwrap().is_none());
        assert!(!store
            .contains(ServiceCategory::Kra.storage_key())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_malformed_record_surfaces_serialization_error() {
        let (store, repository) = repository();
        store
            .put(ServiceCategory::Kra.storage_key(), "{not valid json")
            .await
            .unwrap();

        let result = repository.load(ServiceCategory::Kra).await;
        assert!(matches!(
            result,
            Err(crate::models::StorageError::Serialization { .. })
        ));
    }
}
