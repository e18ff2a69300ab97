use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{
    Cart, CartView, CatalogEntry, ServiceCategory, ServiceError, ServiceResult, StorageError,
};
use crate::storage::CartRepository;

/// Service for managing the per-category shopping carts
///
/// Every operation loads the persisted cart, mutates it and saves it back
/// before returning, so client storage always reflects the last mutation.
/// Totals are derived on every read, never cached.
pub struct CartService {
    carts: Arc<dyn CartRepository>,
}

impl CartService {
    /// Create a new CartService
    pub fn new(carts: Arc<dyn CartRepository>) -> Self {
        Self { carts }
    }

    /// Get a category's cart, restoring it from storage
    ///
    /// A missing record starts an empty cart. A malformed record is
    /// fail-soft: it is logged and replaced by an empty cart rather than
    /// surfaced, since there is no user-facing recovery path.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn get_cart(&self, category: ServiceCategory) -> ServiceResult<CartView> {
        let cart = self.load_or_empty(category).await?;
        Ok(CartView::from(&cart))
    }

    /// Toggle a catalog entry in its category's cart
    ///
    /// Selecting an already-selected id removes it; otherwise the entry is
    /// added with quantity 1 (variable-price entries start at their
    /// floor).
    #[instrument(skip(self, entry), fields(category = %category, id = %entry.id))]
    pub async fn toggle_selection(
        &self,
        category: ServiceCategory,
        entry: &CatalogEntry,
    ) -> ServiceResult<CartView> {
        let mut cart = self.load_or_empty(category).await?;

        let selected = cart.toggle_selection(entry);
        self.carts.save(&cart).await?;

        info!(
            "{} {} ({} items in cart)",
            if selected { "Selected" } else { "Deselected" },
            entry.id,
            cart.items.len()
        );
        Ok(CartView::from(&cart))
    }

    /// Set an item's quantity
    ///
    /// Quantities below 1 are ignored silently; the cart is returned
    /// unchanged. An id that is not in the cart is an error.
    #[instrument(skip(self), fields(category = %category, id = %id, quantity = new_quantity))]
    pub async fn update_quantity(
        &self,
        category: ServiceCategory,
        id: &str,
        new_quantity: u32,
    ) -> ServiceResult<CartView> {
        let mut cart = self.load_or_empty(category).await?;

        if !cart.contains_item(id) {
            return Err(ServiceError::ItemNotFound { id: id.to_string() });
        }

        if cart.update_quantity(id, new_quantity) {
            self.carts.save(&cart).await?;
        } else {
            info!("Ignored out-of-range quantity {}", new_quantity);
        }
        Ok(CartView::from(&cart))
    }

    /// Set an item's price override, clamped to its floor
    ///
    /// Fixed-price items are returned unchanged; the operation only has a
    /// visible effect on variable-price lines.
    #[instrument(skip(self), fields(category = %category, id = %id))]
    pub async fn update_custom_price(
        &self,
        category: ServiceCategory,
        id: &str,
        requested: Decimal,
    ) -> ServiceResult<CartView> {
        let mut cart = self.load_or_empty(category).await?;

        if !cart.contains_item(id) {
            return Err(ServiceError::ItemNotFound { id: id.to_string() });
        }

        if cart.update_custom_price(id, requested) {
            self.carts.save(&cart).await?;
        }
        Ok(CartView::from(&cart))
    }

    /// Remove one item from a category's cart
    #[instrument(skip(self), fields(category = %category, id = %id))]
    pub async fn remove_item(
        &self,
        category: ServiceCategory,
        id: &str,
    ) -> ServiceResult<CartView> {
        let mut cart = self.load_or_empty(category).await?;

        if !cart.remove_item(id) {
            return Err(ServiceError::ItemNotFound { id: id.to_string() });
        }

        self.carts.save(&cart).await?;
        Ok(CartView::from(&cart))
    }

    /// Clear a category's cart and erase its persisted record
    ///
    /// The record is deleted outright (not saved as empty) so a future
    /// mount cannot resurrect the cleared cart.
    #[instrument(skip(self), fields(category = %category))]
    pub async fn clear_cart(&self, category: ServiceCategory) -> ServiceResult<()> {
        self.carts.delete(category).await?;
        info!("Cart cleared");
        Ok(())
    }

    /// Current cart total for a category
    #[instrument(skip(self), fields(category = %category))]
    pub async fn cart_total(&self, category: ServiceCategory) -> ServiceResult<Decimal> {
        let cart = self.load_or_empty(category).await?;
        Ok(cart.subtotal())
    }

    /// Check whether a category's cart has any items
    pub async fn is_cart_empty(&self, category: ServiceCategory) -> ServiceResult<bool> {
        let cart = self.load_or_empty(category).await?;
        Ok(cart.is_empty())
    }

    pub(crate) async fn load_or_empty(&self, category: ServiceCategory) -> ServiceResult<Cart> {
        match self.carts.load(category).await {
            Ok(Some(cart)) => Ok(cart),
            Ok(None) => Ok(Cart::new(category)),
            Err(StorageError::Serialization { source }) => {
                warn!("Discarding malformed cart record: {}", source);
                Ok(Cart::new(category))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Catalog;
    use crate::storage::{KeyValueCartRepository, KeyValueStore, MemoryStore};
    use async_trait::async_trait;
    use mockall::mock;
    use rust_decimal_macros::dec;

    // Mock repository for failure-path testing
    mock! {
        TestCartRepository {}

        #[async_trait]
        impl CartRepository for TestCartRepository {
            async fn load(&self, category: ServiceCategory) -> Result<Option<Cart>, StorageError>;
            async fn save(&self, cart: &Cart) -> Result<(), StorageError>;
            async fn delete(&self, category: ServiceCategory) -> Result<(), StorageError>;
        }
    }

    fn service_with_store() -> (Arc<MemoryStore>, CartService) {
        let store = Arc::new(MemoryStore::new());
        let repository = Arc::new(KeyValueCartRepository::new(store.clone()));
        (store, CartService::new(repository))
    }

    #[tokio::test]
    async fn test_get_cart_starts_empty() {
        let (_, service) = service_with_store();

        let view = service.get_cart(ServiceCategory::Kra).await.unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.total_price, dec!(0));
    }

    #[tokio::test]
    async fn test_toggle_persists_across_instances() {
        let (store, service) = service_with_store();
        let entry = Catalog::kra().find("tax-returns-filing").unwrap().clone();

        service
            .toggle_selection(ServiceCategory::Kra, &entry)
            .await
            .unwrap();

        // A fresh service over the same store sees the selection.
        let service2 = CartService::new(Arc::new(KeyValueCartRepository::new(store)));
        let view = service2.get_cart(ServiceCategory::Kra).await.unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, entry.id);
    }

    #[tokio::test]
    async fn test_quantity_update_persists_and_clamps() {
        let (_, service) = service_with_store();
        let entry = Catalog::kra().find("tax-returns-filing").unwrap().clone();
        service
            .toggle_selection(ServiceCategory::Kra, &entry)
            .await
            .unwrap();

        let view = service
            .update_quantity(ServiceCategory::Kra, &entry.id, 4)
            .await
            .unwrap();
        assert_eq!(view.items[0].quantity, 4);

        // Below 1: ignored, stored quantity untouched.
        let view = service
            .update_quantity(ServiceCategory::Kra, &entry.id, 0)
            .await
            .unwrap();
        assert_eq!(view.items[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_quantity_update_unknown_id() {
        let (_, service) = service_with_store();

        let result = service
            .update_quantity(ServiceCategory::Kra, "missing", 2)
            .await;
        assert!(matches!(result, Err(ServiceError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn test_custom_price_clamped_through_service() {
        let (_, service) = service_with_store();
        let entry = Catalog::kra().find("kra-penalty-waiver").unwrap().clone();
        service
            .toggle_selection(ServiceCategory::Kra, &entry)
            .await
            .unwrap();

        let view = service
            .update_custom_price(ServiceCategory::Kra, &entry.id, dec!(1200))
            .await
            .unwrap();
        assert_eq!(view.items[0].unit_price, dec!(3000));
        assert_eq!(view.total_price, dec!(3000));
    }

    #[tokio::test]
    async fn test_clear_erases_persisted_record() {
        let (store, service) = service_with_store();
        let entry = Catalog::kra().find("tax-returns-filing").unwrap().clone();
        service
            .toggle_selection(ServiceCategory::Kra, &entry)
            .await
            .unwrap();

        service.clear_cart(ServiceCategory::Kra).await.unwrap();

        assert!(!store
            .contains(ServiceCategory::Kra.storage_key())
            .await
            .unwrap());
        assert!(service.is_cart_empty(ServiceCategory::Kra).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_record_falls_back_to_empty() {
        let (store, service) = service_with_store();
        store
            .put(ServiceCategory::Kra.storage_key(), "][ not json")
            .await
            .unwrap();

        let view = service.get_cart(ServiceCategory::Kra).await.unwrap();
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn test_io_failure_propagates() {
        let mut mock_repo = MockTestCartRepository::new();
        mock_repo.expect_load().times(1).returning(|_| {
            Err(StorageError::Io {
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        });

        let service = CartService::new(Arc::new(mock_repo));

        let result = service.get_cart(ServiceCategory::Kra).await;
        assert!(matches!(result, Err(ServiceError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_toggle_saves_exactly_once() {
        let mut mock_repo = MockTestCartRepository::new();
        mock_repo.expect_load().times(1).returning(|_| Ok(None));
        mock_repo
            .expect_save()
            .times(1)
            .withf(|cart: &Cart| cart.items.len() == 1)
            .returning(|_| Ok(()));

        let service = CartService::new(Arc::new(mock_repo));
        let entry = Catalog::kra().find("tax-returns-filing").unwrap().clone();

        let view = service
            .toggle_selection(ServiceCategory::Kra, &entry)
            .await
            .unwrap();
        assert_eq!(view.items.len(), 1);
    }

    #[tokio::test]
    async fn test_categories_stay_isolated() {
        let (_, service) = service_with_store();
        let kra_entry = Catalog::kra().find("tax-returns-filing").unwrap().clone();
        let books_entry = Catalog::bookkeeping()
            .find("payroll-processing")
            .unwrap()
            .clone();

        service
            .toggle_selection(ServiceCategory::Kra, &kra_entry)
            .await
            .unwrap();
        service
            .toggle_selection(ServiceCategory::Bookkeeping, &books_entry)
            .await
            .unwrap();
        service.clear_cart(ServiceCategory::Kra).await.unwrap();

        let books = service.get_cart(ServiceCategory::Bookkeeping).await.unwrap();
        assert_eq!(books.items.len(), 1);
    }
}
