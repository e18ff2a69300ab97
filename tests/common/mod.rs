use std::sync::Arc;
use tempfile::TempDir;
use wiremock::MockServer;

use huduma_core::services::{CartService, CheckoutService, PaymentService};
use huduma_core::storage::{FileStore, KeyValueCartRepository, KeyValueHandoffStore};

/// Shared test environment: a file-backed store in a temp directory, the
/// three services wired over it, and a mock payment backend.
pub struct TestEnvironment {
    pub cart_service: CartService,
    pub checkout_service: CheckoutService,
    pub payment_service: PaymentService,
    pub backend: MockServer,
    pub store: Arc<FileStore>,
    // Held so the storage directory outlives the test.
    _data_dir: TempDir,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        let data_dir = tempfile::tempdir().expect("Failed to create temp storage dir");
        let store = Arc::new(
            FileStore::open(data_dir.path())
                .await
                .expect("Failed to open file store"),
        );

        let carts = Arc::new(KeyValueCartRepository::new(store.clone()));
        let handoff = Arc::new(KeyValueHandoffStore::new(store.clone()));

        let backend = MockServer::start().await;
        let payment_service =
            PaymentService::new(backend.uri()).with_confirm_delay(std::time::Duration::ZERO);

        Self {
            cart_service: CartService::new(carts.clone()),
            checkout_service: CheckoutService::new(carts, handoff),
            payment_service,
            backend,
            store,
            _data_dir: data_dir,
        }
    }

    /// A second cart service over the same storage directory, simulating
    /// a fresh page mount restoring persisted state.
    pub fn remounted_cart_service(&self) -> CartService {
        CartService::new(Arc::new(KeyValueCartRepository::new(self.store.clone())))
    }
}
