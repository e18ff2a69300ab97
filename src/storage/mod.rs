// Persistence layer: a client-storage-style key-value store plus the
// typed repositories layered on top of it.
pub use self::cart_repository::{CartRepository, KeyValueCartRepository};
pub use self::handoff::{
    HandoffStore, KeyValueHandoffStore, CURRENT_PROFILE_KEY, ORDER_FOR_PAYMENT_KEY,
    PENDING_REQUEST_KEY,
};
pub use self::kv::{FileStore, KeyValueStore, MemoryStore};

mod cart_repository;
mod handoff;
mod kv;
