pub mod config;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

pub use config::{Config, ConfigError};
pub use observability::{init_tracing, ObservabilityError};
