pub mod cart_service;
pub mod checkout_service;
pub mod payment_service;

pub use cart_service::CartService;
pub use checkout_service::CheckoutService;
pub use payment_service::{PaymentService, GENERIC_NETWORK_ERROR, GENERIC_PAYMENT_ERROR};
