// Re-export all model types
pub use self::cart::*;
pub use self::catalog::*;
pub use self::checkout::*;
pub use self::enums::*;
pub use self::errors::*;
pub use self::payment::*;
pub use self::validation::*;

mod cart;
mod catalog;
mod checkout;
mod enums;
mod errors;
mod payment;
mod validation;
