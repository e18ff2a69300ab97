use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service categories offered by the platform
///
/// Each category owns its own persisted cart; carts never merge across
/// categories before checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Kra,
    DataAnalytics,
    BusinessRegistration,
    Bookkeeping,
}

impl ServiceCategory {
    /// Storage key for this category's persisted cart
    ///
    /// Keys are the original client-storage constants; restoring one key
    /// never reads another category's key.
    pub fn storage_key(&self) -> &'static str {
        match self {
            ServiceCategory::Kra => "selectedKRAServices",
            ServiceCategory::DataAnalytics => "selectedDataServices",
            ServiceCategory::BusinessRegistration => "selectedBusinessServices",
            ServiceCategory::Bookkeeping => "selectedBookkeepingServices",
        }
    }

    /// Coarse tag used once a cart is flattened for checkout
    pub fn tag(&self) -> ServiceTag {
        match self {
            ServiceCategory::Kra => ServiceTag::Kra,
            ServiceCategory::DataAnalytics => ServiceTag::Data,
            ServiceCategory::BusinessRegistration => ServiceTag::Business,
            ServiceCategory::Bookkeeping => ServiceTag::Other,
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceCategory::Kra => write!(f, "kra"),
            ServiceCategory::DataAnalytics => write!(f, "data_analytics"),
            ServiceCategory::BusinessRegistration => write!(f, "business_registration"),
            ServiceCategory::Bookkeeping => write!(f, "bookkeeping"),
        }
    }
}

impl FromStr for ServiceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kra" => Ok(ServiceCategory::Kra),
            "data_analytics" => Ok(ServiceCategory::DataAnalytics),
            "business_registration" => Ok(ServiceCategory::BusinessRegistration),
            "bookkeeping" => Ok(ServiceCategory::Bookkeeping),
            _ => Err(format!("Invalid service category: {}", s)),
        }
    }
}

/// Category-agnostic tag carried on checkout line items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTag {
    Kra,
    Data,
    Business,
    Other,
}

impl ServiceTag {
    /// Fixed backend vocabulary for the payment endpoint's `service_type`
    pub fn backend_service_type(&self) -> &'static str {
        match self {
            ServiceTag::Kra => "kra_services",
            ServiceTag::Data => "data_analytics",
            ServiceTag::Business => "business_registration",
            ServiceTag::Other => "general_services",
        }
    }
}

impl fmt::Display for ServiceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceTag::Kra => write!(f, "kra"),
            ServiceTag::Data => write!(f, "data"),
            ServiceTag::Business => write!(f, "business"),
            ServiceTag::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ServiceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kra" => Ok(ServiceTag::Kra),
            "data" => Ok(ServiceTag::Data),
            "business" => Ok(ServiceTag::Business),
            "other" => Ok(ServiceTag::Other),
            _ => Err(format!("Invalid service tag: {}", s)),
        }
    }
}

/// Request priority chosen at order time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Normal,
    Urgent,
    Express,
}

impl Priority {
    /// Surcharge multiplier applied to the order total
    ///
    /// Only `express` carries a surcharge; `urgent` affects turnaround,
    /// not price.
    pub fn multiplier(&self) -> rust_decimal::Decimal {
        match self {
            Priority::Express => rust_decimal::Decimal::new(13, 1),
            Priority::Normal | Priority::Urgent => rust_decimal::Decimal::ONE,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Normal => write!(f, "normal"),
            Priority::Urgent => write!(f, "urgent"),
            Priority::Express => write!(f, "express"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Priority::Normal),
            "urgent" => Ok(Priority::Urgent),
            "express" => Ok(Priority::Express),
            _ => Err(format!("Invalid priority: {}", s)),
        }
    }
}
