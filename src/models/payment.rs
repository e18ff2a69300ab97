use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Order;

/// Payment method chosen on the payment form, with its method-specific
/// fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentMethod {
    Mpesa {
        phone_number: String,
    },
    Card {
        card_number: String,
        expiry: String,
        cvv: String,
        holder_name: String,
    },
    Bank {
        bank_name: String,
    },
}

impl PaymentMethod {
    /// Fixed backend vocabulary for the payment endpoint's
    /// `payment_method`
    pub fn backend_vocab(&self) -> &'static str {
        match self {
            PaymentMethod::Mpesa { .. } => "mpesa",
            PaymentMethod::Card { .. } => "card",
            PaymentMethod::Bank { .. } => "bank_transfer",
        }
    }

    /// Phone number forwarded to the backend, where the method carries one
    pub fn phone_number(&self) -> Option<&str> {
        match self {
            PaymentMethod::Mpesa { phone_number } => Some(phone_number.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.backend_vocab())
    }
}

/// Normalized payload posted to the backend payment-creation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub service_type: String,
    pub amount: Decimal,
    pub payment_method: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl PaymentRequest {
    /// Build the wire payload for an order and method
    pub fn from_order(order: &Order, method: &PaymentMethod) -> Self {
        Self {
            service_type: order.category.backend_service_type().to_string(),
            amount: order.total_with_fees,
            payment_method: method.backend_vocab().to_string(),
            description: order.description(),
            phone_number: method.phone_number().map(|p| p.to_string()),
        }
    }
}

/// Backend response to a payment creation
///
/// Anything beyond the success flag and error message is the backend's
/// own payment record; it is carried opaquely for the completion callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub record: serde_json::Map<String, serde_json::Value>,
}

/// Phases of one payment submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentPhase {
    Idle,
    Validating,
    Submitting,
    Confirmed,
}

impl fmt::Display for PaymentPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentPhase::Idle => write!(f, "idle"),
            PaymentPhase::Validating => write!(f, "validating"),
            PaymentPhase::Submitting => write!(f, "submitting"),
            PaymentPhase::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// State machine for a payment submission
///
/// `Idle -> Validating -> (rejected -> Idle | Submitting)
///  -> (failed -> Idle | Confirmed)`. `Confirmed` is terminal; every
/// failure returns to an editable `Idle` so the user may resubmit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFlow {
    phase: PaymentPhase,
}

impl PaymentFlow {
    pub fn new() -> Self {
        Self {
            phase: PaymentPhase::Idle,
        }
    }

    pub fn phase(&self) -> PaymentPhase {
        self.phase
    }

    /// The close control is unavailable only while a request is in flight
    pub fn can_close(&self) -> bool {
        self.phase != PaymentPhase::Submitting
    }

    pub fn begin_validation(&mut self) -> bool {
        self.transition(PaymentPhase::Idle, PaymentPhase::Validating)
    }

    /// Local validation failed: back to editable
    pub fn reject(&mut self) -> bool {
        self.transition(PaymentPhase::Validating, PaymentPhase::Idle)
    }

    pub fn begin_submission(&mut self) -> bool {
        self.transition(PaymentPhase::Validating, PaymentPhase::Submitting)
    }

    /// Backend or transport failure: back to editable
    pub fn fail(&mut self) -> bool {
        self.transition(PaymentPhase::Submitting, PaymentPhase::Idle)
    }

    pub fn confirm(&mut self) -> bool {
        self.transition(PaymentPhase::Submitting, PaymentPhase::Confirmed)
    }

    fn transition(&mut self, from: PaymentPhase, to: PaymentPhase) -> bool {
        if self.phase == from {
            self.phase = to;
            true
        } else {
            tracing::warn!(
                "Ignoring payment transition {} -> {} while {}",
                from,
                to,
                self.phase
            );
            false
        }
    }
}

impl Default for PaymentFlow {
    fn default() -> Self {
        Self::new()
    }
}
