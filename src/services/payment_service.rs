use std::time::Duration;
use tracing::{error, info, instrument, warn};

use crate::models::{
    Order, PaymentFlow, PaymentMethod, PaymentRequest, PaymentResponse, ServiceError,
    ServiceResult, Validate,
};

/// Fallback shown when the backend rejects a payment without a message
pub const GENERIC_PAYMENT_ERROR: &str = "Payment failed, please try again.";
/// Fallback shown when the request itself fails
pub const GENERIC_NETWORK_ERROR: &str = "Could not reach the payment service, please try again.";

/// Service that submits finalized orders to the backend payment endpoint
///
/// One POST per user action; no automatic retry, no client-side timeout.
/// The backend response (or its absence) is the only termination
/// condition, and every failure leaves the caller free to resubmit.
pub struct PaymentService {
    client: reqwest::Client,
    base_url: String,
    confirm_delay: Duration,
}

impl PaymentService {
    /// Create a new PaymentService against a backend base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            confirm_delay: Duration::from_millis(1500),
        }
    }

    /// Override the cosmetic confirmation delay (zero disables it)
    pub fn with_confirm_delay(mut self, confirm_delay: Duration) -> Self {
        self.confirm_delay = confirm_delay;
        self
    }

    fn payments_url(&self) -> String {
        format!("{}/api/payments", self.base_url.trim_end_matches('/'))
    }

    /// Submit a payment for an order
    ///
    /// Method fields are validated locally first; a missing field blocks
    /// the submission before any network call. On a successful backend
    /// response the flow waits the fixed cosmetic delay, invokes
    /// `on_complete` with the backend's record, and ends `Confirmed`.
    /// Rejections carry the backend's message verbatim when it sends one.
    #[instrument(skip(self, order, method, on_complete), fields(reference = %order.reference_number, method = %method))]
    pub async fn submit_payment<F>(
        &self,
        order: &Order,
        method: &PaymentMethod,
        on_complete: F,
    ) -> ServiceResult<PaymentResponse>
    where
        F: FnOnce(&PaymentResponse),
    {
        let mut flow = PaymentFlow::new();

        flow.begin_validation();
        if let Err(e) = method.validate() {
            flow.reject();
            info!("Payment blocked before submission: {}", e);
            return Err(e.into());
        }

        flow.begin_submission();
        let request = PaymentRequest::from_order(order, method);
        info!(
            "Submitting payment: {} {} via {}",
            request.service_type, request.amount, request.payment_method
        );

        let response = match self
            .client
            .post(self.payments_url())
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                flow.fail();
                error!("Payment request failed: {}", e);
                return Err(ServiceError::Network {
                    message: GENERIC_NETWORK_ERROR.to_string(),
                });
            }
        };

        let status = response.status();
        let payment: PaymentResponse = match response.json().await {
            Ok(payment) => payment,
            Err(e) => {
                flow.fail();
                error!("Malformed payment response: {}", e);
                return Err(ServiceError::Network {
                    message: GENERIC_NETWORK_ERROR.to_string(),
                });
            }
        };

        if !status.is_success() || !payment.success {
            flow.fail();
            let message = payment
                .error
                .clone()
                .unwrap_or_else(|| GENERIC_PAYMENT_ERROR.to_string());
            warn!("Payment rejected: {}", message);
            return Err(ServiceError::PaymentRejected { message });
        }

        // Cosmetic processing pause before the confirmation state.
        if !self.confirm_delay.is_zero() {
            tokio::time::sleep(self.confirm_delay).await;
        }

        flow.confirm();
        info!("Payment confirmed for {}", order.reference_number);
        on_complete(&payment);
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Cart, Catalog, CustomerDetails, PendingRequest, Priority, ServiceCategory, ServiceItem,
    };
    use chrono::Utc;

    fn test_order() -> Order {
        let catalog = Catalog::kra();
        let mut cart = Cart::new(ServiceCategory::Kra);
        cart.toggle_selection(catalog.find("tax-returns-filing").unwrap());

        let items: Vec<ServiceItem> = cart
            .items
            .iter()
            .map(|item| ServiceItem::from_selection(item, cart.category.tag()))
            .collect();
        let total_amount = items.iter().map(|item| item.total_price).sum();

        Order::from_pending(
            PendingRequest {
                category: cart.category.tag(),
                items,
                total_amount,
                created_at: Utc::now(),
            },
            CustomerDetails::default(),
            Priority::Normal,
        )
    }

    #[tokio::test]
    async fn test_invalid_method_blocks_before_any_request() {
        // Unroutable base URL: if validation let the call through, the
        // request itself would fail with a different error variant.
        let service = PaymentService::new("http://127.0.0.1:1");
        let order = test_order();
        let method = PaymentMethod::Mpesa {
            phone_number: String::new(),
        };

        let mut completed = false;
        let result = service
            .submit_payment(&order, &method, |_| completed = true)
            .await;

        assert!(matches!(result, Err(ServiceError::Validation { .. })));
        assert!(!completed);
    }

    #[tokio::test]
    async fn test_unreachable_backend_maps_to_generic_network_error() {
        let service = PaymentService::new("http://127.0.0.1:1");
        let order = test_order();
        let method = PaymentMethod::Bank {
            bank_name: "Equity".to_string(),
        };

        let result = service.submit_payment(&order, &method, |_| {}).await;

        match result {
            Err(ServiceError::Network { message }) => {
                assert_eq!(message, GENERIC_NETWORK_ERROR);
            }
            other => panic!("Expected Network error, got {:?}", other),
        }
    }

    #[test]
    fn test_payments_url_normalizes_trailing_slash() {
        let service = PaymentService::new("http://localhost:4000/");
        assert_eq!(service.payments_url(), "http://localhost:4000/api/payments");

        let service = PaymentService::new("http://localhost:4000");
        assert_eq!(service.payments_url(), "http://localhost:4000/api/payments");
    }
}
