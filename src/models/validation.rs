use super::{CustomerDetails, PaymentMethod, ValidationError, ValidationResult};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Require a non-blank field value
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: field.to_string(),
        });
    }
    Ok(())
}

impl Validate for CustomerDetails {
    /// Required-presence only; the backend owns deeper verification
    fn validate(&self) -> ValidationResult<()> {
        validate_required("name", &self.name)?;
        validate_required("email", &self.email)?;
        validate_required("phone", &self.phone)?;
        Ok(())
    }
}

impl Validate for PaymentMethod {
    /// Method-specific required fields, checked before any network call
    fn validate(&self) -> ValidationResult<()> {
        match self {
            PaymentMethod::Mpesa { phone_number } => {
                validate_required("phone_number", phone_number)?;
            }
            PaymentMethod::Card {
                card_number,
                expiry,
                cvv,
                holder_name,
            } => {
                validate_required("card_number", card_number)?;
                validate_required("expiry", expiry)?;
                validate_required("cvv", cvv)?;
                validate_required("holder_name", holder_name)?;
            }
            PaymentMethod::Bank { bank_name } => {
                validate_required("bank_name", bank_name)?;
            }
        }
        Ok(())
    }
}
