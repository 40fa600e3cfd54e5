//! Client-side form validation.
//!
//! Everything here runs before a request is built. A [`ValidationError`]
//! blocks submission and is shown next to the form; it never reaches the
//! network. The limits mirror what the backend enforces so that most bad
//! input is caught locally.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Email, EmailError};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Display name length bounds at registration.
pub const NAME_LENGTH: (usize, usize) = (2, 100);
/// Product name and brand length bounds.
pub const PRODUCT_TEXT_LENGTH: (usize, usize) = (2, 255);
/// Minimum delivery address length at checkout.
pub const MIN_ADDRESS_LENGTH: usize = 5;

/// A form value that failed client-side validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email and password are required")]
    MissingCredentials,

    #[error("All fields are required")]
    MissingFields,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("Price must be greater than zero")]
    NonPositivePrice,

    #[error("Stock quantity cannot be negative")]
    NegativeStock,

    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    #[error("Only {available} in stock")]
    ExceedsStock { available: u32 },

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Delivery address must be at least 5 characters")]
    AddressTooShort,

    #[error("Nothing to update")]
    EmptyUpdate,

    #[error("Invalid id '{0}'")]
    InvalidId(String),

    #[error("Order cannot be cancelled once it is {0}")]
    NotCancellable(crate::types::OrderStatus),
}

/// Check the login form and parse the email.
///
/// # Errors
///
/// [`ValidationError::MissingCredentials`] when either field is blank,
/// [`ValidationError::InvalidEmail`] when the address does not parse.
pub fn validate_login(email: &str, password: &str) -> Result<Email, ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(Email::parse(email)?)
}

/// The sign-up form as the user filled it in.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub confirm_password: &'a str,
}

impl RegistrationForm<'_> {
    /// Validate in the order the sign-up page reported problems.
    ///
    /// # Errors
    ///
    /// The first failing rule: missing fields, password mismatch, short
    /// password, name length, then email syntax.
    pub fn validate(&self) -> Result<Email, ValidationError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ValidationError::PasswordTooShort);
        }
        validate_length("Name", self.name.trim(), NAME_LENGTH)?;
        Ok(Email::parse(self.email)?)
    }
}

/// Check that a trimmed text field falls within `(min, max)` characters.
///
/// # Errors
///
/// [`ValidationError::Length`] naming the field.
pub fn validate_length(
    field: &'static str,
    value: &str,
    (min, max): (usize, usize),
) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < min || len > max {
        return Err(ValidationError::Length { field, min, max });
    }
    Ok(())
}

/// # Errors
///
/// [`ValidationError::NonPositivePrice`] for zero or negative prices.
pub fn validate_price(price: Decimal) -> Result<(), ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice);
    }
    Ok(())
}

/// # Errors
///
/// [`ValidationError::NegativeStock`] for negative stock counts.
pub const fn validate_stock(quantity: i64) -> Result<(), ValidationError> {
    if quantity < 0 {
        return Err(ValidationError::NegativeStock);
    }
    Ok(())
}

/// # Errors
///
/// [`ValidationError::AddressTooShort`] when the trimmed address is under
/// [`MIN_ADDRESS_LENGTH`] characters.
pub fn validate_delivery_address(address: &str) -> Result<(), ValidationError> {
    if address.trim().chars().count() < MIN_ADDRESS_LENGTH {
        return Err(ValidationError::AddressTooShort);
    }
    Ok(())
}
