//! # Validation Module
//!
//! Input validation utilities for the Styler backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (apps/api)                                   │
//! │  └── JSON shape, types, numeric parsing                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── required fields, email shape                                      │
//! │  └── price / quantity / amount invariants                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL, UNIQUE(email), UNIQUE(order_id)                         │
//! │  └── CHECK(price > 0), CHECK(quantity >= 1)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewUser, OrderItem, ShippingAddress};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Returns the trimmed value, or `Required` when absent or blank.
pub fn require(field: &str, value: Option<&str>) -> ValidationResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::Required {
            field: field.to_string(),
        }),
    }
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be blank
/// - Must have a non-empty local part and domain around a single `@`
///
/// ## Example
/// ```rust
/// use styler_core::validation::validate_email;
///
/// assert_eq!(validate_email(" a@x.com ").unwrap(), "a@x.com");
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = require("email", Some(email))?;

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email)
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected name@domain".to_string(),
        }),
    }
}

/// Splits a display name on the first whitespace run.
///
/// ```rust
/// use styler_core::validation::split_full_name;
///
/// assert_eq!(split_full_name("  Asha  Rao Kumar "), ("Asha".to_string(), "Rao Kumar".to_string()));
/// assert_eq!(split_full_name("Asha"), ("Asha".to_string(), String::new()));
/// ```
pub fn split_full_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim_start().to_string()),
        None => (name.to_string(), String::new()),
    }
}

/// Builds a [`NewUser`] from registration input.
///
/// All four fields are required together; the error names them as a group
/// so the client sees one message instead of the first missing field.
pub fn validate_registration(
    email: Option<&str>,
    password: Option<&str>,
    name: Option<&str>,
    phone: Option<&str>,
) -> ValidationResult<NewUser> {
    let all_present = [email, password, name, phone]
        .iter()
        .all(|v| v.is_some_and(|s| !s.trim().is_empty()));

    if !all_present {
        return Err(ValidationError::RequiredAll {
            fields: "Name, email, password, and phone".to_string(),
        });
    }

    let email = validate_email(email.unwrap_or_default())?;
    let (first_name, last_name) = split_full_name(name.unwrap_or_default());

    Ok(NewUser {
        email,
        // Passwords are opaque: no trimming.
        password: password.unwrap_or_default().to_string(),
        first_name,
        last_name,
        phone: phone.map(|p| p.trim().to_string()),
    })
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a monetary amount that may be zero but not negative.
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an order line.
///
/// ## Rules
/// - `price > 0`
/// - `quantity >= 1`
///
/// The product name is descriptive only and may be empty.
pub fn validate_order_item(item: &OrderItem) -> ValidationResult<()> {
    if !item.price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if item.quantity < 1 {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a shipping address. Only the first street line is mandatory.
pub fn validate_address(address: &ShippingAddress) -> ValidationResult<()> {
    require("addressLine1", Some(&address.address_line_1))?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert_eq!(require("email", Some("  x ")).unwrap(), "x");
        assert!(require("email", Some("   ")).is_err());
        assert!(require("email", None).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_registration_requires_all_fields() {
        let err = validate_registration(Some("a@x.com"), Some("pw123456"), Some("Asha"), None)
            .unwrap_err();
        assert_eq!(err.to_string(), "Name, email, password, and phone are required");

        let err = validate_registration(Some("a@x.com"), Some("pw"), Some("  "), Some("1"))
            .unwrap_err();
        assert!(matches!(err, ValidationError::RequiredAll { .. }));
    }

    #[test]
    fn test_registration_splits_name() {
        let user = validate_registration(
            Some("a@x.com"),
            Some(" pw123456 "),
            Some("Asha Rao"),
            Some("9876543210"),
        )
        .unwrap();
        assert_eq!(user.first_name, "Asha");
        assert_eq!(user.last_name, "Rao");
        assert_eq!(user.password, " pw123456 ");
        assert_eq!(user.phone.as_deref(), Some("9876543210"));
    }

    #[test]
    fn test_order_item_rules() {
        let good = OrderItem {
            product_id: 1,
            product_name: "Scarf".to_string(),
            price: Money::from_cents(1),
            quantity: 1,
            ..OrderItem::default()
        };
        assert!(validate_order_item(&good).is_ok());

        let free = OrderItem {
            price: Money::zero(),
            ..good.clone()
        };
        assert!(matches!(
            validate_order_item(&free),
            Err(ValidationError::MustBePositive { .. })
        ));

        let none = OrderItem {
            quantity: 0,
            ..good.clone()
        };
        assert!(matches!(
            validate_order_item(&none),
            Err(ValidationError::OutOfRange { .. })
        ));

        let unnamed = OrderItem {
            product_name: String::new(),
            ..good
        };
        assert!(validate_order_item(&unnamed).is_ok());
    }

    #[test]
    fn test_non_negative() {
        assert!(validate_non_negative("taxAmount", Money::zero()).is_ok());
        assert!(validate_non_negative("taxAmount", Money::from_cents(-1)).is_err());
    }
}
