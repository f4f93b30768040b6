//! Cart type conversion functions.

use crate::shopify::types::{Cart, CartUserError};
use waxworks_core::CartId;

use super::super::queries::fragments::{CartSummaryFields, UserErrorFields};

/// Convert the cart summary returned by every cart operation.
pub fn convert_cart(cart: CartSummaryFields) -> Cart {
    Cart {
        id: CartId::new(cart.id),
        checkout_url: cart.checkout_url,
        total_quantity: cart.total_quantity,
    }
}

pub fn convert_user_error(error: UserErrorFields) -> CartUserError {
    CartUserError {
        code: error.code,
        field: error.field,
        message: error.message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_cart() {
        let cart = convert_cart(CartSummaryFields {
            id: "gid://shopify/Cart/c1-abc?key=def".to_string(),
            checkout_url: "https://shop.example/cart/c/c1-abc".to_string(),
            total_quantity: 3,
        });
        assert_eq!(cart.id.as_str(), "gid://shopify/Cart/c1-abc?key=def");
        assert_eq!(cart.total_quantity, 3);
    }

    #[test]
    fn test_convert_user_error_keeps_field_path() {
        let error = convert_user_error(UserErrorFields {
            code: Some("INVALID".to_string()),
            field: Some(vec!["lines".to_string(), "0".to_string(), "quantity".to_string()]),
            message: "Quantity is invalid".to_string(),
        });
        assert_eq!(error.field.as_deref().map(<[String]>::len), Some(3));
        assert_eq!(error.code.as_deref(), Some("INVALID"));
    }
}
