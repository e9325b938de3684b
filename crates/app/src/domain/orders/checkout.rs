//! Checkout field validation.
//!
//! Checkout has its own, stricter validation than ordinary cart mutation, so
//! the two are separate named operations instead of one mode-switched path.
//! Every violation is collected; a rejection always names all bad fields.

use std::collections::HashMap;

use crate::domain::{orders::models::OrderItem, products::models::ProductUuid};

/// Message for a quantity that the product's stock cannot cover.
pub const OUT_OF_STOCK_MESSAGE: &str = "order exceeds inventory in stock";

/// Message for a checkout attempt on an empty cart.
pub const EMPTY_CART_MESSAGE: &str = "There are no items in your cart!";

const BLANK_MESSAGE: &str = "can't be blank";
const NOT_A_NUMBER_MESSAGE: &str = "is not a number";
const CARD_TOO_SHORT_MESSAGE: &str = "is too short (minimum is 4 characters)";

/// Contact and payment data supplied at checkout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutFields {
    pub email: String,
    pub address: String,
    pub cc_name: String,
    pub cc_num: String,
    pub cvv: String,
    pub cc_exp: String,
    pub zip: String,
}

/// Field a validation error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutField {
    Items,
    Email,
    Address,
    CcName,
    CcNum,
    Cvv,
    CcExp,
    Zip,
    Quantity,
}

impl CheckoutField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Email => "email",
            Self::Address => "address",
            Self::CcName => "cc_name",
            Self::CcNum => "cc_num",
            Self::Cvv => "cvv",
            Self::CcExp => "cc_exp",
            Self::Zip => "zip",
            Self::Quantity => "quantity",
        }
    }
}

/// One field-level validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: CheckoutField,
    pub message: String,
}

/// The full set of violations that blocked an operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutRejection {
    pub errors: Vec<FieldError>,
}

impl CheckoutRejection {
    fn add(&mut self, field: CheckoutField, message: &str) {
        self.errors.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when some error is attached to the given field.
    #[must_use]
    pub fn has_field(&self, field: CheckoutField) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for CheckoutRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;

        for error in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", error.field.as_str(), error.message)?;
            first = false;
        }

        Ok(())
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Validate a quantity against a product's current stock, for cart mutation
/// (adding an item or changing its quantity).
///
/// # Errors
///
/// Returns the collected field errors when the quantity is zero or exceeds
/// the available stock.
pub fn validate_item_quantity(quantity: u64, stock: u64) -> Result<(), CheckoutRejection> {
    let mut rejection = CheckoutRejection::default();

    if quantity == 0 {
        rejection.add(CheckoutField::Quantity, "must be greater than 0");
    } else if quantity > stock {
        rejection.add(CheckoutField::Quantity, OUT_OF_STOCK_MESSAGE);
    }

    rejection.into_result()
}

/// Validate an order for checkout: a non-empty cart, presence and shape of
/// the contact/payment fields, and every item quantity against the stock
/// carried on the item.
///
/// # Errors
///
/// Returns the collected field errors; the order must not transition.
pub fn validate_for_checkout(
    fields: &CheckoutFields,
    items: &[OrderItem],
) -> Result<(), CheckoutRejection> {
    let mut rejection = CheckoutRejection::default();

    if items.is_empty() {
        rejection.add(CheckoutField::Items, EMPTY_CART_MESSAGE);
    }

    if fields.email.trim().is_empty() {
        rejection.add(CheckoutField::Email, BLANK_MESSAGE);
    }

    if fields.address.trim().is_empty() {
        rejection.add(CheckoutField::Address, BLANK_MESSAGE);
    }

    if fields.cc_name.trim().is_empty() {
        rejection.add(CheckoutField::CcName, BLANK_MESSAGE);
    }

    if fields.cc_num.trim().is_empty() {
        rejection.add(CheckoutField::CcNum, BLANK_MESSAGE);
    } else if !is_digits(&fields.cc_num) {
        rejection.add(CheckoutField::CcNum, NOT_A_NUMBER_MESSAGE);
    } else if fields.cc_num.len() < 4 {
        rejection.add(CheckoutField::CcNum, CARD_TOO_SHORT_MESSAGE);
    }

    if fields.cvv.trim().is_empty() {
        rejection.add(CheckoutField::Cvv, BLANK_MESSAGE);
    } else if !is_digits(&fields.cvv) {
        rejection.add(CheckoutField::Cvv, NOT_A_NUMBER_MESSAGE);
    }

    if fields.cc_exp.trim().is_empty() {
        rejection.add(CheckoutField::CcExp, BLANK_MESSAGE);
    }

    if fields.zip.trim().is_empty() {
        rejection.add(CheckoutField::Zip, BLANK_MESSAGE);
    } else if !is_digits(&fields.zip) {
        rejection.add(CheckoutField::Zip, NOT_A_NUMBER_MESSAGE);
    }

    // Quantities are summed per product before comparing against stock, so
    // two items of the same product cannot pass individually and overdraw
    // together.
    let mut required: HashMap<ProductUuid, u64> = HashMap::new();

    for item in items {
        *required.entry(item.product_uuid).or_default() += item.quantity;
    }

    for item in items {
        let needed = required.get(&item.product_uuid).copied().unwrap_or(0);

        if needed > item.stock {
            rejection.add(CheckoutField::Quantity, OUT_OF_STOCK_MESSAGE);
        }
    }

    rejection.into_result()
}
