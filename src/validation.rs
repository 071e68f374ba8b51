//! Input validation helpers shared by the service layer.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap()
});

/// Moroccan phone numbers: exactly ten digits.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{10}$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_positive_price(price: Decimal) -> bool {
    price > Decimal::ZERO
}
