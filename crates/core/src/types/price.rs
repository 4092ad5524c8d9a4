//! Won amount formatting.
//!
//! Storefront prices are whole Korean won carried as [`Decimal`] so that
//! percentage discounts are computed without float rounding.

use rust_decimal::Decimal;

/// Format an amount as grouped won, e.g. `15,000원`.
///
/// Fractional won are truncated; negative amounts keep their sign.
///
/// ```
/// use rust_decimal::Decimal;
/// use stylehub_core::format_won;
///
/// assert_eq!(format_won(Decimal::new(1_234_567, 0)), "1,234,567원");
/// assert_eq!(format_won(Decimal::ZERO), "0원");
/// ```
#[must_use]
pub fn format_won(amount: Decimal) -> String {
    let whole = amount.trunc();
    let negative = whole.is_sign_negative() && !whole.is_zero();
    let digits = whole.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{grouped}원")
    } else {
        format!("{grouped}원")
    }
}
