//! Coupon commands.

use rust_decimal::Decimal;
use stylehub_client::{ApiClient, ApiError};
use stylehub_core::{Coupon, DiscountType, format_won};

use super::emit;

fn describe(coupon: &Coupon) -> String {
    let value = match coupon.discount_type {
        DiscountType::Percentage => {
            let cap = coupon
                .max_discount_amount
                .map(|max| format!(", up to {}", format_won(max)))
                .unwrap_or_default();
            format!("{}%{cap}", coupon.discount_value)
        }
        DiscountType::Fixed => format_won(coupon.discount_value),
    };
    format!(
        "{:>6}  {}  {value} off orders from {}  until {}  [{:?}]",
        coupon.id,
        coupon.coupon_name,
        format_won(coupon.min_order_amount),
        coupon.expiry_date.format("%Y-%m-%d"),
        coupon.status
    )
}

/// List the shopper's coupons.
pub async fn list(api: &ApiClient, available_only: bool) -> Result<(), ApiError> {
    let coupons = if available_only {
        api.available_coupons().await?
    } else {
        api.coupons().await?
    };

    if coupons.is_empty() {
        emit("No coupons");
    }
    for coupon in &coupons {
        emit(describe(coupon));
    }
    Ok(())
}

/// Show the best discount available on an order of `price`.
pub async fn discount(api: &ApiClient, price: Decimal) -> Result<(), ApiError> {
    let now = chrono::Local::now().naive_local();
    match api.best_available_coupon(price, now).await? {
        Some((coupon, discount)) => {
            emit(format_args!("Best coupon: {}", describe(&coupon)));
            emit(format_args!(
                "{} - {} = {}",
                format_won(price),
                format_won(discount),
                format_won(price - discount)
            ));
        }
        None => emit(format_args!("No coupon applies to {}", format_won(price))),
    }
    Ok(())
}
