//! Status enums for storefront entities.
//!
//! All values travel as `SCREAMING_SNAKE_CASE` strings, matching the
//! backend's enum names.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Paid,
    Shipping,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether a cancel claim may be filed (not yet shipped).
    #[must_use]
    pub const fn is_cancellable(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Paid)
    }

    /// Whether a return claim may be filed (already delivered).
    #[must_use]
    pub const fn is_returnable(self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Kind of claim filed against an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimType {
    /// Cancellation before shipping.
    Cancel,
    /// Return after delivery.
    Return,
}

/// Claim processing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    #[default]
    Received,
    Processing,
    /// Return pickup in progress (returns only).
    Pickup,
    /// Return picked up (returns only).
    PickedUp,
    Completed,
    Rejected,
}

impl ClaimStatus {
    /// Whether the claim has reached a final state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }
}

/// Coupon availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CouponStatus {
    #[default]
    Available,
    Used,
    Expired,
}

/// How a coupon's `discountValue` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// `discountValue` is a percentage of the order amount.
    Percentage,
    /// `discountValue` is a fixed won amount.
    Fixed,
}

/// Customer inquiry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryStatus {
    #[default]
    Pending,
    Answered,
    Closed,
}

/// Customer inquiry topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryCategory {
    Product,
    Delivery,
    ExchangeReturn,
    Payment,
    Other,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&ClaimStatus::PickedUp).unwrap(),
            "\"PICKED_UP\""
        );
        assert_eq!(
            serde_json::from_str::<InquiryCategory>("\"EXCHANGE_RETURN\"").unwrap(),
            InquiryCategory::ExchangeReturn
        );
        assert_eq!(
            serde_json::from_str::<DiscountType>("\"PERCENTAGE\"").unwrap(),
            DiscountType::Percentage
        );
    }

    #[test]
    fn test_order_claim_eligibility() {
        assert!(OrderStatus::Paid.is_cancellable());
        assert!(!OrderStatus::Shipping.is_cancellable());
        assert!(OrderStatus::Delivered.is_returnable());
        assert!(!OrderStatus::Cancelled.is_returnable());
    }

    #[test]
    fn test_claim_terminal_states() {
        assert!(ClaimStatus::Completed.is_terminal());
        assert!(ClaimStatus::Rejected.is_terminal());
        assert!(!ClaimStatus::Pickup.is_terminal());
    }
}
