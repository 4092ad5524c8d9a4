//! Coupons and the discount they grant at checkout.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::CouponId;
use super::status::{CouponStatus, DiscountType};

/// A coupon issued to the shopper (`GET /coupons`, `GET /coupons/available`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub coupon_name: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_order_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount_amount: Option<Decimal>,
    pub expiry_date: NaiveDateTime,
    pub status: CouponStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Coupon {
    /// Discount this coupon grants on an order of `price` won.
    ///
    /// - Orders below `min_order_amount` get no discount.
    /// - Percentage coupons take `floor(price * value / 100)`, capped by
    ///   `max_discount_amount` when one is set.
    /// - Fixed coupons take `discount_value` as-is; they are never capped by
    ///   `max_discount_amount`.
    ///
    /// The result never exceeds `price` and is never negative.
    ///
    /// ```
    /// # use rust_decimal::Decimal;
    /// # use stylehub_core::{Coupon, CouponId, CouponStatus, DiscountType};
    /// # let at = chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// let coupon = Coupon {
    ///     id: CouponId::new(1),
    ///     coupon_name: "15% off".into(),
    ///     discount_type: DiscountType::Percentage,
    ///     discount_value: Decimal::new(15, 0),
    ///     min_order_amount: Decimal::new(30_000, 0),
    ///     max_discount_amount: Some(Decimal::new(10_000, 0)),
    ///     expiry_date: at,
    ///     status: CouponStatus::Available,
    ///     description: None,
    ///     used_at: None,
    ///     created_at: at,
    /// };
    /// assert_eq!(coupon.discount_for(Decimal::new(100_000, 0)), Decimal::new(10_000, 0));
    /// assert_eq!(coupon.discount_for(Decimal::new(20_000, 0)), Decimal::ZERO);
    /// ```
    #[must_use]
    pub fn discount_for(&self, price: Decimal) -> Decimal {
        if price <= Decimal::ZERO || price < self.min_order_amount {
            return Decimal::ZERO;
        }

        let raw = match self.discount_type {
            DiscountType::Percentage => {
                let percent = (price * self.discount_value / Decimal::ONE_HUNDRED).floor();
                self.max_discount_amount
                    .map_or(percent, |cap| percent.min(cap))
            }
            DiscountType::Fixed => self.discount_value,
        };

        raw.max(Decimal::ZERO).min(price)
    }

    /// Whether the coupon can still be applied at `now`.
    #[must_use]
    pub fn is_usable_at(&self, now: NaiveDateTime) -> bool {
        self.status == CouponStatus::Available && now <= self.expiry_date
    }
}

/// The usable coupon granting the largest positive discount on `price`.
///
/// Ties keep the coupon listed first.
#[must_use]
pub fn best_coupon(coupons: &[Coupon], price: Decimal, now: NaiveDateTime) -> Option<&Coupon> {
    coupons
        .iter()
        .filter(|c| c.is_usable_at(now))
        .map(|c| (c, c.discount_for(price)))
        .filter(|(_, discount)| *discount > Decimal::ZERO)
        .fold(None, |best: Option<(&Coupon, Decimal)>, (c, discount)| match best {
            Some((_, best_discount)) if best_discount >= discount => best,
            _ => Some((c, discount)),
        })
        .map(|(c, _)| c)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn won(amount: i64) -> Decimal {
        Decimal::new(amount, 0)
    }

    fn coupon(
        id: i64,
        discount_type: DiscountType,
        value: i64,
        min: i64,
        max: Option<i64>,
    ) -> Coupon {
        Coupon {
            id: CouponId::new(id),
            coupon_name: format!("coupon-{id}"),
            discount_type,
            discount_value: won(value),
            min_order_amount: won(min),
            max_discount_amount: max.map(won),
            expiry_date: at(31),
            status: CouponStatus::Available,
            description: None,
            used_at: None,
            created_at: at(1),
        }
    }

    #[test]
    fn test_percentage_is_capped() {
        let c = coupon(1, DiscountType::Percentage, 15, 30_000, Some(10_000));
        assert_eq!(c.discount_for(won(100_000)), won(10_000));
    }

    #[test]
    fn test_percentage_below_cap() {
        let c = coupon(1, DiscountType::Percentage, 15, 30_000, Some(10_000));
        assert_eq!(c.discount_for(won(40_000)), won(6_000));
    }

    #[test]
    fn test_percentage_below_minimum_is_zero() {
        let c = coupon(1, DiscountType::Percentage, 15, 30_000, Some(10_000));
        assert_eq!(c.discount_for(won(20_000)), Decimal::ZERO);
    }

    #[test]
    fn test_percentage_floors_fractional_won() {
        let c = coupon(1, DiscountType::Percentage, 15, 0, None);
        assert_eq!(c.discount_for(won(33_333)), won(4_999));
    }

    #[test]
    fn test_fixed_is_not_capped() {
        let c = coupon(2, DiscountType::Fixed, 5_000, 50_000, Some(1_000));
        assert_eq!(c.discount_for(won(60_000)), won(5_000));
    }

    #[test]
    fn test_minimum_is_inclusive() {
        let c = coupon(2, DiscountType::Fixed, 5_000, 50_000, None);
        assert_eq!(c.discount_for(won(50_000)), won(5_000));
        assert_eq!(c.discount_for(won(49_999)), Decimal::ZERO);
    }

    #[test]
    fn test_fixed_never_exceeds_price() {
        let c = coupon(2, DiscountType::Fixed, 5_000, 0, None);
        assert_eq!(c.discount_for(won(3_000)), won(3_000));
    }

    #[test]
    fn test_usable_requires_available_and_unexpired() {
        let mut c = coupon(1, DiscountType::Fixed, 1_000, 0, None);
        assert!(c.is_usable_at(at(31)));
        assert!(!c.is_usable_at(at(31) + chrono::Duration::seconds(1)));
        c.status = CouponStatus::Used;
        assert!(!c.is_usable_at(at(2)));
    }

    #[test]
    fn test_best_coupon_picks_largest_usable_discount() {
        let mut expired = coupon(3, DiscountType::Fixed, 50_000, 0, None);
        expired.status = CouponStatus::Expired;
        let coupons = vec![
            coupon(1, DiscountType::Percentage, 15, 30_000, Some(10_000)),
            coupon(2, DiscountType::Fixed, 12_000, 50_000, None),
            expired,
        ];

        let best = best_coupon(&coupons, won(100_000), at(2)).unwrap();
        assert_eq!(best.id, CouponId::new(2));

        assert!(best_coupon(&coupons, won(10_000), at(2)).is_none());
    }

    #[test]
    fn test_wire_shape_accepts_numbers() {
        let c: Coupon = serde_json::from_value(serde_json::json!({
            "id": 1,
            "couponName": "신규가입 15%",
            "discountType": "PERCENTAGE",
            "discountValue": 15,
            "minOrderAmount": 30000,
            "maxDiscountAmount": 10000,
            "expiryDate": "2026-12-31T23:59:59",
            "status": "AVAILABLE",
            "createdAt": "2026-10-01T09:00:00"
        }))
        .unwrap();
        assert_eq!(c.max_discount_amount, Some(won(10_000)));
        assert_eq!(c.discount_for(won(100_000)), won(10_000));
    }
}
