//! Promotions
//!
//! The three storefront promotions. The set is closed: adding a rule means adding a variant
//! and handling it in [`crate::evaluator::evaluate`].

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use decimal_percentage::Percentage;
use thiserror::Error;

/// Whole-unit subtotal that must be exceeded for [`PromotionKind::ThresholdBonus`].
pub const THRESHOLD_BONUS_MIN_SPEND: i64 = 75_000;

/// Only products whose name contains this qualify for [`PromotionKind::BuyTwoGetOneBowl`].
pub const BUY_TWO_GET_ONE_PRODUCT: &str = "Bowls Mamushka";

/// Units needed before [`PromotionKind::BuyTwoGetOneBowl`] grants a free unit.
pub const BUY_TWO_GET_ONE_MIN_QUANTITY: u32 = 2;

/// Share of the subtotal taken off by [`PromotionKind::ThresholdBonus`].
pub fn threshold_bonus_rate() -> Percentage {
    Percentage::from(0.25)
}

/// Share of the subtotal taken off by [`PromotionKind::FirstPurchase`].
pub fn first_purchase_rate() -> Percentage {
    Percentage::from(0.15)
}

/// Unknown promotion name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown promotion: {0}")]
pub struct UnknownPromotion(pub String);

/// Promotion kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PromotionKind {
    /// 25% off when the subtotal exceeds $75.000
    #[value(alias = "monto75k")]
    ThresholdBonus,

    /// 15% off a first purchase
    #[value(alias = "primeracompra")]
    FirstPurchase,

    /// 2x1 on Bowls Mamushka
    #[value(alias = "bowls")]
    BuyTwoGetOneBowl,
}

impl PromotionKind {
    /// Every promotion, in the order they appear on the page.
    pub const ALL: [PromotionKind; 3] = [
        PromotionKind::ThresholdBonus,
        PromotionKind::FirstPurchase,
        PromotionKind::BuyTwoGetOneBowl,
    ];

    /// Headline shown above the promotion's form.
    pub fn title(self) -> &'static str {
        match self {
            PromotionKind::ThresholdBonus => "25% OFF en compras mayores a $75.000",
            PromotionKind::FirstPurchase => "15% de Descuento en tu primera compra",
            PromotionKind::BuyTwoGetOneBowl => "2x1 en los Bowls Mamushka",
        }
    }
}

impl fmt::Display for PromotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => write!(f, "{self:?}"),
        }
    }
}

impl FromStr for PromotionKind {
    type Err = UnknownPromotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s.trim(), true)
            .map_err(|_err| UnknownPromotion(s.trim().to_string()))
    }
}
