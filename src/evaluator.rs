//! Promotion Evaluator
//!
//! A pure function from a validated [`CalculationInput`] and the selected product's label to a
//! [`CalculationResult`]. Promotions that do not apply (wrong product, too few units, subtotal
//! under the threshold) are ordinary zero-discount results carrying a [`PromotionOutcome`]
//! that explains why; the only error is money arithmetic that cannot be represented.

use std::fmt;

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::trace;

use crate::{
    catalog::product_name,
    discounts::{DiscountError, percent_of, times},
    money::{format_amount, from_whole_units},
    promotions::{
        BUY_TWO_GET_ONE_MIN_QUANTITY, BUY_TWO_GET_ONE_PRODUCT, PromotionKind,
        THRESHOLD_BONUS_MIN_SPEND, first_purchase_rate, threshold_bonus_rate,
    },
};

/// Errors raised while evaluating a promotion.
#[derive(Debug, Error, PartialEq)]
pub enum EvaluationError {
    /// The threshold could not be expressed in the price's currency.
    #[error("threshold overflows the minor-unit range")]
    ThresholdOverflow,

    /// Discount arithmetic failed.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A complete set of inputs: a positive unit price and a positive quantity.
///
/// Anything else is an incomplete form and never reaches the evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationInput<'a> {
    kind: PromotionKind,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CalculationInput<'a> {
    /// Validate the inputs. Returns `None` when the unit price is not positive or the
    /// quantity is zero.
    pub fn new(
        kind: PromotionKind,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Option<Self> {
        (unit_price.to_minor_units() > 0 && quantity > 0).then_some(Self {
            kind,
            unit_price,
            quantity,
        })
    }
}

/// Why a promotion did or did not grant a discount.
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionOutcome<'a> {
    /// The subtotal exceeded the threshold.
    ThresholdReached {
        /// Product name, without the price suffix
        product: String,
        /// Spend threshold
        threshold: Money<'a, Currency>,
    },

    /// The subtotal did not exceed the threshold.
    ThresholdShortfall {
        /// Amount still needed to reach the threshold
        remaining: Money<'a, Currency>,
    },

    /// First purchase discount applied.
    FirstPurchase {
        /// Product name, without the price suffix
        product: String,
    },

    /// Units granted free by the 2x1.
    FreeUnits {
        /// Number of free units
        free_units: u32,
    },

    /// The qualifying product was selected, but not enough of it.
    BelowMinimumQuantity {
        /// Units required
        required: u32,
    },

    /// The 2x1 does not apply to the selected product.
    NotApplicable,
}

impl fmt::Display for PromotionOutcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionOutcome::ThresholdReached { product, threshold } => write!(
                f,
                "¡Felicidades! Tu compra total de {product} superó los {} y ganaste un 25% extra.",
                format_amount(threshold)
            ),
            PromotionOutcome::ThresholdShortfall { remaining } => write!(
                f,
                "Te faltan {} para ganar el 25% OFF.",
                format_amount(remaining)
            ),
            PromotionOutcome::FirstPurchase { product } => write!(
                f,
                "¡Disfruta de tu 15% de descuento en el/los {product} por ser nuevo cliente!"
            ),
            PromotionOutcome::FreeUnits { free_units } => write!(
                f,
                "¡Tu ahorro es equivalente a {free_units} Bowl(s) Mamushka gratis!"
            ),
            PromotionOutcome::BelowMinimumQuantity { required } => write!(
                f,
                "Necesitas {required} Bowls para aplicar esta oferta 2x1."
            ),
            PromotionOutcome::NotApplicable => write!(
                f,
                "Esta promoción 2x1 solo es válida para los {BUY_TWO_GET_ONE_PRODUCT}."
            ),
        }
    }
}

/// Subtotal, discount and total for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult<'a> {
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    outcome: PromotionOutcome<'a>,
}

impl<'a> CalculationResult<'a> {
    /// Return the pre-discount subtotal.
    pub fn subtotal(&self) -> &Money<'a, Currency> {
        &self.subtotal
    }

    /// Return the discount amount.
    pub fn discount(&self) -> &Money<'a, Currency> {
        &self.discount
    }

    /// Return the final total.
    pub fn total(&self) -> &Money<'a, Currency> {
        &self.total
    }

    /// Return the outcome.
    pub fn outcome(&self) -> &PromotionOutcome<'a> {
        &self.outcome
    }

    /// Return the human-readable message for the outcome.
    pub fn message(&self) -> String {
        self.outcome.to_string()
    }

    /// Return whether any discount was granted.
    pub fn has_discount(&self) -> bool {
        self.discount.to_minor_units() > 0
    }
}

/// Evaluate a promotion for the selected product.
///
/// `product_label` may be a full catalog label; any parenthesised price suffix is ignored when
/// checking which product was chosen.
///
/// # Errors
///
/// - [`EvaluationError::Discount`]: the subtotal or a percentage overflowed minor units.
/// - [`EvaluationError::ThresholdOverflow`]: the threshold could not be represented.
/// - [`EvaluationError::Money`]: wrapped money arithmetic error.
pub fn evaluate<'a>(
    input: &CalculationInput<'a>,
    product_label: &str,
) -> Result<CalculationResult<'a>, EvaluationError> {
    let currency = input.unit_price.currency();
    let product = product_name(product_label);
    let subtotal = times(&input.unit_price, input.quantity)?;
    let zero = Money::from_minor(0, currency);

    let (discount, outcome) = match input.kind {
        PromotionKind::ThresholdBonus => {
            let threshold = from_whole_units(THRESHOLD_BONUS_MIN_SPEND, currency)
                .ok_or(EvaluationError::ThresholdOverflow)?;

            if subtotal.to_minor_units() > threshold.to_minor_units() {
                (
                    percent_of(&subtotal, &threshold_bonus_rate())?,
                    PromotionOutcome::ThresholdReached {
                        product: product.to_string(),
                        threshold,
                    },
                )
            } else {
                (
                    zero,
                    PromotionOutcome::ThresholdShortfall {
                        remaining: threshold.sub(subtotal)?,
                    },
                )
            }
        }
        PromotionKind::FirstPurchase => (
            percent_of(&subtotal, &first_purchase_rate())?,
            PromotionOutcome::FirstPurchase {
                product: product.to_string(),
            },
        ),
        PromotionKind::BuyTwoGetOneBowl => {
            if !product.contains(BUY_TWO_GET_ONE_PRODUCT) {
                (zero, PromotionOutcome::NotApplicable)
            } else if input.quantity < BUY_TWO_GET_ONE_MIN_QUANTITY {
                (
                    zero,
                    PromotionOutcome::BelowMinimumQuantity {
                        required: BUY_TWO_GET_ONE_MIN_QUANTITY,
                    },
                )
            } else {
                let free_units = input.quantity / BUY_TWO_GET_ONE_MIN_QUANTITY;

                (
                    times(&input.unit_price, free_units)?,
                    PromotionOutcome::FreeUnits { free_units },
                )
            }
        }
    };

    let total = subtotal.sub(discount)?;

    trace!(
        promotion = %input.kind,
        product,
        quantity = input.quantity,
        subtotal = subtotal.to_minor_units(),
        discount = discount.to_minor_units(),
        "evaluated promotion"
    );

    Ok(CalculationResult {
        subtotal,
        discount,
        total,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::ARS;
    use testresult::TestResult;

    use crate::money::MINOR_PER_MAJOR;

    use super::*;

    fn ars(units: i64) -> Money<'static, Currency> {
        Money::from_minor(units * MINOR_PER_MAJOR, ARS)
    }

    fn input(
        kind: PromotionKind,
        unit_price: i64,
        quantity: u32,
    ) -> TestResult<CalculationInput<'static>> {
        Ok(CalculationInput::new(kind, ars(unit_price), quantity).ok_or("incomplete input")?)
    }

    #[test]
    fn new_rejects_zero_quantity_and_price() {
        assert!(CalculationInput::new(PromotionKind::FirstPurchase, ars(100), 0).is_none());
        assert!(CalculationInput::new(PromotionKind::FirstPurchase, ars(0), 1).is_none());
        assert!(CalculationInput::new(PromotionKind::FirstPurchase, ars(-5), 1).is_none());
    }

    #[test]
    fn threshold_bonus_at_exact_threshold_grants_nothing() -> TestResult {
        let result = evaluate(&input(PromotionKind::ThresholdBonus, 75_000, 1)?, "Manta")?;

        assert_eq!(result.discount(), &ars(0));
        assert_eq!(result.total(), &ars(75_000));
        assert_eq!(
            result.outcome(),
            &PromotionOutcome::ThresholdShortfall { remaining: ars(0) }
        );

        Ok(())
    }

    #[test]
    fn threshold_bonus_above_threshold_takes_a_quarter_off() -> TestResult {
        let result = evaluate(&input(PromotionKind::ThresholdBonus, 75_001, 1)?, "Manta")?;

        assert_eq!(result.discount(), &Money::from_minor(1_875_025, ARS));
        assert_eq!(result.total(), &Money::from_minor(5_625_075, ARS));
        assert!(result.has_discount());

        Ok(())
    }

    #[test]
    fn threshold_bonus_reports_remaining_amount() -> TestResult {
        let result = evaluate(
            &input(PromotionKind::ThresholdBonus, 15_500, 2)?,
            "Florero Pop Amarillo ($15.500)",
        )?;

        assert_eq!(result.message(), "Te faltan $44.000 para ganar el 25% OFF.");

        Ok(())
    }

    #[test]
    fn threshold_bonus_success_message_names_product() -> TestResult {
        let result = evaluate(
            &input(PromotionKind::ThresholdBonus, 45_000, 2)?,
            "Manta de Algodón ($45.000)",
        )?;

        assert_eq!(result.discount(), &ars(22_500));
        assert_eq!(
            result.message(),
            "¡Felicidades! Tu compra total de Manta de Algodón superó los $75.000 y ganaste un 25% extra."
        );

        Ok(())
    }

    #[test]
    fn first_purchase_takes_fifteen_percent() -> TestResult {
        let result = evaluate(
            &input(PromotionKind::FirstPurchase, 28_900, 3)?,
            "Lámpara de Escritorio ($28.900)",
        )?;

        assert_eq!(result.subtotal(), &ars(86_700));
        assert_eq!(result.discount(), &ars(13_005));
        assert_eq!(result.total(), &ars(73_695));
        assert_eq!(
            result.message(),
            "¡Disfruta de tu 15% de descuento en el/los Lámpara de Escritorio por ser nuevo cliente!"
        );

        Ok(())
    }

    #[test]
    fn buy_two_get_one_needs_two_units() -> TestResult {
        let result = evaluate(
            &input(PromotionKind::BuyTwoGetOneBowl, 25_800, 1)?,
            "Bowls Mamushka ($25.800)",
        )?;

        assert_eq!(result.discount(), &ars(0));
        assert_eq!(
            result.outcome(),
            &PromotionOutcome::BelowMinimumQuantity { required: 2 }
        );
        assert_eq!(
            result.message(),
            "Necesitas 2 Bowls para aplicar esta oferta 2x1."
        );

        Ok(())
    }

    #[test]
    fn buy_two_get_one_grants_one_free_unit_per_pair() -> TestResult {
        let three = evaluate(
            &input(PromotionKind::BuyTwoGetOneBowl, 25_800, 3)?,
            "Bowls Mamushka ($25.800)",
        )?;

        assert_eq!(three.outcome(), &PromotionOutcome::FreeUnits { free_units: 1 });
        assert_eq!(three.discount(), &ars(25_800));
        assert_eq!(three.total(), &ars(51_600));

        let four = evaluate(
            &input(PromotionKind::BuyTwoGetOneBowl, 25_800, 4)?,
            "Bowls Mamushka ($25.800)",
        )?;

        assert_eq!(four.outcome(), &PromotionOutcome::FreeUnits { free_units: 2 });
        assert_eq!(four.discount(), &ars(51_600));
        assert_eq!(
            four.message(),
            "¡Tu ahorro es equivalente a 2 Bowl(s) Mamushka gratis!"
        );

        Ok(())
    }

    #[test]
    fn buy_two_get_one_rejects_other_products() -> TestResult {
        let result = evaluate(
            &input(PromotionKind::BuyTwoGetOneBowl, 10_500, 6)?,
            "Servilletas de lino ($10.500)",
        )?;

        assert_eq!(result.discount(), &ars(0));
        assert_eq!(result.total(), &ars(63_000));
        assert_eq!(result.outcome(), &PromotionOutcome::NotApplicable);
        assert!(!result.has_discount());

        Ok(())
    }

    #[test]
    fn evaluation_is_idempotent() -> TestResult {
        let input = input(PromotionKind::FirstPurchase, 15_500, 7)?;

        assert_eq!(
            evaluate(&input, "Florero Pop Amarillo ($15.500)")?,
            evaluate(&input, "Florero Pop Amarillo ($15.500)")?
        );

        Ok(())
    }

    #[test]
    fn subtotal_overflow_is_an_error() -> TestResult {
        let input = CalculationInput::new(
            PromotionKind::FirstPurchase,
            Money::from_minor(i64::MAX / 2, ARS),
            3,
        )
        .ok_or("incomplete input")?;

        assert!(matches!(
            evaluate(&input, "Manta"),
            Err(EvaluationError::Discount(DiscountError::QuantityOverflow { .. }))
        ));

        Ok(())
    }
}
