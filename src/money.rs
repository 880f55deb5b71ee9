//! Money
//!
//! Helpers for moving between whole currency units (how the storefront quotes prices) and the
//! minor units every [`Money`] value is stored in, plus the whole-unit display format used on
//! the promotions page.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};

/// Minor units per whole unit. Every currency the catalog accepts has two decimal places.
pub const MINOR_PER_MAJOR: i64 = 100;

/// Build a money value from a whole-unit amount.
///
/// Returns `None` if the amount does not fit in minor units.
pub fn from_whole_units(units: i64, currency: &Currency) -> Option<Money<'_, Currency>> {
    units
        .checked_mul(MINOR_PER_MAJOR)
        .map(|minor| Money::from_minor(minor, currency))
}

/// Round a money value to whole units, half away from zero.
pub fn round_to_whole_units(money: &Money<'_, Currency>) -> Decimal {
    money
        .amount()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a money value as a whole-unit amount with `.` thousands grouping, e.g. `$75.000`.
pub fn format_amount(money: &Money<'_, Currency>) -> String {
    let units = round_to_whole_units(money);
    let sign = if units < Decimal::ZERO { "-" } else { "" };
    let symbol = match money.currency().iso_alpha_code {
        "ARS" | "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        _ => "",
    };

    let grouped = group_thousands(&units.abs().trunc().to_string());

    if symbol.is_empty() {
        format!("{sign}{grouped} {}", money.currency().iso_alpha_code)
    } else {
        format!("{sign}{symbol}{grouped}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx).is_multiple_of(3) {
            grouped.push('.');
        }

        grouped.push(digit);
    }

    grouped
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{ARS, CHF, EUR};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn from_whole_units_scales_to_minor_units() -> TestResult {
        let money = from_whole_units(25_800, ARS).ok_or("overflow")?;

        assert_eq!(money.to_minor_units(), 2_580_000);

        Ok(())
    }

    #[test]
    fn from_whole_units_rejects_overflow() {
        assert!(from_whole_units(i64::MAX, ARS).is_none());
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(
            round_to_whole_units(&Money::from_minor(5_625_075, ARS)),
            Decimal::from(56_251)
        );
        assert_eq!(
            round_to_whole_units(&Money::from_minor(5_625_049, ARS)),
            Decimal::from(56_250)
        );
        assert_eq!(
            round_to_whole_units(&Money::from_minor(5_625_050, ARS)),
            Decimal::from(56_251)
        );
        assert_eq!(
            round_to_whole_units(&Money::from_minor(-150, ARS)),
            Decimal::from(-2)
        );
    }

    #[test]
    fn small_negative_amounts_round_to_unsigned_zero() {
        assert_eq!(format_amount(&Money::from_minor(-49, ARS)), "$0");
        assert_eq!(format_amount(&Money::from_minor(-50, ARS)), "-$1");
    }

    #[test]
    fn formats_with_thousands_separator() {
        assert_eq!(format_amount(&Money::from_minor(7_500_000, ARS)), "$75.000");
        assert_eq!(format_amount(&Money::from_minor(123_456_789_00, ARS)), "$123.456.789");
        assert_eq!(format_amount(&Money::from_minor(99_900, EUR)), "€999");
    }

    #[test]
    fn formats_zero_and_negative_amounts() {
        assert_eq!(format_amount(&Money::from_minor(0, ARS)), "$0");
        assert_eq!(format_amount(&Money::from_minor(-1_050_000, ARS)), "-$10.500");
    }

    #[test]
    fn formats_unknown_symbol_with_code() {
        assert_eq!(format_amount(&Money::from_minor(150_000, CHF)), "1.500 CHF");
    }
}
