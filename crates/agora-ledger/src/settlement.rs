//! Pure settlement math for resolved decisions.
//!
//! | Outcome | Balance delta | Prosperity delta |
//! |---------|---------------|------------------|
//! | accepted, die >= 5 | `reward - cost * 0.5` | `prosperity * 1.5` |
//! | accepted, die 4 | `reward - cost` | `prosperity` |
//! | rejected | `-(cost * 0.3)` | `prosperity * 0.5` if negative, else 0 |
//!
//! "prosperity" here is the rule's base value, never the society's
//! current prosperity.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::rules::EconomyRule;

/// Lowest die face counted as a strong acceptance (halved cost).
pub const STRONG_ACCEPTANCE_DICE: u8 = 5;

/// Upper bound of society prosperity.
pub const MAX_PROSPERITY: Decimal = Decimal::ONE_HUNDRED;

/// Unclamped deltas produced by one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Signed change to the agent's balance.
    pub balance_delta: Decimal,
    /// Signed change to the society's prosperity.
    pub prosperity_delta: Decimal,
}

/// Compute the deltas for a decision settled under `rule`.
pub fn settle(rule: &EconomyRule, accepted: bool, dice: u8) -> Settlement {
    let half = Decimal::new(5, 1);
    if accepted {
        let strong = dice >= STRONG_ACCEPTANCE_DICE;
        let cost = if strong {
            rule.cost.saturating_mul(half)
        } else {
            rule.cost
        };
        let multiplier = if strong {
            Decimal::new(15, 1)
        } else {
            Decimal::ONE
        };
        Settlement {
            balance_delta: rule.reward.saturating_sub(cost),
            prosperity_delta: rule.prosperity.saturating_mul(multiplier),
        }
    } else {
        let attempt_fee = rule.cost.saturating_mul(Decimal::new(3, 1));
        let prosperity_delta = if rule.prosperity.is_sign_negative() {
            rule.prosperity.saturating_mul(half)
        } else {
            Decimal::ZERO
        };
        Settlement {
            balance_delta: Decimal::ZERO.saturating_sub(attempt_fee),
            prosperity_delta,
        }
    }
}

/// Clamp a balance at zero.
pub fn clamp_balance(balance: Decimal) -> Decimal {
    balance.max(Decimal::ZERO)
}

/// Clamp a prosperity value to 0-100.
pub fn clamp_prosperity(prosperity: Decimal) -> Decimal {
    prosperity.clamp(Decimal::ZERO, MAX_PROSPERITY)
}

/// Round half toward positive infinity, for display.
///
/// `-2.5` rounds to `-2` and `2.5` to `3`. Values outside `i64` saturate.
pub fn round_for_display(value: Decimal) -> i64 {
    let rounded = value.saturating_add(Decimal::new(5, 1)).floor();
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn strong_acceptance_halves_cost_and_boosts_prosperity() {
        let rule = EconomyRule::new("pioneer", 100, 200, 8);
        let s = settle(&rule, true, 6);
        assert_eq!(s.balance_delta, dec!(150));
        assert_eq!(s.prosperity_delta, dec!(12));
    }

    #[test]
    fn grudging_acceptance_pays_full_cost() {
        let rule = EconomyRule::new("pioneer", 100, 200, 8);
        let s = settle(&rule, true, 4);
        assert_eq!(s.balance_delta, dec!(100));
        assert_eq!(s.prosperity_delta, dec!(8));
    }

    #[test]
    fn rejection_charges_attempt_fee_and_halves_negative_prosperity() {
        let rule = EconomyRule::new("conscript", 150, 30, -5);
        let s = settle(&rule, false, 2);
        assert_eq!(s.balance_delta, dec!(-45));
        assert_eq!(s.prosperity_delta, dec!(-2.5));
    }

    #[test]
    fn rejection_of_positive_rule_leaves_prosperity() {
        let rule = EconomyRule::new("build", 100, 50, 10);
        let s = settle(&rule, false, 3);
        assert_eq!(s.balance_delta, dec!(-30));
        assert_eq!(s.prosperity_delta, Decimal::ZERO);
    }

    #[test]
    fn display_rounding_goes_half_up() {
        assert_eq!(round_for_display(dec!(-2.5)), -2);
        assert_eq!(round_for_display(dec!(2.5)), 3);
        assert_eq!(round_for_display(dec!(-45)), -45);
        assert_eq!(round_for_display(dec!(12.49)), 12);
    }

    #[test]
    fn clamps() {
        assert_eq!(clamp_balance(dec!(-1)), Decimal::ZERO);
        assert_eq!(clamp_prosperity(dec!(101.5)), dec!(100));
        assert_eq!(clamp_prosperity(dec!(-3)), Decimal::ZERO);
        assert_eq!(clamp_prosperity(dec!(42.5)), dec!(42.5));
    }
}
