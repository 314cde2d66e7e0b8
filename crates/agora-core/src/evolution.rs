//! The evolution score: a derived 0-100 development index per society.
//!
//! # Factors
//!
//! | Factor | Formula | Clamp |
//! |--------|---------|-------|
//! | time | `max(1, days since epoch) * 0.5` | 0..=100 |
//! | event volume | `events ever appended * 0.1` | 0..=100 |
//! | prosperity | `prosperity * 0.05` | 0..=5 |
//! | acceptance | `(acceptance rate - 0.5) * 10 * 0.2` | -1..=1 |
//!
//! The sum is clamped to 0-100 and rounded half up. Acceptance is measured
//! over the decisions still retained in the society's log; with no
//! decisions the rate is 0.5 and the term is zero.
//!
//! The acceptance term is linear and centered: full acceptance adds one
//! point, total rejection removes one. It rewards acceptance monotonically.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use agora_types::{Event, EvolutionFactors, EvolutionScore, EvolutionTier, SocietyId};

const SECONDS_PER_DAY: i64 = 86_400;

/// Raw measurements a score is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvolutionInputs {
    /// Instant of evaluation.
    pub now: DateTime<Utc>,
    /// Events ever appended to the society's log.
    pub total_events: u64,
    /// Current prosperity, 0-100.
    pub prosperity: Decimal,
    /// Decisions in the retained window.
    pub decisions: usize,
    /// Accepted decisions in the retained window.
    pub accepted: usize,
}

/// Computes [`EvolutionScore`]s relative to a fixed epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvolutionScorer {
    epoch: DateTime<Utc>,
}

impl EvolutionScorer {
    /// Create a scorer measuring elapsed time from `epoch`.
    pub const fn new(epoch: DateTime<Utc>) -> Self {
        Self { epoch }
    }

    /// The configured epoch.
    pub const fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// Count `(decisions, accepted)` among `events`.
    pub fn tally<'a>(events: impl IntoIterator<Item = &'a Event>) -> (usize, usize) {
        events
            .into_iter()
            .filter_map(Event::as_decision)
            .fold((0_usize, 0_usize), |(total, accepted), d| {
                (
                    total.saturating_add(1),
                    accepted.saturating_add(usize::from(d.accepted)),
                )
            })
    }

    /// Acceptance rate in 0-1; 0.5 when there are no decisions.
    pub fn acceptance_rate(decisions: usize, accepted: usize) -> Decimal {
        if decisions == 0 {
            return Decimal::new(5, 1);
        }
        let accepted = Decimal::from(accepted.min(decisions));
        accepted
            .checked_div(Decimal::from(decisions))
            .unwrap_or(Decimal::new(5, 1))
    }

    /// Compute the score for `society`.
    pub fn score(&self, society: &SocietyId, inputs: &EvolutionInputs) -> EvolutionScore {
        let hundred = Decimal::ONE_HUNDRED;

        let elapsed_secs = inputs.now.signed_duration_since(self.epoch).num_seconds();
        let days = Decimal::from(elapsed_secs)
            .checked_div(Decimal::from(SECONDS_PER_DAY))
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ONE);
        let time = days
            .saturating_mul(Decimal::new(5, 1))
            .clamp(Decimal::ZERO, hundred);

        let event_volume = Decimal::from(inputs.total_events)
            .saturating_mul(Decimal::new(1, 1))
            .clamp(Decimal::ZERO, hundred);

        let prosperity = inputs
            .prosperity
            .clamp(Decimal::ZERO, hundred)
            .saturating_mul(Decimal::new(5, 2));

        let rate = Self::acceptance_rate(inputs.decisions, inputs.accepted);
        let acceptance = rate
            .saturating_sub(Decimal::new(5, 1))
            .saturating_mul(Decimal::TEN)
            .saturating_mul(Decimal::new(2, 1))
            .clamp(Decimal::NEGATIVE_ONE, Decimal::ONE);

        let total = time
            .saturating_add(event_volume)
            .saturating_add(prosperity)
            .saturating_add(acceptance)
            .clamp(Decimal::ZERO, hundred);
        let score = total
            .saturating_add(Decimal::new(5, 1))
            .floor()
            .to_u8()
            .unwrap_or(100)
            .min(100);

        let tier = EvolutionTier::from_score(score);
        EvolutionScore {
            society: society.clone(),
            score,
            tier,
            label: tier.label().to_owned(),
            factors: EvolutionFactors {
                time,
                event_volume,
                prosperity,
                acceptance,
            },
            acceptance_rate: rate,
        }
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use chrono::TimeDelta;
    use rust_decimal_macros::dec;

    use super::*;

    fn epoch() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-02-01T00:00:00Z")
            .map(|d| d.with_timezone(&Utc))
            .unwrap_or_default()
    }

    fn inputs(days: i64, events: u64, prosperity: Decimal, decisions: usize, accepted: usize) -> EvolutionInputs {
        EvolutionInputs {
            now: epoch() + TimeDelta::days(days),
            total_events: events,
            prosperity,
            decisions,
            accepted,
        }
    }

    fn rome() -> SocietyId {
        SocietyId::from("rome")
    }

    #[test]
    fn factors_combine_linearly() {
        let scorer = EvolutionScorer::new(epoch());
        let score = scorer.score(&rome(), &inputs(10, 100, dec!(50), 4, 3));
        assert_eq!(score.factors.time, dec!(5));
        assert_eq!(score.factors.event_volume, dec!(10));
        assert_eq!(score.factors.prosperity, dec!(2.5));
        assert_eq!(score.factors.acceptance, dec!(0.5));
        assert_eq!(score.acceptance_rate, dec!(0.75));
        assert_eq!(score.score, 18);
        assert_eq!(score.tier, EvolutionTier::VergeOfCollapse);
    }

    #[test]
    fn half_points_round_up() {
        let scorer = EvolutionScorer::new(epoch());
        // 0.5 (time floor) + 2.5 (prosperity 50) + 0 = 3.0; add 0.5 via 5 events.
        let score = scorer.score(&rome(), &inputs(0, 5, dec!(50), 0, 0));
        assert_eq!(score.factors.time, dec!(0.5));
        assert_eq!(score.score, 4);
    }

    #[test]
    fn time_before_epoch_counts_as_one_day() {
        let scorer = EvolutionScorer::new(epoch());
        let score = scorer.score(&rome(), &inputs(-30, 0, dec!(0), 0, 0));
        assert_eq!(score.factors.time, dec!(0.5));
    }

    #[test]
    fn acceptance_term_rewards_acceptance() {
        let scorer = EvolutionScorer::new(epoch());
        let all = scorer.score(&rome(), &inputs(10, 0, dec!(50), 10, 10));
        let none = scorer.score(&rome(), &inputs(10, 0, dec!(50), 10, 0));
        let neutral = scorer.score(&rome(), &inputs(10, 0, dec!(50), 0, 0));
        assert_eq!(all.factors.acceptance, dec!(1));
        assert_eq!(none.factors.acceptance, dec!(-1));
        assert_eq!(neutral.factors.acceptance, dec!(0));
        assert!(all.score > neutral.score);
        assert!(neutral.score > none.score);
    }

    #[test]
    fn score_clamps_at_one_hundred() {
        let scorer = EvolutionScorer::new(epoch());
        let score = scorer.score(&rome(), &inputs(1_000, 5_000, dec!(100), 1, 1));
        assert_eq!(score.score, 100);
        assert_eq!(score.tier, EvolutionTier::Zenith);
        assert_eq!(score.label, "Civilization at its zenith");
    }

    #[test]
    fn tiers_follow_thresholds() {
        let scorer = EvolutionScorer::new(epoch());
        // 80 days -> 40 points of time, plus 2.5 prosperity -> 43 (rounded).
        let score = scorer.score(&rome(), &inputs(80, 0, dec!(50), 0, 0));
        assert_eq!(score.score, 43);
        assert_eq!(score.tier, EvolutionTier::SteadyProgress);
    }
}
