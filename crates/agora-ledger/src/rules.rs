//! The ordered economy rule table.
//!
//! Each decision's action label is matched against an ordered list of
//! `(matcher, rule)` pairs. The first matcher that accepts the label wins,
//! so declaration order breaks ties (`"Pioneer a trade route"` matches
//! `trade` before `pioneer`). A label that matches nothing settles under
//! the fallback rule `{cost 50, reward 50, prosperity 0}`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Keyword reported for the fallback rule.
pub const DEFAULT_KEYWORD: &str = "default";

/// Economic parameters of one class of action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyRule {
    /// Keyword the action label must contain.
    pub keyword: String,
    /// Cost charged to the agent.
    pub cost: Decimal,
    /// Reward paid to the agent on acceptance.
    pub reward: Decimal,
    /// Base prosperity effect on the society (signed).
    pub prosperity: Decimal,
}

impl EconomyRule {
    /// Build a rule from whole-number parameters.
    pub fn new(keyword: impl Into<String>, cost: i64, reward: i64, prosperity: i64) -> Self {
        Self {
            keyword: keyword.into(),
            cost: Decimal::new(cost, 0),
            reward: Decimal::new(reward, 0),
            prosperity: Decimal::new(prosperity, 0),
        }
    }

    /// The fallback rule applied when no keyword matches.
    pub fn fallback() -> Self {
        Self::new(DEFAULT_KEYWORD, 50, 50, 0)
    }
}

/// Predicate half of a rule table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatcher {
    /// Case-insensitive substring test. An empty keyword never matches.
    Keyword(String),
}

impl RuleMatcher {
    /// Whether this matcher accepts `label`.
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Self::Keyword(keyword) => {
                !keyword.is_empty() && label.to_lowercase().contains(&keyword.to_lowercase())
            }
        }
    }
}

/// An ordered list of economy rules with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBook {
    entries: Vec<(RuleMatcher, EconomyRule)>,
    fallback: EconomyRule,
}

impl RuleBook {
    /// Build a rule book that matches each rule by its keyword, in the
    /// given order, with the standard fallback.
    pub fn new(rules: Vec<EconomyRule>) -> Self {
        let entries = rules
            .into_iter()
            .map(|rule| (RuleMatcher::Keyword(rule.keyword.clone()), rule))
            .collect();
        Self {
            entries,
            fallback: EconomyRule::fallback(),
        }
    }

    /// Replace the fallback rule.
    #[must_use]
    pub fn with_fallback(mut self, fallback: EconomyRule) -> Self {
        self.fallback = fallback;
        self
    }

    /// The standard table: construction, trade, military, governance, and
    /// civic actions.
    pub fn standard() -> Self {
        Self::new(vec![
            // Construction: costly, raises prosperity.
            EconomyRule::new("build", 100, 50, 10),
            EconomyRule::new("construct", 80, 40, 8),
            EconomyRule::new("repair", 60, 30, 5),
            // Trade: cheap, high return.
            EconomyRule::new("trade", 50, 150, 5),
            EconomyRule::new("pioneer", 100, 200, 8),
            EconomyRule::new("manage", 30, 80, 3),
            EconomyRule::new("sponsor", 200, 100, 15),
            // Military: expensive, often harmful.
            EconomyRule::new("conscript", 150, 30, -5),
            EconomyRule::new("patrol", 80, 20, 0),
            EconomyRule::new("attack", 200, 100, -10),
            EconomyRule::new("hold", 50, 80, 5),
            // Governance.
            EconomyRule::new("decree", 30, 50, 8),
            EconomyRule::new("trial", 20, 40, 5),
            EconomyRule::new("convene", 40, 60, 3),
            EconomyRule::new("dispatch", 60, 80, 5),
            // Civic.
            EconomyRule::new("rescue", 80, 20, 15),
            EconomyRule::new("protest", 10, 30, -3),
            EconomyRule::new("found", 50, 40, 10),
        ])
    }

    /// Find the rule for an action label: first match in table order, or
    /// the fallback.
    pub fn lookup(&self, action: &str) -> &EconomyRule {
        self.entries
            .iter()
            .find(|(matcher, _)| matcher.matches(action))
            .map_or(&self.fallback, |(_, rule)| rule)
    }

    /// The rules in match order.
    pub fn rules(&self) -> impl Iterator<Item = &EconomyRule> {
        self.entries.iter().map(|(_, rule)| rule)
    }

    /// The fallback rule.
    pub const fn fallback(&self) -> &EconomyRule {
        &self.fallback
    }

    /// Number of keyed rules (excluding the fallback).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no keyed rules.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::standard()
    }
}
