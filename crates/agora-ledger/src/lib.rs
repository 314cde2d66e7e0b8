//! Economy rules and ledger for the Agora simulation.
//!
//! Every decision an agent submits is priced against an ordered keyword
//! rule table and settled against two cells: the agent's balance and the
//! society's prosperity.
//!
//! # Architecture
//!
//! - [`rules`] -- The [`RuleBook`]: ordered `(matcher, rule)` pairs with a
//!   documented fallback.
//! - [`settlement`] -- Pure delta computation, clamping, display rounding.
//! - [`ledger`] -- The [`EconomyLedger`]: independently lockable balance and
//!   prosperity cells.
//!
//! # Bounds
//!
//! ```text
//! balance >= 0            (every agent, always)
//! 0 <= prosperity <= 100  (every society, always)
//! ```
//!
//! # Usage
//!
//! ```
//! use agora_ledger::{EconomyLedger, RuleBook};
//! use agora_types::{AgentName, SocietyId};
//! use rust_decimal::Decimal;
//!
//! let ledger = EconomyLedger::new();
//! let rules = RuleBook::standard();
//! let rule = rules.lookup("Pioneer a new harbor");
//!
//! let impact = ledger.apply_decision(
//!     &AgentName::from("Marcus"),
//!     &SocietyId::from("rome"),
//!     rule,
//!     true,
//!     6,
//! );
//! assert_eq!(impact.balance, Decimal::new(650, 0));
//! ```

pub mod ledger;
pub mod rules;
pub mod settlement;

pub use ledger::{EconomyLedger, STARTING_BALANCE, STARTING_PROSPERITY};
pub use rules::{DEFAULT_KEYWORD, EconomyRule, RuleBook, RuleMatcher};
pub use settlement::{Settlement, settle};
