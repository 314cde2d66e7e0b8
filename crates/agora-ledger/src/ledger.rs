//! The economy ledger: agent balances and society prosperity.
//!
//! Every agent balance and every society prosperity is an independently
//! lockable cell. A decision locks exactly two cells, always in the order
//! agent balance then society prosperity, so concurrent decisions by
//! different agents in the same society serialize only on the prosperity
//! cell, and decisions by the same agent across societies serialize only
//! on the balance cell. Neither loses updates.
//!
//! Cells are created on first touch: an unknown agent starts at the
//! configured starting balance (500) and an unknown society at the
//! starting prosperity (50). Values are kept at full precision; only the
//! [`ImpactDisplay`] projection is rounded.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;

use agora_types::{AgentName, EconomicImpact, EconomySnapshot, ImpactDisplay, SocietyId};

use crate::rules::EconomyRule;
use crate::settlement::{clamp_balance, clamp_prosperity, round_for_display, settle};

/// Default starting balance of a newly seen agent.
pub const STARTING_BALANCE: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Default starting prosperity of a newly seen society.
pub const STARTING_PROSPERITY: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

type Cell = Arc<Mutex<Decimal>>;

// ---------------------------------------------------------------------------
// Cell map
// ---------------------------------------------------------------------------

/// A map of lockable cells keyed by `K`, created on first touch.
#[derive(Debug)]
struct CellMap<K> {
    initial: Decimal,
    cells: RwLock<HashMap<K, Cell>>,
}

impl<K: Eq + Hash + Clone> CellMap<K> {
    fn new(initial: Decimal) -> Self {
        Self {
            initial,
            cells: RwLock::new(HashMap::new()),
        }
    }

    /// The cell for `key`, creating it at the initial value if absent.
    ///
    /// The map lock is released before the caller locks the cell.
    fn cell(&self, key: &K) -> Cell {
        if let Some(cell) = self.cells.read().get(key) {
            return Arc::clone(cell);
        }
        let mut cells = self.cells.write();
        Arc::clone(
            cells
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(self.initial))),
        )
    }

    /// Current value, or the initial value for an unseen key. Does not
    /// create a cell.
    fn get(&self, key: &K) -> Decimal {
        let cell = self.cells.read().get(key).map(Arc::clone);
        cell.map_or(self.initial, |c| *c.lock())
    }

    fn contains(&self, key: &K) -> bool {
        self.cells.read().contains_key(key)
    }

    fn values(&self) -> Vec<(K, Decimal)> {
        let cells: Vec<(K, Cell)> = self
            .cells
            .read()
            .iter()
            .map(|(k, c)| (k.clone(), Arc::clone(c)))
            .collect();
        cells.into_iter().map(|(k, c)| (k, *c.lock())).collect()
    }

    fn set(&self, key: &K, value: Decimal) {
        *self.cell(key).lock() = value;
    }
}

// ---------------------------------------------------------------------------
// EconomyLedger
// ---------------------------------------------------------------------------

/// Per-agent balances and per-society prosperity.
#[derive(Debug)]
pub struct EconomyLedger {
    balances: CellMap<AgentName>,
    prosperity: CellMap<SocietyId>,
}

impl EconomyLedger {
    /// Create a ledger with the standard starting values (500 / 50).
    pub fn new() -> Self {
        Self::with_starting_values(STARTING_BALANCE, STARTING_PROSPERITY)
    }

    /// Create a ledger with custom starting values. The prosperity value
    /// is clamped to 0-100 and the balance at zero.
    pub fn with_starting_values(balance: Decimal, prosperity: Decimal) -> Self {
        Self {
            balances: CellMap::new(clamp_balance(balance)),
            prosperity: CellMap::new(clamp_prosperity(prosperity)),
        }
    }

    /// Starting balance of a newly seen agent.
    pub const fn starting_balance(&self) -> Decimal {
        self.balances.initial
    }

    /// Starting prosperity of a newly seen society.
    pub const fn starting_prosperity(&self) -> Decimal {
        self.prosperity.initial
    }

    /// Current balance of `agent` (the starting balance if never touched).
    pub fn balance(&self, agent: &AgentName) -> Decimal {
        self.balances.get(agent)
    }

    /// Current prosperity of `society` (the starting prosperity if never
    /// touched).
    pub fn prosperity(&self, society: &SocietyId) -> Decimal {
        self.prosperity.get(society)
    }

    /// Create the balance cell for `agent` if absent and return its value.
    pub fn open_account(&self, agent: &AgentName) -> Decimal {
        *self.balances.cell(agent).lock()
    }

    /// Create the prosperity cell for `society` if absent and return its
    /// value.
    pub fn open_society(&self, society: &SocietyId) -> Decimal {
        *self.prosperity.cell(society).lock()
    }

    /// Whether `agent` has a ledger entry.
    pub fn has_account(&self, agent: &AgentName) -> bool {
        self.balances.contains(agent)
    }

    /// Settle a resolved decision and return its impact record.
    pub fn apply_decision(
        &self,
        agent: &AgentName,
        society: &SocietyId,
        rule: &EconomyRule,
        accepted: bool,
        dice: u8,
    ) -> EconomicImpact {
        self.apply_decision_with(agent, society, rule, accepted, dice, |_| ())
            .0
    }

    /// Settle a resolved decision and run `then` while both affected cells
    /// are still locked.
    ///
    /// Callers use `then` to publish the impact (append the decision event)
    /// so no reader observes the new balance or prosperity before the event
    /// that explains it.
    pub fn apply_decision_with<R>(
        &self,
        agent: &AgentName,
        society: &SocietyId,
        rule: &EconomyRule,
        accepted: bool,
        dice: u8,
        then: impl FnOnce(&EconomicImpact) -> R,
    ) -> (EconomicImpact, R) {
        let balance_cell = self.balances.cell(agent);
        let prosperity_cell = self.prosperity.cell(society);

        // Lock order: balance, then prosperity.
        let mut balance = balance_cell.lock();
        let mut prosperity = prosperity_cell.lock();

        let settlement = settle(rule, accepted, dice);
        *balance = clamp_balance(balance.saturating_add(settlement.balance_delta));
        *prosperity = clamp_prosperity(prosperity.saturating_add(settlement.prosperity_delta));

        let impact = EconomicImpact {
            agent: agent.clone(),
            society: society.clone(),
            rule: rule.keyword.clone(),
            balance_delta: settlement.balance_delta,
            balance: *balance,
            prosperity_delta: settlement.prosperity_delta,
            prosperity: *prosperity,
            display: ImpactDisplay {
                balance_change: round_for_display(settlement.balance_delta),
                new_balance: round_for_display(*balance),
                prosperity_change: round_for_display(settlement.prosperity_delta),
                new_prosperity: round_for_display(*prosperity),
            },
        };

        tracing::trace!(
            agent = %agent,
            society = %society,
            rule = %rule.keyword,
            balance = %impact.balance,
            prosperity = %impact.prosperity,
            "ledger settled decision"
        );

        let out = then(&impact);
        (impact, out)
    }

    /// Balances of every known agent and prosperity of every known society.
    ///
    /// Each cell is read under its own lock; the snapshot is consistent per
    /// cell, not across cells.
    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            balances: self.balances.values().into_iter().collect(),
            prosperity: self.prosperity.values().into_iter().collect(),
        }
    }

    /// Load values from a snapshot, clamping anything out of bounds.
    pub fn restore(&self, snapshot: &EconomySnapshot) {
        for (agent, value) in &snapshot.balances {
            let clamped = clamp_balance(*value);
            if clamped != *value {
                tracing::warn!(agent = %agent, %value, "restored balance out of bounds, clamped");
            }
            self.balances.set(agent, clamped);
        }
        for (society, value) in &snapshot.prosperity {
            let clamped = clamp_prosperity(*value);
            if clamped != *value {
                tracing::warn!(society = %society, %value, "restored prosperity out of bounds, clamped");
            }
            self.prosperity.set(society, clamped);
        }
    }
}

impl Default for EconomyLedger {
    fn default() -> Self {
        Self::new()
    }
}
