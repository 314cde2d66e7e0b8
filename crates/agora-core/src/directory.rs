//! Registries of societies and agents.
//!
//! The society set is fixed when the directory is built; each society owns
//! its event log and member set behind one mutex, which is the per-society
//! timeline lock. Agents are created on registration and each record sits
//! behind its own mutex, so two agents never contend.
//!
//! Lock order, outermost first: society state, agent record, ledger cells.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};

use agora_events::EventLog;
use agora_types::{Agent, AgentName, Society, SocietyId};

use crate::error::AgoraError;

// ---------------------------------------------------------------------------
// Societies
// ---------------------------------------------------------------------------

/// Mutable per-society state: the timeline and its members.
#[derive(Debug)]
pub struct SocietyState {
    /// The society's event log.
    pub log: EventLog,
    /// Agents that have joined.
    pub members: BTreeSet<AgentName>,
}

/// One registered society.
#[derive(Debug)]
pub struct SocietyEntry {
    society: Society,
    state: Mutex<SocietyState>,
}

impl SocietyEntry {
    fn new(society: Society, capacity: usize) -> Self {
        let log = EventLog::with_capacity(society.id.clone(), capacity);
        Self {
            society,
            state: Mutex::new(SocietyState {
                log,
                members: BTreeSet::new(),
            }),
        }
    }

    /// The immutable society record.
    pub const fn society(&self) -> &Society {
        &self.society
    }

    /// Lock the society's timeline.
    pub fn lock(&self) -> MutexGuard<'_, SocietyState> {
        self.state.lock()
    }

    /// Pick the role a new member receives when none is requested: the
    /// catalog entry at `member_count` modulo the catalog size.
    pub fn round_robin_role(&self, member_count: usize) -> Option<&str> {
        let roles = &self.society.roles;
        let index = member_count.checked_rem(roles.len())?;
        roles.get(index).map(String::as_str)
    }
}

/// The fixed set of societies.
#[derive(Debug)]
pub struct SocietyDirectory {
    entries: BTreeMap<SocietyId, Arc<SocietyEntry>>,
    order: Vec<SocietyId>,
}

impl SocietyDirectory {
    /// Build a directory over `societies`, each with a log retaining at
    /// most `capacity` events. Later duplicates of an id are ignored.
    pub fn new(societies: impl IntoIterator<Item = Society>, capacity: usize) -> Self {
        let mut entries = BTreeMap::new();
        let mut order = Vec::new();
        for society in societies {
            if entries.contains_key(&society.id) {
                tracing::warn!(society = %society.id, "duplicate society id ignored");
                continue;
            }
            order.push(society.id.clone());
            entries.insert(society.id.clone(), Arc::new(SocietyEntry::new(society, capacity)));
        }
        Self { entries, order }
    }

    /// Look up a society.
    ///
    /// # Errors
    ///
    /// [`AgoraError::NotFound`] if the id is unknown.
    pub fn get(&self, id: &SocietyId) -> Result<&Arc<SocietyEntry>, AgoraError> {
        self.entries
            .get(id)
            .ok_or_else(|| AgoraError::not_found("society", id.as_str()))
    }

    /// Whether the id is registered.
    pub fn contains(&self, id: &SocietyId) -> bool {
        self.entries.contains_key(id)
    }

    /// Societies in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SocietyEntry>> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Number of societies.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no societies.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Registered agents, keyed by case-sensitive name.
#[derive(Debug, Default)]
pub struct AgentDirectory {
    agents: RwLock<HashMap<AgentName, Arc<Mutex<Agent>>>>,
}

impl AgentDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `agent` if its name is free.
    ///
    /// # Errors
    ///
    /// [`AgoraError::Conflict`] if the name is taken.
    pub fn register(&self, agent: Agent) -> Result<(), AgoraError> {
        let mut agents = self.agents.write();
        if agents.contains_key(&agent.name) {
            return Err(AgoraError::Conflict {
                kind: "agent",
                id: agent.name.to_string(),
            });
        }
        agents.insert(agent.name.clone(), Arc::new(Mutex::new(agent)));
        Ok(())
    }

    /// Look up an agent's record.
    ///
    /// # Errors
    ///
    /// [`AgoraError::NotFound`] if no agent has that name.
    pub fn get(&self, name: &AgentName) -> Result<Arc<Mutex<Agent>>, AgoraError> {
        self.agents
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| AgoraError::not_found("agent", name.as_str()))
    }

    /// Whether the name is registered.
    pub fn contains(&self, name: &AgentName) -> bool {
        self.agents.read().contains_key(name)
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    /// Whether no agent is registered.
    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }

    /// Copies of every record, sorted by name.
    pub fn snapshot(&self) -> Vec<Agent> {
        let handles: Vec<Arc<Mutex<Agent>>> = self.agents.read().values().cloned().collect();
        let mut agents: Vec<Agent> = handles.iter().map(|a| a.lock().clone()).collect();
        agents.sort_by(|a, b| a.name.cmp(&b.name));
        agents
    }

    /// Replace the registry contents with `agents`.
    pub fn replace_all(&self, agents: Vec<Agent>) {
        let map = agents
            .into_iter()
            .map(|a| (a.name.clone(), Arc::new(Mutex::new(a))))
            .collect();
        *self.agents.write() = map;
    }
}
