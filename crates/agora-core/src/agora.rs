//! The `Agora` facade: every public entry point of the simulation.
//!
//! Each mutating call follows the same shape. Inputs are validated and the
//! referenced society and agents are looked up; then the caller's cooldown
//! slot is taken; only then is any state written. A call that fails
//! therefore never leaves a trace. Writes to one society happen under that
//! society's timeline lock, and a decision's ledger update and its event
//! append happen while the ledger cells are still held, so no reader sees
//! a balance without the event that explains it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agora_db::{MemoryStore, StateStore, StateStoreExt};
use agora_events::{EventLog, EventQuery, LogSnapshot};
use agora_ledger::EconomyLedger;
use agora_types::{
    Agent, AgentName, AgentProfile, DecisionDetails, Digest, EconomySnapshot, Event,
    EventPayload, EvolutionScore, JoinDetails, MessageDetails, Society, SocietyId,
    SocietySummary, Stats,
};

use crate::catalog::standard_societies;
use crate::clock::{Clock, SystemClock};
use crate::config::AgoraConfig;
use crate::digest::{self, DIGEST_WINDOW};
use crate::directory::{AgentDirectory, SocietyDirectory, SocietyEntry};
use crate::error::AgoraError;
use crate::evolution::{EvolutionInputs, EvolutionScorer};
use crate::rate_limit::{RateDecision, RateLimiter};
use crate::resolver::{DecisionResolver, DiceSource, RandomDice};

/// Store key of the agent registry.
pub const AGENTS_KEY: &str = "agents";

/// Store key of the economy snapshot.
pub const ECONOMY_KEY: &str = "economy";

/// Store key of one society's event log.
pub fn events_key(society: &SocietyId) -> String {
    format!("events_{society}")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Agent registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    /// Unique, case-sensitive name.
    pub name: String,
    /// Personality descriptor.
    pub personality: String,
    /// Free-form description.
    pub description: String,
}

/// A proposed decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecisionRequest {
    /// Acting agent.
    pub agent: String,
    /// Action label, matched against the economy rules.
    pub action: String,
    /// What the action is aimed at.
    pub target: Option<String>,
    /// Free-form description.
    pub description: String,
}

/// A private message between two agents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageRequest {
    /// Sender.
    pub from: String,
    /// Recipient.
    pub to: String,
    /// Message body.
    pub content: String,
}

/// Result of a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinOutcome {
    /// The society joined.
    pub society: SocietyId,
    /// The role held in it.
    pub role: String,
    /// `false` when the agent was already a member and nothing changed.
    pub joined: bool,
    /// The join event, on first join only.
    pub event: Option<Event>,
}

/// What [`Agora::restore`] found in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Agents loaded.
    pub agents: usize,
    /// Societies whose log was loaded.
    pub logs: usize,
    /// Events loaded across all logs.
    pub events: usize,
    /// Society logs that could not be read or decoded and were skipped.
    pub skipped: usize,
}

fn required(field: &'static str, value: &str) -> Result<String, AgoraError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AgoraError::validation(field, "must not be empty"));
    }
    Ok(value.to_owned())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assembles an [`Agora`] from configuration plus injectable seams.
pub struct AgoraBuilder {
    config: AgoraConfig,
    societies: Vec<Society>,
    store: Option<Arc<dyn StateStore>>,
    clock: Option<Arc<dyn Clock>>,
    dice: Option<Box<dyn DiceSource>>,
}

impl core::fmt::Debug for AgoraBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AgoraBuilder")
            .field("societies", &self.societies.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

struct BoxedDice(Box<dyn DiceSource>);

impl DiceSource for BoxedDice {
    fn roll(&mut self) -> u8 {
        self.0.roll()
    }
}

impl AgoraBuilder {
    /// Start from `config` with the built-in societies.
    pub fn new(config: AgoraConfig) -> Self {
        Self {
            config,
            societies: standard_societies(),
            store: None,
            clock: None,
            dice: None,
        }
    }

    /// Replace the society catalog.
    #[must_use]
    pub fn societies(mut self, societies: Vec<Society>) -> Self {
        self.societies = societies;
        self
    }

    /// Persist through `store` (default: an in-memory store).
    #[must_use]
    pub fn store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Read time from `clock` (default: the system clock).
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Roll `dice` (default: entropy-seeded random dice).
    #[must_use]
    pub fn dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    /// Build the facade.
    pub fn build(self) -> Agora {
        let limits = &self.config.limits;
        let economy = &self.config.economy;
        let resolver = match self.dice {
            Some(dice) => DecisionResolver::new(economy.rule_book(), BoxedDice(dice)),
            None => DecisionResolver::new(economy.rule_book(), RandomDice::from_entropy()),
        };
        Agora {
            societies: SocietyDirectory::new(self.societies, limits.event_capacity),
            agents: AgentDirectory::new(),
            ledger: EconomyLedger::with_starting_values(
                economy.starting_balance,
                economy.starting_prosperity,
            ),
            resolver,
            limiter: RateLimiter::from_secs(limits.cooldown_secs),
            scorer: EvolutionScorer::new(self.config.evolution.epoch),
            store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_capacity: limits.event_capacity,
        }
    }
}

// ---------------------------------------------------------------------------
// Agora
// ---------------------------------------------------------------------------

/// The simulation: directories, ledger, resolver and rate limiter behind
/// one set of entry points shared by human callers and the driver.
pub struct Agora {
    societies: SocietyDirectory,
    agents: AgentDirectory,
    ledger: EconomyLedger,
    resolver: DecisionResolver,
    limiter: RateLimiter,
    scorer: EvolutionScorer,
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    event_capacity: usize,
}

impl core::fmt::Debug for Agora {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Agora")
            .field("societies", &self.societies.len())
            .field("agents", &self.agents.len())
            .field("resolver", &self.resolver)
            .field("limiter", &self.limiter)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl Agora {
    /// Start building from `config`.
    pub fn builder(config: AgoraConfig) -> AgoraBuilder {
        AgoraBuilder::new(config)
    }

    /// The current instant according to the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The decision resolver.
    pub const fn resolver(&self) -> &DecisionResolver {
        &self.resolver
    }

    /// The rate limiter.
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    // -----------------------------------------------------------------------
    // Agents and membership
    // -----------------------------------------------------------------------

    /// Register a new agent with the starting balance.
    ///
    /// # Errors
    ///
    /// [`AgoraError::Validation`] for a blank name,
    /// [`AgoraError::Conflict`] if the name is taken.
    pub fn register_agent(&self, request: &RegisterRequest) -> Result<Agent, AgoraError> {
        let name = AgentName::new(required("name", &request.name)?);
        let agent = Agent::new(
            name.clone(),
            request.personality.trim().to_owned(),
            request.description.trim().to_owned(),
            self.now(),
        );
        self.agents.register(agent.clone())?;
        let balance = self.ledger.open_account(&name);
        tracing::info!(agent = %name, %balance, "agent registered");
        Ok(agent)
    }

    /// Join `society`, taking `role` if given or the next catalog role.
    ///
    /// Joining again is a no-op that reports the role assigned the first
    /// time; a role, once assigned, never changes.
    ///
    /// # Errors
    ///
    /// [`AgoraError::NotFound`] for an unknown agent or society,
    /// [`AgoraError::Validation`] for a role outside the society's catalog.
    pub fn join_society(
        &self,
        agent: &AgentName,
        society: &SocietyId,
        role: Option<&str>,
    ) -> Result<JoinOutcome, AgoraError> {
        let entry = self.societies.get(society)?;
        let record = self.agents.get(agent)?;
        let requested = optional(role);
        if let Some(role) = requested
            .as_deref()
            .filter(|r| !entry.society().has_role(r))
        {
            return Err(AgoraError::validation(
                "role",
                format!("`{role}` is not a role of {society}"),
            ));
        }

        let mut state = entry.lock();
        let mut record = record.lock();

        if let Some(existing) = record.role_in(society) {
            tracing::debug!(agent = %agent, society = %society, role = existing, "already a member");
            return Ok(JoinOutcome {
                society: society.clone(),
                role: existing.to_owned(),
                joined: false,
                event: None,
            });
        }

        let role = match requested {
            Some(role) => role,
            None => entry
                .round_robin_role(state.members.len())
                .ok_or_else(|| AgoraError::validation("role", format!("{society} has no roles")))?
                .to_owned(),
        };

        let now = self.now();
        record.societies.push(society.clone());
        record.roles.insert(society.clone(), role.clone());
        record.last_active = now;
        state.members.insert(agent.clone());
        self.ledger.open_society(society);
        let event = state.log.append(
            EventPayload::Join(JoinDetails {
                agent: agent.clone(),
                role: role.clone(),
            }),
            now,
        );

        tracing::info!(agent = %agent, society = %society, role = %role, "agent joined society");
        Ok(JoinOutcome {
            society: society.clone(),
            role,
            joined: true,
            event: Some(event),
        })
    }

    /// The agent's record plus its current balance.
    ///
    /// # Errors
    ///
    /// [`AgoraError::NotFound`] for an unknown agent.
    pub fn agent_profile(&self, agent: &AgentName) -> Result<AgentProfile, AgoraError> {
        let record = self.agents.get(agent)?.lock().clone();
        Ok(AgentProfile {
            balance: self.ledger.balance(agent),
            agent: record,
        })
    }

    // -----------------------------------------------------------------------
    // Decisions and messages
    // -----------------------------------------------------------------------

    fn take_slot(&self, agent: &AgentName, now: DateTime<Utc>) -> Result<(), AgoraError> {
        match self.limiter.try_act(agent, now) {
            RateDecision::Allowed => Ok(()),
            RateDecision::Denied { retry_after } => {
                tracing::debug!(agent = %agent, retry_after_ms = retry_after.num_milliseconds(), "cooldown active");
                Err(AgoraError::RateLimited { retry_after })
            }
        }
    }

    /// Resolve a decision: roll, settle the economy and record the event.
    ///
    /// The returned event carries the verdict and the economic impact.
    ///
    /// # Errors
    ///
    /// [`AgoraError::Validation`] for a blank agent or action,
    /// [`AgoraError::NotFound`] for an unknown society or agent,
    /// [`AgoraError::RateLimited`] inside the agent's cooldown.
    pub fn submit_decision(
        &self,
        society: &SocietyId,
        request: &DecisionRequest,
    ) -> Result<Event, AgoraError> {
        let agent = AgentName::new(required("agent", &request.agent)?);
        let action = required("action", &request.action)?;
        let entry = self.societies.get(society)?;
        let record = self.agents.get(&agent)?;

        let now = self.now();
        self.take_slot(&agent, now)?;

        let verdict = self.resolver.roll_verdict();
        let rule = self.resolver.resolve(&action);

        let mut details = DecisionDetails {
            agent: agent.clone(),
            action,
            target: optional(request.target.as_deref()),
            description: request.description.trim().to_owned(),
            dice_roll: verdict.dice,
            accepted: verdict.accepted,
            judgment: verdict.judgment,
            verdict: verdict.text.to_owned(),
            economy: None,
        };

        let mut state = entry.lock();
        record.lock().last_active = now;
        let (impact, event) = self.ledger.apply_decision_with(
            &agent,
            society,
            rule,
            verdict.accepted,
            verdict.dice,
            |impact| {
                details.economy = Some(impact.clone());
                state.log.append(EventPayload::Decision(details), now)
            },
        );
        drop(state);

        tracing::debug!(
            agent = %agent,
            society = %society,
            rule = %impact.rule,
            dice = verdict.dice,
            accepted = verdict.accepted,
            balance = %impact.balance,
            prosperity = %impact.prosperity,
            "decision resolved"
        );
        Ok(event)
    }

    /// Record a private message from one agent to another.
    ///
    /// # Errors
    ///
    /// [`AgoraError::Validation`] for a blank field,
    /// [`AgoraError::NotFound`] for an unknown society, sender or recipient,
    /// [`AgoraError::RateLimited`] inside the sender's cooldown.
    pub fn submit_message(
        &self,
        society: &SocietyId,
        request: &MessageRequest,
    ) -> Result<Event, AgoraError> {
        let from = AgentName::new(required("from", &request.from)?);
        let to = AgentName::new(required("to", &request.to)?);
        let content = required("content", &request.content)?;
        let entry = self.societies.get(society)?;
        let sender = self.agents.get(&from)?;
        if !self.agents.contains(&to) {
            return Err(AgoraError::not_found("agent", to.as_str()));
        }

        let now = self.now();
        self.take_slot(&from, now)?;

        let mut state = entry.lock();
        sender.lock().last_active = now;
        let event = state.log.append(
            EventPayload::Message(MessageDetails {
                from: from.clone(),
                to: to.clone(),
                content,
            }),
            now,
        );
        drop(state);

        tracing::debug!(from = %from, to = %to, society = %society, "message recorded");
        Ok(event)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Filtered view of a society's log, oldest first.
    ///
    /// # Errors
    ///
    /// [`AgoraError::NotFound`] for an unknown society.
    pub fn query_events(
        &self,
        society: &SocietyId,
        query: &EventQuery,
    ) -> Result<Vec<Event>, AgoraError> {
        Ok(self.societies.get(society)?.lock().log.recent(query))
    }

    /// The last `count` events of a society, oldest first, unfiltered.
    ///
    /// # Errors
    ///
    /// [`AgoraError::NotFound`] for an unknown society.
    pub fn recent_events(&self, society: &SocietyId, count: usize) -> Result<Vec<Event>, AgoraError> {
        Ok(self.societies.get(society)?.lock().log.tail(count))
    }

    /// Every known balance and the prosperity of every society.
    pub fn economy_snapshot(&self) -> EconomySnapshot {
        let mut snapshot = self.ledger.snapshot();
        for entry in self.societies.iter() {
            let id = &entry.society().id;
            snapshot
                .prosperity
                .entry(id.clone())
                .or_insert_with(|| self.ledger.prosperity(id));
        }
        snapshot
    }

    /// The society's evolution score at the current instant.
    ///
    /// # Errors
    ///
    /// [`AgoraError::NotFound`] for an unknown society.
    pub fn evolution(&self, society: &SocietyId) -> Result<EvolutionScore, AgoraError> {
        let entry = self.societies.get(society)?;
        let (total_events, (decisions, accepted)) = {
            let state = entry.lock();
            (
                state.log.total_appended(),
                EvolutionScorer::tally(state.log.iter()),
            )
        };
        let inputs = EvolutionInputs {
            now: self.now(),
            total_events,
            prosperity: self.ledger.prosperity(society),
            decisions,
            accepted,
        };
        Ok(self.scorer.score(society, &inputs))
    }

    /// The society's gazette over its most recent events.
    ///
    /// # Errors
    ///
    /// [`AgoraError::NotFound`] for an unknown society.
    pub fn digest(&self, society: &SocietyId) -> Result<Digest, AgoraError> {
        let entry = self.societies.get(society)?;
        let recent = entry.lock().log.tail(DIGEST_WINDOW);
        Ok(digest::generate(entry.society(), &recent, self.now()))
    }

    fn summarize(&self, entry: &SocietyEntry) -> SocietySummary {
        let (members, event_count) = {
            let state = entry.lock();
            (state.members.len(), state.log.total_appended())
        };
        SocietySummary {
            society: entry.society().clone(),
            prosperity: self.ledger.prosperity(&entry.society().id),
            members,
            event_count,
        }
    }

    /// Every society with its prosperity, member count and event count.
    pub fn societies(&self) -> Vec<SocietySummary> {
        self.societies.iter().map(|e| self.summarize(e)).collect()
    }

    /// One society's summary.
    ///
    /// # Errors
    ///
    /// [`AgoraError::NotFound`] for an unknown society.
    pub fn society(&self, society: &SocietyId) -> Result<SocietySummary, AgoraError> {
        Ok(self.summarize(self.societies.get(society)?))
    }

    /// Whether a society with this id exists.
    pub fn has_society(&self, society: &SocietyId) -> bool {
        self.societies.contains(society)
    }

    /// Counts of societies, agents and events ever appended.
    pub fn stats(&self) -> Stats {
        let total_events = self
            .societies
            .iter()
            .map(|e| e.lock().log.total_appended())
            .fold(0_u64, u64::saturating_add);
        Stats {
            societies: self.societies.len(),
            agents: self.agents.len(),
            total_events,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write agents, economy and every society log to the store.
    ///
    /// The snapshot is taken with every society's timeline lock held, so
    /// the saved ledger and the saved logs describe the same instant. The
    /// locks are released before anything is written. Every key is
    /// attempted even if an earlier one fails; in-memory state is untouched
    /// either way.
    ///
    /// # Errors
    ///
    /// The first [`AgoraError::Persistence`] encountered.
    pub fn persist(&self) -> Result<(), AgoraError> {
        // Lock order: every society in catalog order, then agent records,
        // then ledger cells.
        let states: Vec<_> = self.societies.iter().map(|entry| entry.lock()).collect();
        let agents = self.agents.snapshot();
        let economy = self.economy_snapshot();
        let logs: Vec<(String, LogSnapshot)> = self
            .societies
            .iter()
            .zip(&states)
            .map(|(entry, state)| (events_key(&entry.society().id), state.log.snapshot()))
            .collect();
        drop(states);

        let mut first_error = None;
        let mut record = |key: &str, result: Result<(), agora_db::DbError>| {
            if let Err(err) = result {
                tracing::error!(key, error = %err, "snapshot write failed");
                first_error.get_or_insert(err);
            }
        };

        record(AGENTS_KEY, self.store.save_json(AGENTS_KEY, &agents));
        record(ECONOMY_KEY, self.store.save_json(ECONOMY_KEY, &economy));
        for (key, snapshot) in &logs {
            record(key, self.store.save_json(key, snapshot));
        }

        let pruned = self.limiter.prune(self.now());
        match first_error {
            Some(err) => Err(err.into()),
            None => {
                tracing::debug!(pruned_cooldowns = pruned, "state persisted");
                Ok(())
            }
        }
    }

    /// Load state saved by [`Agora::persist`]. Missing keys count as empty.
    ///
    /// Everything is read and checked before anything is replaced, so a
    /// failed restore leaves the current state as it was. A society log
    /// that cannot be read or decoded is skipped on its own: its raw text
    /// is copied to `{key}_corrupt` and the society starts with an empty
    /// timeline while agents and economy are still restored. Logs saved for
    /// societies no longer in the catalog are ignored.
    ///
    /// # Errors
    ///
    /// [`AgoraError::Persistence`] if the agents or economy key cannot be
    /// read or holds malformed JSON.
    pub fn restore(&self) -> Result<RestoreReport, AgoraError> {
        let agents: Vec<Agent> = self.store.load_or(AGENTS_KEY, Vec::new())?;
        let economy: EconomySnapshot = self.store.load_or(ECONOMY_KEY, EconomySnapshot::default())?;

        let mut logs = Vec::new();
        let mut skipped = 0_usize;
        for entry in self.societies.iter() {
            let key = events_key(&entry.society().id);
            match self.load_log(&key) {
                Ok(Some(log)) => logs.push((Arc::clone(entry), log)),
                Ok(None) => {}
                Err(err) => {
                    tracing::error!(key = %key, error = %err, "saved log unusable, starting it empty");
                    self.quarantine(&key);
                    skipped = skipped.saturating_add(1);
                }
            }
        }

        let mut report = RestoreReport {
            agents: agents.len(),
            logs: logs.len(),
            events: 0,
            skipped,
        };

        for entry in self.societies.iter() {
            let id = &entry.society().id;
            let members = agents
                .iter()
                .filter(|a| a.role_in(id).is_some())
                .map(|a| a.name.clone())
                .collect();
            entry.lock().members = members;
        }
        for (entry, log) in logs {
            report.events = report.events.saturating_add(log.len());
            entry.lock().log = log;
        }
        for agent in &agents {
            self.ledger.open_account(&agent.name);
        }
        self.agents.replace_all(agents);
        self.ledger.restore(&economy);

        tracing::info!(
            agents = report.agents,
            logs = report.logs,
            events = report.events,
            skipped_logs = report.skipped,
            "state restored"
        );
        Ok(report)
    }

    fn load_log(&self, key: &str) -> Result<Option<EventLog>, AgoraError> {
        match self.store.load_json::<LogSnapshot>(key)? {
            Some(snapshot) => Ok(Some(EventLog::restore(snapshot, self.event_capacity)?)),
            None => Ok(None),
        }
    }

    /// Copy the raw text at `key` aside so the next snapshot does not
    /// destroy it.
    fn quarantine(&self, key: &str) {
        let backup = format!("{key}_corrupt");
        let copied = self
            .store
            .load_raw(key)
            .and_then(|raw| raw.map_or(Ok(()), |raw| self.store.save_raw(&backup, &raw)));
        match copied {
            Ok(()) => tracing::warn!(key, backup = %backup, "unusable log kept aside"),
            Err(err) => {
                tracing::error!(key, backup = %backup, error = %err, "could not keep unusable log aside");
            }
        }
    }
}
