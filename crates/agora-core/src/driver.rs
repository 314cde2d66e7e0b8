//! Background driver for the scripted cast.
//!
//! The driver holds no privileges. It registers and joins its characters
//! through [`Agora::register_agent`] and [`Agora::join_society`], and each
//! move goes through [`Agora::submit_decision`] or
//! [`Agora::submit_message`], cooldown included. Which character acts and
//! what they do is decided by a swappable [`ScriptPolicy`].

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use agora_types::{AgentName, Event, SocietyId};

use crate::agora::{Agora, DecisionRequest, MessageRequest, RegisterRequest};
use crate::cast::{STANDARD_CAST, SocietyCast};
use crate::config::DriverConfig;
use crate::error::AgoraError;

/// Shortest pause between moves, whatever the configuration says.
pub const MIN_DELAY: Duration = Duration::from_millis(10);

/// One move chosen by a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Propose a decision.
    Decide {
        /// Where.
        society: SocietyId,
        /// What.
        request: DecisionRequest,
    },
    /// Send a message.
    Message {
        /// Where.
        society: SocietyId,
        /// What.
        request: MessageRequest,
    },
}

/// Chooses the next move for the cast.
pub trait ScriptPolicy: Send {
    /// The next move, or `None` if the cast has nothing to do.
    fn next_move(&mut self, cast: &[SocietyCast]) -> Option<Move>;
}

/// Uniformly random society and character; a message with the configured
/// probability when the character has any, a decision otherwise.
#[derive(Debug)]
pub struct RandomCast {
    rng: StdRng,
    message_probability: f64,
}

impl RandomCast {
    /// Seed deterministically.
    pub fn seeded(seed: u64, message_probability: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), message_probability)
    }

    /// Seed from the operating system.
    pub fn from_entropy(message_probability: f64) -> Self {
        Self::with_rng(StdRng::from_os_rng(), message_probability)
    }

    fn with_rng(rng: StdRng, message_probability: f64) -> Self {
        let message_probability = if message_probability.is_finite() {
            message_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            rng,
            message_probability,
        }
    }
}

impl ScriptPolicy for RandomCast {
    fn next_move(&mut self, cast: &[SocietyCast]) -> Option<Move> {
        let society = cast.choose(&mut self.rng)?;
        let member = society.members.choose(&mut self.rng)?;
        let society_id = SocietyId::new(society.society);

        if !member.messages.is_empty() && self.rng.random_bool(self.message_probability) {
            let message = member.messages.choose(&mut self.rng)?;
            return Some(Move::Message {
                society: society_id,
                request: MessageRequest {
                    from: member.name.to_owned(),
                    to: message.to.to_owned(),
                    content: message.content.to_owned(),
                },
            });
        }

        let action = member.actions.choose(&mut self.rng)?;
        Some(Move::Decide {
            society: society_id,
            request: DecisionRequest {
                agent: member.name.to_owned(),
                action: action.action.to_owned(),
                target: Some(action.target.to_owned()),
                description: action.description.to_owned(),
            },
        })
    }
}

/// Counts from [`ScriptedDriver::enlist`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnlistReport {
    /// Characters newly registered.
    pub registered: usize,
    /// Characters newly joined to their society.
    pub joined: usize,
}

/// Plays the cast against an [`Agora`] on a jittered timer.
pub struct ScriptedDriver {
    agora: Arc<Agora>,
    cast: &'static [SocietyCast],
    policy: Box<dyn ScriptPolicy>,
    interval: Duration,
    jitter: Duration,
    rng: StdRng,
}

impl core::fmt::Debug for ScriptedDriver {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScriptedDriver")
            .field("societies", &self.cast.len())
            .field("interval", &self.interval)
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}

impl ScriptedDriver {
    /// A driver for the standard cast with a [`RandomCast`] policy.
    pub fn new(agora: Arc<Agora>, config: &DriverConfig) -> Self {
        let (policy, rng) = match config.seed {
            Some(seed) => (
                RandomCast::seeded(seed, config.message_probability),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (
                RandomCast::from_entropy(config.message_probability),
                StdRng::from_os_rng(),
            ),
        };
        Self {
            agora,
            cast: STANDARD_CAST,
            policy: Box::new(policy),
            interval: Duration::from_secs(config.interval_secs),
            jitter: Duration::from_secs(config.jitter_secs),
            rng,
        }
    }

    /// Replace the move policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl ScriptPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Replace the cast.
    #[must_use]
    pub const fn with_cast(mut self, cast: &'static [SocietyCast]) -> Self {
        self.cast = cast;
        self
    }

    /// Register every character and join it to its society.
    ///
    /// Characters that already exist (for example after a restore) are
    /// left as they are. Other failures are logged and skipped.
    pub fn enlist(&self) -> EnlistReport {
        let mut report = EnlistReport::default();
        for society_cast in self.cast {
            let society = SocietyId::new(society_cast.society);
            for member in society_cast.members {
                let request = RegisterRequest {
                    name: member.name.to_owned(),
                    personality: member.personality.to_owned(),
                    description: format!("{} - {}", member.role, member.personality),
                };
                match self.agora.register_agent(&request) {
                    Ok(_) => report.registered = report.registered.saturating_add(1),
                    Err(AgoraError::Conflict { .. }) => {}
                    Err(err) => {
                        warn!(agent = member.name, error = %err, "could not register cast member");
                        continue;
                    }
                }
                let name = AgentName::new(member.name);
                match self.agora.join_society(&name, &society, Some(member.role)) {
                    Ok(outcome) if outcome.joined => {
                        report.joined = report.joined.saturating_add(1);
                    }
                    Ok(_) => {}
                    Err(err) => {
                        warn!(agent = member.name, society = %society, error = %err, "could not join cast member");
                    }
                }
            }
        }
        info!(
            registered = report.registered,
            joined = report.joined,
            "scripted cast enlisted"
        );
        report
    }

    /// Play one move. Returns the recorded event, or `None` if the move
    /// was refused or there was nothing to do.
    pub fn tick(&mut self) -> Option<Event> {
        let next = self.policy.next_move(self.cast)?;
        let result = match &next {
            Move::Decide { society, request } => self.agora.submit_decision(society, request),
            Move::Message { society, request } => self.agora.submit_message(society, request),
        };
        match result {
            Ok(event) => {
                debug!(society = %event.society, kind = %event.kind(), seq = event.seq, "scripted move recorded");
                Some(event)
            }
            Err(AgoraError::RateLimited { retry_after }) => {
                debug!(retry_after_ms = retry_after.num_milliseconds(), "scripted move skipped, cooling down");
                None
            }
            Err(err) => {
                warn!(error = %err, "scripted move failed");
                None
            }
        }
    }

    /// The pause before the next move: the interval plus or minus a
    /// uniform jitter, never below [`MIN_DELAY`].
    pub fn next_delay(&mut self) -> Duration {
        let interval = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
        let jitter = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        let offset = self.rng.random_range(0..=jitter.saturating_mul(2));
        let millis = interval.saturating_sub(jitter).saturating_add(offset);
        Duration::from_millis(millis).max(MIN_DELAY)
    }

    /// Enlist the cast, then play moves until `shutdown` turns `true` or
    /// its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        self.enlist();
        loop {
            if *shutdown.borrow() {
                break;
            }
            let delay = self.next_delay();
            tokio::select! {
                () = tokio::time::sleep(delay) => {
                    self.tick();
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        info!("scripted driver stopped");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::AgoraConfig;
    use crate::resolver::FixedDice;

    fn agora(cooldown_secs: u64) -> Arc<Agora> {
        let mut config = AgoraConfig::default();
        config.limits.cooldown_secs = cooldown_secs;
        Arc::new(Agora::builder(config).dice(FixedDice::always(5)).build())
    }

    fn driver(agora: &Arc<Agora>, interval_secs: u64, jitter_secs: u64) -> ScriptedDriver {
        let config = DriverConfig {
            interval_secs,
            jitter_secs,
            seed: Some(11),
            ..DriverConfig::default()
        };
        ScriptedDriver::new(Arc::clone(agora), &config)
    }

    #[test]
    fn random_cast_picks_members_of_the_chosen_society() {
        let mut policy = RandomCast::seeded(3, 0.5);
        for _ in 0..200 {
            let (society, actor) = match policy.next_move(STANDARD_CAST).unwrap() {
                Move::Decide { society, request } => (society, request.agent),
                Move::Message { society, request } => (society, request.from),
            };
            let cast = STANDARD_CAST
                .iter()
                .find(|c| c.society == society.as_str())
                .unwrap();
            assert!(cast.members.iter().any(|m| m.name == actor));
        }
    }

    #[test]
    fn message_probability_extremes() {
        let mut never = RandomCast::seeded(1, 0.0);
        let mut always = RandomCast::seeded(1, 1.0);
        for _ in 0..50 {
            assert!(matches!(never.next_move(STANDARD_CAST), Some(Move::Decide { .. })));
            assert!(matches!(always.next_move(STANDARD_CAST), Some(Move::Message { .. })));
        }
        assert!(RandomCast::seeded(1, 0.5).next_move(&[]).is_none());
    }

    #[test]
    fn enlist_is_repeatable() {
        let agora = agora(30);
        let driver = driver(&agora, 20, 10);
        let first = driver.enlist();
        assert_eq!(first.registered, 16);
        assert_eq!(first.joined, 16);
        assert_eq!(driver.enlist(), EnlistReport::default());

        let profile = agora
            .agent_profile(&AgentName::from("Hanzo_Ninja"))
            .unwrap();
        assert_eq!(profile.agent.role_in(&SocietyId::from("ancient_japan")), Some("Ninja"));
    }

    #[test]
    fn ticks_go_through_the_cooldown() {
        let agora = agora(3_600);
        let mut driver = driver(&agora, 20, 10);
        driver.enlist();
        let joins = agora.stats().total_events;

        let played = (0..100).filter(|_| driver.tick().is_some()).count();
        // Each of the 16 characters can act at most once per hour.
        assert!(played <= 16);
        assert!(played > 0);
        assert_eq!(
            agora.stats().total_events,
            joins.saturating_add(u64::try_from(played).unwrap())
        );
    }

    #[test]
    fn delay_stays_within_the_jitter_band() {
        let agora = agora(30);
        let mut driver = driver(&agora, 20, 10);
        for _ in 0..100 {
            let delay = driver.next_delay();
            assert!(delay >= Duration::from_secs(10));
            assert!(delay <= Duration::from_secs(30));
        }
        let mut fast = self::driver(&agora, 0, 0);
        assert_eq!(fast.next_delay(), MIN_DELAY);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let agora = agora(0);
        let driver = driver(&agora, 0, 0);
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(driver.run(rx));

        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(agora.stats().agents, 16);
        assert!(agora.stats().total_events > 16);
    }
}
