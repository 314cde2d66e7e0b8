//! Decision pipeline and simulation services for Agora.
//!
//! The [`Agora`] facade is the only way state changes. Human callers (via
//! the HTTP observer) and the scripted driver use the same entry points and
//! the same per-agent cooldown.
//!
//! # Modules
//!
//! - [`agora`] -- The facade: registration, joins, decisions, messages,
//!   read models, snapshot and restore.
//! - [`catalog`] -- The five built-in societies.
//! - [`cast`] -- Scripted characters for the driver.
//! - [`clock`] -- Injectable time source.
//! - [`config`] -- `agora.yaml` loading into strongly-typed structs.
//! - [`digest`] -- The per-society gazette.
//! - [`directory`] -- Society and agent registries.
//! - [`driver`] -- Background driver for the scripted cast.
//! - [`error`] -- [`AgoraError`].
//! - [`evolution`] -- The 0-100 evolution score.
//! - [`rate_limit`] -- Per-agent cooldown.
//! - [`resolver`] -- Rule lookup and the dice judgment.
//!
//! # Pipeline
//!
//! ```text
//! request -> validate -> lookup -> cooldown -> dice -> ledger -> event log
//!                                                       (under one lock)
//! ```

pub mod agora;
pub mod cast;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod digest;
pub mod directory;
pub mod driver;
pub mod error;
pub mod evolution;
pub mod rate_limit;
pub mod resolver;

pub use agora::{
    Agora, AgoraBuilder, DecisionRequest, JoinOutcome, MessageRequest, RegisterRequest,
    RestoreReport,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AgoraConfig, ConfigError};
pub use driver::{RandomCast, ScriptPolicy, ScriptedDriver};
pub use error::AgoraError;
pub use resolver::{DecisionResolver, DiceSource, FixedDice, RandomDice};
