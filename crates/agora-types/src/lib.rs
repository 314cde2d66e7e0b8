//! Shared type definitions for the Agora simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Agora workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for a dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier wrappers (agent names, society slugs, UUID ids)
//! - [`enums`] -- Event kinds, judgment bands, evolution tiers, genres
//! - [`structs`] -- Societies, agents, events, and derived read models

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{EventKind, EvolutionTier, Genre, Judgment};
pub use ids::{AgentName, DigestId, EventId, SocietyId};
pub use structs::{
    Agent, AgentProfile, Article, DecisionDetails, Digest, EconomicImpact, EconomySnapshot,
    Editorial, Event, EventPayload, EvolutionFactors, EvolutionScore, ImpactDisplay, JoinDetails,
    MessageDetails, PressProfile, Society, SocietySummary, Stats,
};
