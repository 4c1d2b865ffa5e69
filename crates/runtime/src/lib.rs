//! Runtime orchestration for reservation/prediction battles.
//!
//! This crate wires the deterministic [`battle_core::BattleEngine`] to
//! asynchronous decision sources, an event bus and save repositories.
//! Consumers embed [`BattleSession`] to drive turns and subscribe to events.
//!
//! Modules are organized by responsibility:
//! - [`api`] exposes the provider traits and runtime error type
//! - [`events`] provides the topic-based event bus
//! - [`providers`] hosts the heuristic AI
//! - [`repository`] persists rosters between battles
//! - [`session`] runs turns and whole battles
pub mod api;
pub mod events;
pub mod providers;
pub mod repository;
pub mod session;

pub use api::{
    PassiveProvider, PredictionProvider, PredictionRequest, ProviderKind, ReservationChoice,
    ReservationProvider, ReservationRequest, Result, RuntimeError, ScriptedProvider,
};
pub use events::{BattleEvent, EventBus, Topic};
pub use providers::HeuristicAi;
pub use repository::{
    CombatantRecord, FileSaveRepository, InMemorySaveRepo, RepositoryError, RosterRecord,
    SaveRepository,
};
pub use session::{BattleReport, BattleSession, TurnSummary};
