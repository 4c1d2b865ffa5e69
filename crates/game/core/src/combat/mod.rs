//! Combat resolution.
//!
//! - `interaction`: the `(AttackType, ResponseType)` rule table
//! - `damage`: pluggable base-damage formula
//! - `outcome`: per-slot records for the rendering collaborator
//! - `resolver`: walks the turn's slots in order and mutates stat blocks

pub mod damage;
pub mod interaction;
pub mod outcome;
pub mod resolver;

pub use damage::{AttackMinusDefense, DamageFormula, scale_damage};
pub use interaction::{HitRatios, InteractionTable};
pub use outcome::{ActionOutcome, DamageDealt, OutcomeKind};
pub use resolver::{OutcomeResolver, SlotResolution, TurnResolution};
