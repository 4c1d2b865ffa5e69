//! Per-slot outcome records handed to the rendering collaborator.

use strum::{Display, IntoStaticStr};

/// Tag identifying how a slot played out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutcomeKind {
    /// Not resolved yet.
    #[default]
    Pending,
    Hit,
    Evaded,
    /// The defender's counter matched; the attacker takes the damage.
    Countered,
    /// The defender countered the wrong attack type and is hit.
    CounterMissed,
    /// An ally took the hit in the original target's place.
    Covered,
    /// A thrust went through the cover and hit the original target.
    CoverPierced,
    /// The attacker was defeated before its slot came up.
    AttackerDown,
}

impl OutcomeKind {
    pub fn tag(self) -> &'static str {
        self.into()
    }
}

/// Damage actually applied to one combatant by one slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageDealt {
    pub residual: u32,
    pub fatal: u32,
}

impl DamageDealt {
    pub const NONE: Self = Self {
        residual: 0,
        fatal: 0,
    };

    pub fn is_none(&self) -> bool {
        self.residual == 0 && self.fatal == 0
    }
}

/// Interaction template plus what actually happened.
///
/// Ratios are fractions of the base damage value; they are never negative.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    pub kind: OutcomeKind,
    pub attacker_residual_ratio: f32,
    pub attacker_fatal_ratio: f32,
    pub defender_residual_ratio: f32,
    pub defender_fatal_ratio: f32,
    /// Chance in `[0, 1]` that an Evade response succeeds.
    pub evade_rate: f32,

    pub attacker_anim_on_hit: Option<String>,
    pub defender_anim_on_hit: Option<String>,
    pub attacker_anim_on_evade: Option<String>,
    pub defender_anim_on_evade: Option<String>,

    /// Set by the resolver when the evade roll succeeded.
    pub evaded: bool,
    pub attacker_damage: DamageDealt,
    pub defender_damage: DamageDealt,
}

impl ActionOutcome {
    pub fn new(kind: OutcomeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_defender_ratios(mut self, residual: f32, fatal: f32) -> Self {
        self.defender_residual_ratio = residual.max(0.0);
        self.defender_fatal_ratio = fatal.max(0.0);
        self
    }

    pub fn with_attacker_ratios(mut self, residual: f32, fatal: f32) -> Self {
        self.attacker_residual_ratio = residual.max(0.0);
        self.attacker_fatal_ratio = fatal.max(0.0);
        self
    }

    pub fn with_evade_rate(mut self, evade_rate: f32) -> Self {
        self.evade_rate = evade_rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_hit_anims(mut self, attacker: &str, defender: &str) -> Self {
        self.attacker_anim_on_hit = Some(attacker.to_owned());
        self.defender_anim_on_hit = Some(defender.to_owned());
        self
    }

    pub fn with_evade_anims(mut self, attacker: &str, defender: &str) -> Self {
        self.attacker_anim_on_evade = Some(attacker.to_owned());
        self.defender_anim_on_evade = Some(defender.to_owned());
        self
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn hits_defender(&self) -> bool {
        self.defender_residual_ratio > 0.0 || self.defender_fatal_ratio > 0.0
    }

    pub fn hits_attacker(&self) -> bool {
        self.attacker_residual_ratio > 0.0 || self.attacker_fatal_ratio > 0.0
    }

    /// Marks a successful evade: no damage is applied to the defender.
    pub fn mark_evaded(&mut self) {
        self.kind = OutcomeKind::Evaded;
        self.evaded = true;
        self.defender_residual_ratio = 0.0;
        self.defender_fatal_ratio = 0.0;
    }
}
