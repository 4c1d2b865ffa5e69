//! Closed enumerations driving the attack/response interaction table.

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// The three attack families. Each has its own hands budget.
///
/// Variant order is the index into per-type arrays (see [`AttackType::index`]).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumCount, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttackType {
    Thrust,
    Slash,
    Down,
}

impl AttackType {
    pub const ALL: [AttackType; AttackType::COUNT] =
        [AttackType::Thrust, AttackType::Slash, AttackType::Down];

    /// Ordinal used to index fixed-size per-type arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The counter response that beats this attack, if any. Thrust has none.
    pub const fn countered_by(self) -> Option<ResponseType> {
        match self {
            AttackType::Thrust => None,
            AttackType::Slash => Some(ResponseType::CounterSlash),
            AttackType::Down => Some(ResponseType::CounterDown),
        }
    }
}

/// Defender's answer to a single reservation slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ResponseType {
    /// Undefended.
    #[default]
    None,
    /// An ally steps in and takes the slot.
    Cover,
    Evade,
    CounterSlash,
    CounterDown,
}

impl ResponseType {
    /// Hand type consumed by a counter response.
    pub const fn counter_hand(self) -> Option<AttackType> {
        match self {
            ResponseType::CounterSlash => Some(AttackType::Slash),
            ResponseType::CounterDown => Some(AttackType::Down),
            _ => None,
        }
    }

    pub const fn is_counter(self) -> bool {
        self.counter_hand().is_some()
    }
}
