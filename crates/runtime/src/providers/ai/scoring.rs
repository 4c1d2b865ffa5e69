//! Scoring functions for evaluating attack and response candidates.
//!
//! All scoring functions are pure and return a score from 0-100, where 50
//! means "no expected advantage either way".

use battle_core::{AttackType, CombatFlags, Combatant, InteractionTable, ResponseType};

/// Weight of fatal damage relative to residual damage.
const FATAL_WEIGHT: f32 = 2.0;
/// Score change per unit of weighted base damage.
const SCALE: f32 = 20.0;
/// Penalty for spending a limited resource (counter hand, cover charge).
const RESOURCE_COST: u32 = 5;

fn harm(residual: f32, fatal: f32) -> f32 {
    residual + FATAL_WEIGHT * fatal
}

fn to_score(value: f32) -> u32 {
    (50.0 + value * SCALE).clamp(0.0, 100.0).round() as u32
}

/// Expected harm to the defending side minus harm to the attacker, in units
/// of base damage.
pub fn net_harm(
    table: &InteractionTable,
    attack: AttackType,
    response: ResponseType,
    attacker_flags: CombatFlags,
) -> f32 {
    let outcome = table.outcome_for(attack, response, attacker_flags);
    let hit_chance = 1.0 - outcome.evade_rate;
    harm(outcome.defender_residual_ratio, outcome.defender_fatal_ratio) * hit_chance
        - harm(outcome.attacker_residual_ratio, outcome.attacker_fatal_ratio)
}

/// Whether `responder` can pay for `response` right now.
pub fn can_afford(responder: &Combatant, response: ResponseType, cover_available: bool) -> bool {
    match response {
        ResponseType::None | ResponseType::Evade => true,
        ResponseType::Cover => cover_available,
        ResponseType::CounterSlash | ResponseType::CounterDown => {
            responder.flags().contains(CombatFlags::UNLIMITED_COUNTER)
                || response
                    .counter_hand()
                    .is_some_and(|hand| responder.stats.hands.has(hand))
        }
    }
}

/// Scores an attack against a defender assumed to answer it as well as it can.
pub fn score_attack(
    table: &InteractionTable,
    attack: AttackType,
    attacker_flags: CombatFlags,
    defender: &Combatant,
    cover_available: bool,
) -> u32 {
    let worst = RESPONSES
        .iter()
        .filter(|&&response| can_afford(defender, response, cover_available))
        .map(|&response| net_harm(table, attack, response, attacker_flags))
        .fold(f32::INFINITY, f32::min);
    to_score(worst)
}

/// Scores a response for the defending side.
///
/// An unknown (unrevealed) attack is scored against every attack type
/// equally.
pub fn score_response(
    table: &InteractionTable,
    attack: Option<AttackType>,
    response: ResponseType,
    attacker_flags: CombatFlags,
) -> u32 {
    let expected = match attack {
        Some(attack) => net_harm(table, attack, response, attacker_flags),
        None => {
            AttackType::ALL
                .iter()
                .map(|&attack| net_harm(table, attack, response, attacker_flags))
                .sum::<f32>()
                / AttackType::ALL.len() as f32
        }
    };
    let score = to_score(-expected);
    match response {
        ResponseType::None | ResponseType::Evade => score,
        _ => score.saturating_sub(RESOURCE_COST),
    }
}

/// Responses in preference order for ties.
pub const RESPONSES: [ResponseType; 5] = [
    ResponseType::Evade,
    ResponseType::CounterSlash,
    ResponseType::CounterDown,
    ResponseType::Cover,
    ResponseType::None,
];
