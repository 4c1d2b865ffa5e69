//! StatBlock: per-combatant attributes and the dual-tier HP model.
//!
//! HP is split into two layers:
//!
//! ```text
//! [ residual (green) ][ fatal (red) ][ lost ]
//! |<------------------ max_hp ------------->|
//! ```
//!
//! Residual damage converts residual HP into fatal HP. Fatal damage drains the
//! fatal layer. A combatant is dead once both layers are empty.
//!
//! Amounts are unsigned, so a negative damage amount cannot be expressed.

use super::hands::HandsLedger;
use crate::config::BattleConfig;
use crate::state::AttackType;

/// Numeric attributes of one combatant.
///
/// # Invariants
///
/// - `residual_hp + fatal_hp <= max_hp` after any mutation
/// - display ratios are recomputed from HP after every HP change and are
///   never read back as authoritative
#[derive(Clone, Debug, PartialEq)]
pub struct StatBlock {
    max_hp: u32,
    residual_hp: u32,
    fatal_hp: u32,
    display_residual: f32,
    display_fatal: f32,

    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
    pub insight: i32,
    pub confuse: i32,
    pub intelligence: i32,
    pub max_reservation_per_turn: u32,

    pub hands: HandsLedger,

    pub no_ningu_speed_bonus_value: i32,
    /// Amount actually added to `speed` by the no-ningu bonus, if applied.
    no_ningu_applied: Option<i32>,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            max_hp: 0,
            residual_hp: 0,
            fatal_hp: 0,
            display_residual: 0.0,
            display_fatal: 0.0,
            attack: 0,
            defense: 0,
            speed: 0,
            insight: 0,
            confuse: 0,
            intelligence: 0,
            max_reservation_per_turn: BattleConfig::DEFAULT_MAX_RESERVATIONS,
            hands: HandsLedger::default(),
            no_ningu_speed_bonus_value: 0,
            no_ningu_applied: None,
        }
    }
}

impl StatBlock {
    /// Zeroed block (the state a character factory starts from).
    pub fn new() -> Self {
        Self::default()
    }

    /// Block at full health with the given maximum.
    pub fn with_max_hp(max_hp: u32) -> Self {
        let mut block = Self {
            max_hp,
            ..Self::default()
        };
        block.reset_hp();
        block
    }

    pub fn with_hands(mut self, hands: HandsLedger) -> Self {
        self.hands = hands;
        self
    }

    // ===== HP accessors =====

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn residual_hp(&self) -> u32 {
        self.residual_hp
    }

    pub fn fatal_hp(&self) -> u32 {
        self.fatal_hp
    }

    pub fn display_residual(&self) -> f32 {
        self.display_residual
    }

    pub fn display_fatal(&self) -> f32 {
        self.display_fatal
    }

    pub fn is_dead(&self) -> bool {
        self.residual_hp == 0 && self.fatal_hp == 0
    }

    // ===== HP mutation =====

    /// Changes the maximum and clamps both layers into it (residual first).
    pub fn set_max_hp(&mut self, max_hp: u32) {
        self.max_hp = max_hp;
        self.set_hp(self.residual_hp, self.fatal_hp);
    }

    /// Overwrites both layers, clamped so that `residual + fatal <= max_hp`.
    ///
    /// Residual takes priority; fatal fills whatever room is left.
    pub fn set_hp(&mut self, residual_hp: u32, fatal_hp: u32) {
        self.residual_hp = residual_hp.min(self.max_hp);
        self.fatal_hp = fatal_hp.min(self.max_hp - self.residual_hp);
        self.refresh_display();
    }

    /// Converts up to `amount` residual HP into fatal HP. Excess is lost.
    pub fn apply_residual_damage(&mut self, amount: u32) {
        let consume = self.residual_hp.min(amount);
        self.residual_hp -= consume;
        self.fatal_hp += consume;
        self.refresh_display();
    }

    /// Drains up to `amount` fatal HP. Never touches the residual layer.
    pub fn apply_fatal_damage(&mut self, amount: u32) {
        let consume = self.fatal_hp.min(amount);
        self.fatal_hp -= consume;
        self.refresh_display();
    }

    /// Residual conversion first, then fatal drain.
    pub fn apply_mixed_damage(&mut self, residual_amount: u32, fatal_amount: u32) {
        self.apply_residual_damage(residual_amount);
        self.apply_fatal_damage(fatal_amount);
    }

    /// Scripted death: empties both layers.
    pub fn kill_instantly(&mut self) {
        self.residual_hp = 0;
        self.fatal_hp = 0;
        self.refresh_display();
    }

    /// Full heal.
    pub fn reset_hp(&mut self) {
        self.residual_hp = self.max_hp;
        self.fatal_hp = 0;
        self.refresh_display();
    }

    fn refresh_display(&mut self) {
        if self.max_hp == 0 {
            self.display_residual = 0.0;
            self.display_fatal = 0.0;
            return;
        }
        let max = self.max_hp as f32;
        self.display_residual = (self.residual_hp as f32 / max).clamp(0.0, 1.0);
        self.display_fatal = (self.fatal_hp as f32 / max).clamp(0.0, 1.0);
    }

    // ===== Hands =====

    pub fn add_hands(&mut self, count: u32) {
        self.hands.add(count);
    }

    pub fn reset_hands(&mut self) {
        self.hands.reset();
    }

    pub fn remaining_hands(&self, attack: AttackType) -> u32 {
        self.hands.remaining(attack)
    }

    // ===== No-ningu speed bonus =====

    pub fn no_ningu_speed_bonus_applied(&self) -> bool {
        self.no_ningu_applied.is_some()
    }

    /// Toggles the speed bonus granted when no ninja tool is equipped.
    ///
    /// Repeating the current state is a no-op. Disabling subtracts exactly
    /// what enabling added, even if `no_ningu_speed_bonus_value` changed in
    /// between.
    pub fn apply_no_ningu_speed_bonus(&mut self, enabled: bool) {
        match (enabled, self.no_ningu_applied) {
            (true, None) => {
                let bonus = self.no_ningu_speed_bonus_value;
                self.speed = self.speed.saturating_add(bonus);
                self.no_ningu_applied = Some(bonus);
            }
            (false, Some(bonus)) => {
                self.speed = self.speed.saturating_sub(bonus);
                self.no_ningu_applied = None;
            }
            _ => {}
        }
    }

    /// Restores the applied bonus amount when rebuilding from a save.
    pub(crate) fn restore_no_ningu_applied(&mut self, applied: Option<i32>) {
        self.no_ningu_applied = applied;
    }

    pub(crate) fn no_ningu_applied_amount(&self) -> Option<i32> {
        self.no_ningu_applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_hp_invariant(block: &StatBlock) {
        assert!(block.residual_hp() + block.fatal_hp() <= block.max_hp());
    }

    #[test]
    fn residual_then_fatal_damage() {
        let mut block = StatBlock::with_max_hp(100);

        block.apply_residual_damage(30);
        assert_eq!((block.residual_hp(), block.fatal_hp()), (70, 30));

        block.apply_fatal_damage(50);
        assert_eq!((block.residual_hp(), block.fatal_hp()), (70, 0));
        assert_hp_invariant(&block);
    }

    #[test]
    fn residual_excess_is_lost() {
        let mut block = StatBlock::with_max_hp(40);
        block.apply_residual_damage(100);

        assert_eq!((block.residual_hp(), block.fatal_hp()), (0, 40));
        assert!(!block.is_dead());
        assert_hp_invariant(&block);
    }

    #[test]
    fn mixed_damage_converts_before_draining() {
        let mut block = StatBlock::with_max_hp(100);

        // Fatal pool is empty until the residual part refills it.
        block.apply_mixed_damage(60, 50);

        assert_eq!((block.residual_hp(), block.fatal_hp()), (40, 10));
        assert_hp_invariant(&block);
    }

    #[test]
    fn dead_only_when_both_layers_empty() {
        let mut block = StatBlock::with_max_hp(10);
        block.apply_mixed_damage(10, 9);
        assert!(!block.is_dead());

        block.apply_fatal_damage(1);
        assert!(block.is_dead());
    }

    #[test]
    fn kill_and_reset() {
        let mut block = StatBlock::with_max_hp(50);
        block.kill_instantly();
        assert!(block.is_dead());
        assert_eq!(block.display_residual(), 0.0);

        block.reset_hp();
        assert_eq!((block.residual_hp(), block.fatal_hp()), (50, 0));
        assert_eq!((block.display_residual(), block.display_fatal()), (1.0, 0.0));
    }

    #[test]
    fn display_ratios_follow_hp() {
        let mut block = StatBlock::with_max_hp(200);
        block.apply_residual_damage(50);

        assert_eq!(block.display_residual(), 0.75);
        assert_eq!(block.display_fatal(), 0.25);
    }

    #[test]
    fn set_hp_clamps_into_max() {
        let mut block = StatBlock::with_max_hp(100);
        block.set_hp(80, 50);
        assert_eq!((block.residual_hp(), block.fatal_hp()), (80, 20));

        block.set_max_hp(60);
        assert_eq!((block.residual_hp(), block.fatal_hp()), (60, 0));
        assert_hp_invariant(&block);
    }

    #[test]
    fn no_ningu_bonus_is_idempotent_and_reversible() {
        let mut block = StatBlock::with_max_hp(10);
        block.speed = 12;
        block.no_ningu_speed_bonus_value = 5;

        block.apply_no_ningu_speed_bonus(true);
        assert_eq!(block.speed, 17);
        block.apply_no_ningu_speed_bonus(true);
        assert_eq!(block.speed, 17);

        block.no_ningu_speed_bonus_value = 9;
        block.apply_no_ningu_speed_bonus(false);
        assert_eq!(block.speed, 12);
        block.apply_no_ningu_speed_bonus(false);
        assert_eq!(block.speed, 12);
    }

    #[test]
    fn clone_does_not_alias_hands() {
        let mut live = StatBlock::with_max_hp(10).with_hands(HandsLedger::uniform(2));
        let preview = live.clone();

        live.hands.try_consume(AttackType::Slash);
        live.apply_residual_damage(4);

        assert_eq!(preview.remaining_hands(AttackType::Slash), 2);
        assert_eq!(preview.residual_hp(), 10);
    }

    #[test]
    fn add_hands_never_exceeds_max() {
        let mut block = StatBlock::new().with_hands(HandsLedger::uniform(3));
        block.hands.set_remaining(AttackType::Thrust, 2);

        block.add_hands(5);

        assert_eq!(block.remaining_hands(AttackType::Thrust), 3);
    }
}
