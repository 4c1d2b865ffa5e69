use crate::state::{CombatantId, Side};

use super::BattleEngine;

/// Turn scheduling queries for BattleEngine.
impl BattleEngine {
    /// Living combatants in acting order: highest speed first, lowest id on ties.
    pub fn turn_order(&self) -> Vec<CombatantId> {
        let mut order: Vec<_> = self
            .roster
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| (c.stats.speed, c.id))
            .collect();
        order.sort_by(|(speed_a, id_a), (speed_b, id_b)| {
            speed_b.cmp(speed_a).then(id_a.cmp(id_b))
        });
        order.into_iter().map(|(_, id)| id).collect()
    }

    /// Whether one side (or both) has no living combatant left.
    pub fn is_over(&self) -> bool {
        self.roster.is_side_defeated(Side::Player) || self.roster.is_side_defeated(Side::Enemy)
    }

    /// The surviving side once the battle is over. `None` while both sides
    /// stand, and on a mutual wipe.
    pub fn winner(&self) -> Option<Side> {
        let player_down = self.roster.is_side_defeated(Side::Player);
        let enemy_down = self.roster.is_side_defeated(Side::Enemy);
        match (player_down, enemy_down) {
            (false, true) => Some(Side::Player),
            (true, false) => Some(Side::Enemy),
            _ => None,
        }
    }

    /// First living opponent of `actor` in roster order.
    pub fn default_target(&self, actor: CombatantId) -> Option<CombatantId> {
        let side = self.roster.get(actor)?.side;
        self.roster.living(side.opponent()).next().map(|c| c.id)
    }
}
