//! Upgrade Store
//!
//! Points earned by beating the boss buy levels in three upgrades, each of
//! which shifts one battle cadence in the player's favor. The store writes
//! nothing into a running battle: `difficulty()` is read when the next
//! session starts. Progress is in-memory only.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::Difficulty;

/// Highest level of every upgrade
pub const MAX_UPGRADE_LEVEL: u8 = 5;

/// Player fire cooldown never drops below this
pub const MIN_PLAYER_FIRE_COOLDOWN_MS: u64 = 100;

/// Purchasable upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Shorter player fire cooldown
    QuickDraw,
    /// Longer boss fire interval
    BossFireDelay,
    /// Longer boss move interval
    BossSluggish,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::QuickDraw,
        UpgradeKind::BossFireDelay,
        UpgradeKind::BossSluggish,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::QuickDraw => "Quick Draw",
            UpgradeKind::BossFireDelay => "Jammed Cannon",
            UpgradeKind::BossSluggish => "Heavy Boots",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UpgradeKind::QuickDraw => "-75ms player fire cooldown per level",
            UpgradeKind::BossFireDelay => "+150ms between boss shots per level",
            UpgradeKind::BossSluggish => "+250ms between boss moves per level",
        }
    }

    fn index(self) -> usize {
        match self {
            UpgradeKind::QuickDraw => 0,
            UpgradeKind::BossFireDelay => 1,
            UpgradeKind::BossSluggish => 2,
        }
    }

    /// Points needed to reach `level`
    pub fn cost(self, level: u8) -> u32 {
        if level <= 2 {
            1
        } else {
            2
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("not enough upgrade points ({available} available, {needed} needed)")]
    NoPoints { available: u32, needed: u32 },

    #[error("{} is already at max level", .0.name())]
    MaxLevel(UpgradeKind),
}

/// Upgrade levels and unspent points
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct UpgradeStore {
    base: Difficulty,
    levels: [u8; 3],
    points: u32,
}

impl Default for UpgradeStore {
    fn default() -> Self {
        Self::new(Difficulty::default(), 0)
    }
}

impl UpgradeStore {
    pub fn new(base: Difficulty, starting_points: u32) -> Self {
        Self {
            base,
            levels: [0; 3],
            points: starting_points,
        }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn level(&self, kind: UpgradeKind) -> u8 {
        self.levels[kind.index()]
    }

    /// Next level of `kind`, if not maxed
    pub fn next_level(&self, kind: UpgradeKind) -> Option<u8> {
        let level = self.level(kind);
        (level < MAX_UPGRADE_LEVEL).then_some(level + 1)
    }

    pub fn can_afford(&self, kind: UpgradeKind) -> bool {
        self.next_level(kind)
            .is_some_and(|next| self.points >= kind.cost(next))
    }

    /// One point per boss defeated
    pub fn award_win(&mut self) {
        self.points += 1;
        info!("Upgrade point awarded ({} available)", self.points);
    }

    /// Spend points on the next level of `kind`. Returns the new level.
    pub fn purchase(&mut self, kind: UpgradeKind) -> Result<u8, UpgradeError> {
        let next = self.next_level(kind).ok_or(UpgradeError::MaxLevel(kind))?;
        let needed = kind.cost(next);
        if self.points < needed {
            return Err(UpgradeError::NoPoints {
                available: self.points,
                needed,
            });
        }
        self.points -= needed;
        self.levels[kind.index()] = next;
        info!("Purchased {} level {} ({} points left)", kind.name(), next, self.points);
        Ok(next)
    }

    /// Cadences for the next battle
    pub fn difficulty(&self) -> Difficulty {
        let quick_draw = self.level(UpgradeKind::QuickDraw) as u64;
        let fire_delay = self.level(UpgradeKind::BossFireDelay) as u64;
        let sluggish = self.level(UpgradeKind::BossSluggish) as u64;

        let base_cooldown = self.base.player_fire_cooldown_ms;
        let player_fire_cooldown_ms = if base_cooldown == 0 {
            0
        } else {
            base_cooldown
                .saturating_sub(75 * quick_draw)
                .max(MIN_PLAYER_FIRE_COOLDOWN_MS.min(base_cooldown))
        };

        Difficulty {
            player_fire_cooldown_ms,
            boss_fire_interval_ms: self.base.boss_fire_interval_ms.saturating_add(150 * fire_delay),
            boss_move_interval_ms: self.base.boss_move_interval_ms.saturating_add(250 * sluggish),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_rises_after_level_two() {
        assert_eq!(UpgradeKind::QuickDraw.cost(1), 1);
        assert_eq!(UpgradeKind::QuickDraw.cost(2), 1);
        assert_eq!(UpgradeKind::QuickDraw.cost(3), 2);
        assert_eq!(UpgradeKind::QuickDraw.cost(5), 2);
    }

    #[test]
    fn test_quick_draw_floor() {
        let mut store = UpgradeStore::new(Difficulty::default(), 100);
        for _ in 0..MAX_UPGRADE_LEVEL {
            store.purchase(UpgradeKind::QuickDraw).unwrap();
        }
        // 500 - 5 * 75 = 125
        assert_eq!(store.difficulty().player_fire_cooldown_ms, 125);

        let tight = Difficulty {
            player_fire_cooldown_ms: 200,
            ..Default::default()
        };
        let mut store = UpgradeStore::new(tight, 100);
        for _ in 0..MAX_UPGRADE_LEVEL {
            store.purchase(UpgradeKind::QuickDraw).unwrap();
        }
        assert_eq!(store.difficulty().player_fire_cooldown_ms, MIN_PLAYER_FIRE_COOLDOWN_MS);
    }

    #[test]
    fn test_huge_base_interval_saturates() {
        let base = Difficulty {
            boss_fire_interval_ms: u64::MAX - 10,
            boss_move_interval_ms: u64::MAX,
            ..Default::default()
        };
        let mut store = UpgradeStore::new(base, 10);
        store.purchase(UpgradeKind::BossFireDelay).unwrap();
        store.purchase(UpgradeKind::BossSluggish).unwrap();

        let difficulty = store.difficulty();
        assert_eq!(difficulty.boss_fire_interval_ms, u64::MAX);
        assert_eq!(difficulty.boss_move_interval_ms, u64::MAX);
    }

    #[test]
    fn test_error_messages() {
        let err = UpgradeError::MaxLevel(UpgradeKind::BossSluggish);
        assert_eq!(err.to_string(), "Heavy Boots is already at max level");
    }
}
