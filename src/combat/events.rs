//! Battle events
//!
//! What the session tells its observers. The HUD listens for health and
//! outcome changes, the scene reads `FrameSnapshot` every frame. Observers
//! never write back into the session.

use bevy::math::Vec3;
use bevy::prelude::Event;

use super::combatant::Side;
use super::projectiles::ProjectileId;
use super::session::BattleMode;

/// Terminal result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BattleOutcome {
    PlayerWon,
    BossWon,
}

impl BattleOutcome {
    pub fn winner(self) -> Side {
        match self {
            BattleOutcome::PlayerWon => Side::Player,
            BattleOutcome::BossWon => Side::Boss,
        }
    }
}

/// Event emitted by a `BattleSession`
#[derive(Event, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    /// A session entered Running
    Started { mode: BattleMode },
    /// Either health pool changed
    HealthChanged { player: i32, boss: i32 },
    ProjectileFired { id: ProjectileId, owner: Side },
    /// A projectile crossed its exit plane without hitting
    ProjectileMissed { id: ProjectileId, owner: Side },
    /// A projectile was consumed by the defender
    Hit {
        id: ProjectileId,
        defender: Side,
        remaining_health: i32,
    },
    BossRepositioned { target_x: f32 },
    /// Terminal transition; sent exactly once per session that ends this way
    Outcome(BattleOutcome),
    /// Forced end with no winner
    Aborted,
}

/// Positions of everything on the field for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSnapshot {
    pub player: Vec3,
    pub boss: Vec3,
    pub projectiles: Vec<(ProjectileId, Side, Vec3)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_names_winner() {
        assert_eq!(BattleOutcome::PlayerWon.winner(), Side::Player);
        assert_eq!(BattleOutcome::BossWon.winner(), Side::Boss);
    }
}
