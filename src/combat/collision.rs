//! Collision & Damage Resolver
//!
//! Matches one side's projectiles against the opposing combatant. This is the
//! only code path that lowers a combatant's health.

use bevy::math::Vec3;
use smallvec::SmallVec;

use super::combatant::Combatant;
use super::combatant::Side;
use super::projectiles::{ProjectileId, ProjectilePool};

/// Proximity test on the floor plane: square hit box of `half_extent` around
/// `target`, y ignored.
pub fn overlaps(projectile: Vec3, target: Vec3, half_extent: f32) -> bool {
    (projectile.x - target.x).abs() <= half_extent && (projectile.z - target.z).abs() <= half_extent
}

/// Outcome of resolving one side's projectiles against a defender
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    /// Consumed projectiles, in spawn order
    pub hits: SmallVec<[ProjectileId; 2]>,
    /// Defender health after the hits (clamped)
    pub remaining_health: i32,
    /// Defender reached zero health during this resolution
    pub defeated: bool,
}

impl HitReport {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Apply every hit of `attacker`'s projectiles on `defender`.
///
/// Projectiles are tested in spawn order; each hit costs exactly one health
/// point and consumes the projectile. Several hits in the same step are all
/// applied. A projectile never hits its own side.
pub fn resolve(
    pool: &mut ProjectilePool,
    attacker: Side,
    defender: &mut Combatant,
    half_extent: f32,
) -> HitReport {
    let mut report = HitReport {
        remaining_health: defender.health(),
        ..Default::default()
    };
    if defender.side == attacker {
        return report;
    }

    let was_defeated = defender.is_defeated();
    for projectile in pool.live_of(attacker) {
        if overlaps(projectile.position, defender.position, half_extent) {
            report.hits.push(projectile.id);
        }
    }
    if report.hits.is_empty() {
        return report;
    }

    for _ in &report.hits {
        report.remaining_health = defender.take_hit();
    }
    pool.retire_all(&report.hits);
    report.defeated = !was_defeated && defender.is_defeated();
    report
}
