//! Projectile Pool
//!
//! Tracks every live projectile of both sides in spawn order, advances them by
//! their side's fixed per-step vector and retires them once they cross their
//! exit plane (a miss) or are consumed by the collision resolver.
//!
//! The pool is the only place projectiles are inserted or removed.

use std::fmt;
use std::time::Duration;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::combatant::Side;
use super::error::BattleError;

/// Stable identifier of a projectile, unique for the pool's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u64);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Travel rules for one side's projectiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileLane {
    /// Displacement applied every step
    pub step: [f32; 3],
    /// z coordinate past which a projectile has missed
    pub exit_z: f32,
}

impl ProjectileLane {
    pub fn step_vector(&self) -> Vec3 {
        Vec3::from_array(self.step)
    }

    /// Whether `z` reached or crossed the exit plane in the direction of travel
    pub fn has_exited(&self, z: f32) -> bool {
        if self.step[2] >= 0.0 {
            z >= self.exit_z
        } else {
            z <= self.exit_z
        }
    }
}

/// A live projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub owner: Side,
    pub position: Vec3,
    pub spawn_time: Duration,
}

/// Cooldown gate for player fire. Closed by a shot, reopened by the
/// cooldown timer.
#[derive(Debug, Clone, Copy, Default)]
struct CooldownGate {
    reopens_at: Option<Duration>,
}

/// Live projectiles of both sides
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    live: Vec<Projectile>,
    next_id: u64,
    player_lane: ProjectileLane,
    boss_lane: ProjectileLane,
    player_gate: CooldownGate,
}

impl ProjectilePool {
    pub fn new(player_lane: ProjectileLane, boss_lane: ProjectileLane) -> Self {
        Self {
            live: Vec::new(),
            next_id: 0,
            player_lane,
            boss_lane,
            player_gate: CooldownGate::default(),
        }
    }

    /// Spawn a projectile for `side` at `origin`.
    ///
    /// Player shots are refused with `CooldownActive` while the gate is closed;
    /// a successful player shot closes it until `cooldown` has passed and the
    /// owner calls `open_player_gate`. Boss shots are never gated here: the
    /// boss fires on the AI Director's cadence.
    pub fn fire(
        &mut self,
        side: Side,
        origin: Vec3,
        now: Duration,
        cooldown: Duration,
    ) -> Result<ProjectileId, BattleError> {
        if side == Side::Player {
            if let Some(reopens_at) = self.player_gate.reopens_at {
                let remaining = reopens_at.saturating_sub(now);
                return Err(BattleError::CooldownActive {
                    remaining_ms: remaining.as_millis() as u64,
                });
            }
            if !cooldown.is_zero() {
                self.player_gate.reopens_at = Some(now + cooldown);
            }
        }

        let id = ProjectileId(self.next_id);
        self.next_id += 1;
        self.live.push(Projectile {
            id,
            owner: side,
            position: origin,
            spawn_time: now,
        });
        Ok(id)
    }

    /// Reopen the player's fire gate
    pub fn open_player_gate(&mut self) {
        self.player_gate.reopens_at = None;
    }

    pub fn player_gate_open(&self) -> bool {
        self.player_gate.reopens_at.is_none()
    }

    /// Move every live projectile one step and retire the ones that crossed
    /// their exit plane. Returns the retired (missed) projectiles in spawn order.
    pub fn advance_all(&mut self) -> SmallVec<[(ProjectileId, Side); 4]> {
        let player_lane = self.player_lane;
        let boss_lane = self.boss_lane;
        let mut missed = SmallVec::new();

        for projectile in self.live.iter_mut() {
            let lane = match projectile.owner {
                Side::Player => &player_lane,
                Side::Boss => &boss_lane,
            };
            projectile.position += lane.step_vector();
            if lane.has_exited(projectile.position.z) {
                missed.push((projectile.id, projectile.owner));
            }
        }

        if !missed.is_empty() {
            self.live.retain(|p| !missed.iter().any(|(id, _)| *id == p.id));
        }
        missed
    }

    /// Remove a projectile. Returns false, changing nothing, if it was not live.
    pub fn retire(&mut self, id: ProjectileId) -> bool {
        match self.live.iter().position(|p| p.id == id) {
            Some(index) => {
                self.live.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove a batch of projectiles after a scan, preserving spawn order of
    /// the survivors. Returns how many were actually live.
    pub fn retire_all(&mut self, ids: &[ProjectileId]) -> usize {
        let before = self.live.len();
        self.live.retain(|p| !ids.contains(&p.id));
        before - self.live.len()
    }

    /// Live projectiles of one side, in spawn order
    pub fn live_of(&self, side: Side) -> impl Iterator<Item = &Projectile> + '_ {
        self.live.iter().filter(move |p| p.owner == side)
    }

    pub fn live(&self) -> &[Projectile] {
        &self.live
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.live.iter().find(|p| p.id == id)
    }

    pub fn count(&self, side: Side) -> usize {
        self.live_of(side).count()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop every projectile and reopen the gate
    pub fn clear(&mut self) {
        self.live.clear();
        self.player_gate = CooldownGate::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ProjectilePool {
        ProjectilePool::new(
            ProjectileLane {
                step: [0.0, 0.0, -0.5],
                exit_z: -14.0,
            },
            ProjectileLane {
                step: [0.0, 0.0, 0.5],
                exit_z: 0.0,
            },
        )
    }

    const COOLDOWN: Duration = Duration::from_millis(500);

    #[test]
    fn test_cooldown_gate_blocks_second_shot() {
        let mut pool = pool();
        let now = Duration::from_millis(100);

        assert!(pool.fire(Side::Player, Vec3::ZERO, now, COOLDOWN).is_ok());
        let later = now + Duration::from_millis(200);
        let second = pool.fire(Side::Player, Vec3::ZERO, later, COOLDOWN);

        assert_eq!(second, Err(BattleError::CooldownActive { remaining_ms: 300 }));
        assert_eq!(pool.count(Side::Player), 1);

        pool.open_player_gate();
        assert!(pool.fire(Side::Player, Vec3::ZERO, now + COOLDOWN, COOLDOWN).is_ok());
        assert_eq!(pool.count(Side::Player), 2);
    }

    #[test]
    fn test_boss_fire_is_not_gated() {
        let mut pool = pool();
        for _ in 0..5 {
            pool.fire(Side::Boss, Vec3::ZERO, Duration::ZERO, COOLDOWN).unwrap();
        }
        assert_eq!(pool.count(Side::Boss), 5);
        assert!(pool.player_gate_open());
    }

    #[test]
    fn test_zero_cooldown_never_closes_gate() {
        let mut pool = pool();
        pool.fire(Side::Player, Vec3::ZERO, Duration::ZERO, Duration::ZERO).unwrap();
        pool.fire(Side::Player, Vec3::ZERO, Duration::ZERO, Duration::ZERO).unwrap();
        assert_eq!(pool.count(Side::Player), 2);
    }

    #[test]
    fn test_projectile_retired_when_reaching_exit() {
        let mut pool = pool();
        let id = pool
            .fire(Side::Boss, Vec3::new(0.0, 1.0, -12.0), Duration::ZERO, COOLDOWN)
            .unwrap();

        // -12 + 0.5 * 23 = -0.5: still live
        for _ in 0..23 {
            assert!(pool.advance_all().is_empty());
        }
        assert!(pool.get(id).is_some());

        // 24th step lands exactly on 0
        let missed = pool.advance_all();
        assert_eq!(missed.as_slice(), &[(id, Side::Boss)]);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_each_side_uses_its_own_lane() {
        let mut pool = pool();
        let p = pool
            .fire(Side::Player, Vec3::new(0.0, 0.5, 8.0), Duration::ZERO, COOLDOWN)
            .unwrap();
        let b = pool
            .fire(Side::Boss, Vec3::new(0.0, 1.0, -12.0), Duration::ZERO, COOLDOWN)
            .unwrap();

        pool.advance_all();

        assert_eq!(pool.get(p).unwrap().position.z, 7.5);
        assert_eq!(pool.get(b).unwrap().position.z, -11.5);
    }

    #[test]
    fn test_retire_is_idempotent() {
        let mut pool = pool();
        let a = pool.fire(Side::Boss, Vec3::ZERO, Duration::ZERO, COOLDOWN).unwrap();
        let b = pool.fire(Side::Boss, Vec3::X, Duration::ZERO, COOLDOWN).unwrap();

        assert!(pool.retire(a));
        let after_first: Vec<_> = pool.live().to_vec();

        assert!(!pool.retire(a));
        assert_eq!(pool.live(), after_first.as_slice());
        assert_eq!(pool.live()[0].id, b);
    }

    #[test]
    fn test_retire_all_keeps_spawn_order() {
        let mut pool = pool();
        let ids: Vec<_> = (0..5)
            .map(|i| {
                pool.fire(Side::Boss, Vec3::new(i as f32, 0.0, 0.0), Duration::ZERO, COOLDOWN)
                    .unwrap()
            })
            .collect();

        assert_eq!(pool.retire_all(&[ids[1], ids[3], ids[3]]), 2);
        let remaining: Vec<_> = pool.live().iter().map(|p| p.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[4]]);
    }
}
