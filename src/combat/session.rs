//! Battle State Machine
//!
//! `BattleSession` owns everything one encounter touches: both combatants, the
//! projectile pool, the timer service and every handle armed on it, the AI
//! Director, the boss reposition tween and the input buffer. Nothing about a
//! session lives outside this struct, so one encounter cannot leak into the
//! next.
//!
//! ## States
//!
//! ```text
//!            start                threshold
//!   Idle ───────────▶ Running ───────────────▶ PlayerWon / BossWon
//!    ▲                  │                            │
//!    └──── end/abort ───┘          start (resets) ───┘
//! ```
//!
//! Every handle armed since `start` is held in `timers` and cancelled exactly
//! once when the session leaves Running, whether through the health threshold
//! or an abort.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bevy::log::{debug, info, warn};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::clock::{FiredTimer, TimerHandle, TimerKind, TimerService};
use super::collision::{self, HitReport};
use super::combatant::{apply_movement_intent, Combatant, Side};
use super::constants::SIM_TICK;
use super::director::{AiDirector, DirectorState, RepositionTween};
use super::error::BattleError;
use super::events::{BattleEvent, BattleOutcome, FrameSnapshot};
use super::input::{BattleAction, InputBuffer};
use super::log::{BattleLog, BattleLogEventType};
use super::projectiles::ProjectilePool;
use super::rng::GameRng;
use super::tuning::{BattleTuning, Difficulty};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattleState {
    #[default]
    Idle,
    Running,
    PlayerWon,
    BossWon,
}

/// Which encounter the hub asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleMode {
    /// Full AI: the boss fires and repositions
    #[default]
    Boss,
    /// The boss repositions but never fires
    Training,
}

impl BattleMode {
    pub fn name(self) -> &'static str {
        match self {
            BattleMode::Boss => "boss",
            BattleMode::Training => "training",
        }
    }

    pub fn boss_fires(self) -> bool {
        self == BattleMode::Boss
    }
}

impl fmt::Display for BattleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BattleMode {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boss" => Ok(BattleMode::Boss),
            "training" => Ok(BattleMode::Training),
            _ => Err(BattleError::InvalidMode(s.to_string())),
        }
    }
}

/// Running totals for the encounter report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleStats {
    pub player_shots: u32,
    pub boss_shots: u32,
    /// Player projectiles that hit the boss
    pub player_hits: u32,
    /// Boss projectiles that hit the player
    pub boss_hits: u32,
    pub misses: u32,
}

/// One encounter, from `start` to an outcome or abort
#[derive(Resource)]
pub struct BattleSession {
    state: BattleState,
    mode: BattleMode,
    tuning: BattleTuning,
    difficulty: Difficulty,
    player: Combatant,
    boss: Combatant,
    projectiles: ProjectilePool,
    clock: TimerService,
    /// Every handle armed since the last `start`
    timers: SmallVec<[TimerHandle; 4]>,
    director: AiDirector,
    boss_tween: Option<RepositionTween>,
    input: InputBuffer,
    rng: GameRng,
    events: Vec<BattleEvent>,
    log: BattleLog,
    accumulator: Duration,
    match_time: Duration,
    ticks: u64,
    stats: BattleStats,
}

impl Default for BattleSession {
    fn default() -> Self {
        Self::new(BattleTuning::default(), GameRng::default())
    }
}

impl BattleSession {
    pub fn new(tuning: BattleTuning, rng: GameRng) -> Self {
        let player = Combatant::new(
            Side::Player,
            tuning.player_spawn(),
            tuning.player_bounds(),
            tuning.player_max_health,
        );
        let boss = Combatant::new(
            Side::Boss,
            tuning.boss_spawn(),
            tuning.boss_bounds(),
            tuning.boss_max_health,
        );
        let projectiles = ProjectilePool::new(tuning.player_lane, tuning.boss_lane);

        Self {
            state: BattleState::Idle,
            mode: BattleMode::default(),
            difficulty: tuning.difficulty,
            tuning,
            player,
            boss,
            projectiles,
            clock: TimerService::new(),
            timers: SmallVec::new(),
            director: AiDirector::default(),
            boss_tween: None,
            input: InputBuffer::default(),
            rng,
            events: Vec::new(),
            log: BattleLog::default(),
            accumulator: Duration::ZERO,
            match_time: Duration::ZERO,
            ticks: 0,
            stats: BattleStats::default(),
        }
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn mode(&self) -> BattleMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.state == BattleState::Running
    }

    /// Terminal outcome, if the session ended by the health threshold
    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self.state {
            BattleState::PlayerWon => Some(BattleOutcome::PlayerWon),
            BattleState::BossWon => Some(BattleOutcome::BossWon),
            _ => None,
        }
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn boss(&self) -> &Combatant {
        &self.boss
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn clock(&self) -> &TimerService {
        &self.clock
    }

    /// Handles armed since `start` and not yet cancelled or expired
    pub fn armed_timers(&self) -> &[TimerHandle] {
        &self.timers
    }

    pub fn director(&self) -> &AiDirector {
        &self.director
    }

    pub fn tuning(&self) -> &BattleTuning {
        &self.tuning
    }

    /// Cadences captured at the last `start`
    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn stats(&self) -> &BattleStats {
        &self.stats
    }

    /// Simulated time since `start`
    pub fn match_time(&self) -> Duration {
        self.match_time
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng.seed
    }

    /// Return to a fresh Idle session: full health, spawn positions, no
    /// projectiles, no intents, director Idle, no tween. Calling it twice in
    /// a row changes nothing the second time.
    pub fn reset(&mut self) -> Result<(), BattleError> {
        if self.is_running() {
            return Err(BattleError::AlreadyRunning);
        }

        // Nothing should be held outside Running; sweep anyway
        self.cancel_held_timers();
        self.player.reset();
        self.boss.reset();
        self.projectiles.clear();
        self.input.clear();
        self.director.reset();
        self.boss_tween = None;
        self.events.clear();
        self.log.clear();
        self.accumulator = Duration::ZERO;
        self.match_time = Duration::ZERO;
        self.ticks = 0;
        self.stats = BattleStats::default();
        self.state = BattleState::Idle;
        Ok(())
    }

    /// Begin an encounter.
    ///
    /// Refused with `AlreadyRunning` while Running, `InvalidMode` for an
    /// unknown mode string and `InvalidDifficulty` for zero boss intervals.
    /// A refused start leaves the session exactly as it was.
    pub fn start(&mut self, mode: &str, difficulty: Difficulty) -> Result<(), BattleError> {
        if self.is_running() {
            warn!("Battle start refused: a session is already running");
            return Err(BattleError::AlreadyRunning);
        }
        let mode: BattleMode = mode.parse().inspect_err(|e| {
            warn!("Battle start refused: {}", e);
        })?;
        difficulty.validate().inspect_err(|e| {
            warn!("Battle start refused: {}", e);
        })?;

        self.reset()?;
        self.mode = mode;
        self.difficulty = difficulty;

        let armed = self.director.activate(
            &mut self.clock,
            difficulty.boss_fire_interval(),
            difficulty.boss_move_interval(),
            mode.boss_fires(),
        );
        self.timers.extend(armed);
        self.state = BattleState::Running;

        info!(
            "Battle started: mode={}, player cooldown {}ms, boss fire every {}ms, boss move every {}ms",
            mode,
            difficulty.player_fire_cooldown_ms,
            difficulty.boss_fire_interval_ms,
            difficulty.boss_move_interval_ms
        );
        self.log.log(
            BattleLogEventType::MatchEvent,
            format!("Battle started ({} mode)", mode),
        );
        self.events.push(BattleEvent::Started { mode });
        self.push_health();
        Ok(())
    }

    /// Forced end with no winner. Returns false if the session was not Running.
    pub fn end(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.teardown();
        self.state = BattleState::Idle;

        info!(
            "Battle aborted after {:.2}s (player {} / boss {})",
            self.match_time.as_secs_f32(),
            self.player.health(),
            self.boss.health()
        );
        self.log
            .log(BattleLogEventType::MatchEvent, "Battle aborted".to_string());
        self.events.push(BattleEvent::Aborted);
        true
    }

    /// Navigation or Escape while Running
    pub fn abort(&mut self) -> bool {
        self.end()
    }

    /// Feed one input edge. Ignored unless Running.
    pub fn set_intent(&mut self, action: BattleAction, active: bool) {
        if !self.is_running() {
            debug!("Ignoring {:?} input: battle is {:?}", action, self.state);
            return;
        }
        self.input.signal(action, active);
    }

    /// Accumulate host frame time and run as many whole steps as fit.
    /// Returns the number of steps taken.
    pub fn update(&mut self, dt: Duration) -> u32 {
        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= SIM_TICK {
            self.accumulator -= SIM_TICK;
            self.step();
            steps += 1;
        }
        steps
    }

    /// Run exactly one simulation step.
    ///
    /// Timers advance even outside Running. With no handles held that is a
    /// no-op; a leaked handle would keep acting here.
    pub fn step(&mut self) {
        let dt = SIM_TICK;
        let running = self.is_running();

        if running {
            self.ticks += 1;
            self.match_time += dt;
            self.log.match_time = self.match_time.as_secs_f32();
            self.apply_player_intents();
        }

        let fired = self.clock.advance(dt);
        for timer in fired {
            self.dispatch_timer(timer);
        }

        if !self.is_running() {
            return;
        }

        if let Some(tween) = self.boss_tween.as_mut() {
            self.boss.position.x = tween.advance(dt);
            if tween.is_finished() {
                self.boss_tween = None;
            }
        }

        for (id, owner) in self.projectiles.advance_all() {
            self.stats.misses += 1;
            self.log.log(
                BattleLogEventType::Miss,
                format!("{} shot {} left the arena", owner.name(), id),
            );
            self.events.push(BattleEvent::ProjectileMissed { id, owner });
        }

        let half_extent = self.tuning.hit_half_extent;
        let on_boss =
            collision::resolve(&mut self.projectiles, Side::Player, &mut self.boss, half_extent);
        let on_player =
            collision::resolve(&mut self.projectiles, Side::Boss, &mut self.player, half_extent);
        self.record_hits(Side::Boss, &on_boss);
        self.record_hits(Side::Player, &on_player);
        if !on_boss.is_empty() || !on_player.is_empty() {
            self.push_health();
        }

        // Player defeat first: a double knockout goes to the boss
        if on_player.defeated {
            self.finish(BattleOutcome::BossWon);
        } else if on_boss.defeated {
            self.finish(BattleOutcome::PlayerWon);
        }
    }

    /// Positions of everything on the field
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            player: self.player.position,
            boss: self.boss.position,
            projectiles: self
                .projectiles
                .live()
                .iter()
                .map(|p| (p.id, p.owner, p.position))
                .collect(),
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    fn apply_player_intents(&mut self) {
        let intents = self.input.snapshot();

        for intent in intents.move_intents() {
            apply_movement_intent(&mut self.player, intent, self.tuning.player_speed);
        }
        if intents.is_active(BattleAction::Jump) {
            self.player.jump(self.tuning.jump_velocity);
        }
        self.player.apply_gravity();

        if intents.is_active(BattleAction::Fire) {
            self.try_player_fire();
        }
    }

    fn try_player_fire(&mut self) {
        let cooldown = self.difficulty.player_fire_cooldown();
        match self
            .projectiles
            .fire(Side::Player, self.player.position, self.match_time, cooldown)
        {
            Ok(id) => {
                if !cooldown.is_zero() {
                    let handle = self.clock.schedule_once(cooldown, TimerKind::PlayerCooldown);
                    self.timers.push(handle);
                }
                self.stats.player_shots += 1;
                self.log.log(
                    BattleLogEventType::Fire,
                    format!("Player fires {} at x={:.2}", id, self.player.position.x),
                );
                self.events.push(BattleEvent::ProjectileFired {
                    id,
                    owner: Side::Player,
                });
            }
            Err(e) => debug!("Player fire rejected: {}", e),
        }
    }

    fn dispatch_timer(&mut self, timer: FiredTimer) {
        if timer.expired {
            self.timers.retain(|h| *h != timer.handle);
        }
        let director_active = self.director.state() == DirectorState::Active;
        if !director_active && timer.kind != TimerKind::PlayerCooldown {
            warn!(
                "Timer {} ({:?}) fired while battle is {:?}",
                timer.handle, timer.kind, self.state
            );
        }

        match timer.kind {
            TimerKind::BossFire => {
                let origin = self.boss.position;
                match self
                    .projectiles
                    .fire(Side::Boss, origin, self.match_time, Duration::ZERO)
                {
                    Ok(id) => {
                        self.stats.boss_shots += 1;
                        self.log.log(
                            BattleLogEventType::Fire,
                            format!("Boss fires {} at x={:.2}", id, origin.x),
                        );
                        self.events.push(BattleEvent::ProjectileFired {
                            id,
                            owner: Side::Boss,
                        });
                    }
                    Err(e) => debug!("Boss fire rejected: {}", e),
                }
            }
            TimerKind::BossReposition => {
                let order = self.director.plan_reposition(
                    &mut self.rng,
                    &self.boss.bounds,
                    self.tuning.reposition_tween(),
                );
                self.boss_tween = Some(RepositionTween::new(self.boss.position.x, order));
                self.log.log(
                    BattleLogEventType::Reposition,
                    format!("Boss moves to x={:.2}", order.target_x),
                );
                self.events.push(BattleEvent::BossRepositioned {
                    target_x: order.target_x,
                });
            }
            TimerKind::PlayerCooldown => self.projectiles.open_player_gate(),
        }
    }

    fn record_hits(&mut self, defender: Side, report: &HitReport) {
        for id in &report.hits {
            match defender {
                Side::Boss => self.stats.player_hits += 1,
                Side::Player => self.stats.boss_hits += 1,
            }
            self.log.log(
                BattleLogEventType::Hit,
                format!(
                    "{} shot {} hits {} ({} left)",
                    defender.opponent().name(),
                    id,
                    defender.name(),
                    report.remaining_health
                ),
            );
            self.events.push(BattleEvent::Hit {
                id: *id,
                defender,
                remaining_health: report.remaining_health,
            });
        }
    }

    fn push_health(&mut self) {
        self.events.push(BattleEvent::HealthChanged {
            player: self.player.health(),
            boss: self.boss.health(),
        });
    }

    /// Health threshold reached: stop everything and record the winner
    fn finish(&mut self, outcome: BattleOutcome) {
        self.teardown();
        self.state = match outcome {
            BattleOutcome::PlayerWon => BattleState::PlayerWon,
            BattleOutcome::BossWon => BattleState::BossWon,
        };

        info!(
            "Battle over after {:.2}s: {} wins (player {} / boss {})",
            self.match_time.as_secs_f32(),
            outcome.winner().name(),
            self.player.health(),
            self.boss.health()
        );
        self.log.log(
            BattleLogEventType::MatchEvent,
            format!("{} wins", outcome.winner().name()),
        );
        self.events.push(BattleEvent::Outcome(outcome));
    }

    /// Leave Running: cancel every held timer, stop the director, drop the
    /// tween and any pending intents
    fn teardown(&mut self) {
        self.cancel_held_timers();
        self.director.stop();
        self.boss_tween = None;
        self.input.clear();
    }

    fn cancel_held_timers(&mut self) {
        for handle in self.timers.drain(..) {
            if let Err(e) = self.clock.cancel(handle) {
                debug!("Skipping cancel: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> BattleSession {
        BattleSession::new(BattleTuning::default(), GameRng::from_seed(7))
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("boss".parse::<BattleMode>(), Ok(BattleMode::Boss));
        assert_eq!(" Training ".parse::<BattleMode>(), Ok(BattleMode::Training));
        assert_eq!(
            "arena".parse::<BattleMode>(),
            Err(BattleError::InvalidMode("arena".to_string()))
        );
    }

    #[test]
    fn test_start_arms_director_timers() {
        let mut s = session();
        s.start("boss", Difficulty::default()).unwrap();

        assert!(s.is_running());
        assert_eq!(s.armed_timers().len(), 2);
        assert_eq!(s.clock().armed_of_kind(TimerKind::BossFire), 1);
        assert_eq!(s.clock().armed_of_kind(TimerKind::BossReposition), 1);
    }

    #[test]
    fn test_training_mode_never_arms_boss_fire() {
        let mut s = session();
        s.start("training", Difficulty::default()).unwrap();
        assert_eq!(s.clock().armed_of_kind(TimerKind::BossFire), 0);

        for _ in 0..600 {
            s.step();
        }
        assert_eq!(s.stats().boss_shots, 0);
        assert_eq!(s.projectiles().count(Side::Boss), 0);
    }

    #[test]
    fn test_cooldown_timer_leaves_held_set_on_expiry() {
        let mut s = session();
        s.start("training", Difficulty::default()).unwrap();

        s.set_intent(BattleAction::Fire, true);
        s.set_intent(BattleAction::Fire, false);
        s.step();
        assert_eq!(s.armed_timers().len(), 2);

        // 30 steps of 1/60s cover the 500ms cooldown
        for _ in 0..30 {
            s.step();
        }
        assert_eq!(s.armed_timers().len(), 1);
        assert!(s.projectiles().player_gate_open());
    }

    #[test]
    fn test_end_sweeps_every_timer() {
        let mut s = session();
        s.start("boss", Difficulty::default()).unwrap();
        s.set_intent(BattleAction::Fire, true);
        s.step();

        assert!(s.end());
        assert_eq!(s.clock().armed_count(), 0);
        assert!(s.armed_timers().is_empty());
        assert!(!s.end());
        assert_eq!(s.state(), BattleState::Idle);
    }

    #[test]
    fn test_double_knockout_goes_to_boss() {
        let tuning = BattleTuning {
            player_max_health: 1,
            boss_max_health: 1,
            ..Default::default()
        };
        let mut s = BattleSession::new(tuning, GameRng::from_seed(7));
        let difficulty = Difficulty {
            boss_move_interval_ms: 3_600_000,
            ..Default::default()
        };
        s.start("boss", difficulty).unwrap();

        // Boss shot from step 60 and player shot from step 98 both land on step 135
        for _ in 0..97 {
            s.step();
        }
        s.set_intent(BattleAction::Fire, true);
        s.set_intent(BattleAction::Fire, false);
        for _ in 0..37 {
            s.step();
        }
        assert!(s.is_running());
        s.step();

        assert_eq!(s.player().health(), 0);
        assert_eq!(s.boss().health(), 0);
        assert_eq!(s.state(), BattleState::BossWon);
        let outcomes = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, BattleEvent::Outcome(_)))
            .count();
        assert_eq!(outcomes, 1);
    }

    #[test]
    fn test_update_runs_whole_steps() {
        let mut s = session();
        s.start("training", Difficulty::default()).unwrap();

        assert_eq!(s.update(Duration::from_millis(10)), 0);
        assert_eq!(s.update(Duration::from_millis(10)), 1);
        assert_eq!(s.update(Duration::from_millis(50)), 3);
        assert_eq!(s.ticks(), 4);
    }

    #[test]
    fn test_snapshot_lists_live_projectiles() {
        let mut s = session();
        s.start("training", Difficulty::default()).unwrap();
        s.set_intent(BattleAction::Fire, true);
        s.step();

        let snap = s.snapshot();
        assert_eq!(snap.player, s.player().position);
        assert_eq!(snap.projectiles.len(), 1);
        assert_eq!(snap.projectiles[0].1, Side::Player);
    }
}
