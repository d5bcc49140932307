//! Integration tests for the Upgrade Store
//!
//! These tests verify that:
//! - Points are earned by wins and spent on upgrade levels
//! - Purchases are refused without points or past the max level
//! - Purchased levels change the cadences the next battle starts with

use duelarena::combat::rng::GameRng;
use duelarena::combat::{BattleAction, BattleEvent, BattleOutcome, BattleSession, BattleTuning};
use duelarena::upgrades::MAX_UPGRADE_LEVEL;
use duelarena::{Difficulty, UpgradeError, UpgradeKind, UpgradeStore};

#[test]
fn test_fresh_store_has_no_points() {
    let mut store = UpgradeStore::default();

    assert_eq!(store.points(), 0);
    assert!(!store.can_afford(UpgradeKind::QuickDraw));
    assert_eq!(
        store.purchase(UpgradeKind::QuickDraw),
        Err(UpgradeError::NoPoints {
            available: 0,
            needed: 1
        })
    );
    assert_eq!(store.difficulty(), Difficulty::default());
}

#[test]
fn test_win_buys_one_level() {
    let mut store = UpgradeStore::default();
    store.award_win();

    assert_eq!(store.purchase(UpgradeKind::BossSluggish), Ok(1));
    assert_eq!(store.points(), 0);
    assert_eq!(store.level(UpgradeKind::BossSluggish), 1);
    assert_eq!(
        store.difficulty().boss_move_interval_ms,
        Difficulty::default().boss_move_interval_ms + 250
    );
}

#[test]
fn test_max_level_refused_without_spending() {
    let mut store = UpgradeStore::new(Difficulty::default(), 20);
    for level in 1..=MAX_UPGRADE_LEVEL {
        assert_eq!(store.purchase(UpgradeKind::BossFireDelay), Ok(level));
    }
    let points = store.points();

    assert_eq!(
        store.purchase(UpgradeKind::BossFireDelay),
        Err(UpgradeError::MaxLevel(UpgradeKind::BossFireDelay))
    );
    assert_eq!(store.points(), points);
    // 1 + 1 + 2 + 2 + 2
    assert_eq!(points, 12);
}

#[test]
fn test_upgraded_difficulty_starts_a_battle() {
    let mut store = UpgradeStore::new(Difficulty::default(), 20);
    for kind in UpgradeKind::ALL {
        store.purchase(kind).unwrap();
        store.purchase(kind).unwrap();
    }
    let difficulty = store.difficulty();
    assert_eq!(difficulty.player_fire_cooldown_ms, 350);
    assert_eq!(difficulty.boss_fire_interval_ms, 1300);
    assert_eq!(difficulty.boss_move_interval_ms, 2500);

    let mut session = BattleSession::new(BattleTuning::default(), GameRng::from_seed(1));
    session.start("boss", difficulty).unwrap();
    assert_eq!(*session.difficulty(), difficulty);
}

#[test]
fn test_won_battle_funds_an_upgrade() {
    let tuning = BattleTuning {
        boss_max_health: 2,
        ..Default::default()
    };
    let mut store = UpgradeStore::default();
    let mut session = BattleSession::new(tuning, GameRng::from_seed(5));
    session.start("training", store.difficulty()).unwrap();

    let mut outcome = None;
    for _ in 0..200 {
        session.set_intent(BattleAction::Fire, true);
        session.step();
        for event in session.drain_events() {
            if let BattleEvent::Outcome(o) = event {
                outcome = Some(o);
            }
        }
    }
    assert_eq!(outcome, Some(BattleOutcome::PlayerWon));

    store.award_win();
    assert!(store.can_afford(UpgradeKind::QuickDraw));
    assert_eq!(store.purchase(UpgradeKind::QuickDraw), Ok(1));
    assert_eq!(store.difficulty().player_fire_cooldown_ms, 425);
}
