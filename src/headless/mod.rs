//! Headless mode for automated battle runs
//!
//! Runs one boss battle without any graphical output, with an autopilot in
//! place of the keyboard, and writes a JSON report.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- --headless battle.json --seed 42
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "mode": "boss",
//!   "autopilot": "aggressive",
//!   "difficulty": { "boss_fire_interval_ms": 1200 },
//!   "max_duration_secs": 90,
//!   "random_seed": 42
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{Autopilot, HeadlessBattleConfig};
pub use runner::{run_headless_battle, BattleResult};
