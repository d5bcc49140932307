//! Command-line interface for DuelArena
//!
//! Graphical by default; `--headless` runs one battle with an autopilot and
//! writes a JSON report.

use clap::Parser;
use std::path::PathBuf;

/// Boss duel arena
#[derive(Parser, Debug)]
#[command(name = "duelarena")]
#[command(about = "Boss duel arena with a headless battle runner")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for the battle report (headless mode only)
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum battle duration in seconds (headless mode only)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// RNG seed for boss repositioning (headless mode only)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_flags_parse() {
        let args = Args::try_parse_from([
            "duelarena",
            "--headless",
            "battle.json",
            "--max-duration",
            "30",
            "--seed",
            "42",
        ])
        .unwrap();

        assert_eq!(args.headless, Some(PathBuf::from("battle.json")));
        assert_eq!(args.max_duration, Some(30.0));
        assert_eq!(args.seed, Some(42));
        assert!(args.output.is_none());
    }
}
