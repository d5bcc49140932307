//! Battle logging
//!
//! Records encounter events for the HUD and for post-match analysis.

use serde::Serialize;

/// A single entry in the battle log
#[derive(Debug, Clone, Serialize)]
pub struct BattleLogEntry {
    /// Timestamp in match time (seconds since start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: BattleLogEventType,
    /// Human-readable description of the event
    pub message: String,
}

/// Types of battle log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BattleLogEventType {
    /// A projectile was spawned
    Fire,
    /// A projectile hit its target
    Hit,
    /// A projectile left the arena
    Miss,
    /// The boss picked a new position
    Reposition,
    /// Match event (start, end, etc.)
    MatchEvent,
}

/// In-memory log of one encounter
#[derive(Debug, Clone, Default, Serialize)]
pub struct BattleLog {
    /// All log entries in chronological order
    pub entries: Vec<BattleLogEntry>,
    /// Current match time
    pub match_time: f32,
}

impl BattleLog {
    /// Clear the log for a new match
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: BattleLogEventType, message: String) {
        self.entries.push(BattleLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
        });
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&BattleLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// One display line, e.g. `[  12.50s] Hit: Player shot P3 hits Boss (29 left)`
    pub fn format_entry(entry: &BattleLogEntry) -> String {
        format!(
            "[{:>7.2}s] {:?}: {}",
            entry.timestamp, entry.event_type, entry.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_time_and_entries() {
        let mut log = BattleLog::default();
        log.match_time = 3.0;
        log.log(BattleLogEventType::MatchEvent, "start".to_string());
        log.clear();
        assert!(log.entries.is_empty());
        assert_eq!(log.match_time, 0.0);
    }

    #[test]
    fn test_recent_keeps_chronological_order() {
        let mut log = BattleLog::default();
        for i in 0..5 {
            log.match_time = i as f32;
            log.log(BattleLogEventType::Fire, format!("shot {}", i));
        }
        let recent: Vec<_> = log.recent(2).iter().map(|e| e.message.as_str()).collect();
        assert_eq!(recent, vec!["shot 3", "shot 4"]);
        assert_eq!(log.entries.len(), 5);
    }
}
