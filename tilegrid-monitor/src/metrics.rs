//! Metrics tracking for the grid monitor

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use tilegrid_core::{GridSnapshot, SlotIndex, TileId};

/// Maximum number of log entries to keep
const MAX_LOG_ENTRIES: usize = 100;

/// A log entry for the dashboard
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Bind,
    Release,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Bind => "BIND",
            LogLevel::Release => "FREE",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum MonitorStatus {
    Starting,
    Running,
    Finished,
}

/// Grid metrics
pub struct Metrics {
    /// Monitor start time
    pub start_time: DateTime<Local>,

    /// RNG seed of the simulated SDK
    pub seed: u64,

    /// Tile events dispatched so far
    pub events_dispatched: u64,

    /// Sink binds requested by the grid (includes rebinds of known tiles)
    pub binds: u64,

    /// Slots freed by tile removals
    pub releases: u64,

    /// Removals of tiles that held no slot
    pub ignored_removals: u64,

    /// Updates skipped as local, content or unbound
    pub filtered_updates: u64,

    /// Updates rejected because the grid was full
    pub rejected_tiles: u64,

    /// Peak simultaneous visible slots
    pub peak_visible: usize,

    /// Latest grid state
    pub snapshot: Option<GridSnapshot>,

    /// Log entries
    pub logs: VecDeque<LogEntry>,

    pub status: MonitorStatus,
}

impl Metrics {
    pub fn new(seed: u64) -> Self {
        Self {
            start_time: Local::now(),
            seed,
            events_dispatched: 0,
            binds: 0,
            releases: 0,
            ignored_removals: 0,
            filtered_updates: 0,
            rejected_tiles: 0,
            peak_visible: 0,
            snapshot: None,
            logs: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            status: MonitorStatus::Starting,
        }
    }

    /// Add a log entry
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.logs.len() >= MAX_LOG_ENTRIES {
            self.logs.pop_front();
        }
        self.logs.push_back(LogEntry {
            timestamp: Local::now(),
            level,
            message: message.into(),
        });
    }

    pub fn event_dispatched(&mut self) {
        self.events_dispatched += 1;
    }

    /// Record a sink bind
    pub fn tile_bound(&mut self, tile_id: TileId, slot: SlotIndex) {
        self.binds += 1;
        self.log(LogLevel::Bind, format!("Tile {} -> slot {}", tile_id, slot));
    }

    /// Record a tile removal and whether it freed a slot
    pub fn tile_removed(&mut self, tile_id: TileId, slot: Option<SlotIndex>) {
        match slot {
            Some(slot) => {
                self.releases += 1;
                self.log(LogLevel::Release, format!("Tile {} left slot {}", tile_id, slot));
            }
            None => self.ignored_removals += 1,
        }
    }

    pub fn tile_filtered(&mut self) {
        self.filtered_updates += 1;
    }

    /// Record an update rejected by the capacity cap
    pub fn tile_rejected(&mut self, message: impl Into<String>) {
        self.rejected_tiles += 1;
        self.log(LogLevel::Warning, message);
    }

    /// Store the latest grid state
    pub fn update_snapshot(&mut self, snapshot: GridSnapshot) {
        self.peak_visible = self.peak_visible.max(snapshot.visible_count);
        self.snapshot = Some(snapshot);
    }

    pub fn visible_count(&self) -> usize {
        self.snapshot.as_ref().map(|s| s.visible_count).unwrap_or(0)
    }

    /// Get uptime as formatted string
    pub fn uptime(&self) -> String {
        let duration = Local::now().signed_duration_since(self.start_time);
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            let hours = secs / 3600;
            let mins = (secs % 3600) / 60;
            format!("{}h {}m", hours, mins)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilegrid_core::SlotView;

    fn snapshot_with(visible: usize) -> GridSnapshot {
        GridSnapshot {
            capacity: 16,
            visible_count: visible,
            slots: (0..16)
                .map(|slot| SlotView {
                    slot,
                    tile_id: None,
                    attendee_id: None,
                    attendee_name: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_log_is_bounded() {
        let mut metrics = Metrics::new(1);
        for i in 0..(MAX_LOG_ENTRIES + 10) {
            metrics.log(LogLevel::Info, format!("entry {}", i));
        }

        assert_eq!(metrics.logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(metrics.logs.front().unwrap().message, "entry 10");
    }

    #[test]
    fn test_removal_counters() {
        let mut metrics = Metrics::new(1);
        metrics.tile_bound(TileId::new(4), 0);
        metrics.tile_removed(TileId::new(4), Some(0));
        metrics.tile_removed(TileId::new(9), None);

        assert_eq!(metrics.binds, 1);
        assert_eq!(metrics.releases, 1);
        assert_eq!(metrics.ignored_removals, 1);
        assert_eq!(metrics.logs.back().unwrap().level, LogLevel::Release);
    }

    #[test]
    fn test_peak_visible() {
        let mut metrics = Metrics::new(1);
        assert_eq!(metrics.visible_count(), 0);

        metrics.update_snapshot(snapshot_with(5));
        metrics.update_snapshot(snapshot_with(3));

        assert_eq!(metrics.visible_count(), 3);
        assert_eq!(metrics.peak_visible, 5);
    }

    #[test]
    fn test_rejections_logged() {
        let mut metrics = Metrics::new(1);
        metrics.tile_rejected("grid full");

        assert_eq!(metrics.rejected_tiles, 1);
        assert_eq!(metrics.logs.back().unwrap().level, LogLevel::Warning);
    }
}
