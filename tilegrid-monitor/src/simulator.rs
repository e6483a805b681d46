//! Simulated media SDK driving the grid

use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tilegrid_core::{
    GridCallback, GridSnapshot, ObserverRegistry, RemoteVideoGrid, SlotIndex, TileEvent, TileId,
    TileState,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::metrics::{LogLevel, Metrics, MonitorStatus};

/// Default number of attendees in the simulated meeting (more than the grid holds)
pub const DEFAULT_ATTENDEES: usize = 20;

/// Default delay between SDK events
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(400);

/// Simulation settings
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub seed: u64,
    pub attendees: usize,
    pub interval: Duration,
    /// Stop after this many events (None = run until quit)
    pub max_events: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: rand::random(),
            attendees: DEFAULT_ATTENDEES,
            interval: DEFAULT_INTERVAL,
            max_events: None,
        }
    }
}

/// Events sent to the dashboard
#[derive(Debug)]
pub enum MonitorEvent {
    Ready { attendees: usize },
    Tick,
    Finished,
}

/// Random stream of tile events, as a real SDK would deliver them.
///
/// Remote camera tiles come and go and repeat their updates; local,
/// screen-share and not-yet-bound tiles are mixed in.
pub struct TileSimulator {
    rng: StdRng,
    attendees: Vec<String>,
    /// Remote tiles the SDK considers live, with their attendee
    live: Vec<(TileId, String)>,
    next_tile_id: u64,
}

impl TileSimulator {
    pub fn new(seed: u64, attendees: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            attendees: (1..=attendees.max(1)).map(attendee_id).collect(),
            live: Vec::new(),
            next_tile_id: 1,
        }
    }

    pub fn attendees(&self) -> &[String] {
        &self.attendees
    }

    fn new_tile_id(&mut self) -> TileId {
        let id = TileId::new(self.next_tile_id);
        self.next_tile_id += 1;
        id
    }

    /// Produce the next SDK event
    pub fn next_event(&mut self) -> TileEvent {
        let roll: u32 = self.rng.gen_range(0..100);

        match roll {
            0..=4 => {
                let mut local = TileState::remote(0, "local");
                local.tile_id = self.new_tile_id();
                local.local_tile = true;
                TileEvent::Updated(local)
            }
            5..=9 => {
                let attendee = self.random_attendee();
                let mut content = TileState::remote(0, attendee);
                content.tile_id = self.new_tile_id();
                content.is_content = true;
                TileEvent::Updated(content)
            }
            10..=14 => {
                let mut unbound = TileState::remote(0, "");
                unbound.tile_id = self.new_tile_id();
                unbound.bound_attendee_id = None;
                TileEvent::Updated(unbound)
            }
            15..=34 if !self.live.is_empty() => {
                let index = self.rng.gen_range(0..self.live.len());
                let (tile_id, attendee) = self.live[index].clone();
                TileEvent::Updated(TileState::remote(tile_id.get(), attendee))
            }
            35..=59 if !self.live.is_empty() => {
                let index = self.rng.gen_range(0..self.live.len());
                let (tile_id, _) = self.live.swap_remove(index);
                TileEvent::Removed(tile_id)
            }
            _ => self.join_or_remove(),
        }
    }

    /// Start video for an attendee without a tile, or drop one if all have tiles
    fn join_or_remove(&mut self) -> TileEvent {
        let idle: Vec<String> = self
            .attendees
            .iter()
            .filter(|a| !self.live.iter().any(|(_, live)| live == *a))
            .cloned()
            .collect();

        match idle.choose(&mut self.rng).cloned() {
            Some(attendee) => {
                let tile_id = self.new_tile_id();
                self.live.push((tile_id, attendee.clone()));
                TileEvent::Updated(TileState::remote(tile_id.get(), attendee))
            }
            None => {
                let index = self.rng.gen_range(0..self.live.len());
                let (tile_id, _) = self.live.swap_remove(index);
                TileEvent::Removed(tile_id)
            }
        }
    }

    fn random_attendee(&mut self) -> String {
        self.attendees
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| attendee_id(1))
    }
}

fn attendee_id(n: usize) -> String {
    format!("attendee-{:02}", n)
}

fn display_name(n: usize) -> String {
    const NAMES: &[&str] = &[
        "Ada", "Brook", "Cato", "Dara", "Emil", "Fern", "Gus", "Hana", "Ivo", "Juno",
    ];
    format!("{} {}", NAMES[(n - 1) % NAMES.len()], (n - 1) / NAMES.len() + 1)
}

/// Rendering side of the monitor: records what the grid asks for
struct MonitorCallback {
    metrics: Arc<RwLock<Metrics>>,
}

impl GridCallback for MonitorCallback {
    fn bind_video_sink(&self, tile_id: TileId, slot: SlotIndex) {
        debug!("Binding tile {} to sink {}", tile_id, slot);
        self.metrics.write().tile_bound(tile_id, slot);
    }

    fn on_visibility_changed(&self, snapshot: GridSnapshot) {
        debug!("Visible slots: {}", snapshot.visible_count);
        self.metrics.write().update_snapshot(snapshot);
    }

    fn on_error(&self, message: String) {
        self.metrics.write().log(LogLevel::Error, message);
    }
}

/// Run the simulation with dashboard integration
pub async fn run_with_dashboard(
    metrics: Arc<RwLock<Metrics>>,
    event_tx: mpsc::UnboundedSender<MonitorEvent>,
    config: SimConfig,
) -> Result<GridSnapshot, Box<dyn Error + Send + Sync>> {
    info!("Grid monitor starting (seed {})", config.seed);

    let registry = ObserverRegistry::new();
    let mounted = RemoteVideoGrid::mount(&registry);
    mounted.set_callback(Arc::new(MonitorCallback {
        metrics: Arc::clone(&metrics),
    }));

    let mut simulator = TileSimulator::new(config.seed, config.attendees);
    for (n, attendee) in simulator.attendees().iter().enumerate() {
        mounted.set_attendee_name(attendee.clone(), display_name(n + 1));
    }

    {
        let mut m = metrics.write();
        m.status = MonitorStatus::Running;
        m.update_snapshot(mounted.snapshot());
        m.log(
            LogLevel::Info,
            format!("{} attendees, seed {}", config.attendees, config.seed),
        );
    }
    let _ = event_tx.send(MonitorEvent::Ready {
        attendees: config.attendees,
    });

    // SDK side: emit events on a timer
    let (tile_tx, mut tile_rx) = mpsc::unbounded_channel::<TileEvent>();
    let interval = config.interval;
    let max_events = config.max_events;
    tokio::spawn(async move {
        let mut sent = 0u64;
        while max_events.map_or(true, |max| sent < max) {
            if tile_tx.send(simulator.next_event()).is_err() {
                break;
            }
            sent += 1;
            tokio::time::sleep(interval).await;
        }
    });

    // Observer side: deliver serially
    while let Some(event) = tile_rx.recv().await {
        let removed_slot = match &event {
            TileEvent::Removed(tile_id) => Some((*tile_id, mounted.slot_of(*tile_id))),
            TileEvent::Updated(_) => None,
        };
        let filtered = matches!(&event, TileEvent::Updated(state) if state.remote_video().is_none());

        let result = registry.dispatch(&event);

        {
            let mut m = metrics.write();
            m.event_dispatched();
            match result {
                Ok(()) => {
                    if let Some((tile_id, slot)) = removed_slot {
                        m.tile_removed(tile_id, slot);
                    }
                    if filtered {
                        m.tile_filtered();
                    }
                }
                Err(e) => {
                    warn!("{}", e);
                    m.tile_rejected(e.to_string());
                }
            }
        }
        let _ = event_tx.send(MonitorEvent::Tick);
    }

    let snapshot = mounted.snapshot();
    mounted.unmount();

    {
        let mut m = metrics.write();
        m.status = MonitorStatus::Finished;
        m.log(LogLevel::Info, "Simulation finished");
    }
    let _ = event_tx.send(MonitorEvent::Finished);
    info!("Grid monitor finished");

    Ok(snapshot)
}

/// Run with plain logging (no dashboard), printing the final grid as JSON
pub async fn run_with_logging(
    metrics: Arc<RwLock<Metrics>>,
    config: SimConfig,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    tilegrid_core::logging::init_tracing();

    let (tx, _rx) = mpsc::unbounded_channel();
    let snapshot = run_with_dashboard(metrics, tx, config).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_is_deterministic() {
        let mut a = TileSimulator::new(42, 20);
        let mut b = TileSimulator::new(42, 20);

        for _ in 0..200 {
            assert_eq!(a.next_event(), b.next_event());
        }
    }

    #[test]
    fn test_removals_refer_to_live_tiles() {
        let mut sim = TileSimulator::new(7, 20);
        let mut started = std::collections::HashSet::new();

        for _ in 0..500 {
            match sim.next_event() {
                TileEvent::Updated(state) => {
                    if state.remote_video().is_some() {
                        started.insert(state.tile_id);
                    }
                }
                TileEvent::Removed(tile_id) => assert!(started.contains(&tile_id)),
            }
        }
    }

    #[test]
    fn test_one_live_tile_per_attendee() {
        let mut sim = TileSimulator::new(3, 5);
        for _ in 0..300 {
            sim.next_event();
            let mut attendees: Vec<&String> = sim.live.iter().map(|(_, a)| a).collect();
            attendees.sort();
            attendees.dedup();
            assert_eq!(attendees.len(), sim.live.len());
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_name(1), "Ada 1");
        assert_eq!(display_name(11), "Ada 2");
        assert_eq!(attendee_id(3), "attendee-03");
    }

    #[tokio::test]
    async fn test_run_drives_grid() {
        let metrics = Arc::new(RwLock::new(Metrics::new(9)));
        let (tx, _rx) = mpsc::unbounded_channel();
        let config = SimConfig {
            seed: 9,
            attendees: 20,
            interval: Duration::from_millis(0),
            max_events: Some(300),
        };

        let snapshot = run_with_dashboard(Arc::clone(&metrics), tx, config).await.unwrap();

        let m = metrics.read();
        assert_eq!(m.events_dispatched, 300);
        assert_eq!(m.status, MonitorStatus::Finished);
        assert!(m.peak_visible <= 16);
        assert_eq!(snapshot.capacity, 16);
        assert_eq!(snapshot.visible_count, snapshot.visible().count());
        assert!(snapshot.visible().all(|s| s.attendee_name.is_some()));
    }
}
