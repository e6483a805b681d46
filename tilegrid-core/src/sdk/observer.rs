//! Observer Channel
//!
//! The SDK reports tile changes to registered observers, one event at a time.
//! Registration hands back a [`Subscription`]; the observer stays registered
//! exactly as long as that handle is alive.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, info};

use super::tile::{TileEvent, TileId, TileState};
use crate::error::Result;

/// Receiver of tile events
pub trait VideoTileObserver: Send + Sync {
    fn video_tile_did_update(&self, tile: &TileState) -> Result<()>;
    fn video_tile_was_removed(&self, tile_id: TileId) -> Result<()>;
}

#[derive(Default)]
struct RegistryInner {
    next_id: AtomicU64,
    observers: RwLock<Vec<(u64, Arc<dyn VideoTileObserver>)>>,
}

impl RegistryInner {
    fn remove(&self, id: u64) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(observer_id, _)| *observer_id != id);
        observers.len() != before
    }
}

/// Set of observers the SDK delivers tile events to
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    inner: Arc<RegistryInner>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer until the returned handle is dropped
    pub fn add_observer(&self, observer: Arc<dyn VideoTileObserver>) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.observers.write().push((id, observer));
        info!("Observer {} registered", id);

        Subscription {
            id,
            registry: Arc::downgrade(&self.inner),
        }
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.read().len()
    }

    /// Deliver one event to every registered observer, in registration order.
    ///
    /// Stops at the first observer error and returns it.
    pub fn dispatch(&self, event: &TileEvent) -> Result<()> {
        // Observers may drop their subscription while handling the event
        let observers: Vec<Arc<dyn VideoTileObserver>> = self
            .inner
            .observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();

        debug!("Dispatching {:?} to {} observers", event, observers.len());

        for observer in observers {
            match event {
                TileEvent::Updated(state) => observer.video_tile_did_update(state)?,
                TileEvent::Removed(tile_id) => observer.video_tile_was_removed(*tile_id)?,
            }
        }
        Ok(())
    }
}

/// Registration handle returned by [`ObserverRegistry::add_observer`].
///
/// Dropping it removes the observer. Outliving the registry is fine.
#[must_use = "dropping a Subscription deregisters the observer immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<RegistryInner>,
}

impl Subscription {
    /// Deregister now instead of at end of scope
    pub fn unsubscribe(self) {}

    /// Whether the observer is still registered
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|inner| inner.observers.read().iter().any(|(id, _)| *id == self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            if inner.remove(self.id) {
                info!("Observer {} removed", self.id);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
