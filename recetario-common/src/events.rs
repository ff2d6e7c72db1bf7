//! Catalog change events
//!
//! Every mutation of the store publishes a [`CatalogEvent`]. Reactive
//! collections subscribe to the [`EventBus`] and re-run their query when an
//! event arrives, the same way an invalidation tracker drives observable
//! queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default number of events buffered per subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// What changed in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CatalogEvent {
    /// One or more rows of the `recipes` table were inserted, updated or deleted
    RecipesChanged {
        /// Rows touched by the statement
        rows: u64,
        timestamp: DateTime<Utc>,
    },

    /// A key in the `settings` table was written
    SettingChanged {
        key: String,
        timestamp: DateTime<Utc>,
    },
}

impl CatalogEvent {
    pub fn recipes_changed(rows: u64) -> Self {
        CatalogEvent::RecipesChanged {
            rows,
            timestamp: Utc::now(),
        }
    }

    pub fn setting_changed(key: impl Into<String>) -> Self {
        CatalogEvent::SettingChanged {
            key: key.into(),
            timestamp: Utc::now(),
        }
    }

    /// Event type name for logging
    pub fn event_type(&self) -> &str {
        match self {
            CatalogEvent::RecipesChanged { .. } => "RecipesChanged",
            CatalogEvent::SettingChanged { .. } => "SettingChanged",
        }
    }

    /// True if the event invalidates recipe queries
    pub fn touches_recipes(&self) -> bool {
        matches!(self, CatalogEvent::RecipesChanged { .. })
    }
}

/// Central distribution bus for store change events
///
/// Uses tokio::broadcast internally:
/// - publishing never blocks on slow subscribers
/// - subscribers that fall behind observe `Lagged` and should re-query
/// - dropping a receiver unsubscribes it
///
/// # Examples
///
/// ```
/// use recetario_common::events::{CatalogEvent, EventBus};
///
/// let bus = EventBus::new(16);
/// let mut rx = bus.subscribe();
/// bus.emit_lossy(CatalogEvent::recipes_changed(1));
/// assert!(rx.try_recv().unwrap().touches_recipes());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Change notifications are always lossy: nobody observing means nothing
    /// needs refreshing.
    pub fn emit_lossy(&self, event: CatalogEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
