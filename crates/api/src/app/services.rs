use std::sync::Arc;

use serde_json::Value as JsonValue;

use stockledger_events::{EventBus, EventEnvelope, InMemoryEventBus};
use stockledger_infra::{Directory, InMemoryStore, InventoryLedger, LedgerConfig};

pub type AppEventBus = Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>;
pub type AppLedger = InventoryLedger<InMemoryStore, AppEventBus>;

/// Everything the handlers need, constructed once and shared through an
/// `Extension<Arc<AppServices>>`.
#[derive(Debug)]
pub struct AppServices {
    pub ledger: AppLedger,
    pub directory: Directory<InMemoryStore>,
}

pub fn build_services(config: LedgerConfig) -> AppServices {
    let store = Arc::new(InMemoryStore::new());
    let bus: AppEventBus = Arc::new(InMemoryEventBus::new());

    spawn_event_log(&bus);

    AppServices {
        ledger: InventoryLedger::new(Arc::clone(&store), bus, config),
        directory: Directory::new(store),
    }
}

/// Background subscriber that records every committed event at debug level.
///
/// Ends on its own once the bus (and so every sender) is dropped.
fn spawn_event_log(bus: &AppEventBus) {
    let subscription = bus.subscribe();
    let spawned = std::thread::Builder::new()
        .name("event-log".to_string())
        .spawn(move || {
            while let Ok(envelope) = subscription.recv() {
                tracing::debug!(
                    sequence = envelope.sequence_number(),
                    event_type = envelope.event_type(),
                    aggregate_type = envelope.aggregate_type(),
                    aggregate_id = %envelope.aggregate_id(),
                    "event published"
                );
            }
        });

    if let Err(err) = spawned {
        tracing::warn!(error = %err, "event log subscriber not started");
    }
}
