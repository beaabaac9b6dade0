use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;

/// Envelope for a published event.
///
/// Notes:
/// - `sequence_number` is assigned by the publisher and increases monotonically
///   across everything it publishes.
/// - `payload` is usually the JSON form of a typed domain event, so consumers can
///   decode only the event families they care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    aggregate_id: Uuid,
    aggregate_type: String,
    sequence_number: u64,
    event_type: String,
    occurred_at: DateTime<Utc>,
    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        aggregate_id: Uuid,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        event_type: impl Into<String>,
        occurred_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            event_type: event_type.into(),
            occurred_at,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn aggregate_id(&self) -> Uuid {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl EventEnvelope<serde_json::Value> {
    /// Wrap a typed event, serializing its payload to JSON.
    pub fn from_event<E>(sequence_number: u64, event: &E) -> Result<Self, serde_json::Error>
    where
        E: Event + Serialize,
    {
        let payload = serde_json::to_value(event)?;
        Ok(Self::new(
            Uuid::now_v7(),
            event.aggregate_id(),
            event.aggregate_type(),
            sequence_number,
            event.event_type(),
            event.occurred_at(),
            payload,
        ))
    }

    /// Decode the JSON payload back into a typed event.
    pub fn decode<E>(&self) -> Result<E, serde_json::Error>
    where
        E: serde::de::DeserializeOwned,
    {
        serde_json::from_value(self.payload.clone())
    }
}
