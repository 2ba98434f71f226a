use crate::common::DomainEvent;
use crate::domains::geometry::Position;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum AntennaEvent {
    RegistrationRequested {
        antenna_id: String,
        position: Position,
        attempt: u32,
        timestamp: DateTime<Utc>,
    },
    RegistrationFailed {
        antenna_id: String,
        attempt: u32,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    Registered {
        antenna_id: String,
        collector_id: i64,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for AntennaEvent {
    fn event_type(&self) -> &'static str {
        match self {
            AntennaEvent::RegistrationRequested { .. } => "AntennaRegistrationRequested",
            AntennaEvent::RegistrationFailed { .. } => "AntennaRegistrationFailed",
            AntennaEvent::Registered { .. } => "AntennaRegistered",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            AntennaEvent::RegistrationRequested { antenna_id, .. } => antenna_id,
            AntennaEvent::RegistrationFailed { antenna_id, .. } => antenna_id,
            AntennaEvent::Registered { antenna_id, .. } => antenna_id,
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            AntennaEvent::RegistrationRequested { timestamp, .. } => *timestamp,
            AntennaEvent::RegistrationFailed { timestamp, .. } => *timestamp,
            AntennaEvent::Registered { timestamp, .. } => *timestamp,
        }
    }
}
