use super::events::AntennaEvent;
use crate::common::{AggregateRoot, DomainError, DomainResult};
use crate::domains::geometry::Position;
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    Unregistered,
    Registering { attempt: u32 },
    Registered { collector_id: i64 },
}

/// A fixed antenna. It takes part in the simulation only once the collector
/// has assigned it an identifier.
#[derive(Debug, Clone)]
pub struct Antenna {
    pub id: String,
    pub position: Position,
    pub state: RegistrationState,
    pub version: u64,
    uncommitted_events: Vec<AntennaEvent>,
}

impl Antenna {
    pub fn new(id: String, position: Position) -> Self {
        Self {
            id,
            position,
            state: RegistrationState::Unregistered,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// The collector-assigned identifier, if registration has completed.
    pub fn collector_id(&self) -> Option<i64> {
        match self.state {
            RegistrationState::Registered { collector_id } => Some(collector_id),
            _ => None,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.collector_id().is_some()
    }

    pub fn attempts(&self) -> u32 {
        match self.state {
            RegistrationState::Registering { attempt } => attempt,
            _ => 0,
        }
    }

    /// Unregistered -> Registering, or a further attempt while Registering.
    pub fn begin_registration(&mut self) -> DomainResult<u32> {
        let attempt = match self.state {
            RegistrationState::Unregistered => 1,
            RegistrationState::Registering { attempt } => attempt + 1,
            RegistrationState::Registered { .. } => {
                return Err(DomainError::InvalidTransition {
                    entity: self.id.clone(),
                    reason: "antenna is already registered".to_string(),
                })
            }
        };

        self.record(AntennaEvent::RegistrationRequested {
            antenna_id: self.id.clone(),
            position: self.position,
            attempt,
            timestamp: Utc::now(),
        })?;
        Ok(attempt)
    }

    pub fn registration_failed(&mut self, reason: String) -> DomainResult<()> {
        let attempt = match self.state {
            RegistrationState::Registering { attempt } => attempt,
            _ => {
                return Err(DomainError::InvalidTransition {
                    entity: self.id.clone(),
                    reason: "no registration in progress".to_string(),
                })
            }
        };

        self.record(AntennaEvent::RegistrationFailed {
            antenna_id: self.id.clone(),
            attempt,
            reason,
            timestamp: Utc::now(),
        })
    }

    /// Stores the collector identifier. Repeating the same identifier is a no-op.
    pub fn complete_registration(&mut self, collector_id: i64) -> DomainResult<()> {
        if collector_id == 0 {
            return Err(DomainError::invalid_argument(format!(
                "collector returned no identifier for antenna {}",
                self.id
            )));
        }

        match self.state {
            RegistrationState::Registered { collector_id: existing } if existing == collector_id => Ok(()),
            RegistrationState::Registered { collector_id: existing } => Err(DomainError::InvalidTransition {
                entity: self.id.clone(),
                reason: format!("already registered as {}, refusing {}", existing, collector_id),
            }),
            RegistrationState::Unregistered => Err(DomainError::InvalidTransition {
                entity: self.id.clone(),
                reason: "registration was never requested".to_string(),
            }),
            RegistrationState::Registering { .. } => self.record(AntennaEvent::Registered {
                antenna_id: self.id.clone(),
                collector_id,
                timestamp: Utc::now(),
            }),
        }
    }
}

impl AggregateRoot for Antenna {
    type Event = AntennaEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
        match event {
            AntennaEvent::RegistrationRequested { attempt, .. } => {
                self.state = RegistrationState::Registering { attempt: *attempt };
            }
            AntennaEvent::RegistrationFailed { .. } => {}
            AntennaEvent::Registered { collector_id, .. } => {
                self.state = RegistrationState::Registered { collector_id: *collector_id };
            }
        }
        self.version += 1;
        Ok(())
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }

    fn add_event(&mut self, event: Self::Event) {
        self.uncommitted_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DomainEvent;

    fn antenna() -> Antenna {
        Antenna::new("antenna-0".to_string(), Position::new(0.0, 20.0))
    }

    #[test]
    fn test_new_antenna_is_unregistered() {
        let a = antenna();
        assert_eq!(a.state, RegistrationState::Unregistered);
        assert!(!a.is_registered());
        assert!(a.uncommitted_events().is_empty());
    }

    #[test]
    fn test_retry_then_register() {
        let mut a = antenna();
        assert_eq!(a.begin_registration().unwrap(), 1);
        a.registration_failed("unavailable".to_string()).unwrap();
        assert_eq!(a.begin_registration().unwrap(), 2);
        assert!(!a.is_registered());

        a.complete_registration(42).unwrap();
        assert_eq!(a.collector_id(), Some(42));
        assert_eq!(a.version, 4);

        let types: Vec<_> = a.uncommitted_events().iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![
                "AntennaRegistrationRequested",
                "AntennaRegistrationFailed",
                "AntennaRegistrationRequested",
                "AntennaRegistered"
            ]
        );
    }

    #[test]
    fn test_zero_identifier_is_not_a_registration() {
        let mut a = antenna();
        a.begin_registration().unwrap();
        assert!(a.complete_registration(0).is_err());
        assert!(!a.is_registered());
    }

    #[test]
    fn test_repeating_same_identifier_is_harmless() {
        let mut a = antenna();
        a.begin_registration().unwrap();
        a.complete_registration(7).unwrap();
        let version = a.version;
        a.complete_registration(7).unwrap();
        assert_eq!(a.version, version);
        assert!(a.complete_registration(8).is_err());
        assert!(a.begin_registration().is_err());
    }

    #[test]
    fn test_cannot_complete_without_request() {
        let mut a = antenna();
        assert!(matches!(
            a.complete_registration(3),
            Err(DomainError::InvalidTransition { .. })
        ));
        assert!(a.registration_failed("x".to_string()).is_err());
    }
}
