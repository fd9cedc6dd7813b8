use tracing::trace;

use crate::collision::{BodyId, ContactAdded, ContactListener, OwnerTag};

/// A world body carrying an owner tag was touched this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub owner: OwnerTag,
    pub body: BodyId,
}

/// Queues contact events for the caller. Holds no history beyond the current queue.
#[derive(Debug, Default)]
pub struct ContactRecorder {
    events: Vec<ContactEvent>,
}

impl ContactRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Hand the queued events over to the caller, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ContactListener for ContactRecorder {
    fn on_contact_added(&mut self, contact: &ContactAdded) {
        match contact.owner {
            Ok(Some(owner)) => self.events.push(ContactEvent { owner, body: contact.body }),
            Ok(None) => {}
            Err(err) => trace!(body = ?contact.body, %err, "skipping contact"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollisionError;
    use glam::Vec3;

    fn contact(body: u32, owner: Result<Option<OwnerTag>, CollisionError>) -> ContactAdded {
        ContactAdded { body: BodyId(body), normal: Vec3::Z, owner }
    }

    #[test]
    fn test_records_only_tagged_bodies() {
        let mut recorder = ContactRecorder::new();
        recorder.on_contact_added(&contact(1, Ok(OwnerTag::new(10))));
        recorder.on_contact_added(&contact(2, Ok(None)));
        recorder.on_contact_added(&contact(3, Err(CollisionError::BodyLocked(BodyId(3)))));
        // No dedup within a tick
        recorder.on_contact_added(&contact(1, Ok(OwnerTag::new(10))));

        let owner = OwnerTag::new(10).unwrap();
        assert_eq!(
            recorder.events(),
            &[ContactEvent { owner, body: BodyId(1) }, ContactEvent { owner, body: BodyId(1) }]
        );
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut recorder = ContactRecorder::new();
        recorder.on_contact_added(&contact(4, Ok(OwnerTag::new(1))));
        let drained = recorder.drain();
        assert_eq!(drained.len(), 1);
        assert!(recorder.is_empty());
        assert!(recorder.drain().is_empty());
    }
}
