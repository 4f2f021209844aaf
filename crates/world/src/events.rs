//! Host notification channel.
//!
//! The bootstrapper never loads plugins itself. It emits a single
//! notification carrying the sanitized world description; the host's plugin
//! loader consumes it through whatever [`EventSink`] it registered.

use simlog_common::EntityId;

use crate::description::World;

/// Notifications emitted toward the host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The world was bootstrapped; the host may now attach runtime plugins
    /// declared in the (sanitized) description.
    LoadPlugins { world_entity: EntityId, world: World },
}

/// Registration interface the host exposes for notifications.
pub trait EventSink {
    fn emit(&mut self, event: HostEvent);
}

/// Vec-backed sink for hosts that poll, and for tests.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<HostEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return all pending events.
    pub fn drain_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[HostEvent] {
        &self.pending
    }
}

impl EventSink for EventQueue {
    fn emit(&mut self, event: HostEvent) {
        self.pending.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_collects_and_drains() {
        let mut queue = EventQueue::new();
        queue.emit(HostEvent::LoadPlugins {
            world_entity: EntityId(1),
            world: World {
                name: "w".into(),
                models: vec![],
                lights: vec![],
                plugins: vec![],
            },
        });
        assert_eq!(queue.events().len(), 1);
        let drained = queue.drain_events();
        assert_eq!(drained.len(), 1);
        assert!(queue.events().is_empty());
    }
}
