use std::collections::HashMap;

use crate::entity::Entity;
use crate::world::ScreenGroup;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Collide,
    Tick,
}

#[derive(Debug)]
pub enum GameEvent<'a> {
    /// The player's predicted position touches `sprite`
    Collide { world: &'a ScreenGroup, sprite: &'a Entity },
    Tick { frame: u64 },
}

impl GameEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::Collide { .. } => EventKind::Collide,
            GameEvent::Tick { .. } => EventKind::Tick,
        }
    }
}

/// An observer. The returned flag is collected by `emit`; for `Collide`,
/// `false` vetoes the move.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &GameEvent<'_>) -> bool;
}

impl<F> EventHandler for F
where
    F: Fn(&GameEvent<'_>) -> bool + Send + Sync,
{
    fn handle(&self, event: &GameEvent<'_>) -> bool {
        self(event)
    }
}

#[derive(Default)]
pub struct EventManager {
    handlers: HashMap<EventKind, Vec<Box<dyn EventHandler>>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<H: EventHandler + 'static>(&mut self, kind: EventKind, handler: H) {
        self.handlers.entry(kind).or_default().push(Box::new(handler));
    }

    /// Run every handler subscribed to the event's kind, in subscription order.
    pub fn emit(&self, event: &GameEvent<'_>) -> Vec<bool> {
        self.handlers
            .get(&event.kind())
            .map(|handlers| handlers.iter().map(|h| h.handle(event)).collect())
            .unwrap_or_default()
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("collide", &self.handler_count(EventKind::Collide))
            .field("tick", &self.handler_count(EventKind::Tick))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn emit_without_subscribers_is_empty() {
        let events = EventManager::new();
        assert!(events.emit(&GameEvent::Tick { frame: 1 }).is_empty());
    }

    #[test]
    fn results_follow_subscription_order() {
        let mut events = EventManager::new();
        events.subscribe(EventKind::Tick, |_: &GameEvent<'_>| true);
        events.subscribe(EventKind::Tick, |_: &GameEvent<'_>| false);
        events.subscribe(EventKind::Collide, |_: &GameEvent<'_>| false);

        assert_eq!(events.emit(&GameEvent::Tick { frame: 0 }), vec![true, false]);
        assert_eq!(events.handler_count(EventKind::Collide), 1);
    }

    #[test]
    fn handlers_see_the_payload() {
        let last = Arc::new(AtomicU64::new(0));
        let seen = last.clone();
        let mut events = EventManager::new();
        events.subscribe(EventKind::Tick, move |event: &GameEvent<'_>| {
            if let GameEvent::Tick { frame } = event {
                seen.store(*frame, Ordering::Relaxed);
            }
            true
        });

        events.emit(&GameEvent::Tick { frame: 99 });
        assert_eq!(last.load(Ordering::Relaxed), 99);
    }

    struct Deny;

    impl EventHandler for Deny {
        fn handle(&self, _event: &GameEvent<'_>) -> bool {
            false
        }
    }

    #[test]
    fn struct_handlers_work_too() {
        let mut events = EventManager::new();
        events.subscribe(EventKind::Collide, Deny);
        let world = ScreenGroup::new();
        let template = crate::game_object::GameObject::new("x", "X", "obstacle", 1, 1);
        let sprite = Entity::from_template(
            crate::entity::EntityId(0),
            &template,
            crate::entity::EntityController::Static,
        );
        assert_eq!(events.emit(&GameEvent::Collide { world: &world, sprite: &sprite }), vec![false]);
    }
}
