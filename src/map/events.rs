use std::collections::HashMap;

/// Handle to a layer inside a [`MapView`](super::MapView)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerId {
    Polygon(usize),
    Marker(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    HoverEnter,
    HoverExit,
    VisibilityCheck,
}

/// Something that happened on the map surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    HoverEnter(LayerId),
    HoverExit(LayerId),
    /// The viewport finished zooming to this level
    ZoomEnd(f64),
}

impl MapEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MapEvent::HoverEnter(_) => EventKind::HoverEnter,
            MapEvent::HoverExit(_) => EventKind::HoverExit,
            MapEvent::ZoomEnd(_) => EventKind::VisibilityCheck,
        }
    }

    fn target(&self) -> Option<LayerId> {
        match self {
            MapEvent::HoverEnter(id) | MapEvent::HoverExit(id) => Some(*id),
            MapEvent::ZoomEnd(_) => None,
        }
    }
}

/// A layer that reacts to dispatched events
pub trait Interactive {
    /// Apply the event. Returns true when the layer's visible state changed.
    fn handle(&mut self, event: &MapEvent) -> bool;
}

/// Routes map events to the layers that subscribed to them.
///
/// Hover events are targeted: only the named layer receives them, and only
/// if it subscribed. Zoom events are broadcast to every visibility-check
/// subscriber in subscription order.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    subscriptions: HashMap<EventKind, Vec<LayerId>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, layer: LayerId, kind: EventKind) {
        let subscribers = self.subscriptions.entry(kind).or_default();
        if !subscribers.contains(&layer) {
            subscribers.push(layer);
        }
    }

    pub fn is_subscribed(&self, layer: LayerId, kind: EventKind) -> bool {
        self.subscriptions
            .get(&kind)
            .is_some_and(|subs| subs.contains(&layer))
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions.get(&kind).map_or(0, Vec::len)
    }

    pub fn recipients(&self, event: &MapEvent) -> Vec<LayerId> {
        let kind = event.kind();
        match event.target() {
            Some(target) if self.is_subscribed(target, kind) => vec![target],
            Some(_) => Vec::new(),
            None => self.subscriptions.get(&kind).cloned().unwrap_or_default(),
        }
    }
}
