//! Event capability held by each view.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Name of the event fired when a node is clicked.
pub const CLICK: &str = "click";

pub type Listener<E> = Arc<dyn Fn(&mut E) + Send + Sync>;

/// Handle returned by `Emitter::on`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Named-event listener table. Listeners run in subscription order and may
/// change the payload they receive.
pub struct Emitter<E> {
    listeners: RwLock<IndexMap<ListenerId, (String, Listener<E>)>>,
    next_id: AtomicUsize,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Emitter {
            listeners: RwLock::new(IndexMap::new()),
            next_id: AtomicUsize::new(0),
        }
    }
}

impl<E> std::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Emitter::default()
    }

    pub fn on<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&mut E) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .insert(id, (event.to_string(), Arc::new(listener)));
        id
    }

    /// Returns `false` when the listener was already gone.
    pub fn off(&self, id: ListenerId) -> bool {
        self.listeners.write().shift_remove(&id).is_some()
    }

    pub fn off_all(&self) {
        self.listeners.write().clear();
    }

    /// Call every listener for `event` with the payload.
    ///
    /// The table is snapshotted first, so listeners may subscribe or
    /// unsubscribe while the event is being delivered.
    pub fn fire(&self, event: &str, payload: &mut E) -> usize {
        let listeners: Vec<Listener<E>> = self
            .listeners
            .read()
            .values()
            .filter(|(name, _)| name == event)
            .map(|(_, listener)| listener.clone())
            .collect();

        tracing::trace!(event, listeners = listeners.len(), "fire");
        for listener in &listeners {
            listener(payload);
        }
        listeners.len()
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }
}

/// Payload of the `click` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub node: String,
    /// Listeners set this to `false` to cancel the view's default action.
    pub return_value: bool,
}

impl ClickEvent {
    pub fn new(node: &str) -> Self {
        ClickEvent {
            node: node.to_string(),
            return_value: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn listeners_run_for_their_event_only() {
        let emitter: Emitter<ClickEvent> = Emitter::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        emitter.on(CLICK, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        emitter.on("hover", |_| panic!("wrong event"));

        let mut event = ClickEvent::new("a");
        assert_eq!(emitter.fire(CLICK, &mut event), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listeners_can_veto() {
        let emitter = Emitter::new();
        emitter.on(CLICK, |e: &mut ClickEvent| e.return_value = false);
        let mut event = ClickEvent::new("a");
        emitter.fire(CLICK, &mut event);
        assert!(!event.return_value);
    }

    #[test]
    fn off_removes_one_listener() {
        let emitter: Emitter<ClickEvent> = Emitter::new();
        let a = emitter.on(CLICK, |_| {});
        emitter.on(CLICK, |_| {});
        assert!(emitter.off(a));
        assert!(!emitter.off(a));
        assert_eq!(emitter.len(), 1);
        emitter.off_all();
        assert!(emitter.is_empty());
        assert_eq!(emitter.fire(CLICK, &mut ClickEvent::new("a")), 0);
    }
}
