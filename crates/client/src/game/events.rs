// Event queue between browser callbacks and the single game-state consumer
//
// Socket, timer, image and DOM callbacks never touch the client directly.
// They push an event here; the first push of a batch fires the wake hook,
// which schedules one pump that drains everything. Drawing is requested
// separately through `RedrawRequest`, once per animation frame.
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use glam::Vec2;
use protocol::MoveDirection;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    SocketOpened { socket: u64 },
    SocketClosed { socket: u64, code: u16 },
    SocketError { socket: u64 },
    SocketMessage { socket: u64, text: String },
    ReconnectDue { token: u64 },
    SpriteLoaded { avatar: String, uri: String },
    SpriteFailed { avatar: String, uri: String },
    BackgroundLoaded,
    BackgroundFailed,
    Resized { width: u32, height: u32 },
    MoveKey(MoveDirection),
    Click(Vec2),
}

#[derive(Default)]
pub struct EventQueue {
    events: RefCell<VecDeque<ClientEvent>>,
    scheduled: Cell<bool>,
    wake: RefCell<Option<Box<dyn Fn()>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the hook that schedules a drain.
    pub fn set_wake(&self, wake: impl Fn() + 'static) {
        *self.wake.borrow_mut() = Some(Box::new(wake));
    }

    pub fn push(&self, event: ClientEvent) {
        self.events.borrow_mut().push_back(event);
        if self.scheduled.replace(true) {
            return;
        }
        if let Some(wake) = self.wake.borrow().as_ref() {
            wake();
        }
    }

    /// Wake again for a batch that could not be drained.
    pub fn rewake(&self) {
        self.scheduled.set(true);
        if let Some(wake) = self.wake.borrow().as_ref() {
            wake();
        }
    }

    /// Take every queued event. Pushes made after this call wake again.
    pub fn drain(&self) -> Vec<ClientEvent> {
        self.scheduled.set(false);
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// Coalesces redraw requests into at most one pending animation frame.
#[derive(Debug, Default)]
pub struct RedrawRequest {
    pending: Cell<bool>,
}

impl RedrawRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a redraw as needed. Returns true only when no frame was pending,
    /// i.e. when the caller must request one.
    pub fn request(&self) -> bool {
        !self.pending.replace(true)
    }

    /// Called by the frame: returns whether a redraw was requested.
    pub fn take(&self) -> bool {
        self.pending.replace(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn counting_queue() -> (EventQueue, Rc<Cell<u32>>) {
        let queue = EventQueue::new();
        let wakes = Rc::new(Cell::new(0));
        let counter = wakes.clone();
        queue.set_wake(move || counter.set(counter.get() + 1));
        (queue, wakes)
    }

    #[test]
    fn test_batch_wakes_once() {
        let (queue, wakes) = counting_queue();
        queue.push(ClientEvent::BackgroundLoaded);
        queue.push(ClientEvent::Resized { width: 10, height: 20 });
        queue.push(ClientEvent::SocketOpened { socket: 1 });
        assert_eq!(wakes.get(), 1);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn test_drain_preserves_order_and_rearms() {
        let (queue, wakes) = counting_queue();
        queue.push(ClientEvent::SocketOpened { socket: 1 });
        queue.push(ClientEvent::SocketMessage { socket: 1, text: "{}".into() });

        let events = queue.drain();
        assert_eq!(
            events,
            vec![
                ClientEvent::SocketOpened { socket: 1 },
                ClientEvent::SocketMessage { socket: 1, text: "{}".into() },
            ]
        );
        assert!(queue.is_empty());

        queue.push(ClientEvent::BackgroundFailed);
        assert_eq!(wakes.get(), 2);
    }

    #[test]
    fn test_rewake_keeps_events_and_wakes() {
        let (queue, wakes) = counting_queue();
        queue.push(ClientEvent::BackgroundLoaded);
        queue.rewake();
        assert_eq!(wakes.get(), 2);
        assert_eq!(queue.len(), 1);

        // Still counted as scheduled: further pushes join the pending batch.
        queue.push(ClientEvent::BackgroundFailed);
        assert_eq!(wakes.get(), 2);
    }

    #[test]
    fn test_redraw_requests_coalesce_per_frame() {
        let redraw = RedrawRequest::new();
        assert!(redraw.request());
        assert!(!redraw.request());
        assert!(redraw.take());
        assert!(!redraw.take());
        assert!(redraw.request());
    }

    #[test]
    fn test_push_without_wake_hook_still_queues() {
        let queue = EventQueue::new();
        queue.push(ClientEvent::MoveKey(MoveDirection::Up));
        assert_eq!(queue.drain(), vec![ClientEvent::MoveKey(MoveDirection::Up)]);
    }
}
