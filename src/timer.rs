//! One-shot debounce timer with identity-based cancellation.
//!
//! Arming spawns a sleeper thread that always posts its fire event;
//! cancellation never interrupts the sleeper, it just forgets the request
//! id so the late event is ignored. At most one request is armed at any
//! instant.

use std::thread;
use std::time::Duration;

use flume::Sender;
use tracing::trace;

use crate::events::ControllerEvent;

pub struct DebounceTimer {
    events: Sender<ControllerEvent>,
    armed: Option<u64>,
    next_request: u64,
}

impl DebounceTimer {
    pub fn new(events: Sender<ControllerEvent>) -> Self {
        Self {
            events,
            armed: None,
            next_request: 0,
        }
    }

    /// Arms a new one-shot timer, superseding any armed one, and returns
    /// its request id.
    pub fn arm(&mut self, delay: Duration) -> u64 {
        self.next_request += 1;
        let request = self.next_request;
        self.armed = Some(request);

        let events = self.events.clone();
        thread::Builder::new()
            .name("hover-debounce".into())
            .spawn(move || {
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                let _ = events.send(ControllerEvent::DebounceFired { request });
            })
            .expect("Failed to spawn debounce timer");

        trace!(request, ?delay, "debounce armed");
        request
    }

    /// Forgets the armed request. Its fire event, if still in flight,
    /// becomes a no-op.
    pub fn cancel(&mut self) {
        if let Some(request) = self.armed.take() {
            trace!(request, "debounce cancelled");
        }
    }

    /// Consumes the armed request if `request` matches it. A stale fire
    /// returns false and leaves any newer armed request in place.
    pub fn acknowledge(&mut self, request: u64) -> bool {
        if self.armed == Some(request) {
            self.armed = None;
            true
        } else {
            trace!(request, "stale debounce fire ignored");
            false
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recv_fire(rx: &flume::Receiver<ControllerEvent>) -> u64 {
        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(ControllerEvent::DebounceFired { request }) => request,
            other => panic!("expected debounce fire, got {other:?}"),
        }
    }

    #[test]
    fn test_fire_is_acknowledged_once() {
        let (tx, rx) = flume::unbounded();
        let mut timer = DebounceTimer::new(tx);

        let request = timer.arm(Duration::ZERO);
        assert!(timer.is_armed());

        let fired = recv_fire(&rx);
        assert_eq!(fired, request);
        assert!(timer.acknowledge(fired));
        assert!(!timer.is_armed());
        assert!(!timer.acknowledge(fired));
    }

    #[test]
    fn test_superseded_request_never_wins() {
        let (tx, rx) = flume::unbounded();
        let mut timer = DebounceTimer::new(tx);

        let first = timer.arm(Duration::ZERO);
        let second = timer.arm(Duration::ZERO);

        // Both sleepers post their events; only the second is honored,
        // regardless of arrival order.
        let mut honored = Vec::new();
        for _ in 0..2 {
            let request = recv_fire(&rx);
            if timer.acknowledge(request) {
                honored.push(request);
            }
        }
        assert_eq!(honored, vec![second]);
        assert_ne!(first, second);
    }

    #[test]
    fn test_cancel_ignores_late_fire() {
        let (tx, rx) = flume::unbounded();
        let mut timer = DebounceTimer::new(tx);

        let request = timer.arm(Duration::ZERO);
        timer.cancel();
        assert!(!timer.is_armed());

        let fired = recv_fire(&rx);
        assert_eq!(fired, request);
        assert!(!timer.acknowledge(fired));
    }
}
