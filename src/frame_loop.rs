//! Explicit frame scheduling.
//!
//! The window shell asks the [`FrameLoop`] for a tick on every redraw; each
//! tick carries its index and the time since the previous one. Cancelling
//! through any [`CancelHandle`] clone stops further ticks, after which the
//! shell exits.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// One scheduled frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    pub index: u64,
    pub delta: Duration,
}

/// Cloneable stop switch for a [`FrameLoop`]
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct FrameLoop {
    next_index: u64,
    last_tick: Option<Instant>,
    cancel: CancelHandle,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            next_index: 0,
            last_tick: None,
            cancel: CancelHandle::default(),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Next tick, or `None` once cancelled
    pub fn tick(&mut self) -> Option<FrameTick> {
        self.tick_at(Instant::now())
    }

    /// Like [`FrameLoop::tick`] with an explicit clock reading
    pub fn tick_at(&mut self, now: Instant) -> Option<FrameTick> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let delta = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last_tick = Some(now);

        let tick = FrameTick {
            index: self.next_index,
            delta,
        };
        self.next_index += 1;
        Some(tick)
    }

    pub fn frames_produced(&self) -> u64 {
        self.next_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_count_and_measure() {
        let mut frames = FrameLoop::new();
        let start = Instant::now();

        let first = frames.tick_at(start).unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.delta, Duration::ZERO);

        let second = frames.tick_at(start + Duration::from_millis(16)).unwrap();
        assert_eq!(second.index, 1);
        assert_eq!(second.delta, Duration::from_millis(16));
        assert_eq!(frames.frames_produced(), 2);
    }

    #[test]
    fn test_cancel_stops_ticks() {
        let mut frames = FrameLoop::new();
        let handle = frames.cancel_handle();
        assert!(frames.tick().is_some());

        handle.clone().cancel();
        assert!(handle.is_cancelled());
        assert!(!frames.is_running());
        assert!(frames.tick().is_none());
        assert_eq!(frames.frames_produced(), 1);
    }
}
