//! # Frame Scheduling
//!
//! The time source and frame-callback seam between the engine and its host.
//!
//! ## Key Types
//! - `AnimationClock`: millisecond time source (`SystemClock`, `ManualClock`).
//! - `FrameHost`: clock plus request/cancel of next-frame callbacks.
//! - `FrameQueue`: in-memory host; cancelled requests are dropped from the
//!   queue and can never be delivered.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

pub trait AnimationClock {
    fn now_millis(&self) -> u64;
}

/// Wall clock. Every skeleton driven by it shares the same shimmer phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl AnimationClock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Clock advanced by hand, for offline rendering and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_millis: u64) -> Self {
        Self {
            now: Cell::new(start_millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.now.set(millis);
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }
}

impl AnimationClock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}

/// Handle for one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequest(pub u64);

/// The rendering pipeline hosting the engine.
pub trait FrameHost {
    fn now_millis(&self) -> u64;

    /// Asks for a callback on the next frame.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraws a request so its callback never fires.
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[derive(Debug, Default)]
pub struct FrameQueue<C: AnimationClock> {
    clock: C,
    next_id: u64,
    pending: BTreeSet<FrameRequest>,
}

impl<C: AnimationClock> FrameQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            pending: BTreeSet::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, request: FrameRequest) -> bool {
        self.pending.contains(&request)
    }

    /// Removes and returns every request due on this frame, oldest first.
    pub fn take_due(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

impl<C: AnimationClock> FrameHost for FrameQueue<C> {
    fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let request = FrameRequest(self.next_id);
        self.pending.insert(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending.remove(&request);
    }
}
