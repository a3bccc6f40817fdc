//! Deterministic stand-ins for the host collaborators.

use crate::debounce::Timer;
use crate::gesture::{PointerEvent, PointerSource};
use crate::layout::{Placement, RenderSink};
use crate::transition::{FrameScheduler, FrameToken};
use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

/// Frame scheduler whose frames are delivered by hand.
#[derive(Debug, Default)]
pub struct ManualFrames {
    next_id: u64,
    queue: VecDeque<FrameToken>,
    cancelled: Vec<FrameToken>,
}

impl ManualFrames {
    pub fn take_next(&mut self) -> Option<FrameToken> {
        self.queue.pop_front()
    }

    pub fn peek_next(&self) -> Option<FrameToken> {
        self.queue.front().copied()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn was_cancelled(&self, token: FrameToken) -> bool {
        self.cancelled.contains(&token)
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken::new(self.next_id);
        self.queue.push_back(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.queue.retain(|t| *t != token);
        self.cancelled.push(token);
    }
}

#[derive(Default)]
struct TimerState {
    now: Duration,
    next_id: usize,
    scheduled: BTreeMap<usize, (Duration, Box<dyn FnOnce()>)>,
}

/// Virtual-time timer. Clones share one clock.
#[derive(Clone, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<TimerState>>,
}

impl ManualTimer {
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Moves the clock forward, firing due callbacks in deadline order.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let due = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .scheduled
                    .iter()
                    .filter(|(_, (at, _))| *at <= target)
                    .min_by_key(|(id, (at, _))| (*at, **id))
                    .map(|(id, _)| *id);
                next.and_then(|id| state.scheduled.remove(&id))
                    .inspect(|(at, _)| state.now = *at)
            };
            match due {
                Some((_, callback)) => callback(),
                None => break,
            }
        }
        self.state.borrow_mut().now = target;
    }
}

impl Timer for ManualTimer {
    type Handle = usize;

    fn start(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> usize {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = state.next_id;
        let at = state.now + delay;
        state.scheduled.insert(id, (at, callback));
        id
    }

    fn cancel(&self, handle: usize) {
        let removed = self.state.borrow_mut().scheduled.remove(&handle);
        assert!(removed.is_some(), "cancelled a timer that already fired");
    }
}

/// Render sink that keeps the latest placement per element and every
/// stacking-order write.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub placements: BTreeMap<usize, Placement>,
    pub stacking_writes: Vec<(usize, i32)>,
}

impl RecordingSink {
    pub fn placement(&self, element: usize) -> Placement {
        self.placements[&element]
    }
}

impl RenderSink for RecordingSink {
    type Element = usize;

    fn place(&mut self, element: &usize, placement: &Placement) {
        self.placements.insert(*element, *placement);
    }

    fn set_stacking_order(&mut self, element: &usize, order: i32) {
        self.stacking_writes.push((*element, order));
    }
}

/// Pointer source driven by the test.
#[derive(Default)]
pub struct ScriptedPointer {
    handlers: RefCell<Vec<Box<dyn FnMut(PointerEvent)>>>,
}

impl ScriptedPointer {
    pub fn emit(&self, event: PointerEvent) {
        for handler in self.handlers.borrow_mut().iter_mut() {
            handler(event);
        }
    }
}

impl PointerSource for ScriptedPointer {
    fn subscribe(&self, handler: Box<dyn FnMut(PointerEvent)>) {
        self.handlers.borrow_mut().push(handler);
    }
}
