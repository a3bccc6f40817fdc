//! Frame-driven tweening between two values.
//!
//! The driver never sleeps or spawns: it asks a [`FrameScheduler`] for the
//! next display frame and does its work when the host hands that frame back
//! through [`Transitioner::on_frame`].

use crate::easing::Easing;
use crate::error::OrbitError;
use derive_more::{Display, From, Into};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into)]
pub struct FrameToken(u64);

impl FrameToken {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Host-side access to the display refresh cycle.
///
/// A requested frame is delivered at most once, by the host calling back
/// with the returned token and the frame timestamp. Cancelled tokens must not
/// be delivered; if one slips through it is ignored.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl Transition {
    pub fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
        }
    }

    /// Builds a transition from a duration in seconds and an easing name.
    pub fn named(from: f64, to: f64, seconds: f64, easing: &str) -> Result<Self, OrbitError> {
        let easing = Easing::from_name(easing)?;
        let duration =
            Duration::try_from_secs_f64(seconds).map_err(|_| OrbitError::InvalidDuration(seconds))?;
        Ok(Self::new(from, to, duration, easing))
    }

    fn value_at(&self, elapsed: Duration) -> f64 {
        let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + self.easing.apply(progress) * (self.to - self.from)
    }
}

/// A value delivered for one frame. The last one of a transition carries
/// `is_final` and exactly the target value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub value: f64,
    pub is_final: bool,
}

#[derive(Debug)]
struct Running {
    transition: Transition,
    /// Pinned to the timestamp of the first delivered frame.
    started_at: Option<Duration>,
    pending: FrameToken,
}

/// Runs at most one transition at a time; starting another cancels it.
#[derive(Debug, Default)]
pub struct Transitioner {
    running: Option<Running>,
}

impl Transitioner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.running.is_some()
    }

    pub fn from_to<S: FrameScheduler>(&mut self, transition: Transition, scheduler: &mut S) {
        self.cancel(scheduler);

        log::trace!(
            "transition {:.4} -> {:.4} over {:?} ({})",
            transition.from,
            transition.to,
            transition.duration,
            transition.easing
        );

        let pending = scheduler.request_frame();
        self.running = Some(Running {
            transition,
            started_at: None,
            pending,
        });
    }

    /// Drops the running transition, if any, and its requested frame.
    pub fn cancel<S: FrameScheduler>(&mut self, scheduler: &mut S) {
        if let Some(running) = self.running.take() {
            scheduler.cancel_frame(running.pending);
        }
    }

    /// Advances the running transition for a delivered frame.
    ///
    /// Returns `None` when nothing is running or the token is stale.
    pub fn on_frame<S: FrameScheduler>(
        &mut self,
        token: FrameToken,
        timestamp: Duration,
        scheduler: &mut S,
    ) -> Option<Step> {
        let running = self.running.as_mut().filter(|r| r.pending == token)?;
        let started_at = *running.started_at.get_or_insert(timestamp);
        let elapsed = timestamp.saturating_sub(started_at);

        if elapsed >= running.transition.duration {
            let to = running.transition.to;
            self.running = None;
            return Some(Step {
                value: to,
                is_final: true,
            });
        }

        let value = running.transition.value_at(elapsed);
        running.pending = scheduler.request_frame();

        Some(Step {
            value,
            is_final: false,
        })
    }
}
