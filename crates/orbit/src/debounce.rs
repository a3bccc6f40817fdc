use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// One-shot timers on the host's event loop.
pub trait Timer {
    type Handle: 'static;

    fn start(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> Self::Handle;

    /// Only ever called with handles whose callback has not run yet.
    fn cancel(&self, handle: Self::Handle);
}

/// Coalesces bursts of triggers into a single call after a quiet period.
pub struct Debouncer<T: Timer> {
    timer: T,
    delay: Duration,
    pending: Rc<RefCell<Option<T::Handle>>>,
}

impl<T: Timer> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl<T: Timer> Debouncer<T> {
    pub fn new(timer: T, delay: Duration) -> Self {
        Self {
            timer,
            delay,
            pending: Rc::new(RefCell::new(None)),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Restarts the quiet period; `callback` replaces any earlier one.
    pub fn trigger(&self, callback: impl FnOnce() + 'static) {
        self.cancel();

        let pending = Rc::clone(&self.pending);
        let handle = self.timer.start(
            self.delay,
            Box::new(move || {
                pending.borrow_mut().take();
                callback();
            }),
        );
        *self.pending.borrow_mut() = Some(handle);
    }

    pub fn cancel(&self) {
        let previous = self.pending.borrow_mut().take();
        if let Some(handle) = previous {
            self.timer.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualTimer;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_burst_fires_once_after_last_trigger() {
        let timer = ManualTimer::default();
        let debouncer = Debouncer::new(timer.clone(), ms(100));
        let fired = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..5 {
            let (fired, clock) = (fired.clone(), timer.clone());
            debouncer.trigger(move || fired.borrow_mut().push(clock.now()));
            timer.advance(ms(10));
        }
        // Last trigger happened at 40ms.
        timer.advance(ms(89));
        assert!(fired.borrow().is_empty());
        assert!(debouncer.is_pending());

        timer.advance(ms(1));
        assert_eq!(*fired.borrow(), vec![ms(140)]);
        assert!(!debouncer.is_pending());

        timer.advance(ms(500));
        assert_eq!(fired.borrow().len(), 1);
    }

    #[test]
    fn test_separate_bursts_fire_separately() {
        let timer = ManualTimer::default();
        let debouncer = Debouncer::new(timer.clone(), ms(100));
        let count = Rc::new(RefCell::new(0));

        for _ in 0..2 {
            let count = count.clone();
            debouncer.trigger(move || *count.borrow_mut() += 1);
            timer.advance(ms(150));
        }
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_cancel() {
        let timer = ManualTimer::default();
        let debouncer = Debouncer::new(timer.clone(), ms(100));
        let count = Rc::new(RefCell::new(0));
        {
            let count = count.clone();
            debouncer.trigger(move || *count.borrow_mut() += 1);
        }
        debouncer.cancel();
        timer.advance(ms(200));
        assert_eq!(*count.borrow(), 0);
    }
}
