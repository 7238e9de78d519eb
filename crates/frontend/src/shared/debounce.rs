//! Trailing-edge debounce
//!
//! Every [`Debouncer::schedule`] call supersedes the previous one: only the
//! future returned by the latest call resolves to `true`, after the quiet
//! period. [`Debouncer::cancel`] supersedes all pending calls. Nothing is
//! aborted; superseded futures just resolve to `false` when their timer ends.

use futures::future::{FutureExt, LocalBoxFuture};
use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Timer used to wait out the quiet period
pub type Sleeper = Rc<dyn Fn(Duration) -> LocalBoxFuture<'static, ()>>;

/// Browser timer (`setTimeout` through gloo)
pub fn browser_sleeper() -> Sleeper {
    Rc::new(|delay: Duration| {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::future::TimeoutFuture::new(millis).boxed_local()
    })
}

#[derive(Clone)]
pub struct Debouncer {
    delay: Duration,
    generation: Rc<Cell<u64>>,
    sleeper: Sleeper,
}

impl Debouncer {
    pub fn new(delay: Duration, sleeper: Sleeper) -> Self {
        Self {
            delay,
            generation: Rc::new(Cell::new(0)),
            sleeper,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer. Resolves to `true` if this is still the latest call
    /// once the delay has passed.
    pub fn schedule(&self) -> impl Future<Output = bool> + 'static {
        let armed = self.generation.get().wrapping_add(1);
        self.generation.set(armed);

        let generation = Rc::clone(&self.generation);
        let wait = (self.sleeper)(self.delay);
        async move {
            wait.await;
            generation.get() == armed
        }
    }

    /// Drop every pending call (view teardown, explicit save)
    pub fn cancel(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}

#[cfg(test)]
pub(crate) fn immediate_sleeper() -> Sleeper {
    Rc::new(|_| futures::future::ready(()).boxed_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_only_latest_call_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(300), immediate_sleeper());
        let first = debouncer.schedule();
        let second = debouncer.schedule();
        let third = debouncer.schedule();
        assert!(!block_on(first));
        assert!(!block_on(second));
        assert!(block_on(third));
    }

    #[test]
    fn test_cancel_supersedes_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(300), immediate_sleeper());
        let pending = debouncer.schedule();
        debouncer.cancel();
        assert!(!block_on(pending));

        // usable again after cancel
        assert!(block_on(debouncer.schedule()));
    }

    #[test]
    fn test_sleeper_receives_delay() {
        let seen = Rc::new(Cell::new(Duration::ZERO));
        let seen_in = Rc::clone(&seen);
        let sleeper: Sleeper = Rc::new(move |d| {
            seen_in.set(d);
            futures::future::ready(()).boxed_local()
        });
        let debouncer = Debouncer::new(Duration::from_millis(800), sleeper);
        assert!(block_on(debouncer.schedule()));
        assert_eq!(seen.get(), Duration::from_millis(800));
    }
}
