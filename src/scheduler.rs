//! Single-threaded cooperative frame scheduler.
//!
//! Stands in for the display clock: recurring per-frame callbacks, one-shot
//! timers and resize listeners, all driven by [`FrameScheduler::tick`] from the
//! event loop (or from tests with a synthetic clock).
//!
//! Each callback runs inside an isolation boundary. A callback that returns an
//! error or panics is logged and unregistered, and its siblings keep running.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::error;

use crate::error::Result;

/// Timing information handed to every frame callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Monotonic tick counter, starting at 1
    pub frame: u64,
    /// Clock value passed to `tick`
    pub now: Duration,
    /// Time since the previous tick
    pub delta: Duration,
}

type FrameFn = Rc<RefCell<dyn FnMut(&FrameTick) -> Result<()>>>;
type ResizeFn = Rc<RefCell<dyn FnMut() -> Result<()>>>;
type TimerFn = Box<dyn FnOnce()>;

struct Timer {
    due: Duration,
    run: TimerFn,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    frames: BTreeMap<u64, (&'static str, FrameFn)>,
    resizes: BTreeMap<u64, (&'static str, ResizeFn)>,
    timers: BTreeMap<u64, Timer>,
}

impl Registry {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove(&mut self, id: u64) {
        self.frames.remove(&id);
        self.resizes.remove(&id);
        self.timers.remove(&id);
    }

    fn contains(&self, id: u64) -> bool {
        self.frames.contains_key(&id)
            || self.resizes.contains_key(&id)
            || self.timers.contains_key(&id)
    }
}

/// Cheap clonable handle to the page-wide scheduler
#[derive(Clone, Default)]
pub struct FrameScheduler {
    registry: Rc<RefCell<Registry>>,
    frame: Rc<Cell<u64>>,
    now: Rc<Cell<Duration>>,
}

/// Registration token; cancelling is synchronous and idempotent
#[derive(Debug)]
pub struct CallbackHandle {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl CallbackHandle {
    /// Detach the callback. No invocation happens after this returns.
    pub fn cancel(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().contains(self.id))
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, id: u64) -> CallbackHandle {
        CallbackHandle {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Run `callback` once per tick until cancelled or until it fails
    pub fn request_frames<F>(&self, label: &'static str, callback: F) -> CallbackHandle
    where
        F: FnMut(&FrameTick) -> Result<()> + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.allocate();
        registry
            .frames
            .insert(id, (label, Rc::new(RefCell::new(callback))));
        self.handle(id)
    }

    /// Run `callback` on every [`FrameScheduler::dispatch_resize`]
    pub fn on_resize<F>(&self, label: &'static str, callback: F) -> CallbackHandle
    where
        F: FnMut() -> Result<()> + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = registry.allocate();
        registry
            .resizes
            .insert(id, (label, Rc::new(RefCell::new(callback))));
        self.handle(id)
    }

    /// Run `callback` once, on the first tick at least `delay` after the current clock
    pub fn schedule_after<F>(&self, delay: Duration, callback: F) -> CallbackHandle
    where
        F: FnOnce() + 'static,
    {
        let due = self.now.get() + delay;
        let mut registry = self.registry.borrow_mut();
        let id = registry.allocate();
        registry.timers.insert(
            id,
            Timer {
                due,
                run: Box::new(callback),
            },
        );
        self.handle(id)
    }

    /// Advance the clock to `now`: fire due timers, then every frame callback
    /// that was registered before this tick started.
    pub fn tick(&self, now: Duration) -> FrameTick {
        let previous = self.now.replace(now);
        let frame = self.frame.get() + 1;
        self.frame.set(frame);
        let tick = FrameTick {
            frame,
            now,
            delta: now.saturating_sub(previous),
        };

        let due: Vec<u64> = self
            .registry
            .borrow()
            .timers
            .iter()
            .filter(|(_, timer)| timer.due <= now)
            .map(|(id, _)| *id)
            .collect();
        for id in due {
            let timer = self.registry.borrow_mut().timers.remove(&id);
            if let Some(timer) = timer {
                if catch_unwind(AssertUnwindSafe(timer.run)).is_err() {
                    error!(timer = id, "timer callback panicked");
                }
            }
        }

        let frames: Vec<(u64, &'static str, FrameFn)> = self
            .registry
            .borrow()
            .frames
            .iter()
            .map(|(id, (label, cb))| (*id, *label, Rc::clone(cb)))
            .collect();
        for (id, label, callback) in frames {
            // Cancelled by an earlier callback during this tick
            if !self.registry.borrow().frames.contains_key(&id) {
                continue;
            }
            let outcome = {
                let Ok(mut callback) = callback.try_borrow_mut() else {
                    continue;
                };
                catch_unwind(AssertUnwindSafe(|| (*callback)(&tick)))
            };
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!(callback = label, error = %err, "frame callback failed, disabling it");
                    self.registry.borrow_mut().remove(id);
                }
                Err(_) => {
                    error!(callback = label, "frame callback panicked, disabling it");
                    self.registry.borrow_mut().remove(id);
                }
            }
        }
        tick
    }

    /// Notify every resize listener (window size changed)
    pub fn dispatch_resize(&self) {
        let listeners: Vec<(u64, &'static str, ResizeFn)> = self
            .registry
            .borrow()
            .resizes
            .iter()
            .map(|(id, (label, cb))| (*id, *label, Rc::clone(cb)))
            .collect();
        for (id, label, callback) in listeners {
            if !self.registry.borrow().resizes.contains_key(&id) {
                continue;
            }
            let outcome = {
                let Ok(mut callback) = callback.try_borrow_mut() else {
                    continue;
                };
                catch_unwind(AssertUnwindSafe(|| (*callback)()))
            };
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    error!(callback = label, error = %err, "resize callback failed, disabling it");
                    self.registry.borrow_mut().remove(id);
                }
                Err(_) => {
                    error!(callback = label, "resize callback panicked, disabling it");
                    self.registry.borrow_mut().remove(id);
                }
            }
        }
    }

    /// Number of registered per-frame callbacks
    pub fn frame_callback_count(&self) -> usize {
        self.registry.borrow().frames.len()
    }

    /// Number of timers still waiting to fire
    pub fn pending_timer_count(&self) -> usize {
        self.registry.borrow().timers.len()
    }

    /// Clock value of the latest tick
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Ticks run so far
    pub fn frame(&self) -> u64 {
        self.frame.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_frame_callbacks_run_every_tick() {
        let scheduler = FrameScheduler::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let _handle = scheduler.request_frames("counter", move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        });

        for i in 1..=3 {
            scheduler.tick(ms(16 * i));
        }
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn test_cancel_is_synchronous_and_idempotent() {
        let scheduler = FrameScheduler::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let handle = scheduler.request_frames("counter", move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        });

        scheduler.tick(ms(16));
        handle.cancel();
        handle.cancel();
        assert!(!handle.is_active());
        scheduler.tick(ms(32));
        assert_eq!(count.get(), 1);
        assert_eq!(scheduler.frame_callback_count(), 0);
    }

    #[test]
    fn test_failing_callback_is_isolated() {
        let scheduler = FrameScheduler::new();
        let healthy = Rc::new(Cell::new(0));
        let seen = Rc::clone(&healthy);

        let broken = scheduler.request_frames("broken", |_| {
            Err(GalleryError::Render("boom".to_string()))
        });
        let panicking = scheduler.request_frames("panicking", |_| panic!("draw exploded"));
        let _ok = scheduler.request_frames("healthy", move |_| {
            seen.set(seen.get() + 1);
            Ok(())
        });

        scheduler.tick(ms(16));
        scheduler.tick(ms(32));

        assert_eq!(healthy.get(), 2);
        assert!(!broken.is_active());
        assert!(!panicking.is_active());
        assert_eq!(scheduler.frame_callback_count(), 1);
    }

    #[test]
    fn test_callback_registered_during_tick_runs_next_tick() {
        let scheduler = FrameScheduler::new();
        let inner_runs = Rc::new(Cell::new(0));
        let spawned = Rc::new(RefCell::new(None));

        let sched = scheduler.clone();
        let runs = Rc::clone(&inner_runs);
        let slot = Rc::clone(&spawned);
        let _outer = scheduler.request_frames("outer", move |_| {
            if slot.borrow().is_none() {
                let runs = Rc::clone(&runs);
                *slot.borrow_mut() = Some(sched.request_frames("inner", move |_| {
                    runs.set(runs.get() + 1);
                    Ok(())
                }));
            }
            Ok(())
        });

        scheduler.tick(ms(16));
        assert_eq!(inner_runs.get(), 0);
        scheduler.tick(ms(32));
        assert_eq!(inner_runs.get(), 1);
    }

    #[test]
    fn test_timer_fires_once_after_delay() {
        let scheduler = FrameScheduler::new();
        scheduler.tick(ms(1000));

        let fired = Rc::new(Cell::new(0));
        let seen = Rc::clone(&fired);
        scheduler.schedule_after(ms(100), move || seen.set(seen.get() + 1));

        scheduler.tick(ms(1050));
        assert_eq!(fired.get(), 0);
        scheduler.tick(ms(1100));
        assert_eq!(fired.get(), 1);
        scheduler.tick(ms(1200));
        assert_eq!(fired.get(), 1);
        assert_eq!(scheduler.pending_timer_count(), 0);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let scheduler = FrameScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let seen = Rc::clone(&fired);
        let handle = scheduler.schedule_after(ms(10), move || seen.set(true));
        handle.cancel();
        scheduler.tick(ms(50));
        assert!(!fired.get());
    }

    #[test]
    fn test_resize_listeners() {
        let scheduler = FrameScheduler::new();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let handle = scheduler.on_resize("resize", move || {
            seen.set(seen.get() + 1);
            Ok(())
        });
        scheduler.dispatch_resize();
        handle.cancel();
        scheduler.dispatch_resize();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_tick_reports_delta() {
        let scheduler = FrameScheduler::new();
        scheduler.tick(ms(10));
        let tick = scheduler.tick(ms(26));
        assert_eq!(tick.frame, 2);
        assert_eq!(tick.delta, ms(16));
    }
}
