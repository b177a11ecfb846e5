use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

/// Fallback frame length when the browser gives us no animation frame.
pub const FRAME_MS: u32 = 16;

/// Keeps a scheduled task alive. Dropping the handle cancels the task if it
/// has not fired yet.
pub struct TaskHandle {
    _guard: Box<dyn Any>,
}

impl TaskHandle {
    pub fn new<G: 'static>(guard: G) -> Self {
        Self { _guard: Box::new(guard) }
    }
}

pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle;

    fn next_frame(&self, task: Box<dyn FnOnce()>) -> TaskHandle {
        self.schedule(FRAME_MS, task)
    }
}

/// Timers backed by `setTimeout` and `requestAnimationFrame`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

struct PendingTimeout(Rc<RefCell<Option<Timeout>>>);

impl Drop for PendingTimeout {
    fn drop(&mut self) {
        // Dropping the Timeout clears it.
        self.0.borrow_mut().take();
    }
}

struct AnimationFrame {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for AnimationFrame {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(self.id);
        }
    }
}

struct PendingFrame(Rc<RefCell<Option<AnimationFrame>>>);

impl Drop for PendingFrame {
    fn drop(&mut self) {
        self.0.borrow_mut().take();
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
        let slot: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
        let fired = Rc::clone(&slot);
        let timeout = Timeout::new(delay_ms, move || {
            // The callback must not free its own closure while it runs, so the
            // spent timer is released on the next microtask.
            if let Some(spent) = fired.borrow_mut().take() {
                spawn_local(async move { drop(spent) });
            }
            task();
        });
        *slot.borrow_mut() = Some(timeout);
        TaskHandle::new(PendingTimeout(slot))
    }

    fn next_frame(&self, task: Box<dyn FnOnce()>) -> TaskHandle {
        let window = match web_sys::window() {
            Some(window) => window,
            None => return self.schedule(FRAME_MS, task),
        };

        let task = Rc::new(RefCell::new(Some(task)));
        let slot: Rc<RefCell<Option<AnimationFrame>>> = Rc::new(RefCell::new(None));

        let callback = {
            let task = Rc::clone(&task);
            let fired = Rc::clone(&slot);
            Closure::wrap(Box::new(move || {
                if let Some(spent) = fired.borrow_mut().take() {
                    spawn_local(async move { drop(spent) });
                }
                if let Some(task) = task.borrow_mut().take() {
                    task();
                }
            }) as Box<dyn FnMut()>)
        };

        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => {
                *slot.borrow_mut() = Some(AnimationFrame { id, _callback: callback });
                TaskHandle::new(PendingFrame(slot))
            }
            Err(_) => {
                log::warn!("requestAnimationFrame unavailable, falling back to a timeout");
                match task.borrow_mut().take() {
                    Some(task) => self.schedule(FRAME_MS, task),
                    None => TaskHandle::new(()),
                }
            }
        }
    }
}

/// Coalesces bursts of calls into one run after `wait_ms` of quiet.
/// A newer call replaces the pending one.
pub struct Debouncer {
    scheduler: Rc<dyn Scheduler>,
    wait_ms: u32,
    pending: RefCell<Option<TaskHandle>>,
}

impl Debouncer {
    pub fn new(scheduler: Rc<dyn Scheduler>, wait_ms: u32) -> Self {
        Self {
            scheduler,
            wait_ms,
            pending: RefCell::new(None),
        }
    }

    pub fn call(&self, task: impl FnOnce() + 'static) {
        let handle = self.scheduler.schedule(self.wait_ms, Box::new(task));
        let superseded = self.pending.replace(Some(handle));
        drop(superseded);
    }

    pub fn cancel(&self) {
        let pending = self.pending.take();
        drop(pending);
    }
}

#[cfg(test)]
pub mod testing {
    use super::{Scheduler, TaskHandle};
    use chrono::{Duration, NaiveDateTime};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use crate::runtime::clock::Clock;

    struct Scheduled {
        due: u64,
        seq: u64,
        cancelled: Rc<Cell<bool>>,
        task: Box<dyn FnOnce()>,
    }

    #[derive(Default)]
    struct Queue {
        now: u64,
        seq: u64,
        tasks: Vec<Scheduled>,
    }

    struct CancelOnDrop(Rc<Cell<bool>>);

    impl Drop for CancelOnDrop {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    /// Virtual-time scheduler. Nothing runs until `advance` is called.
    #[derive(Clone, Default)]
    pub struct ManualScheduler {
        queue: Rc<RefCell<Queue>>,
    }

    impl ManualScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn now(&self) -> u64 {
            self.queue.borrow().now
        }

        pub fn pending(&self) -> usize {
            self.queue
                .borrow()
                .tasks
                .iter()
                .filter(|t| !t.cancelled.get())
                .count()
        }

        pub fn advance(&self, ms: u64) {
            let target = self.queue.borrow().now + ms;
            loop {
                let next = {
                    let mut queue = self.queue.borrow_mut();
                    queue.tasks.retain(|t| !t.cancelled.get());
                    let earliest = queue
                        .tasks
                        .iter()
                        .enumerate()
                        .filter(|(_, t)| t.due <= target)
                        .min_by_key(|(_, t)| (t.due, t.seq))
                        .map(|(i, _)| i);
                    earliest.map(|i| {
                        let task = queue.tasks.remove(i);
                        queue.now = task.due;
                        task
                    })
                };
                match next {
                    Some(scheduled) => (scheduled.task)(),
                    None => break,
                }
            }
            self.queue.borrow_mut().now = target;
        }
    }

    impl Scheduler for ManualScheduler {
        fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TaskHandle {
            let cancelled = Rc::new(Cell::new(false));
            let mut queue = self.queue.borrow_mut();
            queue.seq += 1;
            let scheduled = Scheduled {
                due: queue.now + u64::from(delay_ms),
                seq: queue.seq,
                cancelled: Rc::clone(&cancelled),
                task,
            };
            queue.tasks.push(scheduled);
            TaskHandle::new(CancelOnDrop(cancelled))
        }
    }

    /// Wall clock that follows a `ManualScheduler`'s virtual time.
    pub struct ManualClock {
        start: NaiveDateTime,
        scheduler: ManualScheduler,
    }

    impl ManualClock {
        pub fn new(start: NaiveDateTime, scheduler: ManualScheduler) -> Self {
            Self { start, scheduler }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> NaiveDateTime {
            self.start + Duration::milliseconds(self.scheduler.now() as i64)
        }

        fn timestamp_millis(&self) -> i64 {
            self.now().and_utc().timestamp_millis()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualScheduler;
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn dropping_a_handle_cancels_the_task() {
        let scheduler = ManualScheduler::new();
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        let handle = scheduler.schedule(100, Box::new(move || *flag.borrow_mut() = true));
        drop(handle);
        scheduler.advance(200);
        assert!(!*ran.borrow());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn tasks_run_in_due_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handles = Vec::new();
        for (delay, label) in [(300u32, "c"), (100, "a"), (200, "b")] {
            let log = Rc::clone(&log);
            handles.push(scheduler.schedule(delay, Box::new(move || log.borrow_mut().push(label))));
        }
        scheduler.advance(250);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        scheduler.advance(50);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn debouncer_keeps_only_the_last_call() {
        let scheduler = ManualScheduler::new();
        let debouncer = Debouncer::new(Rc::new(scheduler.clone()), 100);
        let seen = Rc::new(RefCell::new(Vec::new()));

        for (at, value) in [(0u64, 1), (50, 2), (90, 3)] {
            scheduler.advance(at - scheduler.now());
            let seen = Rc::clone(&seen);
            debouncer.call(move || seen.borrow_mut().push(value));
        }

        scheduler.advance(99);
        assert!(seen.borrow().is_empty());
        scheduler.advance(1);
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn cancelled_debouncer_never_fires() {
        let scheduler = ManualScheduler::new();
        let debouncer = Debouncer::new(Rc::new(scheduler.clone()), 100);
        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);
        debouncer.call(move || *flag.borrow_mut() = true);
        debouncer.cancel();
        scheduler.advance(500);
        assert!(!*fired.borrow());
    }
}
