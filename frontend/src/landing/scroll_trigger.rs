use std::rc::Rc;

use log::info;

use crate::runtime::scheduler::{Debouncer, Scheduler};
use crate::runtime::storage::OrderBumpFlags;
use crate::runtime::viewport::WindowListener;

pub const SCROLL_DEBOUNCE_MS: u32 = 100;

/// How far down the page the reader is, in percent of the scrollable range.
/// Pages that cannot scroll report 0.
pub fn scroll_percent(scroll_y: f64, document_height: f64, viewport_height: f64) -> f64 {
    let scrollable = document_height - viewport_height;
    if !scrollable.is_finite() || scrollable <= 0.0 || !scroll_y.is_finite() {
        return 0.0;
    }
    scroll_y / scrollable * 100.0
}

/// Reveals the order bump popup the first time the reader scrolls past the
/// threshold, unless the flags say they already answered it.
pub struct ScrollTrigger {
    flags: OrderBumpFlags,
    threshold_percent: f64,
    visible: bool,
}

impl ScrollTrigger {
    pub fn new(flags: OrderBumpFlags, threshold_percent: f64) -> Self {
        Self {
            flags,
            threshold_percent,
            visible: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns true only on the sample that reveals the popup.
    pub fn observe(&mut self, percent: f64) -> bool {
        if self.visible || percent < self.threshold_percent {
            return false;
        }
        if self.flags.email_submitted() || self.flags.dismissed() {
            return false;
        }
        self.visible = true;
        info!("order_bump_shown scroll_percent={:.1}", percent);
        true
    }

    pub fn close(&mut self, at_millis: i64) {
        self.flags.mark_dismissed(at_millis);
        self.visible = false;
        info!("order_bump_dismissed");
    }
}

fn read_scroll_percent() -> f64 {
    let window = match web_sys::window() {
        Some(window) => window,
        None => return 0.0,
    };
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let viewport_height = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);
    let document_height = window
        .document()
        .and_then(|d| d.document_element())
        .map(|e| f64::from(e.scroll_height()))
        .unwrap_or(0.0);
    scroll_percent(scroll_y, document_height, viewport_height)
}

/// Feeds debounced scroll positions of the window to `on_sample`.
pub struct ScrollWatcher {
    _listener: Option<WindowListener>,
    debouncer: Rc<Debouncer>,
}

impl ScrollWatcher {
    pub fn attach(scheduler: Rc<dyn Scheduler>, on_sample: Rc<dyn Fn(f64)>) -> Self {
        let debouncer = Rc::new(Debouncer::new(scheduler, SCROLL_DEBOUNCE_MS));
        let listener = {
            let debouncer = Rc::clone(&debouncer);
            WindowListener::new("scroll", move || {
                let on_sample = Rc::clone(&on_sample);
                debouncer.call(move || on_sample(read_scroll_percent()));
            })
        };
        if listener.is_none() {
            log::warn!("Could not listen for scroll events, order bump stays hidden");
        }
        Self {
            _listener: listener,
            debouncer,
        }
    }
}

impl Drop for ScrollWatcher {
    fn drop(&mut self) {
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::storage::{MemoryStore, OrderBumpFlags};

    fn trigger() -> (ScrollTrigger, OrderBumpFlags) {
        let flags = OrderBumpFlags::new(Rc::new(MemoryStore::default()));
        (ScrollTrigger::new(flags.clone(), 60.0), flags)
    }

    #[test]
    fn percent_of_the_scrollable_range() {
        assert_eq!(scroll_percent(0.0, 3000.0, 1000.0), 0.0);
        assert_eq!(scroll_percent(1200.0, 3000.0, 1000.0), 60.0);
        assert_eq!(scroll_percent(2000.0, 3000.0, 1000.0), 100.0);
    }

    #[test]
    fn short_pages_never_divide_by_zero() {
        assert_eq!(scroll_percent(0.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_percent(10.0, 600.0, 800.0), 0.0);
    }

    #[test]
    fn reveals_exactly_once() {
        let (mut trigger, _flags) = trigger();
        let revealed: Vec<bool> = [10.0, 55.0, 61.0, 70.0, 40.0, 65.0]
            .into_iter()
            .map(|p| trigger.observe(p))
            .collect();

        assert_eq!(revealed, vec![false, false, true, false, false, false]);
        assert!(trigger.is_visible());
    }

    #[test]
    fn threshold_is_inclusive() {
        let (mut trigger, _flags) = trigger();
        assert!(trigger.observe(60.0));
    }

    #[test]
    fn submitted_email_suppresses_the_popup() {
        let (mut trigger, flags) = trigger();
        flags.mark_email_submitted();
        for p in [10.0, 61.0, 99.0, 100.0, 75.0] {
            assert!(!trigger.observe(p));
        }
        assert!(!trigger.is_visible());
    }

    #[test]
    fn closing_keeps_it_closed_for_the_session() {
        let (mut trigger, flags) = trigger();
        assert!(trigger.observe(80.0));
        trigger.close(1_700_000_000_000);

        assert!(flags.dismissed());
        assert!(!trigger.is_visible());
        assert!(!trigger.observe(90.0));
    }
}
