use std::cell::RefCell;
use std::rc::{Rc, Weak};

use yew::prelude::*;

use crate::data::PainPoint;
use crate::runtime::scheduler::{BrowserScheduler, Scheduler, TaskHandle};
use crate::runtime::viewport::{items_per_view, BrowserViewport, Subscription, ViewportObserver};

/// Time a card stays still so it can be read.
pub const PAUSE_DURATION_MS: u32 = 3500;
/// Length of the slide animation.
pub const TRANSITION_DURATION_MS: u32 = 700;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliderPhase {
    Cycling,
    SnappingBack,
}

/// Position of a looping carousel rendered over its items twice in a row.
///
/// `index` stays inside `[0, 2 * len)`. Reaching `len` shows the copy of the
/// first card, which is where the track jumps back to `0` unanimated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderState {
    len: usize,
    index: usize,
    transitioning: bool,
    items_per_view: usize,
}

impl SliderState {
    pub fn new(len: usize, items_per_view: usize) -> Self {
        Self {
            len,
            index: 0,
            transitioning: true,
            items_per_view: items_per_view.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn items_per_view(&self) -> usize {
        self.items_per_view
    }

    pub fn rendered_len(&self) -> usize {
        self.len * 2
    }

    pub fn phase(&self) -> SliderPhase {
        if self.len > 0 && self.index == self.len {
            SliderPhase::SnappingBack
        } else {
            SliderPhase::Cycling
        }
    }

    /// Index of the source item at the leading edge.
    pub fn leading_item(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            self.index % self.len
        }
    }

    pub fn advance(&mut self) {
        if self.len == 0 || self.phase() == SliderPhase::SnappingBack {
            return;
        }
        self.index += 1;
    }

    pub fn snap_back(&mut self) {
        self.index = 0;
        self.transitioning = false;
    }

    pub fn resume_transitions(&mut self) {
        self.transitioning = true;
    }

    pub fn set_items_per_view(&mut self, items_per_view: usize) {
        self.items_per_view = items_per_view.max(1);
    }

    pub fn translate_percent(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.index as f64 * 100.0 / self.rendered_len() as f64
    }

    pub fn track_width_percent(&self) -> f64 {
        self.rendered_len() as f64 / self.items_per_view as f64 * 100.0
    }

    pub fn slide_width_percent(&self) -> f64 {
        if self.len == 0 {
            return 100.0;
        }
        100.0 / self.rendered_len() as f64
    }

    pub fn track_style(&self) -> String {
        let transition = if self.transitioning {
            format!(
                "transform {}ms cubic-bezier(0.2, 0.8, 0.2, 1)",
                TRANSITION_DURATION_MS
            )
        } else {
            "none".to_string()
        };
        format!(
            "transform: translateX(-{}%); transition: {}; width: {}%;",
            self.translate_percent(),
            transition,
            self.track_width_percent()
        )
    }
}

struct SliderInner {
    state: RefCell<SliderState>,
    scheduler: Rc<dyn Scheduler>,
    timer: RefCell<Option<TaskHandle>>,
    frame: RefCell<Option<TaskHandle>>,
    on_change: Box<dyn Fn(SliderState)>,
}

impl SliderInner {
    fn notify(&self) {
        let snapshot = *self.state.borrow();
        (self.on_change)(snapshot);
    }

    fn later(self: &Rc<Self>, delay_ms: u32, step: fn(&Rc<Self>)) -> TaskHandle {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.scheduler.schedule(
            delay_ms,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    step(&inner);
                }
            }),
        )
    }

    fn next_frame(self: &Rc<Self>, step: fn(&Rc<Self>)) -> TaskHandle {
        let weak: Weak<Self> = Rc::downgrade(self);
        self.scheduler.next_frame(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                step(&inner);
            }
        }))
    }

    /// Replaces whatever timer is pending with the one the current phase needs.
    fn arm(self: &Rc<Self>) {
        let state = *self.state.borrow();
        if state.rendered_len() == 0 {
            return;
        }
        let handle = match state.phase() {
            SliderPhase::Cycling => self.later(PAUSE_DURATION_MS, Self::advance),
            SliderPhase::SnappingBack => self.later(TRANSITION_DURATION_MS, Self::snap_back),
        };
        let previous = self.timer.replace(Some(handle));
        drop(previous);
    }

    fn advance(self: &Rc<Self>) {
        self.state.borrow_mut().advance();
        self.notify();
        self.arm();
    }

    fn snap_back(self: &Rc<Self>) {
        self.state.borrow_mut().snap_back();
        self.notify();
        // Two frames: one to paint the jump without animation, one to turn it back on.
        let handle = self.next_frame(|inner| {
            let handle = inner.next_frame(Self::resume);
            let previous = inner.frame.replace(Some(handle));
            drop(previous);
        });
        let previous = self.frame.replace(Some(handle));
        drop(previous);
        self.arm();
    }

    fn resume(self: &Rc<Self>) {
        self.state.borrow_mut().resume_transitions();
        self.notify();
    }

    fn resize(&self, width: f64) {
        let per_view = items_per_view(width);
        if self.state.borrow().items_per_view() == per_view {
            return;
        }
        self.state.borrow_mut().set_items_per_view(per_view);
        self.notify();
    }
}

/// Drives a `SliderState` on timers until dropped.
pub struct SliderDriver {
    inner: Rc<SliderInner>,
    _resize: Subscription,
}

impl SliderDriver {
    pub fn start(
        len: usize,
        scheduler: Rc<dyn Scheduler>,
        viewport: Rc<dyn ViewportObserver>,
        on_change: impl Fn(SliderState) + 'static,
    ) -> Self {
        let inner = Rc::new(SliderInner {
            state: RefCell::new(SliderState::new(len, items_per_view(viewport.width()))),
            scheduler,
            timer: RefCell::new(None),
            frame: RefCell::new(None),
            on_change: Box::new(on_change),
        });

        let weak = Rc::downgrade(&inner);
        let resize = viewport.on_resize(Rc::new(move |width| {
            if let Some(inner) = weak.upgrade() {
                inner.resize(width);
            }
        }));

        inner.notify();
        inner.arm();
        Self {
            inner,
            _resize: resize,
        }
    }

    pub fn state(&self) -> SliderState {
        *self.inner.state.borrow()
    }
}

impl Drop for SliderDriver {
    fn drop(&mut self) {
        let timer = self.inner.timer.take();
        let frame = self.inner.frame.take();
        drop(timer);
        drop(frame);
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct PainCardProps {
    pub point: PainPoint,
}

#[function_component(PainCard)]
pub fn pain_card(props: &PainCardProps) -> Html {
    let point = &props.point;
    html! {
        <div class="pain-card">
            <img src={point.image} alt="" loading={if point.priority { "eager" } else { "lazy" }} />
            <div class="pain-card-overlay">
                <p class="pain-card-thought">{format!("\u{201c}{}\u{201d}", point.thought)}</p>
                <div class="pain-card-stress">
                    { for (0..5).map(|i| html! {
                        <div class={classes!("stress-dot", (i < point.stress_level).then(|| "active"))}></div>
                    }) }
                    <span class="stress-label">{point.stress_label}</span>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct AutoSliderProps {
    pub items: Vec<PainPoint>,
}

#[function_component(AutoSlider)]
pub fn auto_slider(props: &AutoSliderProps) -> Html {
    let len = props.items.len();
    let state = use_state(|| SliderState::new(len, items_per_view(BrowserViewport.width())));

    {
        let state = state.clone();
        use_effect_with_deps(
            move |len| {
                let driver = SliderDriver::start(
                    *len,
                    Rc::new(BrowserScheduler),
                    Rc::new(BrowserViewport),
                    move |next| state.set(next),
                );
                move || drop(driver)
            },
            len,
        );
    }

    let slide_style = format!("width: {}%;", state.slide_width_percent());

    html! {
        <div class="auto-slider">
            <div class="auto-slider-track" style={state.track_style()}>
                { for props.items.iter().chain(props.items.iter()).map(|point| html! {
                    <div class="auto-slider-slide" style={slide_style.clone()}>
                        <PainCard point={point.clone()} />
                    </div>
                }) }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::scheduler::testing::ManualScheduler;
    use crate::runtime::scheduler::FRAME_MS;
    use crate::runtime::viewport::testing::FakeViewport;

    const N: usize = 6;

    fn start(width: f64) -> (ManualScheduler, FakeViewport, Rc<RefCell<Vec<SliderState>>>, SliderDriver) {
        let scheduler = ManualScheduler::new();
        let viewport = FakeViewport::new(width);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let driver = SliderDriver::start(
            N,
            Rc::new(scheduler.clone()),
            Rc::new(viewport.clone()),
            move |s| sink.borrow_mut().push(s),
        );
        (scheduler, viewport, seen, driver)
    }

    #[test]
    fn advances_once_per_pause() {
        let (scheduler, _viewport, _seen, driver) = start(1280.0);
        assert_eq!(driver.state().index(), 0);

        scheduler.advance(u64::from(PAUSE_DURATION_MS) - 1);
        assert_eq!(driver.state().index(), 0);
        scheduler.advance(1);
        assert_eq!(driver.state().index(), 1);
        scheduler.advance(u64::from(PAUSE_DURATION_MS));
        assert_eq!(driver.state().index(), 2);
    }

    #[test]
    fn snap_back_lands_on_an_identical_frame() {
        let (scheduler, _viewport, seen, driver) = start(1280.0);

        scheduler.advance(N as u64 * u64::from(PAUSE_DURATION_MS));
        let before = driver.state();
        assert_eq!(before.index(), N);
        assert_eq!(before.phase(), SliderPhase::SnappingBack);
        assert!(before.is_transitioning());

        scheduler.advance(u64::from(TRANSITION_DURATION_MS));
        let after = driver.state();
        assert_eq!(after.index(), 0);
        assert!(!after.is_transitioning());
        assert_eq!(after.leading_item(), before.leading_item());
        // One full list length is exactly half of the doubled track.
        assert_eq!(before.translate_percent() - 50.0, after.translate_percent());

        scheduler.advance(2 * u64::from(FRAME_MS));
        assert!(driver.state().is_transitioning());
        assert_eq!(driver.state().index(), 0);

        assert!(seen.borrow().iter().all(|s| s.index() < s.rendered_len()));
    }

    #[test]
    fn keeps_cycling_after_the_snap() {
        let (scheduler, _viewport, _seen, driver) = start(1280.0);
        scheduler.advance(N as u64 * u64::from(PAUSE_DURATION_MS) + u64::from(TRANSITION_DURATION_MS));
        assert_eq!(driver.state().index(), 0);

        scheduler.advance(u64::from(PAUSE_DURATION_MS));
        assert_eq!(driver.state().index(), 1);
        assert!(driver.state().is_transitioning());
    }

    #[test]
    fn resizing_changes_cards_per_view() {
        let (_scheduler, viewport, _seen, driver) = start(1280.0);
        assert_eq!(driver.state().items_per_view(), 3);
        assert_eq!(driver.state().track_width_percent(), 400.0);

        viewport.resize(800.0);
        assert_eq!(driver.state().items_per_view(), 2);
        assert_eq!(driver.state().track_width_percent(), 600.0);

        viewport.resize(375.0);
        assert_eq!(driver.state().items_per_view(), 1);
        assert_eq!(driver.state().track_width_percent(), 1200.0);
    }

    #[test]
    fn dropping_the_driver_clears_every_timer() {
        let (scheduler, viewport, seen, driver) = start(1280.0);
        scheduler.advance(N as u64 * u64::from(PAUSE_DURATION_MS) + u64::from(TRANSITION_DURATION_MS));
        let recorded = seen.borrow().len();

        drop(driver);
        assert_eq!(scheduler.pending(), 0);
        scheduler.advance(60_000);
        viewport.resize(500.0);
        assert_eq!(seen.borrow().len(), recorded);
    }

    #[test]
    fn empty_list_never_moves() {
        let scheduler = ManualScheduler::new();
        let driver = SliderDriver::start(
            0,
            Rc::new(scheduler.clone()),
            Rc::new(FakeViewport::new(1280.0)),
            |_| {},
        );
        scheduler.advance(60_000);
        assert_eq!(driver.state().index(), 0);
        assert_eq!(driver.state().translate_percent(), 0.0);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn track_style_disables_animation_during_the_jump() {
        let mut state = SliderState::new(N, 3);
        state.advance();
        assert!(state.track_style().contains("transform 700ms"));
        state.snap_back();
        assert!(state.track_style().contains("transition: none"));
        assert!(state.track_style().starts_with("transform: translateX(-0%)"));
    }
}
