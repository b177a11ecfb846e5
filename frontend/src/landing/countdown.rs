use std::cell::RefCell;
use std::rc::{Rc, Weak};

use chrono::NaiveDateTime;
use yew::prelude::*;

use crate::runtime::clock::{Clock, LocalClock};
use crate::runtime::scheduler::{BrowserScheduler, Scheduler, TaskHandle};

pub const TICK_MS: u32 = 1000;

const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountdownState {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl CountdownState {
    pub fn from_millis(diff: i64) -> Self {
        if diff <= 0 {
            return Self::default();
        }
        Self {
            hours: (diff / MS_PER_HOUR) as u32,
            minutes: ((diff % MS_PER_HOUR) / MS_PER_MINUTE) as u32,
            seconds: ((diff % MS_PER_MINUTE) / MS_PER_SECOND) as u32,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

/// Time left until 23:59:59.999 of the day `now` falls on.
///
/// The final millisecond of a day yields zeros; the next tick already lands on
/// the new day and counts down from its own end, so the display never sticks
/// at `00:00:00`.
pub fn time_until_end_of_day(now: NaiveDateTime) -> CountdownState {
    match now.date().and_hms_milli_opt(23, 59, 59, 999) {
        Some(target) => CountdownState::from_millis((target - now).num_milliseconds()),
        None => CountdownState::default(),
    }
}

struct CountdownInner {
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn Scheduler>,
    next_tick: RefCell<Option<TaskHandle>>,
    on_tick: Box<dyn Fn(CountdownState)>,
}

impl CountdownInner {
    fn tick(self: &Rc<Self>) {
        (self.on_tick)(time_until_end_of_day(self.clock.now()));

        let weak: Weak<Self> = Rc::downgrade(self);
        let handle = self.scheduler.schedule(
            TICK_MS,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.tick();
                }
            }),
        );
        let previous = self.next_tick.replace(Some(handle));
        drop(previous);
    }
}

/// Emits the time left every second until dropped.
pub struct Countdown {
    inner: Rc<CountdownInner>,
}

impl Countdown {
    pub fn start(
        clock: Rc<dyn Clock>,
        scheduler: Rc<dyn Scheduler>,
        on_tick: impl Fn(CountdownState) + 'static,
    ) -> Self {
        let inner = Rc::new(CountdownInner {
            clock,
            scheduler,
            next_tick: RefCell::new(None),
            on_tick: Box::new(on_tick),
        });
        inner.tick();
        Self { inner }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        let pending = self.inner.next_tick.take();
        drop(pending);
    }
}

#[derive(Properties, PartialEq)]
pub struct CountdownTimerProps {
    #[prop_or_default]
    pub compact: bool,
}

#[function_component(CountdownTimer)]
pub fn countdown_timer(props: &CountdownTimerProps) -> Html {
    let time_left = use_state(|| time_until_end_of_day(LocalClock.now()));

    {
        let time_left = time_left.clone();
        use_effect_with_deps(
            move |_| {
                let countdown = Countdown::start(
                    Rc::new(LocalClock),
                    Rc::new(BrowserScheduler),
                    move |state| time_left.set(state),
                );
                move || drop(countdown)
            },
            (),
        );
    }

    let time_box = |value: u32, label: &'static str| {
        html! {
            <div class="time-box">
                <div class="time-box-value">{format!("{:02}", value)}</div>
                <span class="time-box-label">{label}</span>
            </div>
        }
    };

    if props.compact {
        return html! {
            <span class="countdown-inline">
                {format!("{:02}:{:02}:{:02}", time_left.hours, time_left.minutes, time_left.seconds)}
            </span>
        };
    }

    html! {
        <div class="countdown">
            <p class="countdown-caption">
                <span class="countdown-alarm">{"⏰"}</span>{" Offer ends in:"}
            </p>
            <div class="countdown-boxes">
                { time_box(time_left.hours, "Hours") }
                <span class="countdown-separator">{":"}</span>
                { time_box(time_left.minutes, "Mins") }
                <span class="countdown-separator">{":"}</span>
                { time_box(time_left.seconds, "Secs") }
            </div>
        </div>
    }
}
