use std::any::Any;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub const TABLET_MIN_WIDTH: f64 = 768.0;
pub const DESKTOP_MIN_WIDTH: f64 = 1024.0;

/// How many slider cards fit side by side at a given viewport width.
pub fn items_per_view(width: f64) -> usize {
    if width >= DESKTOP_MIN_WIDTH {
        3
    } else if width >= TABLET_MIN_WIDTH {
        2
    } else {
        1
    }
}

/// Live for as long as the listener should keep firing.
pub struct Subscription {
    _guard: Box<dyn Any>,
}

impl Subscription {
    pub fn new<G: 'static>(guard: G) -> Self {
        Self { _guard: Box::new(guard) }
    }
}

pub trait ViewportObserver {
    fn width(&self) -> f64;
    fn on_resize(&self, listener: Rc<dyn Fn(f64)>) -> Subscription;
}

/// A `window` event listener removed again on drop.
pub struct WindowListener {
    window: Window,
    event: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl WindowListener {
    pub fn new(event: &'static str, handler: impl FnMut() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        window
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self {
            window,
            event,
            callback,
        })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserViewport;

impl ViewportObserver for BrowserViewport {
    fn width(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0)
    }

    fn on_resize(&self, listener: Rc<dyn Fn(f64)>) -> Subscription {
        let viewport = *self;
        match WindowListener::new("resize", move || listener(viewport.width())) {
            Some(guard) => Subscription::new(guard),
            None => {
                log::warn!("No window to observe, viewport width is fixed");
                Subscription::new(())
            }
        }
    }
}
