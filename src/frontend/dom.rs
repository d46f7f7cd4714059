use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_render::{request_animation_frame, AnimationFrame};
use gloo_timers::callback::Timeout;
use js_sys::{Array, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::motion::FrameThrottle;

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

pub fn root_element() -> Option<HtmlElement> {
    document()?.document_element()?.dyn_into::<HtmlElement>().ok()
}

pub fn query(selector: &str) -> Option<HtmlElement> {
    document()?
        .query_selector(selector)
        .ok()
        .flatten()?
        .dyn_into::<HtmlElement>()
        .ok()
}

pub fn query_all(selector: &str) -> Vec<HtmlElement> {
    let Some(nodes) = document().and_then(|d| d.query_selector_all(selector).ok()) else {
        return Vec::new();
    };

    (0..nodes.length())
        .filter_map(|index| nodes.get(index))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

pub fn add_class(element: &Element, class: &str) {
    let _ = element.class_list().add_1(class);
}

pub fn remove_class(element: &Element, class: &str) {
    let _ = element.class_list().remove_1(class);
}

pub fn lock_body_scroll(locked: bool) {
    if let Some(body) = body() {
        set_style(&body, "overflow", if locked { "hidden" } else { "auto" });
    }
}

pub fn viewport_width() -> f64 {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0)
}

pub fn scroll_y() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

/// `document.readyState`, read reflectively so older engines that lack it
/// behave as if loading had finished.
pub fn ready_state() -> String {
    document()
        .and_then(|d| Reflect::get(&d, &JsValue::from_str("readyState")).ok())
        .and_then(|value| value.as_string())
        .unwrap_or_else(|| "complete".to_string())
}

pub fn millis(duration: Duration) -> u32 {
    duration.as_millis().min(u128::from(u32::MAX)) as u32
}

pub fn after<F>(delay: Duration, callback: F) -> Timeout
where
    F: FnOnce() + 'static,
{
    Timeout::new(millis(delay), callback)
}

/// Re-arms itself every animation frame until `step` returns `false`.
pub struct FrameLoop {
    handle: RefCell<Option<AnimationFrame>>,
    step: RefCell<Box<dyn FnMut(f64) -> bool>>,
}

impl FrameLoop {
    pub fn start<F>(step: F) -> Rc<Self>
    where
        F: FnMut(f64) -> bool + 'static,
    {
        let frame_loop = Rc::new(Self {
            handle: RefCell::new(None),
            step: RefCell::new(Box::new(step)),
        });
        Self::schedule(&frame_loop);
        frame_loop
    }

    fn schedule(frame_loop: &Rc<Self>) {
        let next = Rc::clone(frame_loop);
        let handle = request_animation_frame(move |timestamp| {
            let keep_going = (*next.step.borrow_mut())(timestamp);
            if keep_going {
                Self::schedule(&next);
            } else {
                next.handle.borrow_mut().take();
            }
        });
        *frame_loop.handle.borrow_mut() = Some(handle);
    }
}

/// Runs `work` on the next frame unless a run is already pending.
pub fn throttled_frame<F>(
    throttle: &Rc<FrameThrottle>,
    pending: &Rc<RefCell<Option<AnimationFrame>>>,
    work: F,
) where
    F: FnOnce() + 'static,
{
    if !throttle.request() {
        return;
    }
    let throttle_done = Rc::clone(throttle);
    let handle = request_animation_frame(move |_| {
        work();
        throttle_done.complete();
    });
    *pending.borrow_mut() = Some(handle);
}

type EntryCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// An intersection observer that fires `on_enter` for every entry that
/// becomes visible. Disconnects when dropped.
pub struct ViewportTrigger {
    observer: IntersectionObserver,
    _callback: EntryCallback,
}

impl ViewportTrigger {
    pub fn new<F>(threshold: f64, root_margin: &str, mut on_enter: F) -> Option<Self>
    where
        F: FnMut(&Element, &IntersectionObserver) + 'static,
    {
        let callback = EntryCallback::new(move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if entry.is_intersecting() {
                    on_enter(&entry.target(), &observer);
                }
            }
        });

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        options.set_root_margin(root_margin);

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .ok()?;

        Some(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }
}

impl Drop for ViewportTrigger {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
