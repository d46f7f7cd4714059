use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, MouseEvent};

use super::dom::{document, query, query_all, set_style, FrameLoop};
use crate::motion::{CursorFollower, HoverScale};

const HOVER_TARGETS: &str = "a, button, .service-card, .skill-item";

/// Desktop-only custom cursor: a dot and an outline that trail the pointer.
pub struct CustomCursor {
    _frame_loop: Rc<FrameLoop>,
    _listeners: Vec<EventListener>,
}

impl CustomCursor {
    pub fn install() -> Option<Self> {
        let dot = query(".cursor-dot")?;
        let outline = query(".cursor-outline")?;
        let document = document()?;

        let follower = Rc::new(RefCell::new(CursorFollower::new()));
        let mut listeners = Vec::new();

        let pointer = Rc::clone(&follower);
        listeners.push(EventListener::new_with_options(
            &document,
            "mousemove",
            EventListenerOptions::run_in_passive_mode(),
            move |event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                pointer
                    .borrow_mut()
                    .point_at(f64::from(event.client_x()), f64::from(event.client_y()));
            },
        ));

        for target in query_all(HOVER_TARGETS) {
            for (event_type, scale) in [
                ("mouseenter", HoverScale::Raised),
                ("mouseleave", HoverScale::Rest),
            ] {
                listeners.push(hover_listener(&target, event_type, scale, &dot, &outline));
            }
        }

        let frame_loop = FrameLoop::start(move |_| {
            let mut follower = follower.borrow_mut();
            follower.step();
            place(&dot, follower.dot().x, follower.dot().y);
            place(&outline, follower.outline().x, follower.outline().y);
            true
        });

        Some(Self {
            _frame_loop: frame_loop,
            _listeners: listeners,
        })
    }
}

fn place(element: &HtmlElement, x: f64, y: f64) {
    set_style(element, "left", &format!("{x}px"));
    set_style(element, "top", &format!("{y}px"));
}

fn hover_listener(
    target: &HtmlElement,
    event_type: &'static str,
    scale: HoverScale,
    dot: &HtmlElement,
    outline: &HtmlElement,
) -> EventListener {
    let dot = dot.clone();
    let outline = outline.clone();
    EventListener::new(target, event_type, move |_| {
        set_style(&dot, "transform", scale.dot_transform());
        set_style(&outline, "transform", scale.outline_transform());
    })
}
