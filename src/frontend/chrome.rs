use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::AnimationFrame;
use web_sys::{
    window, Event, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
};

use super::dom::{
    add_class, body, document, query, query_all, remove_class, scroll_y, set_style,
    throttled_frame, viewport_width,
};
use crate::config::EffectsConfig;
use crate::motion::{parallax_transform, FrameThrottle};
use crate::navigation::{
    anchor_target_selector, NavPanel, PanelChrome, PanelTrigger, ScrollChrome,
};

/// Scroll-driven work coalesced to one run per animation frame.
struct FrameScheduled {
    throttle: Rc<FrameThrottle>,
    pending: Rc<RefCell<Option<AnimationFrame>>>,
}

impl FrameScheduled {
    fn new() -> Self {
        Self {
            throttle: Rc::new(FrameThrottle::new()),
            pending: Rc::new(RefCell::new(None)),
        }
    }

    fn run<F>(&self, work: F)
    where
        F: FnOnce() + 'static,
    {
        throttled_frame(&self.throttle, &self.pending, work);
    }
}

fn passive_scroll_listener<F>(on_scroll: F) -> Option<EventListener>
where
    F: FnMut(&Event) + 'static,
{
    Some(EventListener::new_with_options(
        &window()?,
        "scroll",
        EventListenerOptions::run_in_passive_mode(),
        on_scroll,
    ))
}

/// Sticky header and scroll-to-top button.
pub fn install_sticky_header(config: &EffectsConfig) -> Option<EventListener> {
    let nav = query("nav")?;
    let scroll_button = query(".scroll-button a");
    let threshold = config.sticky_threshold_px;
    let scheduled = FrameScheduled::new();

    let apply = Rc::new(move || {
        let chrome = ScrollChrome::at(scroll_y(), threshold);
        if chrome.sticky {
            add_class(&nav, "sticky");
        } else {
            remove_class(&nav, "sticky");
        }
        if let Some(button) = &scroll_button {
            if chrome.sticky {
                add_class(button, "show");
            } else {
                remove_class(button, "show");
            }
            set_style(button, "display", chrome.scroll_button_display());
        }
    });

    passive_scroll_listener(move |_| {
        let apply = Rc::clone(&apply);
        scheduled.run(move || apply());
    })
}

/// Desktop-only parallax on the decorative `.shape` elements.
pub fn install_parallax(config: &EffectsConfig) -> Option<EventListener> {
    if !config.is_desktop_width(viewport_width()) {
        return None;
    }
    let shapes = Rc::new(query_all(".shape"));
    if shapes.is_empty() {
        return None;
    }
    let scheduled = FrameScheduled::new();

    passive_scroll_listener(move |_| {
        let shapes = Rc::clone(&shapes);
        scheduled.run(move || {
            let offset = scroll_y();
            for (index, shape) in shapes.iter().enumerate() {
                set_style(shape, "transform", &parallax_transform(offset, index));
            }
        });
    })
}

struct PanelElements {
    navbar: Option<HtmlElement>,
    menu_button: Option<HtmlElement>,
    scroll_button: Option<HtmlElement>,
}

impl PanelElements {
    fn apply(&self, chrome: PanelChrome) {
        if let Some(navbar) = &self.navbar {
            if chrome.panel_active {
                add_class(navbar, "active");
            } else {
                remove_class(navbar, "active");
            }
        }
        if let Some(menu_button) = &self.menu_button {
            set_style(menu_button, "opacity", chrome.menu_button_opacity);
            set_style(menu_button, "pointer-events", chrome.menu_button_pointer_events);
        }
        if let Some(scroll_button) = &self.scroll_button {
            set_style(scroll_button, "pointer-events", chrome.scroll_button_pointer_events);
        }
        if let Some(body) = body() {
            set_style(&body, "overflow", chrome.body_overflow);
        }
    }
}

/// Slide-out navigation panel.
pub fn install_nav_panel() -> Vec<EventListener> {
    let elements = Rc::new(PanelElements {
        navbar: query(".navbar"),
        menu_button: query(".menu-btn"),
        scroll_button: query(".scroll-button a"),
    });
    let panel = Rc::new(RefCell::new(NavPanel::new()));

    let bind = |target: &HtmlElement, trigger: PanelTrigger| {
        let elements = Rc::clone(&elements);
        let panel = Rc::clone(&panel);
        EventListener::new(target, "click", move |_| {
            let chrome = panel.borrow_mut().handle(trigger);
            elements.apply(chrome);
        })
    };

    let mut listeners = Vec::new();
    if let Some(menu_button) = query(".menu-btn") {
        listeners.push(bind(&menu_button, PanelTrigger::MenuButton));
    }
    if let Some(cancel_button) = query(".cancel-btn") {
        listeners.push(bind(&cancel_button, PanelTrigger::CancelButton));
    }
    for link in query_all(".menu li a") {
        listeners.push(bind(&link, PanelTrigger::NavLink));
    }
    listeners
}

/// Smooth scrolling for in-page anchors.
pub fn install_smooth_scroll() -> Vec<EventListener> {
    query_all(r##"a[href^="#"]"##)
        .into_iter()
        .map(|anchor| {
            let href_source = anchor.clone();
            EventListener::new_with_options(
                &anchor,
                "click",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(href) = href_source.get_attribute("href") else {
                        return;
                    };
                    let Some(selector) = anchor_target_selector(&href) else {
                        return;
                    };
                    event.prevent_default();

                    let Some(target) =
                        document().and_then(|d| d.query_selector(selector).ok().flatten())
                    else {
                        return;
                    };
                    let options = ScrollIntoViewOptions::new();
                    options.set_behavior(ScrollBehavior::Smooth);
                    options.set_block(ScrollLogicalPosition::Start);
                    target.scroll_into_view_with_scroll_into_view_options(&options);
                },
            )
        })
        .collect()
}
