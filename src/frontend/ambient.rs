use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_events::EventListener;
use gloo_timers::callback::{Interval, Timeout};
use js_sys::{Function, Reflect, JSON};
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::window;

use super::dom::{add_class, after, millis, query, query_all, root_element, set_style};
use crate::config::EffectsConfig;
use crate::logging::{log_event, LogLevel};
use crate::motion::{skill_box_reveal_delay_ms, ScrollRevealOptions, TaglineRotor, TAGLINE_FADE};

const LOADING_FADE_DELAY: Duration = Duration::from_millis(1_200);
const LOADING_HIDE_DELAY: Duration = Duration::from_millis(400);
const LIFTED: &str = "translateY(-2px) scale(1.02)";
const RESTING: &str = "translateY(0) scale(1)";
const TRANSITION_VARIABLES: [&str; 3] =
    ["--transition-fast", "--transition-smooth", "--transition-slow"];

fn js_text(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn call_scroll_reveal(options: &ScrollRevealOptions) -> Result<(), String> {
    let window = window().ok_or_else(|| "no window".to_string())?;
    let library = Reflect::get(&window, &JsValue::from_str("AOS")).map_err(js_text)?;
    if library.is_undefined() || library.is_null() {
        return Err("AOS is not loaded".to_string());
    }

    let init = Reflect::get(&library, &JsValue::from_str("init"))
        .map_err(js_text)?
        .dyn_into::<Function>()
        .map_err(|_| "AOS.init is not a function".to_string())?;

    let options = serde_json::to_string(options).map_err(|error| error.to_string())?;
    let options = JSON::parse(&options).map_err(js_text)?;
    init.call1(&library, &options).map_err(js_text)?;
    Ok(())
}

/// Staggers the skill boxes, then hands the page to the scroll-reveal library.
pub fn init_scroll_reveal(config: &EffectsConfig) {
    for (index, skill_box) in query_all(".skills .box").iter().enumerate() {
        let delay = skill_box_reveal_delay_ms(index).to_string();
        let _ = skill_box.set_attribute("data-aos-delay", &delay);
    }

    if let Err(reason) = call_scroll_reveal(&ScrollRevealOptions::default()) {
        log_event(
            config.log_level,
            LogLevel::Warn,
            "scroll_reveal_unavailable",
            json!({ "reason": reason }),
        );
    }
}

pub struct LoadingScreen {
    _fade: Timeout,
    _hide: Rc<RefCell<Option<Timeout>>>,
}

impl LoadingScreen {
    pub fn dismiss_after_load() -> Option<Self> {
        let screen = query(".loading-screen")?;
        let hide = Rc::new(RefCell::new(None));

        let hide_slot = Rc::clone(&hide);
        let fade = after(LOADING_FADE_DELAY, move || {
            add_class(&screen, "fade-out");
            let screen = screen.clone();
            let timer = after(LOADING_HIDE_DELAY, move || {
                set_style(&screen, "display", "none");
                for element in query_all(".loader-text, .loader-circle") {
                    set_style(&element, "will-change", "auto");
                }
            });
            *hide_slot.borrow_mut() = Some(timer);
        });

        Some(Self {
            _fade: fade,
            _hide: hide,
        })
    }
}

pub fn install_button_lift() -> Vec<EventListener> {
    let mut listeners = Vec::new();
    for button in query_all("button, .btn-primary, .btn-secondary") {
        for (event_type, transform) in [("mouseenter", LIFTED), ("mouseleave", RESTING)] {
            let target = button.clone();
            listeners.push(EventListener::new(&button, event_type, move |_| {
                set_style(&target, "transform", transform);
            }));
        }
    }
    listeners
}

/// Cycles the tagline under the headline with a short fade between phrases.
pub struct TaglineCycle {
    _interval: Interval,
    _fade: Rc<RefCell<Option<Timeout>>>,
}

impl TaglineCycle {
    pub fn start(config: &EffectsConfig) -> Option<Self> {
        let element = query(".profession-text")?;
        let rotor = Rc::new(RefCell::new(TaglineRotor::new()));
        let fade = Rc::new(RefCell::new(None));

        let fade_slot = Rc::clone(&fade);
        let interval = Interval::new(millis(config.tagline_interval), move || {
            set_style(&element, "opacity", "0");
            let element = element.clone();
            let rotor = Rc::clone(&rotor);
            let timer = after(TAGLINE_FADE, move || {
                let text = rotor.borrow_mut().advance();
                element.set_text_content(Some(text));
                set_style(&element, "opacity", "1");
            });
            *fade_slot.borrow_mut() = Some(timer);
        });

        Some(Self {
            _interval: interval,
            _fade: fade,
        })
    }
}

pub fn install_unload_cleanup() -> Option<EventListener> {
    Some(EventListener::new(&window()?, "beforeunload", |_| {
        for element in query_all(".animating") {
            set_style(&element, "will-change", "auto");
        }
    }))
}

/// Turns transitions off on machines with few cores.
pub fn apply_low_core_mode(config: &EffectsConfig) -> bool {
    let Some(window) = window() else {
        return false;
    };
    if !config.is_low_core(window.navigator().hardware_concurrency()) {
        return false;
    }
    let Some(root) = root_element() else {
        return false;
    };
    for variable in TRANSITION_VARIABLES {
        set_style(&root, variable, "none");
    }
    true
}
