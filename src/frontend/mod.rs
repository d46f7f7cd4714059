mod ambient;
mod chrome;
mod contact_desk;
mod cursor;
mod dom;
mod emailjs;
mod overlay_view;
mod typewriter;
mod viewport;

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use js_sys::Reflect;
use serde_json::json;
use wasm_bindgen::{closure::Closure, JsValue};
use web_sys::window;

use crate::config::{data_attribute_name, EffectsConfig};
use crate::logging::{log_event, LogLevel};
use ambient::{LoadingScreen, TaglineCycle};
use contact_desk::ContactDesk;
use cursor::CustomCursor;
use dom::{document, ready_state, root_element, viewport_width, ViewportTrigger};
use overlay_view::Toaster;
use typewriter::TypewriterRun;
use viewport::ViewportEffects;

thread_local! {
    static CONTROLLER: RefCell<Option<Rc<Controller>>> = const { RefCell::new(None) };
}

/// Owns every listener, observer, timer and exported callback the page
/// effects need. Dropping it tears them all down.
struct Controller {
    config: Rc<EffectsConfig>,
    contact: Rc<ContactDesk>,
    listeners: RefCell<Vec<EventListener>>,
    triggers: RefCell<Vec<ViewportTrigger>>,
    cursor: RefCell<Option<CustomCursor>>,
    typewriter: RefCell<Option<(Rc<TypewriterRun>, Timeout)>>,
    loading_screen: RefCell<Option<LoadingScreen>>,
    tagline: RefCell<Option<TaglineCycle>>,
    exported: RefCell<Vec<Closure<dyn Fn()>>>,
}

impl Controller {
    fn new(config: EffectsConfig) -> Rc<Self> {
        let config = Rc::new(config);
        Rc::new(Self {
            contact: ContactDesk::new(Rc::clone(&config), Toaster::default()),
            config,
            listeners: RefCell::new(Vec::new()),
            triggers: RefCell::new(Vec::new()),
            cursor: RefCell::new(None),
            typewriter: RefCell::new(None),
            loading_screen: RefCell::new(None),
            tagline: RefCell::new(None),
            exported: RefCell::new(Vec::new()),
        })
    }

    fn keep(&self, listeners: impl IntoIterator<Item = EventListener>) {
        self.listeners.borrow_mut().extend(listeners);
    }

    /// Functions the markup calls from inline handlers.
    fn export_globals(&self) {
        let Some(window) = window() else {
            return;
        };

        let open_desk = Rc::clone(&self.contact);
        let close_desk = Rc::clone(&self.contact);
        let globals = [
            ("openContactModal", Closure::<dyn Fn()>::new(move || open_desk.open_modal())),
            ("closeContactModal", Closure::<dyn Fn()>::new(move || close_desk.close_modal())),
        ];

        let mut exported = self.exported.borrow_mut();
        for (name, callback) in globals {
            let _ = Reflect::set(&window, &JsValue::from_str(name), callback.as_ref());
            exported.push(callback);
        }
    }

    fn on_ready(&self) {
        let config = &self.config;

        ambient::init_scroll_reveal(config);
        let effects = ViewportEffects::collect(config);
        self.triggers.borrow_mut().extend(effects.install());

        self.keep(chrome::install_sticky_header(config));
        self.keep(chrome::install_nav_panel());
        self.keep(chrome::install_smooth_scroll());
        self.keep(chrome::install_parallax(config));
        self.keep(ambient::install_button_lift());
        self.keep(ambient::install_unload_cleanup());
        self.keep(self.contact.install());

        let desktop = config.is_desktop_width(viewport_width());
        if desktop {
            *self.cursor.borrow_mut() = CustomCursor::install();
        }
        *self.tagline.borrow_mut() = TaglineCycle::start(config);
        let low_core = ambient::apply_low_core_mode(config);

        log_event(
            config.log_level,
            LogLevel::Info,
            "controller_started",
            json!({
                "desktop": desktop,
                "low_core": low_core,
                "observers": self.triggers.borrow().len(),
            }),
        );
    }

    fn on_load(&self) {
        *self.loading_screen.borrow_mut() = LoadingScreen::dismiss_after_load();
        *self.typewriter.borrow_mut() = typewriter::install(&self.config);
    }
}

fn read_config() -> EffectsConfig {
    let root = root_element();
    EffectsConfig::from_lookup(|key| root.as_ref()?.get_attribute(&data_attribute_name(key)))
}

/// Runs `callback` once the DOM is parsed, immediately if it already is.
fn when_ready<F>(callback: F) -> Option<EventListener>
where
    F: FnOnce() + 'static,
{
    if ready_state() != "loading" {
        callback();
        return None;
    }
    Some(EventListener::once(&document()?, "DOMContentLoaded", move |_| {
        callback()
    }))
}

/// Runs `callback` once every subresource has loaded.
fn when_loaded<F>(callback: F) -> Option<EventListener>
where
    F: FnOnce() + 'static,
{
    if ready_state() == "complete" {
        callback();
        return None;
    }
    Some(EventListener::once(&window()?, "load", move |_| callback()))
}

pub fn run() {
    let controller = Controller::new(read_config());
    controller.export_globals();

    let ready = Rc::clone(&controller);
    let on_ready = when_ready(move || ready.on_ready());
    let loaded = Rc::clone(&controller);
    let on_load = when_loaded(move || loaded.on_load());
    controller.keep(on_ready.into_iter().chain(on_load));

    CONTROLLER.with(|slot| *slot.borrow_mut() = Some(controller));
}
