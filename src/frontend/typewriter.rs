use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use web_sys::HtmlElement;

use super::dom::{add_class, after, query, remove_class, set_style};
use crate::config::EffectsConfig;
use crate::motion::Typewriter;

/// Types text into one element. Starting a new run cancels the pending tick
/// of the previous one.
pub struct TypewriterRun {
    element: HtmlElement,
    pending: Rc<RefCell<Option<Timeout>>>,
    _caret: EventListener,
}

impl TypewriterRun {
    pub fn attach(element: HtmlElement) -> Self {
        let caret_target = element.clone();
        let caret = EventListener::new(&element, "animationend", move |_| {
            set_style(&caret_target, "border-right", "2px solid transparent");
        });

        Self {
            element,
            pending: Rc::new(RefCell::new(None)),
            _caret: caret,
        }
    }

    /// Types `text`, one character per `speed` (120 ms when unset).
    pub fn start(&self, text: &str, speed: Option<Duration>) {
        let speed = Typewriter::tick_delay(speed);
        self.pending.borrow_mut().take();
        self.element.set_text_content(Some(""));
        remove_class(&self.element, "animation-complete");
        add_class(&self.element, "animating");

        let writer = Rc::new(RefCell::new(Typewriter::new(text)));
        tick(self.element.clone(), writer, speed, Rc::clone(&self.pending));
    }
}

fn tick(
    element: HtmlElement,
    writer: Rc<RefCell<Typewriter>>,
    speed: Duration,
    pending: Rc<RefCell<Option<Timeout>>>,
) {
    let Some(shown) = writer.borrow_mut().advance() else {
        remove_class(&element, "animating");
        add_class(&element, "animation-complete");
        pending.borrow_mut().take();
        return;
    };
    element.set_text_content(Some(&shown));

    let next_pending = Rc::clone(&pending);
    let timer = after(speed, move || tick(element, writer, speed, next_pending));
    *pending.borrow_mut() = Some(timer);
}

/// Finds `.typewriter` and schedules the headline run after the start delay.
pub fn install(config: &EffectsConfig) -> Option<(Rc<TypewriterRun>, Timeout)> {
    let run = Rc::new(TypewriterRun::attach(query(".typewriter")?));
    let text = config.typewriter_text.clone();
    let speed = Some(config.typewriter_speed);

    let starter = Rc::clone(&run);
    let timer = after(config.typewriter_start_delay, move || starter.start(&text, speed));
    Some((run, timer))
}
