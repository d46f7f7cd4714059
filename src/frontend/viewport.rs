use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use web_sys::{Element, HtmlElement, IntersectionObserver};

use super::dom::{
    add_class, after, query_all, remove_class, set_style, FrameLoop, ViewportTrigger,
};
use crate::config::EffectsConfig;
use crate::motion::{
    CounterAnimation, CounterTrigger, OneShot, SkillBarAnimation, TimerSlot, PULSE_DURATION,
    SKILL_BAR_SETTLE,
};

const ICON_THRESHOLD: f64 = 0.1;
const ICON_ROOT_MARGIN: &str = "0px 0px -100px 0px";
const COUNTER_THRESHOLD: f64 = 0.7;
const SECTION_THRESHOLD: f64 = 0.2;
const SECTION_ROOT_MARGIN: &str = "0px 0px -30px 0px";

struct CounterSlot {
    element: HtmlElement,
    trigger: CounterTrigger,
}

struct IconSlot {
    element: Element,
    unpulse: TimerSlot<Timeout>,
}

struct SkillBarSlot {
    element: HtmlElement,
    animation: SkillBarAnimation,
    played: OneShot,
    timers: RefCell<Vec<Timeout>>,
}

/// One-shot counter and skill-bar animations, plus the icon pulse.
pub struct ViewportEffects {
    icons: Vec<IconSlot>,
    counters: Vec<Rc<CounterSlot>>,
    skill_bars: Vec<Rc<SkillBarSlot>>,
    skill_bar_stagger: Duration,
}

impl ViewportEffects {
    pub fn collect(config: &EffectsConfig) -> Rc<Self> {
        let counters = query_all(".counter")
            .into_iter()
            .filter_map(|element| {
                let raw = element.get_attribute("data-target")?;
                let animation = CounterAnimation::from_attribute(&raw, config.counter_duration)?;
                Some(Rc::new(CounterSlot {
                    element,
                    trigger: CounterTrigger::new(animation),
                }))
            })
            .collect();

        let skill_bars = query_all(".skill-progress")
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| {
                let raw = element.get_attribute("data-width")?;
                let animation = SkillBarAnimation::from_attribute(&raw, index as u32)?;
                Some(Rc::new(SkillBarSlot {
                    element,
                    animation,
                    played: OneShot::new(),
                    timers: RefCell::new(Vec::new()),
                }))
            })
            .collect();

        let icons = query_all(".icon i")
            .into_iter()
            .map(|element| IconSlot {
                element: element.into(),
                unpulse: TimerSlot::new(),
            })
            .collect();

        Rc::new(Self {
            icons,
            counters,
            skill_bars,
            skill_bar_stagger: config.skill_bar_stagger,
        })
    }

    /// Wires the observers; the returned triggers must outlive the page.
    pub fn install(self: &Rc<Self>) -> Vec<ViewportTrigger> {
        let mut triggers = Vec::new();

        let effects = Rc::clone(self);
        let on_icon = move |target: &Element, _: &IntersectionObserver| {
            if let Some(icon) = effects.icons.iter().find(|icon| &icon.element == target) {
                pulse(icon);
            }
        };
        if let Some(trigger) = ViewportTrigger::new(ICON_THRESHOLD, ICON_ROOT_MARGIN, on_icon) {
            for icon in &self.icons {
                trigger.observe(&icon.element);
            }
            triggers.push(trigger);
        }

        let effects = Rc::clone(self);
        let on_counter = move |target: &Element, observer: &IntersectionObserver| {
            if let Some(slot) = effects.counter_for(target) {
                play_counter(slot);
            }
            observer.unobserve(target);
        };
        if let Some(trigger) = ViewportTrigger::new(COUNTER_THRESHOLD, "0px", on_counter) {
            for slot in &self.counters {
                trigger.observe(&slot.element);
            }
            triggers.push(trigger);
        }

        let effects = Rc::clone(self);
        if let Some(trigger) =
            ViewportTrigger::new(SECTION_THRESHOLD, SECTION_ROOT_MARGIN, move |target, _| {
                if target.class_list().contains("skills") {
                    effects.play_all();
                }
            })
        {
            for section in query_all("section") {
                trigger.observe(&section);
            }
            triggers.push(trigger);
        }

        triggers
    }

    fn counter_for(&self, target: &Element) -> Option<&Rc<CounterSlot>> {
        self.counters.iter().find(|slot| {
            let element: &Element = slot.element.as_ref();
            element == target
        })
    }

    fn play_all(&self) {
        for slot in &self.counters {
            play_counter(slot);
        }
        for slot in &self.skill_bars {
            play_skill_bar(slot, self.skill_bar_stagger);
        }
    }
}

/// Re-arming replaces the pending removal, so each icon holds one timer.
fn pulse(icon: &IconSlot) {
    add_class(&icon.element, "animate-pulse");
    let target = icon.element.clone();
    icon.unpulse.replace(after(PULSE_DURATION, move || {
        remove_class(&target, "animate-pulse");
    }));
}

fn play_counter(slot: &Rc<CounterSlot>) {
    let Some(animation) = slot.trigger.fire() else {
        return;
    };
    let _ = slot.element.set_attribute("data-animated", "true");
    add_class(&slot.element, "animating");

    let slot = Rc::clone(slot);
    let mut started_at: Option<f64> = None;
    FrameLoop::start(move |timestamp| {
        let start = *started_at.get_or_insert(timestamp);
        let elapsed = Duration::from_secs_f64((timestamp - start).max(0.0) / 1_000.0);
        let value = animation.value_at(elapsed);
        slot.element.set_text_content(Some(&value.to_string()));

        if animation.is_finished(elapsed) {
            remove_class(&slot.element, "animating");
            add_class(&slot.element, "animation-complete");
            return false;
        }
        true
    });
}

fn play_skill_bar(slot: &Rc<SkillBarSlot>, stagger: Duration) {
    if !slot.played.claim() {
        return;
    }
    let _ = slot.element.set_attribute("data-animated", "true");
    add_class(&slot.element, "animating");

    let filled = Rc::clone(slot);
    let timer = after(slot.animation.start_delay(stagger), move || {
        set_style(&filled.element, "width", filled.animation.width());
        let settled = Rc::clone(&filled);
        let settle = after(SKILL_BAR_SETTLE, move || {
            remove_class(&settled.element, "animating");
            add_class(&settled.element, "animation-complete");
        });
        filled.timers.borrow_mut().push(settle);
    });
    slot.timers.borrow_mut().push(timer);
}
