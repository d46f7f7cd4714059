use std::cell::{Cell, RefCell};
use std::time::Duration;

use serde::Serialize;

pub const DOT_SMOOTHING: f64 = 0.9;
pub const OUTLINE_SMOOTHING: f64 = 0.15;
pub const PULSE_DURATION: Duration = Duration::from_millis(1_000);
pub const SKILL_BAR_SETTLE: Duration = Duration::from_millis(1_500);
pub const TAGLINE_FADE: Duration = Duration::from_millis(250);
pub const TAGLINES: [&str; 4] = [
    "Software Engineer",
    "Web Developer",
    "Problem Solver",
    "Creative Thinker",
];

/// Options handed to the page's scroll-reveal library at startup.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollRevealOptions {
    pub duration: u32,
    pub once: bool,
    pub offset: u32,
    pub easing: &'static str,
    pub disable: bool,
    pub mirror: bool,
    pub anchor_placement: &'static str,
}

impl Default for ScrollRevealOptions {
    fn default() -> Self {
        Self {
            duration: 1_000,
            once: true,
            offset: 120,
            easing: "ease-out-cubic",
            disable: false,
            mirror: false,
            anchor_placement: "top-bottom",
        }
    }
}

/// Quartic ease-out on `t` in `[0, 1]`.
pub fn ease_out_quart(t: f64) -> f64 {
    let shifted = t - 1.0;
    1.0 - shifted * shifted * shifted * shifted
}

/// A flag that can be raised once and never lowered.
#[derive(Debug, Default)]
pub struct OneShot {
    fired: Cell<bool>,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the first caller.
    pub fn claim(&self) -> bool {
        !self.fired.replace(true)
    }

    #[cfg(test)]
    pub fn is_fired(&self) -> bool {
        self.fired.get()
    }
}

/// Coalesces bursts of events into one pending frame callback.
#[derive(Debug, Default)]
pub struct FrameThrottle {
    in_flight: Cell<bool>,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the caller should schedule a frame.
    pub fn request(&self) -> bool {
        !self.in_flight.replace(true)
    }

    pub fn complete(&self) {
        self.in_flight.set(false);
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.in_flight.get()
    }
}

/// Holds the latest handle of a restartable effect. Replacing it drops the
/// previous handle, so a timer handle is cancelled on replacement.
#[derive(Debug)]
pub struct TimerSlot<T> {
    current: RefCell<Option<T>>,
}

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self {
            current: RefCell::new(None),
        }
    }
}

impl<T> TimerSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, handle: T) {
        let previous = self.current.borrow_mut().replace(handle);
        drop(previous);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CounterAnimation {
    target: u64,
    duration: Duration,
}

impl CounterAnimation {
    pub fn new(target: u64, duration: Duration) -> Self {
        Self { target, duration }
    }

    /// Reads a counter's target from its `data-target` attribute.
    pub fn from_attribute(raw: &str, duration: Duration) -> Option<Self> {
        raw.trim()
            .parse::<i64>()
            .ok()
            .map(|target| Self::new(target.max(0) as u64, duration))
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, elapsed: Duration) -> u64 {
        let eased = ease_out_quart(self.progress(elapsed));
        let value = (self.target as f64 * eased).floor();
        (value.max(0.0) as u64).min(self.target)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }
}

/// A counter that animates the first time it is triggered and ignores every
/// trigger after that.
#[derive(Debug)]
pub struct CounterTrigger {
    animation: CounterAnimation,
    played: OneShot,
}

impl CounterTrigger {
    pub fn new(animation: CounterAnimation) -> Self {
        Self {
            animation,
            played: OneShot::new(),
        }
    }

    /// Returns the animation to run, or `None` once it has already started.
    pub fn fire(&self) -> Option<CounterAnimation> {
        self.played.claim().then_some(self.animation)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillBarAnimation {
    width: String,
    index: u32,
}

impl SkillBarAnimation {
    /// Reads a bar's final width from its `data-width` attribute.
    pub fn from_attribute(raw: &str, index: u32) -> Option<Self> {
        let width = raw.trim();
        if width.is_empty() {
            return None;
        }
        Some(Self {
            width: width.to_string(),
            index,
        })
    }

    pub fn width(&self) -> &str {
        &self.width
    }

    pub fn start_delay(&self, stagger: Duration) -> Duration {
        stagger * self.index
    }
}

/// AOS delay for the skill box at `index`.
pub fn skill_box_reveal_delay_ms(index: usize) -> usize {
    (index + 1) * 100
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn approach(self, target: Point, factor: f64) -> Point {
        Point {
            x: self.x + (target.x - self.x) * factor,
            y: self.y + (target.y - self.y) * factor,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverScale {
    Rest,
    Raised,
}

impl HoverScale {
    pub fn dot_transform(self) -> &'static str {
        match self {
            Self::Rest => "translate(-50%, -50%)",
            Self::Raised => "translate(-50%, -50%) scale(1.3)",
        }
    }

    pub fn outline_transform(self) -> &'static str {
        match self {
            Self::Rest => "translate(-50%, -50%)",
            Self::Raised => "translate(-50%, -50%) scale(1.2)",
        }
    }
}

/// Pointer target plus the two lagging proxies drawn on screen.
#[derive(Clone, Copy, Debug, Default)]
pub struct CursorFollower {
    target: Point,
    dot: Point,
    outline: Point,
}

impl CursorFollower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn point_at(&mut self, x: f64, y: f64) {
        self.target = Point::new(x, y);
    }

    pub fn step(&mut self) {
        self.dot = self.dot.approach(self.target, DOT_SMOOTHING);
        self.outline = self.outline.approach(self.target, OUTLINE_SMOOTHING);
    }

    pub fn dot(&self) -> Point {
        self.dot
    }

    pub fn outline(&self) -> Point {
        self.outline
    }
}

pub fn parallax_speed(index: usize) -> f64 {
    0.2 + index as f64 * 0.05
}

pub fn parallax_transform(scroll_y: f64, index: usize) -> String {
    format!("translateY({}px)", scroll_y * parallax_speed(index))
}

/// Reveals `text` one character at a time.
#[derive(Clone, Debug)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub const DEFAULT_SPEED: Duration = Duration::from_millis(120);

    /// Per-character delay, falling back to [`Self::DEFAULT_SPEED`].
    pub fn tick_delay(speed: Option<Duration>) -> Duration {
        speed.unwrap_or(Self::DEFAULT_SPEED)
    }

    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    /// Advances one character and returns the visible prefix, or `None`
    /// once the whole text is out.
    pub fn advance(&mut self) -> Option<String> {
        if self.shown >= self.chars.len() {
            return None;
        }
        self.shown += 1;
        Some(self.chars[..self.shown].iter().collect())
    }

    #[cfg(test)]
    pub fn is_done(&self) -> bool {
        self.shown >= self.chars.len()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TaglineRotor {
    index: usize,
}

impl TaglineRotor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static str {
        TAGLINES[self.index]
    }

    pub fn advance(&mut self) -> &'static str {
        self.index = (self.index + 1) % TAGLINES.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn counter_value_halfway_follows_quartic_curve() {
        let counter = CounterAnimation::new(100, Duration::from_millis(1_500));

        let value = counter.value_at(Duration::from_millis(750));
        assert_eq!(value, 93, "floor(100 * (1 - 0.5^4)) = floor(93.75)");
        assert!((93..=95).contains(&value));
    }

    #[test]
    fn counter_value_is_clamped_to_range() {
        let counter = CounterAnimation::new(42, Duration::from_millis(1_500));

        assert_eq!(counter.value_at(Duration::ZERO), 0);
        assert_eq!(counter.value_at(Duration::from_millis(1_500)), 42);
        assert_eq!(counter.value_at(Duration::from_secs(60)), 42);
        assert!(counter.is_finished(Duration::from_millis(1_500)));
        assert!(!counter.is_finished(Duration::from_millis(1_499)));
    }

    #[test]
    fn counter_value_never_decreases() {
        let counter = CounterAnimation::new(250, Duration::from_millis(1_500));
        let mut previous = 0;

        for ms in (0..=1_600).step_by(16) {
            let value = counter.value_at(Duration::from_millis(ms));
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn counter_attribute_parsing() {
        let duration = Duration::from_millis(1_500);

        assert_eq!(
            CounterAnimation::from_attribute(" 120 ", duration).map(|c| c.target()),
            Some(120)
        );
        assert_eq!(
            CounterAnimation::from_attribute("-3", duration).map(|c| c.target()),
            Some(0)
        );
        assert!(CounterAnimation::from_attribute("lots", duration).is_none());
    }

    #[test]
    fn one_shot_fires_exactly_once() {
        let flag = OneShot::new();

        assert!(!flag.is_fired());
        assert!(flag.claim());
        assert!(!flag.claim());
        assert!(!flag.claim());
        assert!(flag.is_fired());
    }

    #[test]
    fn retriggered_counter_starts_only_once() {
        let counter = CounterTrigger::new(CounterAnimation::new(100, Duration::from_millis(1_500)));

        let first = counter.fire().expect("first trigger starts the animation");
        assert_eq!(first.target(), 100);
        assert!(counter.fire().is_none());
        assert!(counter.fire().is_none());
    }

    #[test]
    fn replacing_a_timer_drops_the_previous_one() {
        struct Handle(Rc<Cell<usize>>);

        impl Drop for Handle {
            fn drop(&mut self) {
                self.0.set(self.0.get() - 1);
            }
        }

        let live = Rc::new(Cell::new(0));
        let arm = |live: &Rc<Cell<usize>>| {
            live.set(live.get() + 1);
            Handle(Rc::clone(live))
        };
        let slot = TimerSlot::new();

        for _ in 0..5 {
            slot.replace(arm(&live));
        }
        assert_eq!(live.get(), 1, "only the latest timer stays armed");

        drop(slot);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn frame_throttle_coalesces_bursts() {
        let throttle = FrameThrottle::new();

        let scheduled = (0..10).filter(|_| throttle.request()).count();
        assert_eq!(scheduled, 1);
        assert!(throttle.is_pending());

        throttle.complete();
        assert!(throttle.request());
    }

    #[test]
    fn skill_bars_stagger_by_index() {
        let bar = SkillBarAnimation::from_attribute("85%", 3).expect("width present");

        assert_eq!(bar.width(), "85%");
        assert_eq!(
            bar.start_delay(Duration::from_millis(150)),
            Duration::from_millis(450)
        );
        assert!(SkillBarAnimation::from_attribute("  ", 0).is_none());
        assert_eq!(skill_box_reveal_delay_ms(0), 100);
        assert_eq!(skill_box_reveal_delay_ms(4), 500);
    }

    #[test]
    fn cursor_dot_leads_outline() {
        let mut cursor = CursorFollower::new();
        cursor.point_at(100.0, 200.0);
        cursor.step();

        assert!((cursor.dot().x - 90.0).abs() < 1e-9);
        assert!((cursor.dot().y - 180.0).abs() < 1e-9);
        assert!((cursor.outline().x - 15.0).abs() < 1e-9);

        for _ in 0..200 {
            cursor.step();
        }
        assert!((cursor.outline().x - 100.0).abs() < 1e-6);
        assert!((cursor.outline().y - 200.0).abs() < 1e-6);
    }

    #[test]
    fn hover_scale_transforms() {
        assert_eq!(
            HoverScale::Raised.dot_transform(),
            "translate(-50%, -50%) scale(1.3)"
        );
        assert_eq!(HoverScale::Rest.outline_transform(), "translate(-50%, -50%)");
    }

    #[test]
    fn parallax_speed_grows_with_index() {
        assert_eq!(parallax_transform(100.0, 0), "translateY(20px)");
        assert!(parallax_speed(3) > parallax_speed(2));
    }

    #[test]
    fn typewriter_speed_defaults_to_120ms() {
        assert_eq!(Typewriter::tick_delay(None), Duration::from_millis(120));
        assert_eq!(
            Typewriter::tick_delay(Some(Duration::from_millis(130))),
            Duration::from_millis(130)
        );
    }

    #[test]
    fn typewriter_reveals_characters_in_order() {
        let mut typewriter = Typewriter::new("Ankit");
        let frames: Vec<String> = std::iter::from_fn(|| typewriter.advance()).collect();

        assert_eq!(frames, vec!["A", "An", "Ank", "Anki", "Ankit"]);
        assert!(typewriter.is_done());
        assert!(typewriter.advance().is_none());
    }

    #[test]
    fn typewriter_handles_multibyte_text() {
        let mut typewriter = Typewriter::new("né");

        assert_eq!(typewriter.advance().as_deref(), Some("n"));
        assert_eq!(typewriter.advance().as_deref(), Some("né"));
    }

    #[test]
    fn scroll_reveal_options_serialize_in_camel_case() {
        let value = serde_json::to_value(ScrollRevealOptions::default()).expect("serializable");

        assert_eq!(value["anchorPlacement"], "top-bottom");
        assert_eq!(value["once"], true);
        assert_eq!(value["offset"], 120);
        assert_eq!(value["easing"], "ease-out-cubic");
    }

    #[test]
    fn tagline_cycles_through_four_entries() {
        let mut rotor = TaglineRotor::new();

        assert_eq!(rotor.current(), "Software Engineer");
        assert_eq!(rotor.advance(), "Web Developer");
        assert_eq!(rotor.advance(), "Problem Solver");
        assert_eq!(rotor.advance(), "Creative Thinker");
        assert_eq!(rotor.advance(), "Software Engineer");
    }
}
