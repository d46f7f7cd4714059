use std::time::Duration;

use crate::logging::LogLevel;

const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const DEFAULT_DESKTOP_MIN_WIDTH_PX: u32 = 768;
const DEFAULT_STICKY_THRESHOLD_PX: u32 = 20;
const DEFAULT_TYPEWRITER_TEXT: &str = "Ankit Bajgain";
const DEFAULT_TYPEWRITER_SPEED_MS: u64 = 130;
const DEFAULT_TYPEWRITER_START_DELAY_MS: u64 = 1_800;
const DEFAULT_COUNTER_DURATION_MS: u64 = 1_500;
const DEFAULT_SKILL_BAR_STAGGER_MS: u64 = 150;
const DEFAULT_TAGLINE_INTERVAL_MS: u64 = 4_000;
const DEFAULT_LOW_CORE_THRESHOLD: u32 = 2;
const DEFAULT_EMAILJS_PUBLIC_KEY: &str = "EE339AKtUMm9zDXfV";
const DEFAULT_EMAILJS_SERVICE_ID: &str = "service_pb5qpuq";
const DEFAULT_EMAILJS_TEMPLATE_ID: &str = "template_dgbye78";
const DEFAULT_CONTACT_EMAIL: &str = "bajgainankit@gmail.com";
const DEFAULT_CONTACT_PHONE: &str = "+977 9862133032";

const DESKTOP_MIN_WIDTH_PX_BOUNDS: (u32, u32) = (320, 4_096);
const STICKY_THRESHOLD_PX_BOUNDS: (u32, u32) = (0, 1_000);
const TYPEWRITER_SPEED_MS_BOUNDS: (u64, u64) = (10, 2_000);
const TYPEWRITER_START_DELAY_MS_BOUNDS: (u64, u64) = (0, 10_000);
const COUNTER_DURATION_MS_BOUNDS: (u64, u64) = (100, 10_000);
const SKILL_BAR_STAGGER_MS_BOUNDS: (u64, u64) = (0, 2_000);
const TAGLINE_INTERVAL_MS_BOUNDS: (u64, u64) = (1_000, 60_000);
const LOW_CORE_THRESHOLD_BOUNDS: (u32, u32) = (0, 64);

/// Runtime knobs for the effects controller.
///
/// Every value has a compiled-in default; a lookup (the document root's
/// `data-*` attributes in the browser) may override it. Values that fail to
/// parse or fall outside their bounds are ignored.
#[derive(Clone, Debug)]
pub struct EffectsConfig {
    pub log_level: LogLevel,
    pub desktop_min_width_px: u32,
    pub sticky_threshold_px: u32,
    pub typewriter_text: String,
    pub typewriter_speed: Duration,
    pub typewriter_start_delay: Duration,
    pub counter_duration: Duration,
    pub skill_bar_stagger: Duration,
    pub tagline_interval: Duration,
    pub low_core_threshold: u32,
    pub emailjs_public_key: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub contact_email: String,
    pub contact_phone: String,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl EffectsConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let desktop_min_width_px = parse_u32_with_bounds(
            &lookup,
            "DESKTOP_MIN_WIDTH_PX",
            DEFAULT_DESKTOP_MIN_WIDTH_PX,
            DESKTOP_MIN_WIDTH_PX_BOUNDS,
        );
        let sticky_threshold_px = parse_u32_with_bounds(
            &lookup,
            "STICKY_THRESHOLD_PX",
            DEFAULT_STICKY_THRESHOLD_PX,
            STICKY_THRESHOLD_PX_BOUNDS,
        );
        let typewriter_speed_ms = parse_u64_with_bounds(
            &lookup,
            "TYPEWRITER_SPEED_MS",
            DEFAULT_TYPEWRITER_SPEED_MS,
            TYPEWRITER_SPEED_MS_BOUNDS,
        );
        let typewriter_start_delay_ms = parse_u64_with_bounds(
            &lookup,
            "TYPEWRITER_START_DELAY_MS",
            DEFAULT_TYPEWRITER_START_DELAY_MS,
            TYPEWRITER_START_DELAY_MS_BOUNDS,
        );
        let counter_duration_ms = parse_u64_with_bounds(
            &lookup,
            "COUNTER_DURATION_MS",
            DEFAULT_COUNTER_DURATION_MS,
            COUNTER_DURATION_MS_BOUNDS,
        );
        let skill_bar_stagger_ms = parse_u64_with_bounds(
            &lookup,
            "SKILL_BAR_STAGGER_MS",
            DEFAULT_SKILL_BAR_STAGGER_MS,
            SKILL_BAR_STAGGER_MS_BOUNDS,
        );
        let tagline_interval_ms = parse_u64_with_bounds(
            &lookup,
            "TAGLINE_INTERVAL_MS",
            DEFAULT_TAGLINE_INTERVAL_MS,
            TAGLINE_INTERVAL_MS_BOUNDS,
        );
        let low_core_threshold = parse_u32_with_bounds(
            &lookup,
            "LOW_CORE_THRESHOLD",
            DEFAULT_LOW_CORE_THRESHOLD,
            LOW_CORE_THRESHOLD_BOUNDS,
        );
        let string_or = |name: &str, default: &str| {
            parse_non_empty_string(&lookup, name).unwrap_or_else(|| default.to_string())
        };

        Self {
            log_level: parse_log_level(&lookup, "LOG_LEVEL", DEFAULT_LOG_LEVEL),
            desktop_min_width_px,
            sticky_threshold_px,
            typewriter_text: string_or("TYPEWRITER_TEXT", DEFAULT_TYPEWRITER_TEXT),
            typewriter_speed: Duration::from_millis(typewriter_speed_ms),
            typewriter_start_delay: Duration::from_millis(typewriter_start_delay_ms),
            counter_duration: Duration::from_millis(counter_duration_ms),
            skill_bar_stagger: Duration::from_millis(skill_bar_stagger_ms),
            tagline_interval: Duration::from_millis(tagline_interval_ms),
            low_core_threshold,
            emailjs_public_key: string_or("EMAILJS_PUBLIC_KEY", DEFAULT_EMAILJS_PUBLIC_KEY),
            emailjs_service_id: string_or("EMAILJS_SERVICE_ID", DEFAULT_EMAILJS_SERVICE_ID),
            emailjs_template_id: string_or("EMAILJS_TEMPLATE_ID", DEFAULT_EMAILJS_TEMPLATE_ID),
            contact_email: string_or("CONTACT_EMAIL", DEFAULT_CONTACT_EMAIL),
            contact_phone: string_or("CONTACT_PHONE", DEFAULT_CONTACT_PHONE),
        }
    }

    pub fn is_desktop_width(&self, viewport_width: f64) -> bool {
        viewport_width > f64::from(self.desktop_min_width_px)
    }

    pub fn is_low_core(&self, hardware_concurrency: f64) -> bool {
        hardware_concurrency > 0.0 && hardware_concurrency <= f64::from(self.low_core_threshold)
    }
}

/// Maps a config key such as `EMAILJS_PUBLIC_KEY` to the attribute that
/// carries it on the document root (`data-emailjs-public-key`).
pub fn data_attribute_name(key: &str) -> String {
    format!("data-{}", key.to_ascii_lowercase().replace('_', "-"))
}

fn parse_u64_with_bounds<F>(lookup: &F, name: &str, default: u64, bounds: (u64, u64)) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_u32_with_bounds<F>(lookup: &F, name: &str, default: u32, bounds: (u32, u32)) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_non_empty_string<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_log_level<F>(lookup: &F, name: &str, default: LogLevel) -> LogLevel
where
    F: Fn(&str) -> Option<String>,
{
    match parse_non_empty_string(lookup, name)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" => LogLevel::Warn,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_page_constants() {
        let config = EffectsConfig::default();

        assert_eq!(config.typewriter_text, "Ankit Bajgain");
        assert_eq!(config.typewriter_speed, Duration::from_millis(130));
        assert_eq!(config.counter_duration, Duration::from_millis(1_500));
        assert_eq!(config.tagline_interval, Duration::from_millis(4_000));
        assert_eq!(config.sticky_threshold_px, 20);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn overrides_within_bounds_are_applied() {
        let config = EffectsConfig::from_lookup(lookup_from(&[
            ("TYPEWRITER_SPEED_MS", " 90 "),
            ("LOG_LEVEL", "DEBUG"),
            ("CONTACT_EMAIL", "someone@example.com"),
        ]));

        assert_eq!(config.typewriter_speed, Duration::from_millis(90));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.contact_email, "someone@example.com");
    }

    #[test]
    fn out_of_range_or_garbage_values_fall_back_to_defaults() {
        let config = EffectsConfig::from_lookup(lookup_from(&[
            ("COUNTER_DURATION_MS", "5"),
            ("TAGLINE_INTERVAL_MS", "soon"),
            ("LOG_LEVEL", "verbose"),
            ("EMAILJS_SERVICE_ID", "   "),
        ]));

        assert_eq!(config.counter_duration, Duration::from_millis(1_500));
        assert_eq!(config.tagline_interval, Duration::from_millis(4_000));
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.emailjs_service_id, "service_pb5qpuq");
    }

    #[test]
    fn desktop_width_is_strictly_greater_than_breakpoint() {
        let config = EffectsConfig::default();

        assert!(!config.is_desktop_width(768.0));
        assert!(config.is_desktop_width(769.0));
    }

    #[test]
    fn low_core_check_ignores_unknown_concurrency() {
        let config = EffectsConfig::default();

        assert!(config.is_low_core(2.0));
        assert!(!config.is_low_core(4.0));
        assert!(!config.is_low_core(0.0));
    }

    #[test]
    fn data_attribute_name_is_kebab_case() {
        assert_eq!(
            data_attribute_name("EMAILJS_PUBLIC_KEY"),
            "data-emailjs-public-key"
        );
    }
}
