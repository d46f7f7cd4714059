/// Inline style values the slide-out panel imposes on the surrounding chrome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelChrome {
    pub panel_active: bool,
    pub body_overflow: &'static str,
    pub menu_button_opacity: &'static str,
    pub menu_button_pointer_events: &'static str,
    pub scroll_button_pointer_events: &'static str,
}

impl PanelChrome {
    const OPEN: Self = Self {
        panel_active: true,
        body_overflow: "hidden",
        menu_button_opacity: "0",
        menu_button_pointer_events: "none",
        scroll_button_pointer_events: "none",
    };

    const CLOSED: Self = Self {
        panel_active: false,
        body_overflow: "auto",
        menu_button_opacity: "1",
        menu_button_pointer_events: "auto",
        scroll_button_pointer_events: "auto",
    };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelTrigger {
    MenuButton,
    CancelButton,
    NavLink,
}

#[derive(Debug, Default)]
pub struct NavPanel {
    open: bool,
}

impl NavPanel {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn handle(&mut self, trigger: PanelTrigger) -> PanelChrome {
        self.open = matches!(trigger, PanelTrigger::MenuButton);
        self.chrome()
    }

    pub fn chrome(&self) -> PanelChrome {
        if self.open {
            PanelChrome::OPEN
        } else {
            PanelChrome::CLOSED
        }
    }
}

/// Sticky header and scroll-to-top button state for a given scroll offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollChrome {
    pub sticky: bool,
}

impl ScrollChrome {
    pub fn at(scroll_y: f64, threshold_px: u32) -> Self {
        Self {
            sticky: scroll_y > f64::from(threshold_px),
        }
    }

    pub fn scroll_button_display(self) -> &'static str {
        if self.sticky {
            "flex"
        } else {
            "none"
        }
    }
}

/// Selector for the element an in-page anchor points at. A bare `#` or a
/// non-fragment href has no target.
pub fn anchor_target_selector(href: &str) -> Option<&str> {
    let fragment = href.strip_prefix('#')?;
    if fragment.is_empty() {
        return None;
    }
    Some(href)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_panel_locks_body_scroll() {
        let mut panel = NavPanel::new();

        let chrome = panel.handle(PanelTrigger::MenuButton);
        assert!(panel.is_open());
        assert!(chrome.panel_active);
        assert_eq!(chrome.body_overflow, "hidden");
        assert_eq!(chrome.menu_button_opacity, "0");
        assert_eq!(chrome.menu_button_pointer_events, "none");
        assert_eq!(chrome.scroll_button_pointer_events, "none");
    }

    #[test]
    fn cancel_and_nav_link_both_restore_chrome() {
        for trigger in [PanelTrigger::CancelButton, PanelTrigger::NavLink] {
            let mut panel = NavPanel::new();
            panel.handle(PanelTrigger::MenuButton);

            let chrome = panel.handle(trigger);
            assert!(!panel.is_open());
            assert_eq!(chrome.body_overflow, "auto");
            assert_eq!(chrome.menu_button_opacity, "1");
            assert_eq!(chrome.menu_button_pointer_events, "auto");
            assert_eq!(chrome.scroll_button_pointer_events, "auto");
        }
    }

    #[test]
    fn header_becomes_sticky_past_threshold() {
        assert!(!ScrollChrome::at(20.0, 20).sticky);
        assert!(ScrollChrome::at(20.5, 20).sticky);
        assert_eq!(ScrollChrome::at(300.0, 20).scroll_button_display(), "flex");
        assert_eq!(ScrollChrome::at(0.0, 20).scroll_button_display(), "none");
    }

    #[test]
    fn anchor_targets() {
        assert_eq!(anchor_target_selector("#about"), Some("#about"));
        assert_eq!(anchor_target_selector("#"), None);
        assert_eq!(anchor_target_selector("/resume.pdf"), None);
    }
}
