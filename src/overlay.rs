use std::time::Duration;

pub const TOAST_ENTER_DELAY: Duration = Duration::from_millis(100);
pub const TOAST_EXIT_DURATION: Duration = Duration::from_millis(300);
pub const MENU_OUTSIDE_CLICK_ARM_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "fas fa-check-circle",
            Self::Error => "fas fa-exclamation-circle",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            Self::Success => "linear-gradient(135deg, #161d23 0%, #0f444c 100%)",
            Self::Error => "linear-gradient(135deg, #dc3545 0%, #c82333 100%)",
        }
    }

    /// How long the toast stays on screen before sliding out.
    pub fn display_duration(self) -> Duration {
        match self {
            Self::Success => Duration::from_millis(3_000),
            Self::Error => Duration::from_millis(5_000),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuKind {
    Email,
    Phone,
}

impl MenuKind {
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Email => "email-options-menu",
            Self::Phone => "phone-options-menu",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayId(u64);

/// Holds at most one live overlay. Mounting drops whatever was there, and
/// timers or listeners that outlive their overlay can only remove the
/// instance they were created for.
#[derive(Debug)]
pub struct OverlaySlot<T> {
    current: Option<(OverlayId, T)>,
    next_id: u64,
}

impl<T> Default for OverlaySlot<T> {
    fn default() -> Self {
        Self {
            current: None,
            next_id: 1,
        }
    }
}

impl<T> OverlaySlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves the id the next mounted overlay will carry.
    pub fn next_id(&self) -> OverlayId {
        OverlayId(self.next_id)
    }

    /// Stores `overlay` and hands back the one it displaced.
    pub fn mount(&mut self, overlay: T) -> (OverlayId, Option<T>) {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        let displaced = self.current.replace((id, overlay)).map(|(_, old)| old);
        (id, displaced)
    }

    /// Takes whatever is mounted, regardless of id.
    pub fn clear(&mut self) -> Option<T> {
        self.current.take().map(|(_, old)| old)
    }

    pub fn unmount(&mut self, id: OverlayId) -> Option<T> {
        match &self.current {
            Some((current_id, _)) if *current_id == id => self.current.take().map(|(_, old)| old),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: OverlayId) -> Option<&mut T> {
        match &mut self.current {
            Some((current_id, overlay)) if *current_id == id => Some(overlay),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_mounted(&self, id: OverlayId) -> bool {
        matches!(&self.current, Some((current_id, _)) if *current_id == id)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
