use crate::native::Rect;

/// One physical display with its working area (the screen minus any docked
/// bars and the taskbar).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    pub index: usize,
    pub working_area: Rect,
    pub taskbar_visible: bool,
}

impl Monitor {
    #[must_use]
    pub const fn new(index: usize, working_area: Rect) -> Self {
        Self {
            index,
            working_area,
            taskbar_visible: true,
        }
    }
}
