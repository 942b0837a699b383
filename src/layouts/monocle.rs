use super::Layout;
use crate::models::Window;
use crate::native::{NativeApi, Rect};

/// Layout which gives every managed window the whole working area.
#[derive(Debug, Default, Clone, Copy)]
pub struct Monocle;

impl Layout for Monocle {
    fn layout_name(&self) -> &'static str {
        super::MONOCLE
    }

    fn reposition(&mut self, windows: &[&Window], area: Rect, api: &mut dyn NativeApi) {
        for window in windows {
            api.set_frame(window.handle, area);
        }
    }

    // every window occupies the full working area, so per-window geometry
    // carries no information worth saving
    fn should_save_and_restore_shared_windows_position(&self) -> bool {
        false
    }
}
