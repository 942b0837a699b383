mod even_horizontal;
mod monocle;

pub use even_horizontal::EvenHorizontal;
pub use monocle::Monocle;

use crate::models::{Window, WorkspaceId};
use crate::native::{NativeApi, Rect};

pub const MONOCLE: &str = "Monocle";
pub const EVEN_HORIZONTAL: &str = "EvenHorizontal";

/// A pluggable layout strategy.
///
/// The workspace tells the layout which windows it controls; `reposition`
/// applies geometry through the OS adapter. Layouts never see floating or
/// minimized windows.
pub trait Layout {
    fn layout_name(&self) -> &'static str;

    fn initialize(&mut self, _workspace: WorkspaceId, _area: Rect) {}

    fn reposition(&mut self, windows: &[&Window], area: Rect, api: &mut dyn NativeApi);

    fn window_created(&mut self, _window: &Window) {}

    fn window_destroyed(&mut self, _window: &Window) {}

    fn window_minimized(&mut self, _window: &Window) {}

    fn window_restored(&mut self, _window: &Window) {}

    /// Whether shared windows keep their own geometry across workspace
    /// switches, or the layout re-derives it anyway.
    fn should_save_and_restore_shared_windows_position(&self) -> bool {
        true
    }
}

pub fn new_layout(name: &str) -> Option<Box<dyn Layout>> {
    match name {
        MONOCLE => Some(Box::new(Monocle)),
        EVEN_HORIZONTAL => Some(Box::new(EvenHorizontal)),
        _ => None,
    }
}
