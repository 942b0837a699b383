//! The boundary to the native shell: window queries, window mutation and the
//! shell notification queue. Everything the core knows about the OS goes
//! through this trait, which keeps the state machine testable.
#[cfg(test)]
pub mod mock_native_api;

use crate::models::{Monitor, WindowHandle};
use crate::shell_event::ShellEvent;

use bitflags::bitflags;
use futures::future::BoxFuture;
use std::time::Duration;

#[cfg(test)]
pub use self::mock_native_api::{MockNativeApi, MockWindow};

bitflags! {
    /// Window style bits as reported by the shell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowStyle: u32 {
        const BORDER       = 0x0080_0000;
        const CAPTION      = 0x00C0_0000;
        const SIZE_FRAME   = 0x0004_0000;
        const SYS_MENU     = 0x0008_0000;
        const MINIMIZE_BOX = 0x0002_0000;
        const MAXIMIZE_BOX = 0x0001_0000;
        const MAXIMIZED    = 0x0100_0000;
        const MINIMIZED    = 0x2000_0000;
        const VISIBLE      = 0x1000_0000;
        const CHILD        = 0x4000_0000;
        const POPUP        = 0x8000_0000;
    }
}

bitflags! {
    /// Extended window style bits as reported by the shell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WindowExStyle: u32 {
        const DLG_MODAL_FRAME = 0x0000_0001;
        const TOPMOST         = 0x0000_0008;
        const TOOL_WINDOW     = 0x0000_0080;
        const WINDOW_EDGE     = 0x0000_0100;
        const CLIENT_EDGE     = 0x0000_0200;
        const APP_WINDOW      = 0x0004_0000;
        const NO_ACTIVATE     = 0x0800_0000;
    }
}

bitflags! {
    /// Modifier keys for a hotkey registration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const ALT     = 0b0001;
        const CONTROL = 0b0010;
        const SHIFT   = 0b0100;
        const WIN     = 0b1000;
    }
}

/// A key combination registered system-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: u32,
}

/// A screen rectangle in virtual-desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A decoded window icon, already scaled to the small-icon size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconBitmap {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Everything the rule router needs to know about a freshly observed window.
#[derive(Debug, Clone)]
pub struct NativeWindowInfo {
    pub handle: WindowHandle,
    pub class_name: String,
    pub title: String,
    pub process_name: String,
    pub style: WindowStyle,
    pub ex_style: WindowExStyle,
}

/// A job that produces an icon off the dispatch thread. The adapter builds it
/// from data that is safe to read from a worker (typically the process image
/// path); the core runs it on the background worker and marshals the result
/// back before it touches any state.
pub type IconJob = Box<dyn FnOnce() -> Option<IconBitmap> + Send>;

/// The OS adapter consumed by the manager.
///
/// Query methods return `None` (or a benign default) for handles that no
/// longer exist; mutation methods are expected to be silent no-ops on stale
/// handles. Notifications race with window destruction, so the core treats
/// both cases as normal operation rather than faults.
pub trait NativeApi {
    // -- discovery ---------------------------------------------------------

    /// All top-level windows, ordered topmost first.
    fn enum_desktop_windows(&self) -> Vec<WindowHandle>;

    /// Visible windows owned (directly or transitively) by `owner`.
    fn owned_windows(&self, owner: WindowHandle) -> Vec<WindowHandle>;

    /// Whether the handle is something a window manager should consider.
    fn is_app_window(&self, handle: WindowHandle) -> bool;

    fn is_window(&self, handle: WindowHandle) -> bool;

    fn is_window_visible(&self, handle: WindowHandle) -> bool;

    fn is_minimized(&self, handle: WindowHandle) -> bool;

    /// Probes the window with a bounded timeout. Hung windows must not block
    /// the dispatch thread forever during bulk show/hide.
    fn is_responding(&self, handle: WindowHandle, timeout: Duration) -> bool;

    fn owner(&self, handle: WindowHandle) -> Option<WindowHandle>;

    fn last_active_popup(&self, handle: WindowHandle) -> WindowHandle;

    // -- queries -----------------------------------------------------------

    fn class_name(&self, handle: WindowHandle) -> Option<String>;

    fn title(&self, handle: WindowHandle) -> Option<String>;

    fn process_name(&self, handle: WindowHandle) -> Option<String>;

    fn style(&self, handle: WindowHandle) -> WindowStyle;

    fn ex_style(&self, handle: WindowHandle) -> WindowExStyle;

    fn frame(&self, handle: WindowHandle) -> Option<Rect>;

    // -- mutation ----------------------------------------------------------

    fn set_style(&mut self, handle: WindowHandle, style: WindowStyle);

    fn set_ex_style(&mut self, handle: WindowHandle, ex_style: WindowExStyle);

    fn set_frame(&mut self, handle: WindowHandle, frame: Rect);

    fn show(&mut self, handle: WindowHandle);

    fn hide(&mut self, handle: WindowHandle);

    fn show_owned_popups(&mut self, handle: WindowHandle, show: bool);

    fn minimize(&mut self, handle: WindowHandle);

    fn restore(&mut self, handle: WindowHandle);

    fn redraw(&mut self, handle: WindowHandle);

    fn redraw_desktop(&mut self);

    /// Nicely ask a window if it would please close at its convenience.
    fn close(&mut self, handle: WindowHandle);

    /// Plain foreground activation, without the input-injection trick.
    fn activate(&mut self, handle: WindowHandle);

    /// Forces the window to the foreground by replaying the registered
    /// hotkey, which grants the calling thread the foreground privilege.
    fn force_foreground(&mut self, handle: WindowHandle);

    // -- monitors and taskbar ----------------------------------------------

    fn monitors(&self) -> Vec<Monitor>;

    fn show_windows_taskbar(&mut self, monitor: usize, show: bool);

    /// Applies the global border widths. `None` leaves a metric untouched.
    fn set_border_widths(&mut self, border: Option<i32>, padded: Option<i32>);

    fn restore_border_widths(&mut self);

    // -- hotkeys and notifications -----------------------------------------

    /// Returns false if the combination is already taken by another program.
    fn register_hotkey(&mut self, hotkey: Hotkey) -> bool;

    /// The next pending shell notification, in arrival order.
    fn next_shell_event(&mut self) -> Option<ShellEvent>;

    /// Puts an event at the back of the notification queue. Used both for
    /// synthetic events and for re-posting when the dispatcher is busy.
    fn post_shell_event(&mut self, event: ShellEvent);

    fn wait_readable(&mut self) -> BoxFuture<'_, ()>;

    fn flush(&self);

    // -- background work ---------------------------------------------------

    /// A `Send` job that loads the window's icon off the dispatch thread.
    fn icon_loader(&self, handle: WindowHandle) -> Option<IconJob>;
}
