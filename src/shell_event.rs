use crate::models::WindowHandle;

/// A decoded shell notification as delivered by the OS adapter.
///
/// The adapter is expected to hand these out strictly in arrival order;
/// re-posting an event puts it at the back of that queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellEvent {
    /// A top-level window was created or came back from the tray.
    WindowCreated(WindowHandle),
    /// A top-level window was destroyed or minimized to the tray.
    WindowDestroyed(WindowHandle),
    /// The foreground window changed. `None` means the desktop itself
    /// took focus.
    WindowActivated(Option<WindowHandle>),
    /// The minimize/restore rectangle of a window changed. The actual
    /// minimized state has to be re-queried from the OS.
    MinimizeRectChanged(WindowHandle),
    /// A window is flashing its taskbar button.
    WindowFlashing(WindowHandle),
    /// The taskbar button of a window changed (title or icon).
    WindowTitleChanged(WindowHandle),
    /// A window is about to be replaced by another top-level window.
    WindowReplacing(WindowHandle),
    /// A window has been replaced by another top-level window.
    WindowReplaced(WindowHandle),
}
