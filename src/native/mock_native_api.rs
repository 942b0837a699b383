use super::{Hotkey, IconBitmap, IconJob, NativeApi, Rect, WindowExStyle, WindowStyle};
use crate::models::{Monitor, WindowHandle};
use crate::shell_event::ShellEvent;

use futures::future::BoxFuture;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// The OS-side truth for one window, as the mock shell sees it.
#[derive(Debug, Clone)]
pub struct MockWindow {
    pub class_name: String,
    pub title: String,
    pub process_name: String,
    pub style: WindowStyle,
    pub ex_style: WindowExStyle,
    pub frame: Rect,
    pub visible: bool,
    pub minimized: bool,
    pub owner: Option<WindowHandle>,
    pub responding: bool,
    pub app_window: bool,
    pub icon: Option<IconBitmap>,
}

impl MockWindow {
    pub fn with_class(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_owned(),
            title: format!("{class_name} window"),
            process_name: class_name.to_lowercase(),
            style: WindowStyle::CAPTION | WindowStyle::VISIBLE,
            ex_style: WindowExStyle::APP_WINDOW,
            frame: Rect::new(0, 0, 800, 600),
            visible: true,
            minimized: false,
            owner: None,
            responding: true,
            app_window: true,
            icon: None,
        }
    }
}

/// In-memory shell used by the tests.
pub struct MockNativeApi {
    pub windows: HashMap<WindowHandle, MockWindow>,
    /// Enumeration order, topmost first.
    pub enum_order: Vec<WindowHandle>,
    pub events: VecDeque<ShellEvent>,
    pub monitors: Vec<Monitor>,
    pub hotkey_available: bool,
    pub registered_hotkey: Option<Hotkey>,
    pub foreground: Option<WindowHandle>,
    pub taskbar_changes: Vec<(usize, bool)>,
    pub border_widths: Option<(Option<i32>, Option<i32>)>,
}

impl MockNativeApi {
    pub fn new() -> Self {
        Self {
            windows: HashMap::new(),
            enum_order: Vec::new(),
            events: VecDeque::new(),
            monitors: vec![Monitor::new(0, Rect::new(0, 0, 1920, 1080))],
            hotkey_available: true,
            registered_hotkey: None,
            foreground: None,
            taskbar_changes: Vec::new(),
            border_widths: None,
        }
    }

    pub fn add_window(&mut self, handle: WindowHandle, window: MockWindow) {
        self.windows.insert(handle, window);
        self.enum_order.push(handle);
    }

    pub fn remove_window(&mut self, handle: WindowHandle) {
        self.windows.remove(&handle);
        self.enum_order.retain(|h| *h != handle);
    }

    pub fn set_minimized(&mut self, handle: WindowHandle, minimized: bool) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.minimized = minimized;
        }
    }

    pub fn push_event(&mut self, event: ShellEvent) {
        self.events.push_back(event);
    }
}

impl NativeApi for MockNativeApi {
    fn enum_desktop_windows(&self) -> Vec<WindowHandle> {
        self.enum_order.clone()
    }

    fn owned_windows(&self, owner: WindowHandle) -> Vec<WindowHandle> {
        self.enum_order
            .iter()
            .copied()
            .filter(|h| {
                if !self.windows.get(h).is_some_and(|w| w.visible) {
                    return false;
                }
                let mut current = self.windows.get(h).and_then(|w| w.owner);
                while let Some(o) = current {
                    if o == owner {
                        return true;
                    }
                    current = self.windows.get(&o).and_then(|w| w.owner);
                }
                false
            })
            .collect()
    }

    fn is_app_window(&self, handle: WindowHandle) -> bool {
        self.windows.get(&handle).is_some_and(|w| w.app_window)
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        self.windows.contains_key(&handle)
    }

    fn is_window_visible(&self, handle: WindowHandle) -> bool {
        self.windows.get(&handle).is_some_and(|w| w.visible)
    }

    fn is_minimized(&self, handle: WindowHandle) -> bool {
        self.windows.get(&handle).is_some_and(|w| w.minimized)
    }

    fn is_responding(&self, handle: WindowHandle, _timeout: Duration) -> bool {
        self.windows.get(&handle).is_some_and(|w| w.responding)
    }

    fn owner(&self, handle: WindowHandle) -> Option<WindowHandle> {
        self.windows.get(&handle).and_then(|w| w.owner)
    }

    fn last_active_popup(&self, handle: WindowHandle) -> WindowHandle {
        handle
    }

    fn class_name(&self, handle: WindowHandle) -> Option<String> {
        self.windows.get(&handle).map(|w| w.class_name.clone())
    }

    fn title(&self, handle: WindowHandle) -> Option<String> {
        self.windows.get(&handle).map(|w| w.title.clone())
    }

    fn process_name(&self, handle: WindowHandle) -> Option<String> {
        self.windows.get(&handle).map(|w| w.process_name.clone())
    }

    fn style(&self, handle: WindowHandle) -> WindowStyle {
        self.windows.get(&handle).map(|w| w.style).unwrap_or_default()
    }

    fn ex_style(&self, handle: WindowHandle) -> WindowExStyle {
        self.windows
            .get(&handle)
            .map(|w| w.ex_style)
            .unwrap_or_default()
    }

    fn frame(&self, handle: WindowHandle) -> Option<Rect> {
        self.windows.get(&handle).map(|w| w.frame)
    }

    fn set_style(&mut self, handle: WindowHandle, style: WindowStyle) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.style = style;
        }
    }

    fn set_ex_style(&mut self, handle: WindowHandle, ex_style: WindowExStyle) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.ex_style = ex_style;
        }
    }

    fn set_frame(&mut self, handle: WindowHandle, frame: Rect) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.frame = frame;
        }
    }

    fn show(&mut self, handle: WindowHandle) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.visible = true;
        }
    }

    fn hide(&mut self, handle: WindowHandle) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.visible = false;
        }
    }

    fn show_owned_popups(&mut self, owner: WindowHandle, show: bool) {
        for handle in self.owned_windows(owner) {
            if let Some(window) = self.windows.get_mut(&handle) {
                window.visible = show;
            }
        }
    }

    fn minimize(&mut self, handle: WindowHandle) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.minimized = true;
        }
    }

    fn restore(&mut self, handle: WindowHandle) {
        if let Some(window) = self.windows.get_mut(&handle) {
            window.minimized = false;
        }
    }

    fn redraw(&mut self, _handle: WindowHandle) {}

    fn redraw_desktop(&mut self) {}

    fn close(&mut self, handle: WindowHandle) {
        // the shell acknowledges a close with a destroy notification
        self.remove_window(handle);
        self.push_event(ShellEvent::WindowDestroyed(handle));
    }

    fn activate(&mut self, handle: WindowHandle) {
        self.foreground = Some(handle);
    }

    fn force_foreground(&mut self, handle: WindowHandle) {
        self.foreground = Some(handle);
    }

    fn monitors(&self) -> Vec<Monitor> {
        self.monitors.clone()
    }

    fn show_windows_taskbar(&mut self, monitor: usize, show: bool) {
        self.taskbar_changes.push((monitor, show));
    }

    fn set_border_widths(&mut self, border: Option<i32>, padded: Option<i32>) {
        self.border_widths = Some((border, padded));
    }

    fn restore_border_widths(&mut self) {
        self.border_widths = None;
    }

    fn register_hotkey(&mut self, hotkey: Hotkey) -> bool {
        if self.hotkey_available {
            self.registered_hotkey = Some(hotkey);
        }
        self.hotkey_available
    }

    fn next_shell_event(&mut self) -> Option<ShellEvent> {
        self.events.pop_front()
    }

    fn post_shell_event(&mut self, event: ShellEvent) {
        self.events.push_back(event);
    }

    fn wait_readable(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(futures::future::ready(()))
    }

    fn flush(&self) {}

    fn icon_loader(&self, handle: WindowHandle) -> Option<IconJob> {
        let icon = self.windows.get(&handle).and_then(|w| w.icon.clone())?;
        Some(Box::new(move || Some(icon)))
    }
}
