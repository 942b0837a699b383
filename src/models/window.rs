//! Window Information
#![allow(clippy::module_name_repetitions)]

use crate::config::program_rule::{DecorationPolicy, OnWindowShownAction, ProgramRule, Rule};
use crate::native::{NativeApi, NativeWindowInfo, Rect, WindowExStyle, WindowStyle};

/// A stable, opaque identifier the shell uses for a top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WindowHandle(pub u64);

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// One occurrence of a native window on one workspace.
///
/// A window that lives on several workspaces has one of these per workspace,
/// all referencing the same native handle. Every record sharing a handle
/// carries the same `workspaces_count` and must see the same
/// floating/minimized transitions; the orchestrator fans those out by handle.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone)]
pub struct Window {
    pub handle: WindowHandle,
    pub class_name: String,
    pub title: String,
    pub process_name: String,
    pub style: WindowStyle,
    pub ex_style: WindowExStyle,
    pub is_floating: bool,
    pub is_minimized: bool,
    pub show_in_tabs: bool,
    /// How many workspaces currently reference the same native handle.
    pub workspaces_count: usize,
    pub redraw_on_show: bool,
    pub activate_last_active_popup: bool,
    pub hide_owned_popups: bool,
    pub on_hidden_window_shown: OnWindowShownAction,
    titlebar: DecorationPolicy,
    in_taskbar: DecorationPolicy,
    window_borders: DecorationPolicy,
    /// Dialogs and tool windows owned by this window. They follow their
    /// owner through every workspace/floating/minimized transition.
    owned_windows: Vec<Window>,
    saved_frame: Option<Rect>,
    original_style: WindowStyle,
    original_ex_style: WindowExStyle,
}

impl Window {
    #[must_use]
    pub fn new(
        info: NativeWindowInfo,
        workspaces_count: usize,
        owned_windows: Vec<Window>,
        rule: &Rule,
        program_rule: &ProgramRule,
    ) -> Self {
        Self {
            handle: info.handle,
            class_name: info.class_name,
            title: info.title,
            process_name: info.process_name,
            style: info.style,
            ex_style: info.ex_style,
            is_floating: rule.is_floating,
            is_minimized: info.style.contains(WindowStyle::MINIMIZED),
            show_in_tabs: rule.show_in_tabs,
            workspaces_count,
            redraw_on_show: rule.redraw_on_show,
            activate_last_active_popup: rule.activate_last_active_popup,
            hide_owned_popups: program_rule.hide_owned_popups,
            on_hidden_window_shown: program_rule.on_hidden_window_shown,
            titlebar: rule.titlebar,
            in_taskbar: rule.in_taskbar,
            window_borders: rule.window_borders,
            owned_windows,
            saved_frame: None,
            original_style: info.style,
            original_ex_style: info.ex_style,
        }
    }

    /// Applies an action to this window and, recursively, to every window it
    /// owns. Owned dialogs must track their owner's workspace state, so all
    /// membership bookkeeping goes through this.
    pub fn do_for_self_or_owned(&mut self, action: &mut impl FnMut(&mut Window)) {
        action(self);
        for owned in &mut self.owned_windows {
            owned.do_for_self_or_owned(action);
        }
    }

    pub fn for_self_or_owned(&self, action: &mut impl FnMut(&Window)) {
        action(self);
        for owned in &self.owned_windows {
            owned.for_self_or_owned(action);
        }
    }

    #[must_use]
    pub fn self_or_owned_handles(&self) -> Vec<WindowHandle> {
        let mut handles = Vec::with_capacity(1 + self.owned_windows.len());
        self.for_self_or_owned(&mut |w| handles.push(w.handle));
        handles
    }

    pub(crate) fn collect_self_or_owned<'a>(&'a self, out: &mut Vec<&'a Window>) {
        out.push(self);
        for owned in &self.owned_windows {
            owned.collect_self_or_owned(out);
        }
    }

    pub(crate) fn find_self_or_owned_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        if self.handle == handle {
            return Some(self);
        }
        self.owned_windows
            .iter_mut()
            .find_map(|w| w.find_self_or_owned_mut(handle))
    }

    /// Applies the placement's presentation policies to the live window.
    ///
    /// Called the first time the window becomes relevant and again whenever a
    /// shared window is shown on this workspace, because another workspace's
    /// record may have left different styles behind. Applying the same
    /// policies twice leaves the window untouched.
    pub fn initialize(&mut self, api: &mut dyn NativeApi) {
        if !api.is_window(self.handle) {
            return;
        }
        let current_style = api.style(self.handle);
        let current_ex_style = api.ex_style(self.handle);
        let mut style = current_style;
        let mut ex_style = current_ex_style;

        match self.titlebar {
            DecorationPolicy::Shown => style.insert(WindowStyle::CAPTION),
            DecorationPolicy::Hidden => style.remove(WindowStyle::CAPTION),
            DecorationPolicy::AsIs => {}
        }
        match self.window_borders {
            DecorationPolicy::Shown => {
                style.insert(WindowStyle::BORDER | WindowStyle::SIZE_FRAME);
            }
            DecorationPolicy::Hidden => {
                style.remove(WindowStyle::BORDER | WindowStyle::SIZE_FRAME);
            }
            DecorationPolicy::AsIs => {}
        }
        match self.in_taskbar {
            DecorationPolicy::Shown => {
                ex_style.insert(WindowExStyle::APP_WINDOW);
                ex_style.remove(WindowExStyle::TOOL_WINDOW);
            }
            DecorationPolicy::Hidden => {
                ex_style.remove(WindowExStyle::APP_WINDOW);
                ex_style.insert(WindowExStyle::TOOL_WINDOW);
            }
            DecorationPolicy::AsIs => {}
        }

        if style != current_style {
            api.set_style(self.handle, style);
        }
        if ex_style != current_ex_style {
            api.set_ex_style(self.handle, ex_style);
        }
        self.style = style;
        self.ex_style = ex_style;
        if self.redraw_on_show {
            api.redraw(self.handle);
        }
    }

    /// Captures the current on-screen geometry for restore-on-switch.
    pub fn save_position(&mut self, api: &dyn NativeApi) {
        if let Some(frame) = api.frame(self.handle) {
            self.saved_frame = Some(frame);
        }
    }

    pub fn restore_position(&self, api: &mut dyn NativeApi) {
        if let Some(frame) = self.saved_frame {
            api.set_frame(self.handle, frame);
        }
    }

    #[must_use]
    pub const fn saved_frame(&self) -> Option<Rect> {
        self.saved_frame
    }

    pub fn toggle_titlebar(&mut self, api: &mut dyn NativeApi) {
        self.style.toggle(WindowStyle::CAPTION);
        self.titlebar = if self.style.contains(WindowStyle::CAPTION) {
            DecorationPolicy::Shown
        } else {
            DecorationPolicy::Hidden
        };
        api.set_style(self.handle, self.style);
        api.redraw(self.handle);
    }

    pub fn toggle_border(&mut self, api: &mut dyn NativeApi) {
        self.style.toggle(WindowStyle::BORDER | WindowStyle::SIZE_FRAME);
        self.window_borders = if self.style.contains(WindowStyle::BORDER) {
            DecorationPolicy::Shown
        } else {
            DecorationPolicy::Hidden
        };
        api.set_style(self.handle, self.style);
        api.redraw(self.handle);
    }

    pub fn toggle_taskbar_visibility(&mut self, api: &mut dyn NativeApi) {
        self.ex_style
            .toggle(WindowExStyle::APP_WINDOW | WindowExStyle::TOOL_WINDOW);
        self.in_taskbar = if self.ex_style.contains(WindowExStyle::APP_WINDOW) {
            DecorationPolicy::Shown
        } else {
            DecorationPolicy::Hidden
        };
        api.set_ex_style(self.handle, self.ex_style);
        api.redraw(self.handle);
    }

    pub fn hide(&mut self, api: &mut dyn NativeApi) {
        self.hide_popups(api);
        api.hide(self.handle);
    }

    pub fn show(&mut self, api: &mut dyn NativeApi) {
        api.show(self.handle);
        self.show_popups_and_redraw(api);
    }

    pub fn show_popups_and_redraw(&self, api: &mut dyn NativeApi) {
        if self.hide_owned_popups {
            api.show_owned_popups(self.handle, true);
        }
        if self.redraw_on_show {
            api.redraw(self.handle);
        }
    }

    pub fn hide_popups(&self, api: &mut dyn NativeApi) {
        if self.hide_owned_popups {
            api.show_owned_popups(self.handle, false);
        }
    }

    /// Undoes every change the manager applied to the live window. Used on
    /// shutdown, after which the window is shown wherever it happens to be.
    pub fn revert_to_initial_values(&mut self, api: &mut dyn NativeApi) {
        if !api.is_window(self.handle) {
            return;
        }
        api.set_style(self.handle, self.original_style);
        api.set_ex_style(self.handle, self.original_ex_style);
        self.style = self.original_style;
        self.ex_style = self.original_ex_style;
        api.redraw(self.handle);
    }
}
