use crate::layouts::Layout;
use crate::models::{Monitor, Window, WindowHandle};
use crate::native::NativeApi;
use crate::utils::helpers::settle_sleep;

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

pub type WorkspaceId = usize;

/// A virtual desktop.
///
/// Owns the full window list in Z-order (front is topmost) plus the managed
/// subset the layout controls. Floating and minimized windows stay in the
/// owner list for Z-order and activation purposes but are never handed to the
/// layout.
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub monitor: Monitor,
    pub show_windows_taskbar: bool,
    pub reposition_on_switched_to: bool,
    pub is_visible: bool,
    pub is_current: bool,
    has_changes: bool,
    layout: Box<dyn Layout>,
    floating_windows_count: usize,
    windows_shown_in_tabs_count: usize,
    /// All owner windows, topmost first.
    windows: VecDeque<Window>,
    /// Handles of windows under layout control: not floating, not minimized.
    /// Includes owned windows. Not Z-ordered.
    managed: Vec<WindowHandle>,
    /// Handles of windows with `workspaces_count > 1`.
    shared: Vec<WindowHandle>,
    /// Shared windows that must be re-initialized once more before they
    /// leave the shared subset.
    removed_shared: Vec<WindowHandle>,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Workspace {{ id: {}, name: {:?}, layout: {}, windows: {} }}",
            self.id,
            self.name,
            self.layout.layout_name(),
            self.windows.len()
        )
    }
}

impl PartialEq for Workspace {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Workspace {
    #[must_use]
    pub fn new(
        id: WorkspaceId,
        name: String,
        monitor: Monitor,
        mut layout: Box<dyn Layout>,
        show_windows_taskbar: bool,
        reposition_on_switched_to: bool,
    ) -> Self {
        layout.initialize(id, monitor.working_area);
        Self {
            id,
            name,
            monitor,
            show_windows_taskbar,
            reposition_on_switched_to,
            is_visible: false,
            is_current: false,
            has_changes: false,
            layout,
            floating_windows_count: 0,
            windows_shown_in_tabs_count: 0,
            windows: VecDeque::new(),
            managed: Vec::new(),
            shared: Vec::new(),
            removed_shared: Vec::new(),
        }
    }

    // -- lifecycle events --------------------------------------------------

    /// A window was routed onto this workspace. New windows are topmost.
    pub fn window_created(&mut self, mut window: Window, api: &mut dyn NativeApi) {
        if window.workspaces_count > 1 {
            let shared = &mut self.shared;
            window.for_self_or_owned(&mut |w| shared.insert(0, w.handle));
        }
        if window.show_in_tabs {
            self.windows_shown_in_tabs_count += 1;
        }
        if self.is_visible || window.workspaces_count == 1 {
            window.do_for_self_or_owned(&mut |w| w.initialize(api));
        }
        {
            let Workspace {
                managed,
                layout,
                floating_windows_count,
                has_changes,
                is_visible,
                ..
            } = self;
            let visible = *is_visible;
            window.do_for_self_or_owned(&mut |w| {
                if w.is_floating {
                    *floating_windows_count += 1;
                } else if !w.is_minimized {
                    managed.insert(0, w.handle);
                    layout.window_created(w);
                    // position is resolved lazily on the next switch-to
                    *has_changes |= !visible;
                }
            });
        }
        self.windows.push_front(window);
    }

    /// Removes the window from this workspace and returns its record so the
    /// orchestrator can re-home or drop it.
    pub fn window_destroyed(&mut self, handle: WindowHandle) -> Option<Window> {
        let index = self.windows.iter().position(|w| w.handle == handle)?;
        let mut window = self.windows.remove(index)?;
        if window.workspaces_count > 1 {
            let shared = &mut self.shared;
            window.for_self_or_owned(&mut |w| {
                if let Some(i) = shared.iter().position(|h| *h == w.handle) {
                    shared.remove(i);
                }
            });
        }
        if window.show_in_tabs {
            self.windows_shown_in_tabs_count -= 1;
        }
        {
            let Workspace {
                managed,
                layout,
                floating_windows_count,
                has_changes,
                is_visible,
                ..
            } = self;
            let visible = *is_visible;
            window.do_for_self_or_owned(&mut |w| {
                if w.is_floating {
                    *floating_windows_count -= 1;
                } else if !w.is_minimized {
                    if let Some(i) = managed.iter().position(|h| *h == w.handle) {
                        managed.remove(i);
                        layout.window_destroyed(w);
                        *has_changes |= !visible;
                    }
                }
            });
        }
        Some(window)
    }

    /// Moves the window to the top of the Z-order. Unknown handles leave the
    /// Z-order untouched.
    ///
    /// The shell occasionally omits a minimize-state notification when focus
    /// changes rapidly, so the formerly-topmost and second-topmost windows
    /// are re-checked against the OS after a short settle delay and the
    /// missing event is synthesized. The reconciliation is best-effort.
    pub fn window_activated(
        &mut self,
        handle: Option<WindowHandle>,
        api: &mut dyn NativeApi,
        settle: Duration,
    ) {
        let Some(handle) = handle else {
            // the desktop took focus; the topmost window may have been
            // minimized without a notification
            let Some(top) = self.windows.front() else {
                return;
            };
            if !top.is_minimized {
                let top = top.handle;
                settle_sleep(settle);
                if api.is_minimized(top) {
                    self.window_minimized(top);
                }
            }
            return;
        };
        if !self.move_to_top(handle) {
            return;
        }
        let top_is_minimized = self.windows.front().is_some_and(|w| w.is_minimized);
        if top_is_minimized {
            settle_sleep(settle);
            if !api.is_minimized(handle) {
                // the restore notification never arrived
                self.window_restored(handle);
            }
        } else if self.windows.len() > 1 {
            let second = &self.windows[1];
            if !second.is_minimized {
                let second = second.handle;
                settle_sleep(settle);
                if api.is_minimized(second) {
                    // the minimize notification never arrived
                    self.window_minimized(second);
                }
            }
        }
    }

    /// Minimized windows sink to the bottom of the Z-order and leave the
    /// managed subset. Duplicate notifications are absorbed by the state
    /// guard.
    pub fn window_minimized(&mut self, handle: WindowHandle) -> bool {
        if !self.move_to_bottom(handle) {
            return false;
        }
        let Workspace {
            windows,
            managed,
            layout,
            ..
        } = self;
        let Some(window) = windows.back_mut() else {
            return false;
        };
        window.do_for_self_or_owned(&mut |w| {
            if !w.is_minimized {
                w.is_minimized = true;
                if let Some(i) = managed.iter().position(|h| *h == w.handle) {
                    managed.remove(i);
                    layout.window_minimized(w);
                }
            }
        });
        true
    }

    /// Restored windows come back to the top of the Z-order and, unless
    /// floating, rejoin the managed subset.
    pub fn window_restored(&mut self, handle: WindowHandle) -> bool {
        if !self.move_to_top(handle) {
            return false;
        }
        let Workspace {
            windows,
            managed,
            layout,
            ..
        } = self;
        let Some(window) = windows.front_mut() else {
            return false;
        };
        window.do_for_self_or_owned(&mut |w| {
            if w.is_minimized {
                w.is_minimized = false;
                if !w.is_floating {
                    managed.insert(0, w.handle);
                    layout.window_restored(w);
                }
            }
        });
        true
    }

    /// Floating windows are Z-order members but never layout-controlled.
    pub fn toggle_window_floating(&mut self, handle: WindowHandle) -> bool {
        let Workspace {
            windows,
            managed,
            layout,
            floating_windows_count,
            ..
        } = self;
        let Some(window) = windows.iter_mut().find(|w| w.handle == handle) else {
            return false;
        };
        window.do_for_self_or_owned(&mut |w| {
            w.is_floating = !w.is_floating;
            if w.is_floating {
                *floating_windows_count += 1;
                if !w.is_minimized {
                    if let Some(i) = managed.iter().position(|h| *h == w.handle) {
                        managed.remove(i);
                    }
                    layout.window_destroyed(w);
                }
            } else {
                *floating_windows_count -= 1;
                if !w.is_minimized {
                    managed.insert(0, w.handle);
                    layout.window_created(w);
                }
            }
        });
        true
    }

    // -- switch protocol ---------------------------------------------------

    /// Applies the layout- and workspace-specific state to the windows and
    /// marks the workspace visible.
    pub fn switch_to(&mut self, api: &mut dyn NativeApi) {
        let needs_reposition = self.needs_reposition();
        let save_restore = self
            .layout
            .should_save_and_restore_shared_windows_position();
        for handle in self.shared.clone() {
            let Some(window) = self.find_window_mut(handle) else {
                continue;
            };
            window.initialize(api);
            if !needs_reposition || window.is_floating || save_restore {
                window.restore_position(api);
            }
        }
        if !self.removed_shared.is_empty() {
            let removed = std::mem::take(&mut self.removed_shared);
            self.shared.retain(|h| !removed.contains(h));
        }
        if needs_reposition {
            self.reposition(api);
        }
        self.is_visible = true;
    }

    /// Saves the geometry of shared windows that will need restoring later
    /// and marks the workspace hidden.
    pub fn unswitch(&mut self, api: &mut dyn NativeApi) {
        let save_restore = self
            .layout
            .should_save_and_restore_shared_windows_position();
        let reposition_on_switched_to = self.reposition_on_switched_to;
        for handle in self.shared.clone() {
            let Some(window) = self.find_window_mut(handle) else {
                continue;
            };
            if !reposition_on_switched_to || window.is_floating || save_restore {
                window.save_position(api);
            }
        }
        self.is_visible = false;
    }

    #[must_use]
    pub fn needs_reposition(&self) -> bool {
        self.has_changes || self.reposition_on_switched_to
    }

    pub fn reposition(&mut self, api: &mut dyn NativeApi) {
        let Workspace {
            windows,
            managed,
            layout,
            monitor,
            ..
        } = self;
        let mut all: Vec<&Window> = Vec::new();
        for window in windows.iter() {
            window.collect_self_or_owned(&mut all);
        }
        let managed_windows: Vec<&Window> = all
            .into_iter()
            .filter(|w| managed.contains(&w.handle))
            .collect();
        layout.reposition(&managed_windows, monitor.working_area, api);
        self.has_changes = false;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.has_changes = true;
    }

    pub fn change_layout(&mut self, mut layout: Box<dyn Layout>, api: &mut dyn NativeApi) -> bool {
        if layout.layout_name() == self.layout.layout_name() {
            return false;
        }
        layout.initialize(self.id, self.monitor.working_area);
        self.layout = layout;
        self.reposition(api);
        true
    }

    #[must_use]
    pub fn layout(&self) -> &dyn Layout {
        self.layout.as_ref()
    }

    pub fn toggle_windows_taskbar_visibility(&mut self, api: &mut dyn NativeApi) {
        self.show_windows_taskbar = !self.show_windows_taskbar;
        self.monitor.taskbar_visible = self.show_windows_taskbar;
        api.show_windows_taskbar(self.monitor.index, self.show_windows_taskbar);
        self.reposition(api);
    }

    /// Fixes up the Z-order after initial discovery. Discovery enumerates
    /// from the top of the Z-order down while `window_created` pushes to the
    /// front, so the list ends up reversed.
    pub(crate) fn initialize(&mut self) {
        let drained: Vec<Window> = self.windows.drain(..).collect();
        for window in drained {
            self.windows.push_front(window);
        }
    }

    // -- shared-window bookkeeping -----------------------------------------

    pub(crate) fn add_to_shared(&mut self, handle: WindowHandle) {
        let mut handles = Vec::new();
        if let Some(window) = self.ownermost_window(handle) {
            handles = window.self_or_owned_handles();
        }
        for h in handles {
            self.shared.insert(0, h);
        }
    }

    pub(crate) fn add_to_removed_shared(&mut self, handle: WindowHandle) {
        let mut handles = Vec::new();
        if let Some(window) = self.ownermost_window(handle) {
            handles = window.self_or_owned_handles();
        }
        for h in handles {
            self.removed_shared.insert(0, h);
        }
    }

    /// Bumps `workspaces_count` on every record of the window. A window
    /// crossing 1 -> 2 becomes shared on this workspace.
    pub(crate) fn increment_workspaces_count(&mut self, handle: WindowHandle) -> Option<usize> {
        let count = {
            let window = self.ownermost_window_mut(handle)?;
            window.do_for_self_or_owned(&mut |w| w.workspaces_count += 1);
            window.workspaces_count
        };
        if count == 2 {
            self.add_to_shared(handle);
        }
        Some(count)
    }

    /// Drops `workspaces_count` on every record of the window. A window
    /// crossing 2 -> 1 stops being shared, but only after it has been
    /// re-initialized once on the next switch-to.
    pub(crate) fn decrement_workspaces_count(&mut self, handle: WindowHandle) -> Option<usize> {
        let count = {
            let window = self.ownermost_window_mut(handle)?;
            window.do_for_self_or_owned(&mut |w| w.workspaces_count -= 1);
            window.workspaces_count
        };
        if count == 1 {
            self.add_to_removed_shared(handle);
        }
        Some(count)
    }

    // -- queries -----------------------------------------------------------

    #[must_use]
    pub fn contains_window(&self, handle: WindowHandle) -> bool {
        self.windows.iter().any(|w| w.handle == handle)
    }

    #[must_use]
    pub fn ownermost_window(&self, handle: WindowHandle) -> Option<&Window> {
        self.windows.iter().find(|w| w.handle == handle)
    }

    pub(crate) fn ownermost_window_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.handle == handle)
    }

    /// The window, if it is under layout control.
    #[must_use]
    pub fn managed_window(&self, handle: WindowHandle) -> Option<&Window> {
        if !self.managed.contains(&handle) {
            return None;
        }
        self.find_window(handle)
    }

    #[must_use]
    pub fn find_window(&self, handle: WindowHandle) -> Option<&Window> {
        let mut all = Vec::new();
        for window in &self.windows {
            window.collect_self_or_owned(&mut all);
        }
        all.into_iter().find(|w| w.handle == handle)
    }

    pub(crate) fn find_window_mut(&mut self, handle: WindowHandle) -> Option<&mut Window> {
        self.windows
            .iter_mut()
            .find_map(|w| w.find_self_or_owned_mut(handle))
    }

    /// The topmost non-minimized window, the one to foreground after a
    /// switch.
    #[must_use]
    pub fn topmost_window(&self) -> Option<&Window> {
        self.windows.front().filter(|w| !w.is_minimized)
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    pub(crate) fn windows_mut(&mut self) -> impl Iterator<Item = &mut Window> {
        self.windows.iter_mut()
    }

    #[must_use]
    pub fn windows_count(&self) -> usize {
        self.windows.len()
    }

    #[must_use]
    pub fn managed_handles(&self) -> &[WindowHandle] {
        &self.managed
    }

    #[must_use]
    pub fn shared_handles(&self) -> &[WindowHandle] {
        &self.shared
    }

    #[must_use]
    pub fn floating_windows_count(&self) -> usize {
        self.floating_windows_count
    }

    #[must_use]
    pub fn shown_in_tabs_count(&self) -> usize {
        self.windows_shown_in_tabs_count
    }

    // -- Z-order plumbing --------------------------------------------------

    fn move_to_top(&mut self, handle: WindowHandle) -> bool {
        let Some(index) = self.windows.iter().position(|w| w.handle == handle) else {
            return false;
        };
        if index != 0 {
            if let Some(window) = self.windows.remove(index) {
                self.windows.push_front(window);
            }
        }
        true
    }

    fn move_to_bottom(&mut self, handle: WindowHandle) -> bool {
        let Some(index) = self.windows.iter().position(|w| w.handle == handle) else {
            return false;
        };
        if index + 1 != self.windows.len() {
            if let Some(window) = self.windows.remove(index) {
                self.windows.push_back(window);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::program_rule::{ProgramRule, Rule};
    use crate::layouts::{EvenHorizontal, Monocle};
    use crate::native::{
        MockNativeApi, MockWindow, NativeWindowInfo, Rect, WindowExStyle, WindowStyle,
    };
    use std::collections::BTreeSet;

    fn test_workspace() -> Workspace {
        Workspace::new(
            1,
            "main".to_owned(),
            Monitor::new(0, Rect::new(0, 0, 1920, 1080)),
            Box::new(EvenHorizontal::default()),
            false,
            false,
        )
    }

    fn test_window(api: &mut MockNativeApi, handle: u64, rule: &Rule) -> Window {
        api.add_window(WindowHandle(handle), MockWindow::with_class("Notepad"));
        let info = NativeWindowInfo {
            handle: WindowHandle(handle),
            class_name: "Notepad".to_owned(),
            title: "Untitled - Notepad".to_owned(),
            process_name: "notepad".to_owned(),
            style: WindowStyle::CAPTION | WindowStyle::VISIBLE,
            ex_style: WindowExStyle::APP_WINDOW,
        };
        Window::new(info, 1, vec![], rule, &ProgramRule::default())
    }

    /// The managed subset must equal the owner-list entries that are neither
    /// floating nor minimized, at every point of any event sequence.
    fn assert_managed_invariant(ws: &Workspace) {
        let mut expected = BTreeSet::new();
        for window in ws.windows() {
            window.for_self_or_owned(&mut |w| {
                if !w.is_floating && !w.is_minimized {
                    expected.insert(w.handle);
                }
            });
        }
        let actual: BTreeSet<WindowHandle> = ws.managed_handles().iter().copied().collect();
        assert_eq!(actual, expected, "managed subset diverged from owner list");
    }

    #[test]
    fn managed_subset_tracks_creates_and_destroys() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        let rule = Rule::default();
        let floating_rule = Rule {
            is_floating: true,
            ..Rule::default()
        };

        for handle in 1..=3 {
            let window = test_window(&mut api, handle, &rule);
            ws.window_created(window, &mut api);
            assert_managed_invariant(&ws);
        }
        let floating = test_window(&mut api, 4, &floating_rule);
        ws.window_created(floating, &mut api);
        assert_managed_invariant(&ws);
        assert_eq!(ws.floating_windows_count(), 1);

        ws.window_minimized(WindowHandle(2));
        assert_managed_invariant(&ws);
        ws.window_destroyed(WindowHandle(2));
        assert_managed_invariant(&ws);
        ws.window_destroyed(WindowHandle(4));
        assert_managed_invariant(&ws);
        assert_eq!(ws.floating_windows_count(), 0);
        ws.window_restored(WindowHandle(1));
        assert_managed_invariant(&ws);
    }

    #[test]
    fn new_windows_are_topmost() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        let rule = Rule::default();
        ws.window_created(test_window(&mut api, 1, &rule), &mut api);
        ws.window_created(test_window(&mut api, 2, &rule), &mut api);
        assert_eq!(ws.windows().next().map(|w| w.handle), Some(WindowHandle(2)));
    }

    #[test]
    fn activating_a_known_handle_moves_it_to_the_front() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        let rule = Rule::default();
        for handle in 1..=3 {
            ws.window_created(test_window(&mut api, handle, &rule), &mut api);
        }
        ws.window_activated(Some(WindowHandle(1)), &mut api, Duration::ZERO);
        let order: Vec<WindowHandle> = ws.windows().map(|w| w.handle).collect();
        assert_eq!(
            order,
            vec![WindowHandle(1), WindowHandle(3), WindowHandle(2)]
        );
    }

    #[test]
    fn activating_an_absent_handle_does_not_alter_z_order() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        let rule = Rule::default();
        for handle in 1..=3 {
            ws.window_created(test_window(&mut api, handle, &rule), &mut api);
        }
        let before: Vec<WindowHandle> = ws.windows().map(|w| w.handle).collect();
        ws.window_activated(Some(WindowHandle(99)), &mut api, Duration::ZERO);
        let after: Vec<WindowHandle> = ws.windows().map(|w| w.handle).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn minimized_windows_sink_and_restored_windows_rise() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        let rule = Rule::default();
        for handle in 1..=3 {
            ws.window_created(test_window(&mut api, handle, &rule), &mut api);
        }
        ws.window_minimized(WindowHandle(3));
        let order: Vec<WindowHandle> = ws.windows().map(|w| w.handle).collect();
        assert_eq!(
            order,
            vec![WindowHandle(2), WindowHandle(1), WindowHandle(3)]
        );
        assert!(!ws.managed_handles().contains(&WindowHandle(3)));

        ws.window_restored(WindowHandle(3));
        let order: Vec<WindowHandle> = ws.windows().map(|w| w.handle).collect();
        assert_eq!(
            order,
            vec![WindowHandle(3), WindowHandle(2), WindowHandle(1)]
        );
        assert!(ws.managed_handles().contains(&WindowHandle(3)));
    }

    #[test]
    fn duplicate_minimize_notifications_are_absorbed() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        ws.window_created(test_window(&mut api, 1, &Rule::default()), &mut api);
        ws.window_minimized(WindowHandle(1));
        ws.window_minimized(WindowHandle(1));
        assert_managed_invariant(&ws);
        ws.window_restored(WindowHandle(1));
        assert_managed_invariant(&ws);
        assert!(ws.managed_handles().contains(&WindowHandle(1)));
    }

    #[test]
    fn toggle_floating_is_its_own_inverse() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        ws.window_created(test_window(&mut api, 1, &Rule::default()), &mut api);
        let managed_before = ws.managed_handles().to_vec();

        ws.toggle_window_floating(WindowHandle(1));
        assert_eq!(ws.floating_windows_count(), 1);
        assert!(!ws.managed_handles().contains(&WindowHandle(1)));
        assert_managed_invariant(&ws);

        ws.toggle_window_floating(WindowHandle(1));
        assert_eq!(ws.floating_windows_count(), 0);
        assert_eq!(ws.managed_handles(), managed_before.as_slice());
        assert_managed_invariant(&ws);
    }

    #[test]
    fn missed_minimize_is_synthesized_on_desktop_activation() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        ws.window_created(test_window(&mut api, 1, &Rule::default()), &mut api);
        // the OS minimized the window but the notification never arrived
        api.set_minimized(WindowHandle(1), true);

        ws.window_activated(None, &mut api, Duration::ZERO);

        let top = ws.windows().next().expect("window is still present");
        assert!(top.is_minimized);
        assert!(!ws.managed_handles().contains(&WindowHandle(1)));
    }

    #[test]
    fn missed_restore_is_synthesized_on_activation() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        ws.window_created(test_window(&mut api, 1, &Rule::default()), &mut api);
        ws.window_minimized(WindowHandle(1));
        // the OS restored the window but the notification never arrived
        api.set_minimized(WindowHandle(1), false);

        ws.window_activated(Some(WindowHandle(1)), &mut api, Duration::ZERO);

        let top = ws.windows().next().expect("window is still present");
        assert!(!top.is_minimized);
        assert!(ws.managed_handles().contains(&WindowHandle(1)));
    }

    #[test]
    fn switch_to_skips_restore_when_layout_positions_shared_windows() {
        let mut api = MockNativeApi::new();
        let area = Rect::new(0, 0, 1920, 1080);
        let mut ws = Workspace::new(
            2,
            "web".to_owned(),
            Monitor::new(0, area),
            Box::new(Monocle::default()),
            false,
            false,
        );
        let mut window = test_window(&mut api, 1, &Rule::default());
        window.workspaces_count = 2;
        api.set_frame(WindowHandle(1), Rect::new(5, 5, 100, 100));
        window.save_position(&api);
        ws.window_created(window, &mut api);
        // created while hidden, so the workspace is dirty and monocle does
        // not ask for shared-window restore
        assert!(ws.needs_reposition());

        ws.switch_to(&mut api);

        assert_eq!(api.frame(WindowHandle(1)), Some(area));
        let saved = ws
            .find_window(WindowHandle(1))
            .and_then(super::Window::saved_frame);
        assert_eq!(saved, Some(Rect::new(5, 5, 100, 100)));
    }

    #[test]
    fn switch_to_restores_shared_geometry_when_nothing_changed() {
        let mut api = MockNativeApi::new();
        let mut ws = Workspace::new(
            2,
            "web".to_owned(),
            Monitor::new(0, Rect::new(0, 0, 1920, 1080)),
            Box::new(EvenHorizontal::default()),
            false,
            false,
        );
        let mut window = test_window(&mut api, 1, &Rule::default());
        window.workspaces_count = 2;
        ws.window_created(window, &mut api);
        ws.switch_to(&mut api);
        ws.mark_dirty();
        ws.reposition(&mut api);

        api.set_frame(WindowHandle(1), Rect::new(7, 7, 640, 480));
        ws.unswitch(&mut api);
        api.set_frame(WindowHandle(1), Rect::new(0, 0, 10, 10));
        ws.switch_to(&mut api);

        assert_eq!(api.frame(WindowHandle(1)), Some(Rect::new(7, 7, 640, 480)));
    }

    #[test]
    fn pending_removals_leave_the_shared_subset_on_switch() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        let mut window = test_window(&mut api, 1, &Rule::default());
        window.workspaces_count = 2;
        ws.window_created(window, &mut api);
        assert_eq!(ws.shared_handles(), &[WindowHandle(1)]);

        ws.decrement_workspaces_count(WindowHandle(1));
        ws.switch_to(&mut api);

        assert!(ws.shared_handles().is_empty());
        assert_eq!(
            ws.ownermost_window(WindowHandle(1)).map(|w| w.workspaces_count),
            Some(1)
        );
    }

    #[test]
    fn initialize_reverses_the_discovery_order() {
        let mut api = MockNativeApi::new();
        let mut ws = test_workspace();
        let rule = Rule::default();
        // discovery walks the Z-order top to bottom
        for handle in 1..=3 {
            ws.window_created(test_window(&mut api, handle, &rule), &mut api);
        }
        ws.initialize();
        let order: Vec<WindowHandle> = ws.windows().map(|w| w.handle).collect();
        assert_eq!(
            order,
            vec![WindowHandle(1), WindowHandle(2), WindowHandle(3)]
        );
    }
}
