//! Workspace switching and foreground management.

use crate::config::Config;
use crate::layouts::Layout;
use crate::models::{Manager, WindowHandle, Workspace, WorkspaceId};
use crate::native::NativeApi;
use crate::plugins::Notification;
use crate::posted_action::{ActivationTarget, PostedAction};
use crate::state::State;
use crate::utils::helpers::settle_sleep;

use std::collections::HashSet;

impl<C: Config, API: NativeApi> Manager<C, API> {
    /// Makes another workspace current: bulk show/hide, foreground the new
    /// top window, dismiss temporarily shown windows. The save/restore half
    /// of the switch is deferred through the action queue so the foreground
    /// change wins the race against the heavy work.
    pub fn switch_to_workspace(&mut self, workspace: WorkspaceId) -> bool {
        self.switch_to_workspace_with(workspace, true)
    }

    pub(crate) fn switch_to_workspace_with(&mut self, to: WorkspaceId, set_foreground: bool) -> bool {
        let from = self.state.current_workspace;
        if to == from || self.state.workspace(to).is_none() {
            return false;
        }
        self.show_hide_windows(to, from);
        if set_foreground {
            self.set_top_window_as_foreground_of(to);
        }
        if !self.state.temporarily_shown.is_empty() {
            let shown: Vec<WindowHandle> = self.state.temporarily_shown.drain().collect();
            for handle in shown {
                self.hide_window(handle);
            }
        }
        let old_taskbar = self.state.workspace(from).map(|ws| ws.show_windows_taskbar);
        if let Some(ws) = self.state.workspace(to) {
            if old_taskbar != Some(ws.show_windows_taskbar) {
                let monitor = ws.monitor.index;
                let show = ws.show_windows_taskbar;
                self.native.show_windows_taskbar(monitor, show);
            }
        }

        self.state.previous_workspace = from;
        self.state.current_workspace = to;
        if let Some(ws) = self.state.workspace_mut(from) {
            ws.is_current = false;
        }
        self.notify(Notification::WorkspaceDeactivated(from));
        if let Some(ws) = self.state.workspace_mut(to) {
            ws.is_current = true;
        }
        self.notify(Notification::WorkspaceActivated(to));

        self.state
            .post_action(PostedAction::CompleteWorkspaceSwitch { from, to });
        true
    }

    pub(crate) fn complete_workspace_switch(&mut self, from: WorkspaceId, to: WorkspaceId) {
        {
            let Manager { state, native, .. } = self;
            if let Some(ws) = state.workspace_mut(from) {
                ws.unswitch(native);
            }
        }
        self.notify(Notification::WorkspaceHidden(from));
        {
            let Manager { state, native, .. } = self;
            if let Some(ws) = state.workspace_mut(to) {
                ws.switch_to(native);
            }
        }
        self.notify(Notification::WorkspaceShown(to));
    }

    /// Shows the windows of one workspace and hides the other's, skipping
    /// windows shared by both sides and windows that fail the liveness
    /// probe.
    fn show_hide_windows(&mut self, show: WorkspaceId, hide: WorkspaceId) {
        let timeout = self.config.unresponsive_timeout();
        let Manager { state, native, .. } = self;
        let State {
            workspaces,
            hidden_windows,
            ..
        } = state;

        if let Some(ws) = workspaces.get_mut(show - 1) {
            for window in ws.windows_mut() {
                if !native.is_responding(window.handle, timeout) {
                    tracing::warn!(window = %window.handle, "unresponsive window skipped during show");
                    continue;
                }
                window.show(native);
            }
        }
        let shown: HashSet<WindowHandle> = workspaces
            .get(show - 1)
            .map(|ws| ws.windows().map(|w| w.handle).collect())
            .unwrap_or_default();
        if let Some(ws) = workspaces.get_mut(hide - 1) {
            for window in ws.windows_mut() {
                if shown.contains(&window.handle) {
                    continue;
                }
                if !native.is_responding(window.handle, timeout) {
                    tracing::warn!(window = %window.handle, "unresponsive window skipped during hide");
                    continue;
                }
                hidden_windows.add(window.handle);
                window.hide(native);
            }
        }
    }

    /// Activates the window in the current workspace, or switches to its
    /// primary workspace first.
    pub fn switch_to_application(&mut self, handle: WindowHandle) -> bool {
        if self.switch_to_application_in_current_workspace(handle) {
            return true;
        }
        let Some(&primary) = self.state.route(handle).and_then(<[WorkspaceId]>::first) else {
            return false;
        };
        self.switch_to_workspace_with(primary, false);
        self.switch_to_application_in_current_workspace(handle)
    }

    fn switch_to_application_in_current_workspace(&mut self, handle: WindowHandle) -> bool {
        let current = self.state.current_workspace;
        let Some((owner, minimized, popup)) = self.find_ownermost(current, handle) else {
            return false;
        };
        self.activate_window(
            owner,
            ActivationTarget::Window {
                handle: owner,
                activate_last_active_popup: popup,
            },
            minimized,
        );
        true
    }

    /// Walks the owner chain until a window of the workspace is found.
    pub(crate) fn find_ownermost(
        &self,
        workspace: WorkspaceId,
        handle: WindowHandle,
    ) -> Option<(WindowHandle, bool, bool)> {
        let ws = self.state.workspace(workspace)?;
        let mut handle = handle;
        loop {
            if let Some(window) = ws.ownermost_window(handle) {
                return Some((
                    window.handle,
                    window.is_minimized,
                    window.activate_last_active_popup,
                ));
            }
            handle = self.native.owner(handle)?;
        }
    }

    /// A minimized target gets restored first; foregrounding is then
    /// deferred until the window has settled.
    pub(crate) fn activate_window(
        &mut self,
        handle: WindowHandle,
        target: ActivationTarget,
        is_minimized: bool,
    ) {
        if is_minimized {
            self.native.restore(handle);
            settle_sleep(self.config.minimize_restore_delay());
            self.state.post_action(PostedAction::ForceForeground(target));
        } else {
            self.force_foreground(target);
        }
    }

    pub(crate) fn force_foreground(&mut self, target: ActivationTarget) {
        let handle = match target {
            ActivationTarget::Handle(handle) => handle,
            ActivationTarget::Window {
                handle,
                activate_last_active_popup,
            } => {
                if activate_last_active_popup {
                    self.native.last_active_popup(handle)
                } else {
                    handle
                }
            }
        };
        if !self.native.is_window(handle) {
            return;
        }
        if self.hotkey_registered {
            self.native.force_foreground(handle);
        } else {
            // degraded mode: no foreground privilege, plain activation
            self.native.activate(handle);
        }
    }

    pub(crate) fn set_top_window_as_foreground(&mut self) {
        let current = self.state.current_workspace;
        self.set_top_window_as_foreground_of(current);
    }

    fn set_top_window_as_foreground_of(&mut self, workspace: WorkspaceId) {
        let Some(target) = self
            .state
            .workspace(workspace)
            .and_then(Workspace::topmost_window)
            .map(|w| ActivationTarget::Window {
                handle: w.handle,
                activate_last_active_popup: w.activate_last_active_popup,
            })
        else {
            return;
        };
        self.force_foreground(target);
    }

    pub(crate) fn follow_window(&mut self, to: WorkspaceId, follow: bool, target: ActivationTarget) {
        if follow {
            if !self.switch_to_workspace(to) {
                self.force_foreground(target);
            }
        } else {
            self.set_top_window_as_foreground();
        }
    }

    /// Hides a temporarily shown window again and returns focus to the
    /// workspace's top window.
    pub fn dismiss_temporarily_shown_window(&mut self, handle: WindowHandle) -> bool {
        if !self.state.temporarily_shown.contains(&handle) {
            return false;
        }
        self.hide_window(handle);
        self.set_top_window_as_foreground();
        self.state.temporarily_shown.remove(&handle);
        true
    }

    pub fn toggle_window_titlebar(&mut self, handle: WindowHandle) -> bool {
        if !self.state.current().managed_handles().contains(&handle) {
            return false;
        }
        let Manager { state, native, .. } = self;
        match state.current_mut().find_window_mut(handle) {
            Some(window) => {
                window.toggle_titlebar(native);
                true
            }
            None => false,
        }
    }

    pub fn toggle_window_border(&mut self, handle: WindowHandle) -> bool {
        if !self.state.current().managed_handles().contains(&handle) {
            return false;
        }
        let Manager { state, native, .. } = self;
        match state.current_mut().find_window_mut(handle) {
            Some(window) => {
                window.toggle_border(native);
                true
            }
            None => false,
        }
    }

    pub fn toggle_show_in_taskbar(&mut self, handle: WindowHandle) -> bool {
        let current = self.state.current_workspace;
        let Some((owner, ..)) = self.find_ownermost(current, handle) else {
            return false;
        };
        let Manager { state, native, .. } = self;
        match state.current_mut().ownermost_window_mut(owner) {
            Some(window) => {
                window.toggle_taskbar_visibility(native);
                true
            }
            None => false,
        }
    }

    pub fn toggle_taskbar_visibility(&mut self) {
        let Manager { state, native, .. } = self;
        state.current_mut().toggle_windows_taskbar_visibility(native);
    }

    pub fn change_workspace_layout(
        &mut self,
        workspace: WorkspaceId,
        layout: Box<dyn Layout>,
    ) -> bool {
        let changed = {
            let Manager { state, native, .. } = self;
            state
                .workspace_mut(workspace)
                .is_some_and(|ws| ws.change_layout(layout, native))
        };
        if changed {
            let layout = self
                .state
                .workspace(workspace)
                .map(|ws| ws.layout().layout_name().to_owned())
                .unwrap_or_default();
            self.notify(Notification::WorkspaceLayoutChanged { workspace, layout });
        }
        changed
    }

    pub fn move_workspace_to_monitor(&mut self, workspace: WorkspaceId, monitor: usize) -> bool {
        let Some(new_monitor) = self.native.monitors().get(monitor).copied() else {
            return false;
        };
        let old_monitor;
        {
            let Manager { state, native, .. } = self;
            let Some(ws) = state.workspace_mut(workspace) else {
                return false;
            };
            if ws.monitor.index == monitor {
                return false;
            }
            old_monitor = ws.monitor.index;
            ws.monitor = new_monitor;
            ws.mark_dirty();
            if ws.is_visible {
                ws.reposition(native);
            }
        }
        self.notify(Notification::WorkspaceMonitorChanged {
            workspace,
            old_monitor,
            new_monitor: monitor,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProgramRule, Rule, TestConfig};
    use crate::native::{MockNativeApi, MockWindow};
    use crate::posted_action::PostedAction;

    fn manager_with_split_windows(
    ) -> Manager<crate::config::TestConfig, crate::native::MockNativeApi> {
        // one window per workspace
        let mut config = TestConfig::with_workspaces(2);
        config.rules = vec![
            ProgramRule::new("^One$", ".*", ".*")
                .expect("valid pattern")
                .with_rules(vec![Rule::on_workspace(1)]),
            ProgramRule::new("^Two$", ".*", ".*")
                .expect("valid pattern")
                .with_rules(vec![Rule::on_workspace(2)]),
        ];
        let mut api = MockNativeApi::new();
        api.add_window(WindowHandle(1), MockWindow::with_class("One"));
        api.add_window(WindowHandle(2), MockWindow::with_class("Two"));
        let mut manager = Manager::new_test_with(config, api);
        manager.startup();
        manager
    }

    #[test]
    fn startup_hides_windows_of_hidden_workspaces() {
        let manager = manager_with_split_windows();
        assert!(manager.native.is_window_visible(WindowHandle(1)));
        assert!(!manager.native.is_window_visible(WindowHandle(2)));
        assert!(manager.state.is_hidden(WindowHandle(2)));
        assert_eq!(manager.native.foreground, Some(WindowHandle(1)));
    }

    #[test]
    fn switching_shows_the_new_workspace_and_hides_the_old() {
        let mut manager = manager_with_split_windows();
        assert!(manager.switch_to_workspace(2));
        assert_eq!(manager.state.current_workspace, 2);
        assert_eq!(manager.state.previous_workspace, 1);
        assert!(!manager.native.is_window_visible(WindowHandle(1)));
        assert!(manager.native.is_window_visible(WindowHandle(2)));
        assert_eq!(manager.native.foreground, Some(WindowHandle(2)));
        // the save/restore half runs from the action queue
        assert_eq!(
            manager.state.posted_actions.front(),
            Some(&PostedAction::CompleteWorkspaceSwitch { from: 1, to: 2 })
        );
        assert!(manager.dispatch_cycle());
        assert!(manager.state.current().is_visible);
        assert!(!manager
            .state
            .workspace(1)
            .expect("workspace exists")
            .is_visible);
    }

    #[test]
    fn switching_to_the_current_workspace_is_a_noop() {
        let mut manager = manager_with_split_windows();
        assert!(!manager.switch_to_workspace(1));
        assert!(manager.state.posted_actions.is_empty());
    }

    #[test]
    fn unresponsive_windows_are_skipped_during_bulk_hide() {
        let mut manager = manager_with_split_windows();
        if let Some(window) = manager.native.windows.get_mut(&WindowHandle(1)) {
            window.responding = false;
        }
        manager.switch_to_workspace(2);
        // the hung window neither blocked the switch nor got hidden
        assert!(manager.native.is_window_visible(WindowHandle(1)));
        assert!(!manager.state.is_hidden(WindowHandle(1)));
        assert_eq!(manager.state.current_workspace, 2);
    }

    #[test]
    fn switch_to_application_changes_workspace_when_needed() {
        let mut manager = manager_with_split_windows();
        assert!(manager.switch_to_application(WindowHandle(2)));
        assert_eq!(manager.state.current_workspace, 2);
        assert_eq!(manager.native.foreground, Some(WindowHandle(2)));
    }

    #[test]
    fn temporarily_shown_windows_are_dismissed_on_switch() {
        let mut manager = manager_with_split_windows();
        manager.state.temporarily_shown.insert(WindowHandle(2));
        manager.native.show(WindowHandle(2));

        manager.switch_to_workspace(2);

        assert!(manager.state.temporarily_shown.is_empty());
        // dismissal hid it again on top of the startup hide
        assert!(manager.state.is_hidden(WindowHandle(2)));
    }

    #[test]
    fn deferred_actions_drain_one_per_cycle_in_order() {
        let mut manager = manager_with_split_windows();
        manager
            .state
            .post_action(PostedAction::SwitchToWorkspace(2));
        manager
            .state
            .post_action(PostedAction::SwitchToWorkspace(1));

        assert!(manager.dispatch_cycle());
        assert_eq!(manager.state.current_workspace, 2);
        // the second switch is still queued behind the completion of the
        // first; queue order is honored, not last-queued-wins
        assert!(manager.dispatch_cycle());
        assert!(manager.dispatch_cycle());
        assert_eq!(manager.state.current_workspace, 1);
    }

    #[test]
    fn a_failed_hotkey_registration_degrades_activation() {
        let mut config = TestConfig::with_workspaces(1);
        config.rules = vec![ProgramRule::default()];
        let mut api = MockNativeApi::new();
        api.hotkey_available = false;
        api.add_window(WindowHandle(1), MockWindow::with_class("Notepad"));
        let mut manager = Manager::new_test_with(config, api);
        manager.startup();

        assert!(!manager.hotkey_registered);
        // activation still works through the plain path
        assert_eq!(manager.native.foreground, Some(WindowHandle(1)));
    }

    #[test]
    fn changing_the_layout_notifies_and_repositions() {
        let mut manager = manager_with_split_windows();
        let area = manager.state.current().monitor.working_area;
        assert!(manager.change_workspace_layout(1, Box::new(crate::layouts::Monocle)));
        assert_eq!(
            manager.state.current().layout().layout_name(),
            crate::layouts::MONOCLE
        );
        assert_eq!(manager.native.frame(WindowHandle(1)), Some(area));
        // same layout again is a no-op
        assert!(!manager.change_workspace_layout(1, Box::new(crate::layouts::Monocle)));
    }

    #[test]
    fn dismissing_a_temporarily_shown_window_restores_focus() {
        let mut manager = manager_with_split_windows();
        manager.state.temporarily_shown.insert(WindowHandle(2));
        assert!(manager.dismiss_temporarily_shown_window(WindowHandle(2)));
        assert!(!manager.native.is_window_visible(WindowHandle(2)));
        assert_eq!(manager.native.foreground, Some(WindowHandle(1)));
        assert!(!manager.dismiss_temporarily_shown_window(WindowHandle(2)));
    }

    #[test]
    fn quit_reverts_every_tracked_window() {
        let mut manager = manager_with_split_windows();
        manager.toggle_window_titlebar(WindowHandle(1));
        assert!(!manager
            .native
            .style(WindowHandle(1))
            .contains(crate::native::WindowStyle::CAPTION));

        manager.quit();

        assert!(manager.quit_requested);
        assert!(manager
            .native
            .style(WindowHandle(1))
            .contains(crate::native::WindowStyle::CAPTION));
        assert!(manager.native.is_window_visible(WindowHandle(2)));
        assert!(manager.native.border_widths.is_none());
    }
}
