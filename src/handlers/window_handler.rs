//! The rule router: placing newly observed windows, removing destroyed ones
//! and re-syncing the routing table against OS truth.

use crate::config::{Config, OnWindowShownAction};
use crate::models::{Manager, Window, WindowHandle, WorkspaceId};
use crate::native::{NativeApi, NativeWindowInfo};
use crate::plugins::Notification;
use crate::posted_action::{ActivationTarget, PostedAction};
use crate::utils::helpers::settle_sleep;

use std::collections::HashSet;

impl<C: Config, API: NativeApi> Manager<C, API> {
    /// Routes a freshly observed native window through the program rules and
    /// hands one window record per placement directive to its workspace.
    ///
    /// Returns false when the window is left unmanaged; such handles are
    /// flagged so they are never evaluated again.
    pub(crate) fn add_window_to_workspace(&mut self, handle: WindowHandle, first_try: bool) -> bool {
        if !self.native.is_app_window(handle) {
            return false;
        }
        let Some(info) = query_window_info(&self.native, handle) else {
            // gone already; notifications race with destruction
            return false;
        };

        let Some(index) = self.config.program_rules().iter().position(|rule| {
            rule.matches(
                &self.native,
                handle,
                &info.class_name,
                &info.title,
                &info.process_name,
                info.style,
                info.ex_style,
            )
        }) else {
            self.state.hidden_windows.add(handle);
            return false;
        };
        let program_rule = &self.config.program_rules()[index];
        if !program_rule.is_managed {
            self.state.hidden_windows.add(handle);
            return false;
        }
        let try_again_after = program_rule.try_again_after;
        let window_created_delay = program_rule.window_created_delay;
        let handle_owned_windows = program_rule.handle_owned_windows;
        let redraw_desktop = program_rule.redraw_desktop_on_window_created;
        let on_window_created = program_rule.on_window_created;
        let mut rules = program_rule.rules.clone();

        if first_try && self.finished_initializing {
            if let Some(pause) = try_again_after {
                // style/owner metadata may not be valid yet right after
                // creation; at most one retry
                settle_sleep(pause);
                return self.add_window_to_workspace(handle, false);
            }
        }

        let current = self.state.current_workspace;
        let has_zero = rules.iter().any(|r| r.workspace == 0);
        let has_current = rules.iter().any(|r| r.workspace == current);
        if has_zero && has_current {
            // both resolve to the current workspace; keep one placement
            rules.retain(|r| r.workspace != 0);
        }
        let workspace_count = self.state.workspaces.len();
        rules.retain(|r| r.workspace <= workspace_count);
        if rules.is_empty() {
            self.state.hidden_windows.add(handle);
            return false;
        }
        let workspaces_count = rules.len();

        if self.finished_initializing {
            if has_zero || has_current {
                // the window lands on the current workspace anyway
                let minimized = self.native.is_minimized(handle);
                self.activate_window(handle, ActivationTarget::Handle(handle), minimized);
            } else {
                match on_window_created {
                    OnWindowShownAction::SwitchToWindowsWorkspace => {
                        self.state
                            .post_action(PostedAction::SwitchToApplication(handle));
                    }
                    OnWindowShownAction::MoveWindowToCurrentWorkspace => {
                        let from = self.state.resolve_workspace(rules[0].workspace);
                        self.state.post_action(PostedAction::MoveApplicationToWorkspace {
                            handle,
                            to: current,
                            from,
                        });
                    }
                    OnWindowShownAction::TemporarilyShowWindowOnCurrentWorkspace => {
                        self.state.temporarily_shown.insert(handle);
                        let minimized = self.native.is_minimized(handle);
                        self.activate_window(handle, ActivationTarget::Handle(handle), minimized);
                    }
                    OnWindowShownAction::HideWindow => {
                        settle_sleep(self.config.window_retry_delay());
                        self.set_top_window_as_foreground();
                        self.state.hidden_windows.add(handle);
                        self.native.hide(handle);
                    }
                }
            }
            settle_sleep(window_created_delay);
        }

        // owned dialogs are enumerated once and attached under the owner
        let mut owned_infos: Vec<NativeWindowInfo> = Vec::new();
        if handle_owned_windows {
            for owned in self.native.owned_windows(handle) {
                if let Some(owned_info) = query_window_info(&self.native, owned) {
                    owned_infos.push(owned_info);
                }
            }
            if owned_infos.is_empty() {
                if first_try && self.finished_initializing {
                    settle_sleep(self.config.window_retry_delay());
                    return self.add_window_to_workspace(handle, false);
                }
                self.state.hidden_windows.add(handle);
                return false;
            }
        }
        if redraw_desktop {
            self.native.redraw_desktop();
        }

        let route: Vec<WorkspaceId> = rules
            .iter()
            .map(|r| self.state.resolve_workspace(r.workspace))
            .collect();
        self.state.applications.insert(handle, route.clone());

        for (rule, &workspace) in rules.iter().zip(&route) {
            {
                let Manager {
                    state,
                    native,
                    config,
                    ..
                } = self;
                let program_rule = &config.program_rules()[index];
                let owned_windows: Vec<Window> = owned_infos
                    .iter()
                    .cloned()
                    .map(|mut owned_info| {
                        owned_info.process_name = info.process_name.clone();
                        Window::new(owned_info, workspaces_count, vec![], rule, program_rule)
                    })
                    .collect();
                let window = Window::new(
                    info.clone(),
                    workspaces_count,
                    owned_windows,
                    rule,
                    program_rule,
                );
                if let Some(ws) = state.workspace_mut(workspace) {
                    ws.window_created(window, native);
                }
            }
            self.notify(Notification::WindowAdded { workspace, handle });
        }
        true
    }

    /// Cascade removal: the handle disappears from every workspace holding
    /// it and from the routing table.
    pub fn remove_application_from_all_workspaces(&mut self, handle: WindowHandle) -> bool {
        let Some(route) = self.state.applications.remove(&handle) else {
            return false;
        };
        for workspace in route {
            let removed = self
                .state
                .workspace_mut(workspace)
                .and_then(|ws| ws.window_destroyed(handle))
                .is_some();
            if removed {
                self.notify(Notification::WindowRemoved { workspace, handle });
            }
        }
        self.state.temporarily_shown.remove(&handle);
        true
    }

    /// Adopts visible windows the router has not seen and drops routing
    /// entries whose handles no longer exist.
    pub(crate) fn refresh_applications(&mut self) -> bool {
        let existing: HashSet<WindowHandle> =
            self.native.enum_desktop_windows().into_iter().collect();
        for &handle in &existing {
            if self.native.is_window_visible(handle) && !self.state.is_tracked(handle) {
                self.add_window_to_workspace(handle, true);
            }
        }
        let stale: Vec<WindowHandle> = self
            .state
            .applications
            .keys()
            .copied()
            .filter(|h| !existing.contains(h))
            .collect();
        for handle in stale {
            self.remove_application_from_all_workspaces(handle);
        }
        true
    }

    /// Full re-sync plus a reposition of everything, hidden workspaces
    /// lazily on their next switch-to.
    pub fn refresh(&mut self) {
        self.refresh_applications();
        for workspace in &mut self.state.workspaces {
            if !workspace.is_current {
                workspace.mark_dirty();
            }
        }
        let Manager { state, native, .. } = self;
        state.current_mut().reposition(native);
    }

    /// A window we keep hidden has shown itself; its rule decides what
    /// happens now.
    pub(crate) fn on_hidden_window_shown(&mut self, handle: WindowHandle) -> bool {
        let Some(&primary) = self.state.route(handle).and_then(<[WorkspaceId]>::first) else {
            return false;
        };
        let Some(action) = self
            .state
            .workspace(primary)
            .and_then(|ws| ws.ownermost_window(handle))
            .map(|w| w.on_hidden_window_shown)
        else {
            return false;
        };
        let current = self.state.current_workspace;
        match action {
            OnWindowShownAction::SwitchToWindowsWorkspace => self.switch_to_application(handle),
            OnWindowShownAction::MoveWindowToCurrentWorkspace => {
                self.change_application_to_workspace(handle, current, primary, true)
            }
            OnWindowShownAction::TemporarilyShowWindowOnCurrentWorkspace => {
                self.state.temporarily_shown.insert(handle);
                true
            }
            OnWindowShownAction::HideWindow => {
                settle_sleep(self.config.window_retry_delay());
                self.hide_window(handle);
                self.set_top_window_as_foreground();
                true
            }
        }
    }

    pub(crate) fn hide_window(&mut self, handle: WindowHandle) {
        let primary = self.state.route(handle).and_then(|r| r.first().copied());
        self.state.hidden_windows.add(handle);
        let Manager { state, native, .. } = self;
        match primary
            .and_then(|ws| state.workspace_mut(ws))
            .and_then(|ws| ws.ownermost_window_mut(handle))
        {
            Some(window) => window.hide(native),
            None => native.hide(handle),
        }
    }

    /// The taskbar button changed: refresh every record's title and load the
    /// icon off the dispatch thread.
    pub(crate) fn window_title_changed_handler(&mut self, handle: WindowHandle) -> bool {
        let Some(route) = self.state.route(handle).map(<[WorkspaceId]>::to_vec) else {
            return false;
        };
        let Some(title) = self.native.title(handle) else {
            return false;
        };
        for workspace in route {
            if let Some(window) = self
                .state
                .workspace_mut(workspace)
                .and_then(|ws| ws.ownermost_window_mut(handle))
            {
                window.title.clone_from(&title);
            }
        }
        self.notify(Notification::WindowTitleChanged { handle, title });
        if let Some(job) = self.native.icon_loader(handle) {
            self.background.submit(move || (handle, job()));
        }
        true
    }
}

fn query_window_info<API: NativeApi>(api: &API, handle: WindowHandle) -> Option<NativeWindowInfo> {
    Some(NativeWindowInfo {
        handle,
        class_name: api.class_name(handle)?,
        title: api.title(handle)?,
        process_name: api.process_name(handle)?,
        style: api.style(handle),
        ex_style: api.ex_style(handle),
    })
}
