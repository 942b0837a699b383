//! Synchronization of windows that live on more than one workspace.
//!
//! One native window, N per-workspace records: floating/minimized transitions
//! fan out by handle to every member workspace, and `workspaces_count` moves
//! in lockstep with membership changes. Geometry belongs to the visible
//! workspace; everyone else keeps a saved snapshot.

use crate::config::Config;
use crate::models::{Manager, WindowHandle, WorkspaceId};
use crate::native::NativeApi;
use crate::plugins::Notification;
use crate::posted_action::ActivationTarget;

impl<C: Config, API: NativeApi> Manager<C, API> {
    /// The native window was minimized; every record of it sinks and leaves
    /// its managed subset.
    pub(crate) fn window_minimized_handler(&mut self, handle: WindowHandle) -> bool {
        let Some(route) = self.state.route(handle).map(<[WorkspaceId]>::to_vec) else {
            return false;
        };
        let mut changed = false;
        for workspace in route {
            let did = self
                .state
                .workspace_mut(workspace)
                .is_some_and(|ws| ws.window_minimized(handle));
            if did {
                self.notify(Notification::WindowMinimized { workspace, handle });
                changed = true;
            }
        }
        changed
    }

    /// The native window came back; every record of it rises and rejoins its
    /// managed subset.
    pub(crate) fn window_restored_handler(&mut self, handle: WindowHandle) -> bool {
        let Some(route) = self.state.route(handle).map(<[WorkspaceId]>::to_vec) else {
            return false;
        };
        let mut changed = false;
        for workspace in route {
            let did = self
                .state
                .workspace_mut(workspace)
                .is_some_and(|ws| ws.window_restored(handle));
            if did {
                self.notify(Notification::WindowRestored { workspace, handle });
                changed = true;
            }
        }
        changed
    }

    /// Toggles floating for the window under the handle, on every workspace
    /// that holds a record of it.
    pub fn toggle_window_floating(&mut self, handle: WindowHandle) -> bool {
        let Some((owner, ..)) = self.find_ownermost(self.state.current_workspace, handle) else {
            return false;
        };
        let Some(route) = self.state.route(owner).map(<[WorkspaceId]>::to_vec) else {
            return false;
        };
        let mut changed = false;
        for workspace in route {
            changed |= self
                .state
                .workspace_mut(workspace)
                .is_some_and(|ws| ws.toggle_window_floating(owner));
        }
        changed
    }

    /// Clones the window's record onto another workspace. Every member's
    /// `workspaces_count` increments together with the membership change;
    /// records crossing 1 -> 2 join their workspaces' shared subsets.
    pub fn add_application_to_workspace(
        &mut self,
        handle: WindowHandle,
        to: WorkspaceId,
        from: WorkspaceId,
        follow: bool,
    ) -> bool {
        if to == from || self.state.workspace(to).is_none() {
            return false;
        }
        let Some((owner, ..)) = self.find_ownermost(from, handle) else {
            return false;
        };
        if self
            .state
            .workspace(to)
            .is_some_and(|ws| ws.contains_window(owner))
        {
            return false;
        }
        let Some(window) = self
            .state
            .workspace(from)
            .and_then(|ws| ws.ownermost_window(owner))
            .cloned()
        else {
            return false;
        };
        let target = ActivationTarget::Window {
            handle: owner,
            activate_last_active_popup: window.activate_last_active_popup,
        };
        {
            let Manager { state, native, .. } = self;
            if let Some(ws) = state.workspace_mut(to) {
                ws.window_created(window, native);
            }
        }
        self.notify(Notification::WindowAdded {
            workspace: to,
            handle: owner,
        });
        if let Some(route) = self.state.applications.get_mut(&owner) {
            route.insert(0, to);
        }
        let route = self
            .state
            .route(owner)
            .map(<[WorkspaceId]>::to_vec)
            .unwrap_or_default();
        for workspace in route {
            if let Some(ws) = self.state.workspace_mut(workspace) {
                ws.increment_workspaces_count(owner);
            }
        }
        self.follow_window(to, follow, target);
        true
    }

    /// Detaches the window from one of its workspaces. The last member does
    /// not detach: it closes the application. A member crossing 2 -> 1 is
    /// queued for removal from the shared subset so it gets re-initialized
    /// once before its record becomes authoritative.
    pub fn remove_application_from_workspace(
        &mut self,
        handle: WindowHandle,
        from: WorkspaceId,
    ) -> bool {
        let Some((owner, ..)) = self.find_ownermost(from, handle) else {
            return false;
        };
        let Some(count) = self
            .state
            .workspace(from)
            .and_then(|ws| ws.ownermost_window(owner))
            .map(|w| w.workspaces_count)
        else {
            return false;
        };
        if count == 1 {
            self.native.close(owner);
            return true;
        }
        self.hide_window(owner);
        if let Some(route) = self.state.applications.get_mut(&owner) {
            route.retain(|ws| *ws != from);
        }
        let remaining = self
            .state
            .route(owner)
            .map(<[WorkspaceId]>::to_vec)
            .unwrap_or_default();
        for workspace in remaining {
            if let Some(ws) = self.state.workspace_mut(workspace) {
                ws.decrement_workspaces_count(owner);
            }
        }
        if self
            .state
            .workspace_mut(from)
            .and_then(|ws| ws.window_destroyed(owner))
            .is_some()
        {
            self.notify(Notification::WindowRemoved {
                workspace: from,
                handle: owner,
            });
        }
        true
    }

    /// Moves the window's record from one workspace to another, keeping its
    /// share count: the membership set changes but its size does not.
    pub fn change_application_to_workspace(
        &mut self,
        handle: WindowHandle,
        to: WorkspaceId,
        from: WorkspaceId,
        follow: bool,
    ) -> bool {
        if to == from || self.state.workspace(to).is_none() {
            return false;
        }
        let Some((owner, ..)) = self.find_ownermost(from, handle) else {
            return false;
        };
        if self
            .state
            .workspace(to)
            .is_some_and(|ws| ws.contains_window(owner))
        {
            return false;
        }
        let Some(window) = self
            .state
            .workspace_mut(from)
            .and_then(|ws| ws.window_destroyed(owner))
        else {
            return false;
        };
        self.notify(Notification::WindowRemoved {
            workspace: from,
            handle: owner,
        });
        let target = ActivationTarget::Window {
            handle: owner,
            activate_last_active_popup: window.activate_last_active_popup,
        };
        {
            let Manager { state, native, .. } = self;
            if let Some(ws) = state.workspace_mut(to) {
                ws.window_created(window, native);
            }
        }
        self.notify(Notification::WindowAdded {
            workspace: to,
            handle: owner,
        });
        if let Some(route) = self.state.applications.get_mut(&owner) {
            route.retain(|ws| *ws != from);
            route.insert(0, to);
        }
        self.follow_window(to, follow, target);
        true
    }
}
