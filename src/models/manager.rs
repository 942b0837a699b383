use crate::config::Config;
use crate::models::{WindowHandle, WorkspaceId};
use crate::native::{IconBitmap, NativeApi};
use crate::plugins::{Notification, Plugin, PluginHost};
use crate::state::State;
use crate::utils::background::BackgroundWorker;

use std::collections::HashSet;

pub(crate) type IconResult = (WindowHandle, Option<IconBitmap>);

/// Maintains current program state and serializes every mutation behind the
/// dispatch loop.
pub struct Manager<C, API> {
    pub state: State,
    pub config: C,
    pub native: API,
    pub plugins: PluginHost,
    pub(crate) background: BackgroundWorker<IconResult>,
    /// Re-post guard: while a shell notification is being handled, any
    /// further notification goes back to the queue instead of re-entering.
    pub(crate) in_shell_event: bool,
    pub(crate) finished_initializing: bool,
    pub(crate) hotkey_registered: bool,
    pub(crate) quit_requested: bool,
}

impl<C, API> Manager<C, API>
where
    C: Config,
    API: NativeApi,
{
    /// # Errors
    ///
    /// Fails when the configuration names an unknown layout or monitor, or
    /// configures no workspaces at all.
    pub fn new(config: C, native: API) -> crate::Result<Self> {
        let monitors = native.monitors();
        let state = State::new(&config, &monitors)?;
        Ok(Self {
            state,
            config,
            native,
            plugins: PluginHost::default(),
            background: BackgroundWorker::new(),
            in_shell_event: false,
            finished_initializing: false,
            hotkey_registered: false,
            quit_requested: false,
        })
    }

    pub fn register_plugin(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.register(plugin);
    }

    /// Brings the manager in sync with the OS: adopts every existing window
    /// through the rule router, applies global metrics and switches to the
    /// starting workspace.
    pub fn startup(&mut self) {
        self.plugins.initialize(&self.state);
        self.native
            .set_border_widths(self.config.border_width(), self.config.padded_border_width());
        if self.native.register_hotkey(self.config.unique_hotkey()) {
            self.hotkey_registered = true;
        } else {
            tracing::warn!(
                "the unique hotkey is taken by another program; \
                 forced-foreground activation is unavailable"
            );
        }

        for handle in self.native.enum_desktop_windows() {
            self.add_window_to_workspace(handle, true);
        }
        // discovery enumerates the Z-order top to bottom; fix up the lists
        for workspace in &mut self.state.workspaces {
            workspace.initialize();
        }

        // everything not on the starting workspace goes out of sight
        let starting = self.config.starting_workspace();
        let on_starting: HashSet<WindowHandle> = self
            .state
            .workspace(starting)
            .map(|ws| ws.windows().map(|w| w.handle).collect())
            .unwrap_or_default();
        let mut to_hide: Vec<(WorkspaceId, WindowHandle)> = Vec::new();
        for workspace in &self.state.workspaces {
            if workspace.id == starting {
                continue;
            }
            for window in workspace.windows() {
                if !on_starting.contains(&window.handle) {
                    to_hide.push((workspace.id, window.handle));
                }
            }
        }
        for (workspace, handle) in to_hide {
            self.state.hidden_windows.add_unique(handle);
            let Manager { state, native, .. } = self;
            if let Some(window) = state
                .workspace_mut(workspace)
                .and_then(|ws| ws.ownermost_window_mut(handle))
            {
                window.hide(native);
            }
        }

        self.state.current_workspace = starting;
        self.state.previous_workspace = starting;
        if let Some(workspace) = self.state.workspace_mut(starting) {
            workspace.is_current = true;
        }
        self.notify(Notification::WorkspaceActivated(starting));
        {
            let Manager { state, native, .. } = self;
            state.current_mut().switch_to(native);
        }
        self.notify(Notification::WorkspaceShown(starting));
        self.set_top_window_as_foreground();
        self.finished_initializing = true;
    }

    /// Reverts every tracked window to its pre-managed snapshot, shows it,
    /// and releases the plugins. Nothing of the routing table survives the
    /// process.
    pub fn quit(&mut self) {
        let entries: Vec<(WorkspaceId, WindowHandle)> = self
            .state
            .applications
            .iter()
            .filter_map(|(handle, route)| route.first().map(|ws| (*ws, *handle)))
            .collect();
        {
            let Manager { state, native, .. } = self;
            for (workspace, handle) in entries {
                let Some(window) = state
                    .workspace_mut(workspace)
                    .and_then(|ws| ws.ownermost_window_mut(handle))
                else {
                    continue;
                };
                window.do_for_self_or_owned(&mut |w| w.revert_to_initial_values(native));
                window.show(native);
            }
            native.restore_border_widths();
        }
        self.plugins.dispose();
        self.quit_requested = true;
    }

    pub(crate) fn notify(&mut self, event: Notification) {
        self.plugins.notify(&event, &self.state);
    }
}

#[cfg(test)]
impl Manager<crate::config::TestConfig, crate::native::MockNativeApi> {
    pub(crate) fn new_test(workspaces: usize) -> Self {
        Self::new_test_with(
            crate::config::TestConfig::with_workspaces(workspaces),
            crate::native::MockNativeApi::new(),
        )
    }

    pub(crate) fn new_test_with(
        config: crate::config::TestConfig,
        native: crate::native::MockNativeApi,
    ) -> Self {
        Self::new(config, native).expect("test config is valid")
    }
}
