//! Bars and other extensions observing the manager.

use crate::models::{WindowHandle, WorkspaceId};
use crate::native::IconBitmap;
use crate::state::State;

use std::fmt;

/// Everything a bar or plugin can learn about without asking.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    WorkspaceShown(WorkspaceId),
    WorkspaceHidden(WorkspaceId),
    WorkspaceActivated(WorkspaceId),
    WorkspaceDeactivated(WorkspaceId),
    WorkspaceLayoutChanged {
        workspace: WorkspaceId,
        layout: String,
    },
    WorkspaceMonitorChanged {
        workspace: WorkspaceId,
        old_monitor: usize,
        new_monitor: usize,
    },
    WindowAdded {
        workspace: WorkspaceId,
        handle: WindowHandle,
    },
    WindowRemoved {
        workspace: WorkspaceId,
        handle: WindowHandle,
    },
    WindowMinimized {
        workspace: WorkspaceId,
        handle: WindowHandle,
    },
    WindowRestored {
        workspace: WorkspaceId,
        handle: WindowHandle,
    },
    WindowActivated {
        handle: Option<WindowHandle>,
    },
    WindowTitleChanged {
        handle: WindowHandle,
        title: String,
    },
    WindowIconChanged {
        handle: WindowHandle,
        icon: Option<IconBitmap>,
    },
    WindowFlashing {
        handle: WindowHandle,
    },
}

pub trait Plugin {
    fn name(&self) -> &str;

    fn initialize(&mut self, _state: &State) {}

    fn dispose(&mut self) {}

    fn notify(&mut self, _event: &Notification, _state: &State) {}
}

/// Fan-out of manager notifications to every registered plugin, in
/// registration order.
#[derive(Default)]
pub struct PluginHost {
    plugins: Vec<Box<dyn Plugin>>,
}

impl fmt::Debug for PluginHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("PluginHost").field("plugins", &names).finish()
    }
}

impl PluginHost {
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub(crate) fn initialize(&mut self, state: &State) {
        for plugin in &mut self.plugins {
            plugin.initialize(state);
        }
    }

    pub(crate) fn dispose(&mut self) {
        for plugin in &mut self.plugins {
            plugin.dispose();
        }
    }

    pub(crate) fn notify(&mut self, event: &Notification, state: &State) {
        for plugin in &mut self.plugins {
            plugin.notify(event, state);
        }
    }
}
