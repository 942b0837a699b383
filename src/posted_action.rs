use crate::models::{WindowHandle, WorkspaceId};

/// A mutation deferred from inside a notification handler until the handler
/// has returned. The queue drains exactly one action per dispatch cycle, in
/// program order; a superseded action still runs against whatever the state
/// is at drain time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostedAction {
    SwitchToWorkspace(WorkspaceId),
    SwitchToApplication(WindowHandle),
    MoveApplicationToWorkspace {
        handle: WindowHandle,
        to: WorkspaceId,
        from: WorkspaceId,
    },
    /// The unswitch/switch-to pair that finishes a workspace switch after
    /// the new top window has been foregrounded.
    CompleteWorkspaceSwitch {
        from: WorkspaceId,
        to: WorkspaceId,
    },
    ForceForeground(ActivationTarget),
}

/// Activation goes either to a bare handle or through a window record that
/// may redirect to its last active popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationTarget {
    Handle(WindowHandle),
    Window {
        handle: WindowHandle,
        activate_last_active_popup: bool,
    },
}

impl ActivationTarget {
    #[must_use]
    pub const fn handle(&self) -> WindowHandle {
        match self {
            Self::Handle(handle) | Self::Window { handle, .. } => *handle,
        }
    }
}
