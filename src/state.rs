//! Process-scoped registries owned by the orchestrator.

use crate::config::Config;
use crate::errors::{Result, ShellgridError};
use crate::layouts;
use crate::models::{Monitor, Window, WindowHandle, Workspace, WorkspaceId};
use crate::posted_action::PostedAction;
use crate::utils::multiset::Multiset;

use std::collections::{HashMap, HashSet, VecDeque};

/// All mutable state of the manager: the workspaces, the routing table and
/// the queues. Mutated only from the dispatch thread.
#[derive(Debug)]
pub struct State {
    pub workspaces: Vec<Workspace>,
    pub current_workspace: WorkspaceId,
    pub previous_workspace: WorkspaceId,
    /// Native handle to the ordered list of workspaces holding a record of
    /// it. The first entry is the primary view.
    pub(crate) applications: HashMap<WindowHandle, Vec<WorkspaceId>>,
    /// Reference counted: hide requests may arrive several times for the
    /// same handle and each must be matched by one destroy notification.
    pub(crate) hidden_windows: Multiset<WindowHandle>,
    /// Windows shown outside their rule-assigned workspace, pending
    /// dismissal on the next switch.
    pub(crate) temporarily_shown: HashSet<WindowHandle>,
    /// Mutations deferred until the current notification handler returns.
    pub(crate) posted_actions: VecDeque<PostedAction>,
}

impl State {
    pub(crate) fn new(config: &impl Config, monitors: &[Monitor]) -> Result<Self> {
        let configs = config.workspaces();
        if configs.is_empty() {
            return Err(ShellgridError::NoWorkspaces);
        }
        let mut workspaces = Vec::with_capacity(configs.len());
        for (index, ws) in configs.iter().enumerate() {
            let id = index + 1;
            let layout = layouts::new_layout(&ws.layout)
                .ok_or_else(|| ShellgridError::UnknownLayout(ws.layout.clone()))?;
            let monitor = monitors
                .get(ws.monitor)
                .copied()
                .ok_or(ShellgridError::UnknownMonitor {
                    workspace: id,
                    monitor: ws.monitor,
                })?;
            workspaces.push(Workspace::new(
                id,
                ws.name.clone(),
                monitor,
                layout,
                ws.show_windows_taskbar,
                ws.reposition_on_switched_to,
            ));
        }
        let starting = config.starting_workspace();
        if starting == 0 || starting > workspaces.len() {
            return Err(ShellgridError::UnknownWorkspace(starting));
        }
        Ok(Self {
            workspaces,
            current_workspace: starting,
            previous_workspace: starting,
            applications: HashMap::new(),
            hidden_windows: Multiset::new(),
            temporarily_shown: HashSet::new(),
            posted_actions: VecDeque::new(),
        })
    }

    #[must_use]
    pub fn workspace(&self, id: WorkspaceId) -> Option<&Workspace> {
        id.checked_sub(1).and_then(|i| self.workspaces.get(i))
    }

    pub fn workspace_mut(&mut self, id: WorkspaceId) -> Option<&mut Workspace> {
        id.checked_sub(1).and_then(|i| self.workspaces.get_mut(i))
    }

    /// There is always a current workspace.
    #[must_use]
    pub fn current(&self) -> &Workspace {
        &self.workspaces[self.current_workspace - 1]
    }

    pub fn current_mut(&mut self) -> &mut Workspace {
        let index = self.current_workspace - 1;
        &mut self.workspaces[index]
    }

    /// Workspace id 0 means "the current workspace at this moment".
    #[must_use]
    pub fn resolve_workspace(&self, id: WorkspaceId) -> WorkspaceId {
        if id == 0 {
            self.current_workspace
        } else {
            id
        }
    }

    #[must_use]
    pub fn route(&self, handle: WindowHandle) -> Option<&[WorkspaceId]> {
        self.applications.get(&handle).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_tracked(&self, handle: WindowHandle) -> bool {
        self.applications.contains_key(&handle)
    }

    #[must_use]
    pub fn is_hidden(&self, handle: WindowHandle) -> bool {
        self.hidden_windows.contains(&handle)
    }

    #[must_use]
    pub fn is_temporarily_shown(&self, handle: WindowHandle) -> bool {
        self.temporarily_shown.contains(&handle)
    }

    /// The primary record of a tracked window.
    #[must_use]
    pub fn find_window(&self, handle: WindowHandle) -> Option<(&Workspace, &Window)> {
        let workspace = self
            .route(handle)
            .and_then(|route| route.first())
            .and_then(|&id| self.workspace(id))?;
        workspace.ownermost_window(handle).map(|w| (workspace, w))
    }

    pub(crate) fn post_action(&mut self, action: PostedAction) {
        self.posted_actions.push_back(action);
    }
}
