pub mod program_rule;
mod workspace_config;

pub use program_rule::{DecorationPolicy, OnWindowShownAction, ProgramRule, Rule};
pub use workspace_config::WorkspaceConfig;

use crate::models::WorkspaceId;
use crate::native::Hotkey;
use std::time::Duration;

/// The configuration surface consumed by the core. How the values get here
/// (TOML, scripting, hardcoded defaults) is a downstream concern.
pub trait Config {
    /// Ordered list of program rules; the first match wins.
    fn program_rules(&self) -> &[ProgramRule];

    fn workspaces(&self) -> &[WorkspaceConfig];

    fn starting_workspace(&self) -> WorkspaceId {
        1
    }

    /// Global border width override. `None` leaves the system metric alone.
    fn border_width(&self) -> Option<i32> {
        None
    }

    fn padded_border_width(&self) -> Option<i32> {
        None
    }

    /// The key combination replayed to grant the foreground privilege.
    fn unique_hotkey(&self) -> Hotkey;

    /// How long to let the OS settle before re-querying the minimized state
    /// when a minimize/restore notification may have gone missing. The
    /// reconciliation built on top of this is best-effort.
    fn minimize_restore_delay(&self) -> Duration {
        Duration::from_millis(300)
    }

    /// Windows failing to answer a liveness probe within this window are
    /// skipped during bulk show/hide.
    fn unresponsive_timeout(&self) -> Duration {
        Duration::from_millis(1000)
    }

    /// Pause before re-examining a window whose metadata was not yet valid
    /// right after creation.
    fn window_retry_delay(&self) -> Duration {
        Duration::from_millis(500)
    }
}

#[cfg(test)]
#[allow(clippy::module_name_repetitions)]
pub struct TestConfig {
    pub rules: Vec<ProgramRule>,
    pub workspaces: Vec<WorkspaceConfig>,
    pub starting_workspace: WorkspaceId,
}

#[cfg(test)]
impl TestConfig {
    pub fn with_workspaces(count: usize) -> Self {
        let workspaces = (1..=count)
            .map(|id| WorkspaceConfig {
                layout: crate::layouts::EVEN_HORIZONTAL.to_owned(),
                ..WorkspaceConfig::new(&id.to_string())
            })
            .collect();
        Self {
            rules: vec![ProgramRule::default()],
            workspaces,
            starting_workspace: 1,
        }
    }
}

#[cfg(test)]
impl Config for TestConfig {
    fn program_rules(&self) -> &[ProgramRule] {
        &self.rules
    }

    fn workspaces(&self) -> &[WorkspaceConfig] {
        &self.workspaces
    }

    fn starting_workspace(&self) -> WorkspaceId {
        self.starting_workspace
    }

    fn unique_hotkey(&self) -> Hotkey {
        Hotkey {
            modifiers: crate::native::Modifiers::WIN,
            key: 0x5A,
        }
    }

    fn minimize_restore_delay(&self) -> Duration {
        Duration::ZERO
    }

    fn unresponsive_timeout(&self) -> Duration {
        Duration::ZERO
    }

    fn window_retry_delay(&self) -> Duration {
        Duration::ZERO
    }
}
