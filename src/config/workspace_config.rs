use serde::{Deserialize, Serialize};

fn default_layout() -> String {
    crate::layouts::MONOCLE.to_owned()
}

/// Startup description of one workspace.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WorkspaceConfig {
    pub name: String,
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default)]
    pub monitor: usize,
    #[serde(default)]
    pub show_windows_taskbar: bool,
    #[serde(default)]
    pub reposition_on_switched_to: bool,
}

impl WorkspaceConfig {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            layout: default_layout(),
            monitor: 0,
            show_windows_taskbar: false,
            reposition_on_switched_to: false,
        }
    }
}
