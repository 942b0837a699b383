use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShellgridError>;

#[derive(Debug, Error)]
pub enum ShellgridError {
    #[error("Invalid rule pattern: {0}")]
    RulePattern(#[from] regex::Error),
    #[error("Unknown layout: {0}")]
    UnknownLayout(String),
    #[error("Workspace {0} is not configured")]
    UnknownWorkspace(usize),
    #[error("Workspace {workspace} references monitor {monitor} which does not exist")]
    UnknownMonitor { workspace: usize, monitor: usize },
    #[error("At least one workspace must be configured")]
    NoWorkspaces,
}
