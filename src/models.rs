mod manager;
mod monitor;
mod window;
mod workspace;

pub use manager::Manager;
pub use monitor::Monitor;
pub use window::{Window, WindowHandle};
pub use workspace::{Workspace, WorkspaceId};
