//! Core state machine of the shellgrid window manager.
// We deny clippy pedantic lints, primarily to keep code as correct as possible
// Remember, the goal of shellgrid is to do one thing and to do that one thing
// well: Be a window manager.
#![warn(clippy::pedantic)]
// Each of these lints are globally allowed because they otherwise make a lot
// of noise. However, work to ensure that each use of one of these is correct
// would be very much appreciated.
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::must_use_candidate,
    clippy::default_trait_access
)]
pub mod config;
pub mod errors;
mod event_loop;
mod handlers;
pub mod layouts;
pub mod models;
pub mod native;
pub mod plugins;
mod posted_action;
mod shell_event;
pub mod state;
pub mod utils;

pub use config::{Config, ProgramRule, Rule, WorkspaceConfig};
pub use errors::{Result, ShellgridError};
pub use layouts::Layout;
pub use models::Manager;
pub use models::Monitor;
pub use models::Window;
pub use models::Workspace;
pub use native::NativeApi;
pub use plugins::{Notification, Plugin};
pub use posted_action::{ActivationTarget, PostedAction};
pub use shell_event::ShellEvent;
pub use state::State;
