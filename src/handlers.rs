mod shared_window_handler;
mod shell_event_handler;
mod window_handler;
mod workspace_handler;
