//! Decoding of shell notifications into state mutations.

use crate::config::Config;
use crate::models::{Manager, WindowHandle};
use crate::native::NativeApi;
use crate::plugins::Notification;
use crate::shell_event::ShellEvent;
use crate::utils::helpers::settle_sleep;
use crate::utils::multiset::RemoveResult;

impl<C: Config, API: NativeApi> Manager<C, API> {
    /// Entry point for shell notifications.
    ///
    /// Handling never re-enters itself: a notification arriving while
    /// another one is being processed goes to the back of the queue, so
    /// notifications are handled strictly one at a time, in receipt order.
    pub fn dispatch_shell_event(&mut self, event: ShellEvent) -> bool {
        if self.in_shell_event {
            self.native.post_shell_event(event);
            return false;
        }
        self.in_shell_event = true;
        let changed = self.shell_event_handler(event);
        self.in_shell_event = false;
        changed
    }

    fn shell_event_handler(&mut self, event: ShellEvent) -> bool {
        match event {
            ShellEvent::WindowCreated(handle) => self.window_shown_handler(handle),
            ShellEvent::WindowDestroyed(handle) => {
                // hides we caused produce destroy notifications of their own,
                // each consuming one hidden-set reference
                if self.state.hidden_windows.remove(&handle) == RemoveResult::NotFound {
                    self.remove_application_from_all_workspaces(handle)
                } else {
                    false
                }
            }
            ShellEvent::WindowActivated(handle) => self.window_activated_handler(handle),
            ShellEvent::MinimizeRectChanged(handle) => {
                // the notification does not say which way it went
                settle_sleep(self.config.minimize_restore_delay());
                if self.native.is_minimized(handle) {
                    self.window_minimized_handler(handle)
                } else {
                    self.window_restored_handler(handle)
                }
            }
            ShellEvent::WindowFlashing(handle) => {
                if self.state.is_tracked(handle) {
                    self.notify(Notification::WindowFlashing { handle });
                }
                false
            }
            ShellEvent::WindowTitleChanged(handle) => self.window_title_changed_handler(handle),
            ShellEvent::WindowReplacing(handle) => {
                // the replacement pair arrives through the same queue as
                // synthetic created/destroyed notifications
                self.native
                    .post_shell_event(ShellEvent::WindowCreated(handle));
                false
            }
            ShellEvent::WindowReplaced(handle) => {
                self.native
                    .post_shell_event(ShellEvent::WindowDestroyed(handle));
                false
            }
        }
    }

    /// A window was created, or a window we know about became visible again.
    fn window_shown_handler(&mut self, handle: WindowHandle) -> bool {
        if !self.state.is_tracked(handle) {
            return self.add_window_to_workspace(handle, true);
        }
        if !self.state.is_hidden(handle) && !self.state.current().contains_window(handle) {
            // a window assigned elsewhere revealed itself; treat it like an
            // activation so its on-hidden-shown action applies
            self.native
                .post_shell_event(ShellEvent::WindowActivated(Some(handle)));
        }
        false
    }

    fn window_activated_handler(&mut self, handle: Option<WindowHandle>) -> bool {
        if let Some(handle) = handle {
            if self.state.is_hidden(handle) {
                return false;
            }
            if !self.state.is_temporarily_shown(handle) {
                if !self.state.is_tracked(handle) {
                    // something slipped past discovery
                    self.refresh_applications();
                } else if !self.state.current().contains_window(handle) {
                    self.on_hidden_window_shown(handle);
                }
            }
        }
        let settle = self.config.minimize_restore_delay();
        {
            let Manager { state, native, .. } = self;
            state.current_mut().window_activated(handle, native, settle);
        }
        self.notify(Notification::WindowActivated { handle });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Manager;
    use crate::native::MockWindow;

    fn manager_with_window(handle: u64) -> Manager<crate::config::TestConfig, crate::native::MockNativeApi> {
        let mut manager = Manager::new_test(2);
        manager
            .native
            .add_window(WindowHandle(handle), MockWindow::with_class("Notepad"));
        manager.startup();
        manager
    }

    #[test]
    fn notifications_received_while_busy_are_replayed_in_receipt_order() {
        let mut manager = manager_with_window(1);
        assert!(manager.state.is_tracked(WindowHandle(1)));

        // a destroy notification lands while the activation handler runs
        manager.in_shell_event = true;
        let changed = manager.dispatch_shell_event(ShellEvent::WindowDestroyed(WindowHandle(1)));
        assert!(!changed);
        assert!(
            manager.state.is_tracked(WindowHandle(1)),
            "the destroy must not be processed inline"
        );
        manager.in_shell_event = false;
        manager.native.remove_window(WindowHandle(1));

        // the re-posted notification drains on the next cycle
        assert!(manager.dispatch_cycle());
        assert!(!manager.state.is_tracked(WindowHandle(1)));
        assert!(!manager.state.current().contains_window(WindowHandle(1)));
    }

    #[test]
    fn replacing_and_replaced_translate_to_synthetic_create_and_destroy() {
        let mut manager = manager_with_window(1);
        manager.dispatch_shell_event(ShellEvent::WindowReplacing(WindowHandle(9)));
        manager.dispatch_shell_event(ShellEvent::WindowReplaced(WindowHandle(1)));
        assert_eq!(
            manager.native.events.pop_front(),
            Some(ShellEvent::WindowCreated(WindowHandle(9)))
        );
        assert_eq!(
            manager.native.events.pop_front(),
            Some(ShellEvent::WindowDestroyed(WindowHandle(1)))
        );
    }

    #[test]
    fn destroy_consumes_one_hidden_reference_before_removing() {
        let mut manager = manager_with_window(1);
        manager.hide_window(WindowHandle(1));

        // the hide we caused produces this notification
        manager.dispatch_shell_event(ShellEvent::WindowDestroyed(WindowHandle(1)));
        assert!(manager.state.is_tracked(WindowHandle(1)));

        // a real destroy still removes the window
        manager.native.remove_window(WindowHandle(1));
        manager.dispatch_shell_event(ShellEvent::WindowDestroyed(WindowHandle(1)));
        assert!(!manager.state.is_tracked(WindowHandle(1)));
    }

    #[test]
    fn a_hidden_window_revealing_itself_is_replayed_as_activation() {
        let mut manager = Manager::new_test(2);
        manager
            .native
            .add_window(WindowHandle(1), MockWindow::with_class("Notepad"));
        manager.config.rules = vec![crate::config::ProgramRule::default()
            .with_rules(vec![crate::config::Rule::on_workspace(2)])];
        manager.startup();
        assert!(!manager.state.current().contains_window(WindowHandle(1)));
        assert!(manager.state.is_hidden(WindowHandle(1)));

        // pretend the window forced itself visible: the hidden reference is
        // gone and a create notification arrives for a known handle
        manager
            .state
            .hidden_windows
            .remove(&WindowHandle(1));
        manager.dispatch_shell_event(ShellEvent::WindowCreated(WindowHandle(1)));

        assert_eq!(
            manager.native.events.pop_front(),
            Some(ShellEvent::WindowActivated(Some(WindowHandle(1))))
        );
    }

    #[test]
    fn flashing_is_forwarded_only_for_tracked_windows() {
        use crate::plugins::{Notification, Plugin};
        use crate::state::State;
        use std::sync::{Arc, Mutex};

        #[derive(Default)]
        struct Recorder(Arc<Mutex<Vec<Notification>>>);
        impl Plugin for Recorder {
            fn name(&self) -> &str {
                "recorder"
            }
            fn notify(&mut self, event: &Notification, _state: &State) {
                self.0.lock().expect("recorder lock").push(event.clone());
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut manager = Manager::new_test(1);
        manager
            .native
            .add_window(WindowHandle(1), MockWindow::with_class("Notepad"));
        manager.register_plugin(Box::new(Recorder(seen.clone())));
        manager.startup();

        manager.dispatch_shell_event(ShellEvent::WindowFlashing(WindowHandle(1)));
        manager.dispatch_shell_event(ShellEvent::WindowFlashing(WindowHandle(42)));

        let seen = seen.lock().expect("recorder lock");
        let flashes: Vec<_> = seen
            .iter()
            .filter(|n| matches!(n, Notification::WindowFlashing { .. }))
            .collect();
        assert_eq!(flashes.len(), 1);
    }
}
