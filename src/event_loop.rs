use crate::config::Config;
use crate::models::Manager;
use crate::native::NativeApi;
use crate::plugins::Notification;
use crate::posted_action::PostedAction;

impl<C: Config, API: NativeApi> Manager<C, API> {
    /// Runs the manager until `quit` is requested.
    ///
    /// All state mutation happens here, on this task: shell notifications
    /// are handled strictly one at a time, one deferred action drains per
    /// cycle, and background results are marshalled in between.
    pub async fn event_loop(mut self) {
        self.startup();
        loop {
            self.native.flush();
            tokio::select! {
                () = self.native.wait_readable() => {}
                () = timeout(50) => {}
            }
            while self.dispatch_cycle() {
                if self.quit_requested {
                    break;
                }
            }
            if self.quit_requested {
                break;
            }
        }
    }

    /// One dispatch cycle: at most one shell notification, then exactly one
    /// deferred action, then any finished background results.
    ///
    /// Returns whether any work was done.
    pub fn dispatch_cycle(&mut self) -> bool {
        let mut progressed = false;
        if let Some(event) = self.native.next_shell_event() {
            self.dispatch_shell_event(event);
            progressed = true;
        }
        if let Some(action) = self.state.posted_actions.pop_front() {
            self.run_posted_action(action);
            progressed = true;
        }
        while let Some((handle, icon)) = self.background.poll() {
            self.notify(Notification::WindowIconChanged { handle, icon });
            progressed = true;
        }
        progressed
    }

    fn run_posted_action(&mut self, action: PostedAction) {
        tracing::debug!(?action, "running deferred action");
        match action {
            PostedAction::SwitchToWorkspace(workspace) => {
                self.switch_to_workspace(workspace);
            }
            PostedAction::SwitchToApplication(handle) => {
                self.switch_to_application(handle);
            }
            PostedAction::MoveApplicationToWorkspace { handle, to, from } => {
                self.change_application_to_workspace(handle, to, from, true);
            }
            PostedAction::CompleteWorkspaceSwitch { from, to } => {
                self.complete_workspace_switch(from, to);
            }
            PostedAction::ForceForeground(target) => {
                self.force_foreground(target);
            }
        }
    }
}

async fn timeout(millis: u64) {
    use tokio::time::{sleep, Duration};
    sleep(Duration::from_millis(millis)).await;
}
