//! Declarative routing of freshly observed windows.
#![allow(clippy::module_name_repetitions)]

use crate::errors::Result;
use crate::models::{WindowHandle, WorkspaceId};
use crate::native::{NativeApi, WindowExStyle, WindowStyle};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// What to do with a titlebar/taskbar-button/border when a rule places a
/// window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecorationPolicy {
    Shown,
    Hidden,
    #[default]
    AsIs,
}

/// What happens right after a rule places a window somewhere other than the
/// current workspace, or when a hidden window shows itself.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnWindowShownAction {
    #[default]
    SwitchToWindowsWorkspace,
    MoveWindowToCurrentWorkspace,
    TemporarilyShowWindowOnCurrentWorkspace,
    HideWindow,
}

/// One placement directive produced by a matched [`ProgramRule`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Target workspace id; 0 resolves to the current workspace at match
    /// time.
    pub workspace: WorkspaceId,
    pub is_floating: bool,
    pub show_in_tabs: bool,
    pub titlebar: DecorationPolicy,
    pub in_taskbar: DecorationPolicy,
    pub window_borders: DecorationPolicy,
    pub redraw_on_show: bool,
    pub activate_last_active_popup: bool,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            workspace: 0,
            is_floating: false,
            show_in_tabs: true,
            titlebar: DecorationPolicy::AsIs,
            in_taskbar: DecorationPolicy::AsIs,
            window_borders: DecorationPolicy::AsIs,
            redraw_on_show: false,
            activate_last_active_popup: true,
        }
    }
}

impl Rule {
    #[must_use]
    pub fn on_workspace(workspace: WorkspaceId) -> Self {
        Self {
            workspace,
            ..Self::default()
        }
    }
}

pub type CustomMatcher = Box<dyn Fn(&dyn NativeApi, WindowHandle) -> bool + Send + Sync>;

/// A declarative matcher plus placement directives. Rules are immutable once
/// loaded and evaluated once per newly observed native window, in declaration
/// order.
pub struct ProgramRule {
    class_name: Regex,
    title: Regex,
    process_name: Regex,
    style_contains: WindowStyle,
    style_not_contains: WindowStyle,
    ex_style_contains: WindowExStyle,
    ex_style_not_contains: WindowExStyle,
    custom_matcher: Option<CustomMatcher>,
    pub is_managed: bool,
    /// One bounded retry after this pause, for windows whose style/owner
    /// metadata is not yet valid immediately after creation.
    pub try_again_after: Option<Duration>,
    pub window_created_delay: Duration,
    pub handle_owned_windows: bool,
    pub hide_owned_popups: bool,
    pub redraw_desktop_on_window_created: bool,
    pub on_window_created: OnWindowShownAction,
    pub on_hidden_window_shown: OnWindowShownAction,
    pub rules: Vec<Rule>,
}

impl fmt::Debug for ProgramRule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ProgramRule")
            .field("class_name", &self.class_name.as_str())
            .field("title", &self.title.as_str())
            .field("process_name", &self.process_name.as_str())
            .field("is_managed", &self.is_managed)
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}

impl Default for ProgramRule {
    fn default() -> Self {
        Self::new(".*", ".*", ".*").expect("the catch-all patterns are valid")
    }
}

impl ProgramRule {
    /// Builds a rule matching on window class, display title and process
    /// name.
    ///
    /// # Errors
    ///
    /// Fails when a pattern does not compile; this is fatal at startup.
    pub fn new(class_name: &str, title: &str, process_name: &str) -> Result<Self> {
        Ok(Self {
            class_name: Regex::new(class_name)?,
            title: Regex::new(title)?,
            process_name: Regex::new(process_name)?,
            style_contains: WindowStyle::empty(),
            style_not_contains: WindowStyle::empty(),
            ex_style_contains: WindowExStyle::empty(),
            ex_style_not_contains: WindowExStyle::empty(),
            custom_matcher: None,
            is_managed: true,
            try_again_after: None,
            window_created_delay: Duration::ZERO,
            handle_owned_windows: false,
            hide_owned_popups: true,
            redraw_desktop_on_window_created: false,
            on_window_created: OnWindowShownAction::default(),
            on_hidden_window_shown: OnWindowShownAction::default(),
            rules: vec![Rule::default()],
        })
    }

    #[must_use]
    pub fn styles(mut self, contains: WindowStyle, not_contains: WindowStyle) -> Self {
        self.style_contains = contains;
        self.style_not_contains = not_contains;
        self
    }

    #[must_use]
    pub fn ex_styles(mut self, contains: WindowExStyle, not_contains: WindowExStyle) -> Self {
        self.ex_style_contains = contains;
        self.ex_style_not_contains = not_contains;
        self
    }

    #[must_use]
    pub fn matching(mut self, matcher: CustomMatcher) -> Self {
        self.custom_matcher = Some(matcher);
        self
    }

    /// Matched windows are left unmanaged and never re-evaluated.
    #[must_use]
    pub fn unmanaged(mut self) -> Self {
        self.is_managed = false;
        self
    }

    #[must_use]
    pub fn try_again_after(mut self, pause: Duration) -> Self {
        self.try_again_after = Some(pause);
        self
    }

    #[must_use]
    pub fn window_created_delay(mut self, delay: Duration) -> Self {
        self.window_created_delay = delay;
        self
    }

    #[must_use]
    pub fn handle_owned_windows(mut self) -> Self {
        self.handle_owned_windows = true;
        self
    }

    #[must_use]
    pub fn keep_owned_popups(mut self) -> Self {
        self.hide_owned_popups = false;
        self
    }

    #[must_use]
    pub fn redraw_desktop_on_window_created(mut self) -> Self {
        self.redraw_desktop_on_window_created = true;
        self
    }

    #[must_use]
    pub fn on_window_created(mut self, action: OnWindowShownAction) -> Self {
        self.on_window_created = action;
        self
    }

    #[must_use]
    pub fn on_hidden_window_shown(mut self, action: OnWindowShownAction) -> Self {
        self.on_hidden_window_shown = action;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Fills in placement directives for workspaces `1..=count` that the
    /// explicit rules do not already name.
    #[must_use]
    pub fn show_on_workspaces(mut self, count: usize) -> Self {
        for workspace in 1..=count {
            if !self.rules.iter().any(|r| r.workspace == workspace) {
                self.rules.push(Rule::on_workspace(workspace));
            }
        }
        self
    }

    #[must_use]
    pub fn matches(
        &self,
        api: &dyn NativeApi,
        handle: WindowHandle,
        class_name: &str,
        title: &str,
        process_name: &str,
        style: WindowStyle,
        ex_style: WindowExStyle,
    ) -> bool {
        self.class_name.is_match(class_name)
            && self.title.is_match(title)
            && self.process_name.is_match(process_name)
            && style.contains(self.style_contains)
            && (style & self.style_not_contains).is_empty()
            && ex_style.contains(self.ex_style_contains)
            && (ex_style & self.ex_style_not_contains).is_empty()
            && match &self.custom_matcher {
                Some(matcher) => matcher(api, handle),
                // owned windows are picked up together with their owner
                None => api.owner(handle).is_none(),
            }
    }
}
