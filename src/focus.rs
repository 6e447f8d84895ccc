// SPDX-License-Identifier: GPL-3.0-only

use kbdd_config::NamingConfig;
use tracing::trace;

use crate::views::ViewId;

/// A view that just received keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusedView {
    pub id: ViewId,
    /// Naming hint of the view, usually its app id.
    pub app_id: String,
}

impl FocusedView {
    pub fn new(id: impl Into<ViewId>, app_id: impl Into<String>) -> Self {
        FocusedView {
            id: id.into(),
            app_id: app_id.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusClass {
    /// Panels and other desktop chrome.
    Shell,
    /// Short lived focus stealers like popup menus.
    Overlay,
    Application,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    naming: NamingConfig,
}

impl Classifier {
    pub fn new(naming: NamingConfig) -> Self {
        Classifier { naming }
    }

    pub fn classify(&self, app_id: &str) -> FocusClass {
        if !self.naming.shell_prefix.is_empty() && app_id.starts_with(&self.naming.shell_prefix) {
            FocusClass::Shell
        } else if app_id == self.naming.overlay_app_id {
            FocusClass::Overlay
        } else {
            FocusClass::Application
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(NamingConfig::default())
    }
}

/// Which views had focus recently, as far as remote switching is concerned.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FocusTracker {
    /// The currently focused view.
    pub previous: Option<ViewId>,
    /// Trail of focused views with overlays skipped.
    pub filtered_previous: Option<ViewId>,
    pub shell: Option<ViewId>,
    /// Target of remote layout switches.
    pub last_application: Option<ViewId>,
}

impl FocusTracker {
    pub fn is_duplicate(&self, view: ViewId) -> bool {
        self.previous == Some(view)
    }

    /// Records a focus change. Returns `false` for a repeated focus of the
    /// current view, which leaves the tracker untouched.
    pub fn update(&mut self, view: ViewId, class: FocusClass) -> bool {
        if self.is_duplicate(view) {
            return false;
        }

        match class {
            FocusClass::Shell => {
                if self.shell.is_none() {
                    self.shell = Some(view);
                    // one-shot: only the first shell sighting seeds the target
                    if self.last_application.is_none() && self.filtered_previous.is_some() {
                        self.last_application = self.filtered_previous;
                    }
                }
            }
            FocusClass::Overlay => {}
            FocusClass::Application => {
                self.filtered_previous = self.previous;
                if self.shell.is_some_and(|shell| shell != view) {
                    self.last_application = Some(view);
                }
            }
        }
        self.previous = Some(view);

        trace!(?view, ?class, tracker = ?self, "Focus tracked");
        true
    }

    /// Forget the shell and the remote switch target.
    pub fn reset_remote(&mut self) {
        self.shell = None;
        self.last_application = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focus(tracker: &mut FocusTracker, id: u32, app_id: &str) -> bool {
        let class = Classifier::default().classify(app_id);
        tracker.update(ViewId(id), class)
    }

    #[test]
    fn classification() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("$unfocus panel"), FocusClass::Shell);
        assert_eq!(classifier.classify("$"), FocusClass::Shell);
        assert_eq!(classifier.classify("nil"), FocusClass::Overlay);
        assert_eq!(classifier.classify("nil2"), FocusClass::Application);
        assert_eq!(classifier.classify("firefox"), FocusClass::Application);
        assert_eq!(classifier.classify(""), FocusClass::Application);
    }

    #[test]
    fn custom_naming() {
        let classifier = Classifier::new(NamingConfig {
            shell_prefix: String::from("wf-"),
            overlay_app_id: String::from("menu"),
        });
        assert_eq!(classifier.classify("wf-panel"), FocusClass::Shell);
        assert_eq!(classifier.classify("menu"), FocusClass::Overlay);
        assert_eq!(classifier.classify("$panel"), FocusClass::Application);
    }

    #[test]
    fn duplicate_focus_is_ignored() {
        let mut tracker = FocusTracker::default();
        assert!(focus(&mut tracker, 10, "firefox"));
        assert!(focus(&mut tracker, 99, "$panel"));
        let snapshot = tracker.clone();
        assert!(!focus(&mut tracker, 99, "$panel"));
        assert_eq!(tracker, snapshot);
    }

    #[test]
    fn application_after_shell_becomes_target() {
        let mut tracker = FocusTracker::default();
        focus(&mut tracker, 10, "firefox");
        assert_eq!(tracker.last_application, None);

        focus(&mut tracker, 99, "$panel");
        assert_eq!(tracker.shell, Some(ViewId(99)));
        // 10 was focused from nothing, so there is no trail to seed from
        assert_eq!(tracker.last_application, None);

        focus(&mut tracker, 10, "firefox");
        assert_eq!(tracker.filtered_previous, Some(ViewId(99)));
        assert_eq!(tracker.last_application, Some(ViewId(10)));
        assert_eq!(tracker.previous, Some(ViewId(10)));
    }

    #[test]
    fn first_shell_sighting_seeds_target() {
        let mut tracker = FocusTracker::default();
        focus(&mut tracker, 5, "term");
        focus(&mut tracker, 10, "firefox");
        focus(&mut tracker, 99, "$panel");
        // the trail lags one application behind the focus
        assert_eq!(tracker.last_application, Some(ViewId(5)));
    }

    #[test]
    fn seeding_is_one_shot() {
        let mut tracker = FocusTracker::default();
        focus(&mut tracker, 10, "firefox");
        focus(&mut tracker, 99, "$panel");
        assert_eq!(tracker.last_application, None);

        // refocusing the shell after overlays does not seed again
        focus(&mut tracker, 50, "nil");
        focus(&mut tracker, 99, "$panel");
        focus(&mut tracker, 51, "nil");
        focus(&mut tracker, 99, "$panel");
        assert_eq!(tracker.last_application, None);
        assert_eq!(tracker.shell, Some(ViewId(99)));
    }

    #[test]
    fn shell_and_overlay_never_become_target() {
        let mut tracker = FocusTracker::default();
        focus(&mut tracker, 99, "$panel");
        focus(&mut tracker, 10, "firefox");
        assert_eq!(tracker.last_application, Some(ViewId(10)));

        focus(&mut tracker, 98, "$launcher");
        focus(&mut tracker, 50, "nil");
        assert_eq!(tracker.last_application, Some(ViewId(10)));
        // only the first shell view is remembered
        assert_eq!(tracker.shell, Some(ViewId(99)));
    }

    #[test]
    fn overlays_are_skipped_by_the_trail() {
        let mut tracker = FocusTracker::default();
        focus(&mut tracker, 10, "firefox");
        focus(&mut tracker, 11, "term");
        assert_eq!(tracker.filtered_previous, Some(ViewId(10)));

        focus(&mut tracker, 50, "nil");
        assert_eq!(tracker.filtered_previous, Some(ViewId(10)));
        assert_eq!(tracker.previous, Some(ViewId(50)));
    }

    #[test]
    fn reset_forgets_shell() {
        let mut tracker = FocusTracker::default();
        focus(&mut tracker, 99, "$panel");
        focus(&mut tracker, 10, "firefox");
        tracker.reset_remote();
        assert_eq!(tracker.shell, None);
        assert_eq!(tracker.last_application, None);
        assert_eq!(tracker.previous, Some(ViewId(10)));

        focus(&mut tracker, 98, "$launcher");
        assert_eq!(tracker.shell, Some(ViewId(98)));
        // trail is the view focused before 10
        assert_eq!(tracker.last_application, Some(ViewId(99)));
    }
}
