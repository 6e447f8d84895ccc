// SPDX-License-Identifier: GPL-3.0-only

use tracing::{debug, trace};

use crate::{
    focus::{Classifier, FocusTracker, FocusedView},
    input::Keyboard,
    layout::LayoutTable,
    panel::{PanelNotifier, FEATURE_DISABLED},
    views::ViewLayouts,
};

/// Per-view keyboard layout bookkeeping.
///
/// Every entry point is one complete event: callers that feed events from
/// several threads must serialize them, e.g. by keeping the `Kbdd` behind a
/// single mutex.
#[derive(Debug)]
pub struct Kbdd<P> {
    pub(crate) layouts: LayoutTable,
    pub(crate) views: ViewLayouts,
    pub(crate) classifier: Classifier,
    pub(crate) focus: FocusTracker,
    /// Layout last applied or announced.
    pub(crate) last_layout: Option<u32>,
    pub(crate) remote_enabled: bool,
    pub(crate) panel: P,
}

impl<P: PanelNotifier> Kbdd<P> {
    pub fn new(layouts: LayoutTable, classifier: Classifier, panel: P) -> Self {
        Kbdd {
            layouts,
            views: ViewLayouts::default(),
            classifier,
            focus: FocusTracker::default(),
            last_layout: None,
            remote_enabled: false,
            panel,
        }
    }

    pub fn layouts(&self) -> &LayoutTable {
        &self.layouts
    }

    pub fn views(&self) -> &ViewLayouts {
        &self.views
    }

    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    pub fn last_layout(&self) -> Option<u32> {
        self.last_layout
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote_enabled
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Swap in a freshly built layout table and announce the current layout.
    pub fn set_layouts(&mut self, layouts: LayoutTable, keyboard: Option<&dyn Keyboard>) {
        debug!(%layouts, "Layout table replaced");
        self.layouts = layouts;
        self.last_layout = keyboard.map(|keyboard| keyboard.locked_layout());
        if let Some(layout) = self.last_layout {
            self.notify_layout(layout);
        }
    }

    /// Keyboard focus moved to `view`.
    pub fn focus_changed(&mut self, keyboard: Option<&mut dyn Keyboard>, view: Option<&FocusedView>) {
        // id 0 is the compositor's "no view"
        let Some(view) = view.filter(|view| view.id.is_valid()) else {
            return;
        };
        let Some(keyboard) = keyboard else {
            trace!(view = %view.id, "No keyboard, ignoring focus change");
            return;
        };
        if self.focus.is_duplicate(view.id) {
            return;
        }

        if let Some(previous) = self.focus.previous.filter(|id| id.is_valid()) {
            let layout = keyboard.locked_layout();
            trace!(view = %previous, layout, "Saving layout");
            self.views.set(previous, layout);
        }

        let class = self.classifier.classify(&view.app_id);
        self.focus.update(view.id, class);

        let layout = self.views.get(view.id);
        debug!(view = %view.id, app_id = %view.app_id, ?class, layout, "Restoring layout");
        self.announce_change(layout);
        // modifier state has to be pushed on every focus change
        keyboard.lock_layout(layout);
    }

    /// A key was pressed, the layout may have been switched by a hotkey.
    pub fn key_pressed(&mut self, keyboard: Option<&dyn Keyboard>) {
        if let Some(keyboard) = keyboard {
            self.announce_change(keyboard.locked_layout());
        }
    }

    /// Announce the current layout again, whether it changed or not.
    pub fn announce(&mut self, keyboard: Option<&dyn Keyboard>) {
        if let Some(keyboard) = keyboard {
            let layout = keyboard.locked_layout();
            self.last_layout = Some(layout);
            self.notify_layout(layout);
        }
    }

    /// Tell the panel that layouts are no longer tracked.
    pub fn shutdown(&mut self) {
        debug!("Layout tracking shut down");
        self.remote_enabled = false;
        self.panel.notify(FEATURE_DISABLED);
    }

    pub(crate) fn announce_change(&mut self, layout: u32) {
        if self.last_layout != Some(layout) {
            self.notify_layout(layout);
            self.last_layout = Some(layout);
        }
    }

    pub(crate) fn notify_layout(&mut self, layout: u32) {
        let name = self.layouts.name_of(layout.into());
        self.panel.notify(name);
    }
}
