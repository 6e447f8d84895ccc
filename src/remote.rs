// SPDX-License-Identifier: GPL-3.0-only

//! Remote layout switching.
//!
//! A panel widget cannot tell which view it is switching the layout for:
//! by the time it gets clicked, the panel itself holds the focus. The
//! remote switch therefore targets the last application view that was
//! focused after the shell made its first appearance.

use tracing::{debug, info};

use crate::{
    input::Keyboard,
    panel::{PanelNotifier, NO_LAYOUTS},
    state::Kbdd,
    views::ViewId,
};

/// The control surface exposed to the transport.
pub trait RemoteSwitch: Send {
    fn enable(&mut self, enabled: bool);
    fn switch(&mut self, layout: &str) -> bool;
}

/// Reasons a switch request gets turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Disabled,
    UnknownLayout,
    NoShell,
    NoTarget,
}

impl<P: PanelNotifier> Kbdd<P> {
    pub fn enable(&mut self, enabled: bool) {
        info!(enabled, "Remote layout switching toggled");
        self.remote_enabled = enabled;
        if enabled {
            let layouts = self.layouts.to_string();
            self.panel.notify(&layouts);
        } else {
            self.panel.notify(NO_LAYOUTS);
            self.focus.reset_remote();
        }
    }

    /// Switch the last application view to `layout`.
    ///
    /// Applies right away when that view has the focus, otherwise the layout
    /// is stored and takes effect when the view gets focused again.
    pub fn switch(&mut self, keyboard: Option<&mut dyn Keyboard>, layout: &str) -> bool {
        let (index, target) = match self.switch_target(layout) {
            Ok(accepted) => accepted,
            Err(rejection) => {
                debug!(layout, ?rejection, "Layout switch rejected");
                return false;
            }
        };

        match keyboard {
            Some(keyboard) if self.focus.previous == Some(target) => {
                debug!(layout, view = %target, "Switching focused view");
                keyboard.lock_layout(index);
                self.last_layout = Some(index);
                self.notify_layout(index);
            }
            _ => {
                debug!(layout, view = %target, "Switching view on next focus");
                self.views.set(target, index);
            }
        }
        true
    }

    pub fn switch_target(&self, layout: &str) -> Result<(u32, ViewId), Rejection> {
        if !self.remote_enabled {
            return Err(Rejection::Disabled);
        }
        let index = self
            .layouts
            .index_of(layout)
            .ok_or(Rejection::UnknownLayout)?;
        if self.focus.shell.is_none() {
            return Err(Rejection::NoShell);
        }
        let target = self.focus.last_application.ok_or(Rejection::NoTarget)?;
        Ok((index, target))
    }
}
