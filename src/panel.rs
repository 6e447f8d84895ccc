// SPDX-License-Identifier: GPL-3.0-only

use tracing::{debug, warn};

use crate::utils::spawn::Children;

/// Announced after remote switching was turned off.
pub const NO_LAYOUTS: &str = "-";
/// Announced when kbdd stops tracking layouts altogether.
pub const FEATURE_DISABLED: &str = "off";

/// Receiver of layout announcements, usually a panel widget.
///
/// Announcements are fire-and-forget, a sink has to deal with its own failures.
pub trait PanelNotifier {
    fn notify(&mut self, token: &str);
}

impl PanelNotifier for Vec<Box<dyn PanelNotifier + Send>> {
    fn notify(&mut self, token: &str) {
        for panel in self.iter_mut() {
            panel.notify(token);
        }
    }
}

/// Announces layouts by running a command with the token as last argument,
/// e.g. `wfpanelctl kbdlayout US`.
#[derive(Debug)]
pub struct CommandPanel {
    command: String,
    children: Children,
}

impl CommandPanel {
    pub fn new(command: impl Into<String>) -> Self {
        CommandPanel {
            command: command.into(),
            children: Children::default(),
        }
    }
}

impl PanelNotifier for CommandPanel {
    fn notify(&mut self, token: &str) {
        if self.command.is_empty() {
            return;
        }
        debug!(command = %self.command, token, "Notifying panel");
        if let Err(err) = self.children.spawn(&self.command, &[token]) {
            warn!(?err, command = %self.command, "Failed to run panel command");
        }
    }
}
