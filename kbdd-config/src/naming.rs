// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

/// Naming hint conventions used to tell shell surfaces and transient
/// overlays apart from application views.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Views whose app id starts with this prefix belong to the shell.
    pub shell_prefix: String,
    /// Views whose app id is exactly this marker are transient overlays.
    pub overlay_app_id: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            shell_prefix: String::from("$"),
            overlay_app_id: String::from("nil"),
        }
    }
}
