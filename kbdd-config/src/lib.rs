// SPDX-License-Identifier: GPL-3.0-only

use serde::{Deserialize, Serialize};

pub mod naming;

pub use naming::NamingConfig;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct KbddConfig {
    pub xkb: XkbConfig,
    pub naming: NamingConfig,
    /// Command prefix used to announce a layout to the panel.
    /// The announced token is appended as the last argument.
    pub notify_command: String,
    /// Command run with the layout index after the layout was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_command: Option<String>,
    /// Period of the layout re-announcement in milliseconds, `0` disables it.
    pub announce_interval_ms: u64,
    pub dbus: bool,
}

impl Default for KbddConfig {
    fn default() -> KbddConfig {
        KbddConfig {
            xkb: XkbConfig::default(),
            naming: NamingConfig::default(),
            notify_command: String::from("wfpanelctl kbdlayout"),
            apply_command: None,
            announce_interval_ms: 4000,
            dbus: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct XkbConfig {
    pub rules: String,
    pub model: String,
    pub layout: String,
    pub variant: String,
    pub options: Option<String>,
}
