// SPDX-License-Identifier: GPL-3.0-only

use kbdd_config::XkbConfig;
use thiserror::Error;
use tracing::{debug, warn};
use xkbcommon::xkb;

use super::Keyboard;
use crate::{layout::LayoutTable, utils::spawn::Children};

#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("libxkbcommon could not compile a keymap for layout {layout:?}")]
    Compile { layout: String },
}

/// Compile `config` into a keymap, which is how configuration gets validated.
pub fn compile_keymap(config: &XkbConfig) -> Result<xkb::Keymap, KeymapError> {
    let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
    xkb::Keymap::new_from_names(
        &context,
        &config.rules,
        &config.model,
        &config.layout,
        &config.variant,
        config.options.clone(),
        xkb::KEYMAP_COMPILE_NO_FLAGS,
    )
    .ok_or_else(|| KeymapError::Compile {
        layout: config.layout.clone(),
    })
}

/// Builds the layout table for a keymap compiled from `config`.
pub fn table_for_keymap(config: &XkbConfig, keymap: &xkb::Keymap) -> LayoutTable {
    let table = LayoutTable::build(&layout_names(config));
    if table.len() != keymap.num_layouts() as usize {
        warn!(
            layouts = %table,
            groups = keymap.num_layouts(),
            "Layout list does not match the compiled keymap"
        );
    }
    table
}

// libxkbcommon falls back to the environment and then to "us"
// for an empty layout string
fn layout_names(config: &XkbConfig) -> String {
    if !config.layout.is_empty() {
        return config.layout.clone();
    }
    std::env::var("XKB_DEFAULT_LAYOUT")
        .ok()
        .filter(|layout| !layout.is_empty())
        .unwrap_or_else(|| String::from("us"))
}

/// A keyboard backed by its own xkb state.
pub struct XkbKeyboard {
    keymap: xkb::Keymap,
    state: xkb::State,
    apply_command: Option<String>,
    children: Children,
}

impl std::fmt::Debug for XkbKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XkbKeyboard")
            .field("keymap", &self.keymap.get_raw_ptr())
            .field("state", &self.state.get_raw_ptr())
            .field("apply_command", &self.apply_command)
            .finish()
    }
}

// The xkb objects are owned exclusively by this struct and only ever
// touched through `&mut self`, callers share it behind a Mutex.
unsafe impl Send for XkbKeyboard {}

impl XkbKeyboard {
    pub fn from_keymap(keymap: xkb::Keymap) -> Self {
        let state = xkb::State::new(&keymap);
        XkbKeyboard {
            keymap,
            state,
            apply_command: None,
            children: Children::default(),
        }
    }

    /// Run `command` with the layout index every time a layout gets applied.
    pub fn with_apply_command(mut self, command: Option<String>) -> Self {
        self.apply_command = command.filter(|command| !command.is_empty());
        self
    }

    pub fn num_layouts(&self) -> u32 {
        self.keymap.num_layouts()
    }

    /// Mirror a layout change that already happened on the device.
    pub fn sync_locked_layout(&mut self, layout: u32) {
        let depressed = self.state.serialize_mods(xkb::STATE_MODS_DEPRESSED);
        let latched = self.state.serialize_mods(xkb::STATE_MODS_LATCHED);
        let locked = self.state.serialize_mods(xkb::STATE_MODS_LOCKED);
        self.state
            .update_mask(depressed, latched, locked, 0, 0, layout);
    }
}

impl Keyboard for XkbKeyboard {
    fn locked_layout(&self) -> u32 {
        self.state.serialize_layout(xkb::STATE_LAYOUT_LOCKED)
    }

    fn lock_layout(&mut self, layout: u32) {
        self.sync_locked_layout(layout);
        if let Some(command) = self.apply_command.as_deref() {
            debug!(command, layout, "Applying layout");
            if let Err(err) = self.children.spawn(command, &[&layout.to_string()]) {
                warn!(?err, command, "Failed to run apply command");
            }
        }
    }
}
