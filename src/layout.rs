// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

/// Separator between layouts in an xkb layout string.
pub const LAYOUT_SEPARATOR: char = ',';
/// Displayed for layout indices the table does not know about.
pub const UNKNOWN_LAYOUT: &str = "--";

/// Short layout names in keymap group order.
///
/// Index `i` names the layout the keymap selects when its locked layout is `i`.
/// A table is never edited in place, it is rebuilt from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutTable {
    names: Vec<String>,
}

impl LayoutTable {
    pub fn build(layouts: &str) -> LayoutTable {
        let names = layouts
            .split(LAYOUT_SEPARATOR)
            .map(|name| name.trim().to_ascii_uppercase())
            .collect();
        LayoutTable { names }
    }

    pub fn name_of(&self, index: i64) -> &str {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.names.get(index))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LAYOUT)
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        if name.is_empty() {
            return None;
        }
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|idx| u32::try_from(idx).ok())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl fmt::Display for LayoutTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", LAYOUT_SEPARATOR)?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}
