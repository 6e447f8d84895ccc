// SPDX-License-Identifier: GPL-3.0-only

use std::{collections::HashMap, fmt};

/// Stable identifier of a view, handed out by the compositor.
///
/// `0` is never a real view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u32);

impl ViewId {
    pub fn is_valid(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for ViewId {
    fn from(id: u32) -> Self {
        ViewId(id)
    }
}

/// Layout used for views that never had one saved.
pub const DEFAULT_LAYOUT: u32 = 0;

/// Last known layout index of every view that ever lost focus.
///
/// Entries of destroyed views are never looked up again and are kept.
#[derive(Debug, Default)]
pub struct ViewLayouts {
    layouts: HashMap<ViewId, u32>,
}

impl ViewLayouts {
    pub fn get(&self, view: ViewId) -> u32 {
        self.layouts.get(&view).copied().unwrap_or(DEFAULT_LAYOUT)
    }

    pub fn set(&mut self, view: ViewId, layout: u32) {
        if !view.is_valid() {
            return;
        }
        self.layouts.insert(view, layout);
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_view_gets_default() {
        let views = ViewLayouts::default();
        assert_eq!(views.get(ViewId(42)), DEFAULT_LAYOUT);
    }

    #[test]
    fn set_overwrites() {
        let mut views = ViewLayouts::default();
        views.set(ViewId(7), 1);
        views.set(ViewId(7), 2);
        views.set(ViewId(8), 1);
        assert_eq!(views.get(ViewId(7)), 2);
        assert_eq!(views.get(ViewId(8)), 1);
        assert_eq!(views.len(), 2);
    }

    #[test]
    fn sentinel_view_is_ignored() {
        let mut views = ViewLayouts::default();
        views.set(ViewId(0), 3);
        assert!(views.is_empty());
        assert_eq!(views.get(ViewId(0)), DEFAULT_LAYOUT);
    }
}
