// SPDX-License-Identifier: GPL-3.0-only

pub mod xkb;

/// The keyboard whose locked layout follows the focused view.
pub trait Keyboard {
    /// Locked layout index of the device.
    fn locked_layout(&self) -> u32;

    /// Lock `layout` on the device. Depressed, latched and locked modifiers
    /// are left as they are.
    fn lock_layout(&mut self, layout: u32);
}

impl<K: Keyboard + ?Sized> Keyboard for Box<K> {
    fn locked_layout(&self) -> u32 {
        (**self).locked_layout()
    }

    fn lock_layout(&mut self, layout: u32) {
        (**self).lock_layout(layout)
    }
}
