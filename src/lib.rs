// SPDX-License-Identifier: GPL-3.0-only

//! Remembers the keyboard layout of every view and restores it on focus,
//! with a D-Bus surface that lets a panel switch the layout of the last
//! focused application.

pub mod config;
pub mod dbus;
pub mod feed;
pub mod focus;
pub mod input;
pub mod layout;
pub mod logger;
pub mod panel;
pub mod remote;
pub mod session;
pub mod state;
pub mod utils;
pub mod views;

pub use self::{
    focus::{Classifier, FocusClass, FocusedView},
    input::Keyboard,
    layout::LayoutTable,
    panel::PanelNotifier,
    remote::RemoteSwitch,
    session::Session,
    state::Kbdd,
    views::ViewId,
};
