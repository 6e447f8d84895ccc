// SPDX-License-Identifier: GPL-3.0-only

use tracing::warn;

use crate::{
    focus::FocusedView,
    input::Keyboard,
    layout::LayoutTable,
    panel::PanelNotifier,
    remote::RemoteSwitch,
    state::Kbdd,
};

/// Layout tracking for one seat: the bookkeeping together with the keyboard
/// it drives. All events of the seat go through here.
#[derive(Debug)]
pub struct Session<K, P> {
    pub kbdd: Kbdd<P>,
    keyboard: Option<K>,
}

impl<K: Keyboard, P: PanelNotifier> Session<K, P> {
    pub fn new(kbdd: Kbdd<P>, keyboard: Option<K>) -> Self {
        Session { kbdd, keyboard }
    }

    pub fn keyboard(&self) -> Option<&K> {
        self.keyboard.as_ref()
    }

    pub fn keyboard_mut(&mut self) -> Option<&mut K> {
        self.keyboard.as_mut()
    }

    /// Replace the keyboard, e.g. after its keymap was recompiled.
    pub fn set_keyboard(&mut self, keyboard: Option<K>) {
        if keyboard.is_none() {
            warn!("No keyboard available, layouts will not be tracked");
        }
        self.keyboard = keyboard;
    }

    pub fn focus_changed(&mut self, view: Option<&FocusedView>) {
        let keyboard = self.keyboard.as_mut().map(|k| k as &mut dyn Keyboard);
        self.kbdd.focus_changed(keyboard, view);
    }

    pub fn key_pressed(&mut self) {
        let keyboard = self.keyboard.as_ref().map(|k| k as &dyn Keyboard);
        self.kbdd.key_pressed(keyboard);
    }

    pub fn set_layouts(&mut self, layouts: LayoutTable) {
        let keyboard = self.keyboard.as_ref().map(|k| k as &dyn Keyboard);
        self.kbdd.set_layouts(layouts, keyboard);
    }

    pub fn announce(&mut self) {
        let keyboard = self.keyboard.as_ref().map(|k| k as &dyn Keyboard);
        self.kbdd.announce(keyboard);
    }

    pub fn shutdown(&mut self) {
        self.kbdd.shutdown();
    }
}

impl<K, P> RemoteSwitch for Session<K, P>
where
    K: Keyboard + Send,
    P: PanelNotifier + Send,
{
    fn enable(&mut self, enabled: bool) {
        self.kbdd.enable(enabled);
    }

    fn switch(&mut self, layout: &str) -> bool {
        let keyboard = self.keyboard.as_mut().map(|k| k as &mut dyn Keyboard);
        self.kbdd.switch(keyboard, layout)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use parking_lot::Mutex;

    use super::*;
    use crate::{
        focus::Classifier,
        state::tests::TestKeyboard,
        views::ViewId,
    };

    fn session() -> Session<TestKeyboard, Vec<String>> {
        let kbdd = Kbdd::new(LayoutTable::build("us,gr"), Classifier::default(), Vec::new());
        Session::new(kbdd, Some(TestKeyboard::default()))
    }

    #[test]
    fn remote_calls_reach_the_keyboard() {
        let shared: Arc<Mutex<Session<TestKeyboard, Vec<String>>>> = Arc::new(Mutex::new(session()));
        let remote: Arc<Mutex<dyn RemoteSwitch>> = shared.clone();

        {
            let mut session = shared.lock();
            session.focus_changed(Some(&FocusedView::new(10, "firefox")));
            session.focus_changed(Some(&FocusedView::new(99, "$panel")));
        }
        remote.lock().enable(true);
        shared
            .lock()
            .focus_changed(Some(&FocusedView::new(10, "firefox")));

        assert!(remote.lock().switch("GR"));
        assert!(!remote.lock().switch("XX"));

        let session = shared.lock();
        assert_eq!(session.keyboard().map(|k| k.locked), Some(1));
        assert_eq!(session.kbdd.focus().last_application, Some(ViewId(10)));
    }

    #[test]
    fn remote_calls_interleave_with_focus_events() {
        let shared: Arc<Mutex<Session<TestKeyboard, Vec<String>>>> = Arc::new(Mutex::new(session()));
        {
            let mut session = shared.lock();
            session.focus_changed(Some(&FocusedView::new(10, "firefox")));
            session.focus_changed(Some(&FocusedView::new(99, "$panel")));
            session.focus_changed(Some(&FocusedView::new(10, "firefox")));
            session.enable(true);
        }

        let remote: Arc<Mutex<dyn RemoteSwitch>> = shared.clone();
        let worker = thread::spawn(move || {
            (0..200)
                .filter(|i| remote.lock().switch(if i % 2 == 0 { "GR" } else { "US" }))
                .count()
        });
        for _ in 0..200 {
            shared
                .lock()
                .focus_changed(Some(&FocusedView::new(99, "$panel")));
            shared
                .lock()
                .focus_changed(Some(&FocusedView::new(10, "firefox")));
        }
        assert_eq!(worker.join().unwrap(), 200);

        // the last switch asked for US, whether it was applied or stored
        let mut session = shared.lock();
        session.focus_changed(Some(&FocusedView::new(99, "$panel")));
        session.focus_changed(Some(&FocusedView::new(10, "firefox")));
        assert_eq!(session.keyboard().map(|k| k.locked), Some(0));
        assert_eq!(session.kbdd.views().get(ViewId(10)), 0);
        assert_eq!(session.kbdd.focus().last_application, Some(ViewId(10)));
    }

    #[test]
    fn without_keyboard_nothing_is_tracked() {
        let mut session = session();
        session.set_keyboard(None);
        session.focus_changed(Some(&FocusedView::new(10, "firefox")));
        session.key_pressed();
        session.announce();
        assert_eq!(session.kbdd.focus().previous, None);
        assert!(session.kbdd.panel().is_empty());
    }

    #[test]
    fn hotkey_then_focus_round_trip() {
        let mut session = session();
        session.focus_changed(Some(&FocusedView::new(1, "firefox")));
        if let Some(keyboard) = session.keyboard_mut() {
            keyboard.locked = 1;
        }
        session.key_pressed();
        session.focus_changed(Some(&FocusedView::new(2, "term")));
        session.focus_changed(Some(&FocusedView::new(1, "firefox")));

        let keyboard = session.keyboard().unwrap();
        assert_eq!(keyboard.applied, vec![0, 0, 1]);
        assert_eq!(
            session.kbdd.panel(),
            &vec!["US".to_string(), "GR".to_string(), "US".to_string(), "GR".to_string()]
        );
    }
}
