// SPDX-License-Identifier: GPL-3.0-only

use futures_executor::ThreadPool;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use tracing::{error, info};

use crate::remote::RemoteSwitch;

mod layout;
pub use self::layout::SignalPanel;

pub const NAME: &str = "org.wayfire.kbdd.layout";
pub const PATH: &str = "/org/wayfire/kbdd/layout";

/// The session bus side of remote layout switching.
///
/// The connection is established in the background, announcements made
/// before it is up are dropped.
#[derive(Debug, Clone)]
pub struct DbusState {
    executor: ThreadPool,
    conn: Arc<OnceLock<zbus::Connection>>,
}

impl DbusState {
    pub fn new(executor: &ThreadPool) -> Self {
        DbusState {
            executor: executor.clone(),
            conn: Arc::new(OnceLock::new()),
        }
    }

    /// Emits the `changed` signal for every announced layout.
    pub fn signal_panel(&self) -> SignalPanel {
        SignalPanel::new(&self.executor, self.conn.clone())
    }

    /// Start serving `enable` and `switch` calls for `target`.
    pub fn serve(&self, target: Arc<Mutex<dyn RemoteSwitch>>) {
        let conn_cell = self.conn.clone();
        self.executor.spawn_ok(async move {
            match layout::serve(target).await {
                Ok(conn) => {
                    info!("Serving {} on the session bus", NAME);
                    if conn_cell.set(conn).is_err() {
                        error!("D-Bus connection was already set up");
                    }
                }
                Err(err) => {
                    error!(?err, "Failed to serve `{}`", NAME);
                }
            }
        });
    }
}
