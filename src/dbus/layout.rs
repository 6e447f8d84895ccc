// SPDX-License-Identifier: GPL-3.0-only

use futures_executor::ThreadPool;
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};
use zbus::object_server::SignalEmitter;

use super::{NAME, PATH};
use crate::{panel::PanelNotifier, remote::RemoteSwitch};

struct LayoutSwitcher {
    target: Arc<Mutex<dyn RemoteSwitch>>,
}

#[zbus::interface(name = "org.wayfire.kbdd.layout")]
impl LayoutSwitcher {
    /// Called by the shell to start (non-zero `status`) or stop honoring
    /// `switch` calls.
    #[zbus(name = "enable")]
    async fn enable(&self, status: u32) {
        debug!(status, "enable called");
        self.target.lock().enable(status != 0);
    }

    /// Switch the last focused application to `layout`, given as the
    /// upper-case short name (`US`, `GR`, ...). Returns whether the layout
    /// was accepted.
    #[zbus(name = "switch")]
    async fn switch(&self, layout: &str) -> bool {
        debug!(layout, "switch called");
        self.target.lock().switch(layout)
    }

    #[zbus(signal, name = "changed")]
    async fn changed(ctx: SignalEmitter<'_>, layout: String) -> zbus::Result<()>;
}

pub(super) async fn serve(target: Arc<Mutex<dyn RemoteSwitch>>) -> zbus::Result<zbus::Connection> {
    let conn = zbus::Connection::session().await?;
    conn.object_server()
        .at(PATH, LayoutSwitcher { target })
        .await?;
    conn.request_name(NAME).await?;
    Ok(conn)
}

/// Announces layouts through the `changed` signal.
#[derive(Debug, Clone)]
pub struct SignalPanel {
    executor: ThreadPool,
    conn: Arc<OnceLock<zbus::Connection>>,
}

impl SignalPanel {
    pub(super) fn new(executor: &ThreadPool, conn: Arc<OnceLock<zbus::Connection>>) -> Self {
        SignalPanel {
            executor: executor.clone(),
            conn,
        }
    }
}

impl PanelNotifier for SignalPanel {
    fn notify(&mut self, token: &str) {
        let Some(conn) = self.conn.get() else {
            return;
        };
        let ctx = match SignalEmitter::new(conn, PATH) {
            Ok(ctx) => ctx.into_owned(),
            Err(err) => {
                warn!(?err, "Invalid object path for layout signal");
                return;
            }
        };
        let future = LayoutSwitcher::changed(ctx, token.to_string());
        self.executor.spawn_ok(async move {
            if let Err(err) = future.await {
                warn!(?err, "Failed to emit layout change");
            }
        });
    }
}
