// SPDX-License-Identifier: GPL-3.0-only

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::utils::env::bool_var;

/// Log to stderr and, when available, to the journal.
///
/// `RUST_LOG` overrides the default filter. Setting `KBDD_NO_JOURNALD`
/// keeps logs out of the journal.
pub fn init_logger() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if cfg!(debug_assertions) {
            "debug"
        } else {
            "info"
        };
        // zbus is very chatty
        EnvFilter::new(format!("{level},zbus=warn"))
    });

    let journald = if bool_var("KBDD_NO_JOURNALD").unwrap_or(false) {
        None
    } else {
        tracing_journald::layer().ok()
    };
    let has_journald = journald.is_some();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(journald)
        .try_init()?;
    log_panics::init();

    info!("Version: {}", std::env!("CARGO_PKG_VERSION"));
    if !has_journald {
        debug!("Not logging to the journal");
    }
    Ok(())
}
