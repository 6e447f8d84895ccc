// SPDX-License-Identifier: GPL-3.0-only

use std::{
    io,
    process::{Child, Command, Stdio},
};
use tracing::{trace, warn};

/// Commands started in the background and not yet waited for.
///
/// Finished children are reaped whenever a new one is spawned, so the owner
/// holds at most the ones still running plus those that exited since.
#[derive(Debug, Default)]
pub struct Children {
    running: Vec<Child>,
}

impl Children {
    /// Run `command` through `sh -c` with `args` appended as positional
    /// parameters. Does not wait for it.
    pub fn spawn(&mut self, command: &str, args: &[&str]) -> io::Result<()> {
        self.reap();
        let child = Command::new("sh")
            .arg("-c")
            .arg(format!("{command} \"$@\""))
            .arg("sh")
            .args(args)
            .stdin(Stdio::null())
            .spawn()?;
        self.running.push(child);
        Ok(())
    }

    pub fn reap(&mut self) {
        self.running.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                trace!(pid = child.id(), %status, "Child exited");
                false
            }
            Ok(None) => true,
            Err(err) => {
                warn!(?err, pid = child.id(), "Failed to query child");
                false
            }
        });
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }
}
