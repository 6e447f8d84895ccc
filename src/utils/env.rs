// SPDX-License-Identifier: GPL-3.0-only

/// Reads a boolean switch from the environment, `None` if unset.
pub fn bool_var(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|value| parse_bool(&value))
}

fn parse_bool(value: &str) -> bool {
    ["1", "true", "yes", "y", "on"].contains(&value.trim().to_lowercase().as_str())
}
