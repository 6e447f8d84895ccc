// SPDX-License-Identifier: GPL-3.0-only

//! Line based event feed.
//!
//! A compositor bridge reports focus and key events as one line each:
//!
//! ```text
//! focus 10 firefox
//! focus 99 $unfocus panel
//! unfocus
//! key
//! lock 1
//! reload
//! enable 1
//! switch GR
//! ```

use std::{num::ParseIntError, str::FromStr};
use thiserror::Error;

use crate::focus::FocusedView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    /// Keyboard focus moved to a view. The naming hint is the rest of the line.
    Focus(FocusedView),
    /// Focus event without a view.
    Unfocus,
    /// A key was pressed.
    Key,
    /// The device locked another layout on its own, e.g. through a hotkey.
    Lock(u32),
    /// Configuration changed.
    Reload,
    Enable(bool),
    Switch(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("Empty event")]
    Empty,
    #[error("Unknown event {0:?}")]
    Unknown(String),
    #[error("Event {0} is missing an argument")]
    MissingArgument(&'static str),
    #[error("Invalid number {value:?}")]
    InvalidNumber {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

fn number<T: FromStr<Err = ParseIntError>>(value: &str) -> Result<T, FeedError> {
    value.parse().map_err(|source| FeedError::InvalidNumber {
        value: value.to_string(),
        source,
    })
}

impl FromStr for FeedEvent {
    type Err = FeedError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (event, args) = match line.split_once(char::is_whitespace) {
            Some((event, args)) => (event, args.trim()),
            None => (line, ""),
        };

        match event {
            "" => Err(FeedError::Empty),
            "focus" => {
                let (id, app_id) = match args.split_once(char::is_whitespace) {
                    Some((id, app_id)) => (id, app_id.trim()),
                    None => (args, ""),
                };
                if id.is_empty() {
                    return Err(FeedError::MissingArgument("focus"));
                }
                Ok(FeedEvent::Focus(FocusedView::new(number::<u32>(id)?, app_id)))
            }
            "unfocus" => Ok(FeedEvent::Unfocus),
            "key" => Ok(FeedEvent::Key),
            "lock" if args.is_empty() => Err(FeedError::MissingArgument("lock")),
            "lock" => Ok(FeedEvent::Lock(number(args)?)),
            "reload" => Ok(FeedEvent::Reload),
            "enable" if args.is_empty() => Err(FeedError::MissingArgument("enable")),
            "enable" => Ok(FeedEvent::Enable(number::<u32>(args)? != 0)),
            "switch" if args.is_empty() => Err(FeedError::MissingArgument("switch")),
            "switch" => Ok(FeedEvent::Switch(args.to_string())),
            other => Err(FeedError::Unknown(other.to_string())),
        }
    }
}
