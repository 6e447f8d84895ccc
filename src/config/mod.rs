// SPDX-License-Identifier: GPL-3.0-only

use kbdd_config::KbddConfig;
use std::{
    fs::OpenOptions,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug)]
pub struct Config {
    /// File the configuration was read from, if any.
    pub path: Option<PathBuf>,
    pub kbdd: KbddConfig,
}

impl Config {
    /// Load from `explicit`, or from the first existing default location.
    ///
    /// Falls back to the defaults if no file is found or it cannot be read.
    pub fn load(explicit: Option<&Path>) -> Config {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::locations().into_iter().find(|path| {
                debug!("Trying config location: {}", path.display());
                path.exists()
            }),
        };

        let Some(path) = path else {
            info!("No config found, using defaults");
            return Config {
                path: None,
                kbdd: KbddConfig::default(),
            };
        };

        info!("Using config at {}", path.display());
        let kbdd = Self::read(&path).unwrap_or_else(|err| {
            warn!(?err, "Failed to read config, using defaults");
            KbddConfig::default()
        });
        Config {
            path: Some(path),
            kbdd,
        }
    }

    pub fn locations() -> Vec<PathBuf> {
        let mut locations = match xdg::BaseDirectories::new() {
            Ok(base) => vec![
                base.get_config_file("kbdd.ron"),
                base.get_config_file("kbdd/config.ron"),
            ],
            Err(err) => {
                warn!(?err, "Failed to find XDG base directories");
                Vec::with_capacity(1)
            }
        };
        locations.push(PathBuf::from("/etc/kbdd/config.ron"));
        locations
    }

    pub fn read(path: &Path) -> Result<KbddConfig, ConfigError> {
        let file = OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        ron::de::from_reader(file).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Re-read the file the configuration came from.
    ///
    /// On error the current values are kept.
    pub fn reload(&mut self) -> Result<&KbddConfig, ConfigError> {
        if let Some(path) = self.path.as_ref() {
            self.kbdd = Self::read(path)?;
        }
        Ok(&self.kbdd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Write};
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_file() {
        let file = config_file(
            r#"(xkb: (layout: "us,gr"), notify_command: "true", naming: (shell_prefix: "wf-"))"#,
        );
        let config = Config::load(Some(file.path()));

        assert_eq!(config.path.as_deref(), Some(file.path()));
        assert_eq!(config.kbdd.xkb.layout, "us,gr");
        assert_eq!(config.kbdd.notify_command, "true");
        assert_eq!(config.kbdd.naming.shell_prefix, "wf-");
        assert_eq!(config.kbdd.naming.overlay_app_id, "nil");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let file = config_file("(xkb: ");
        assert!(matches!(Config::read(file.path()), Err(ConfigError::Parse { .. })));
        let config = Config::load(Some(file.path()));
        assert_eq!(config.kbdd, KbddConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kbdd.ron");
        assert!(matches!(Config::read(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn failed_reload_keeps_values() {
        let file = config_file(r#"(xkb: (layout: "de"))"#);
        let mut config = Config::load(Some(file.path()));

        fs::write(file.path(), "not ron at all (").unwrap();
        assert!(config.reload().is_err());
        assert_eq!(config.kbdd.xkb.layout, "de");

        fs::write(file.path(), r#"(xkb: (layout: "fr"))"#).unwrap();
        let layout = config.reload().map(|kbdd| kbdd.xkb.layout.clone());
        assert_eq!(layout.ok().as_deref(), Some("fr"));
    }

    #[test]
    fn system_location_is_last() {
        let locations = Config::locations();
        assert_eq!(
            locations.last(),
            Some(&PathBuf::from("/etc/kbdd/config.ron"))
        );
    }
}
