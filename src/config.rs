use std::{
	fs, io,
	path::{Path, PathBuf},
	time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{buffer::Combine, paths::default_config_file};

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("read config file {} failed", path.display())]
	Read {
		path:   PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("parse config file {} failed", path.display())]
	Parse {
		path:   PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Prompt length from which a filter entry is applied while typing.
	pub filter_min_len:   usize,
	pub combine:          Combine,
	pub show_attributes:  bool,
	pub log_filter:       String,
	pub poll_interval_ms: u64,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			filter_min_len:   2,
			combine:          Combine::And,
			show_attributes:  true,
			log_filter:       "info".to_string(),
			poll_interval_ms: 100,
		}
	}
}

impl Config {
	/// Load `explicit` when given (it must exist), else the default config
	/// file when present, else the defaults.
	pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
		match explicit {
			Some(path) => Self::read(path),
			None => {
				let path = default_config_file();
				match Self::read(&path) {
					Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
						debug!("no config file at {}, using defaults", path.display());
						Ok(Self::default())
					}
					other => other,
				}
			}
		}
	}

	pub fn read(path: &Path) -> Result<Self, ConfigError> {
		let text = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
		toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
	}

	pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll_interval_ms.max(1)) }
}
