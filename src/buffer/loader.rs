use std::{fs, path::Path};

use tracing::debug;

use super::LineArena;
use crate::error::{Error, Result};

const BINARY_PROBE_LEN: usize = 100;

pub trait BufferLoader {
	fn load(&self, path: &Path) -> Result<LineArena>;
}

/// Loads text files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl BufferLoader for FileLoader {
	fn load(&self, path: &Path) -> Result<LineArena> {
		let bytes = fs::read(path).map_err(|err| Error::OpenFile { path: path.to_path_buf(), reason: err.to_string() })?;
		if bytes.iter().take(BINARY_PROBE_LEN).any(|byte| *byte == 0) {
			return Err(Error::OpenFile { path: path.to_path_buf(), reason: "unsupported file type: binary".to_string() });
		}
		let arena = LineArena::from_text(&String::from_utf8_lossy(&bytes));
		debug!("loaded {} lines from {}", arena.len(), path.display());
		Ok(arena)
	}
}
