//! Process and file management.

use std::path::PathBuf;

use super::Command;
use crate::{controller::Controller, error::Result};

pub struct Exit;

impl Command<Controller> for Exit {
	fn name(&self) -> &'static str { "Exit" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		host.exit();
		Ok(())
	}

	fn is_undoable(&self) -> bool { false }
}

pub struct OpenFile {
	pub path: PathBuf,
}

impl OpenFile {
	pub fn new(text: &str) -> Self { Self { path: PathBuf::from(text.trim()) } }
}

impl Command<Controller> for OpenFile {
	fn name(&self) -> &'static str { "OpenFile" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> { host.open_buffer(&self.path) }

	fn is_undoable(&self) -> bool { false }
}

/// The active file went away: drop its buffer and engines.
pub struct FileClosed;

impl Command<Controller> for FileClosed {
	fn name(&self) -> &'static str { "FileClosed" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		host.close_active_buffer();
		Ok(())
	}

	fn is_undoable(&self) -> bool { false }
}
