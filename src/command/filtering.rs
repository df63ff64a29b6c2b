//! Filter-set editing and the filtered/unfiltered display switch.

use tracing::debug;

use super::Command;
use crate::{buffer::Pattern, controller::Controller, error::Result};

/// Buffer line shown at the top row of the active buffer.
fn top_line(host: &Controller) -> usize {
	host.active_model().and_then(|model| model.displayed_line(model.first_line())).unwrap_or_default()
}

#[derive(Default)]
pub struct EnableFiltering {
	before: Option<(bool, usize)>,
}

impl Command<Controller> for EnableFiltering {
	fn name(&self) -> &'static str { "EnableFiltering" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		self.before = host.set_filtering(true, 0);
		Ok(())
	}

	fn unexecute(&mut self, host: &mut Controller) -> Result<()> {
		if let Some((filtering, first_line)) = self.before.take() {
			host.set_filtering(filtering, first_line);
		}
		Ok(())
	}
}

/// Back to the whole buffer, keeping the line shown at the top.
#[derive(Default)]
pub struct DisableFiltering {
	before: Option<(bool, usize)>,
}

impl Command<Controller> for DisableFiltering {
	fn name(&self) -> &'static str { "DisableFiltering" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		let line = top_line(host);
		self.before = host.set_filtering(false, line);
		Ok(())
	}

	fn unexecute(&mut self, host: &mut Controller) -> Result<()> {
		if let Some((filtering, first_line)) = self.before.take() {
			host.set_filtering(filtering, first_line);
		}
		Ok(())
	}
}

pub struct SwitchFilterType;

impl SwitchFilterType {
	fn toggle(host: &Controller) {
		host.update_filters(|set| {
			set.set_combine(set.combine().toggled());
			true
		});
	}
}

impl Command<Controller> for SwitchFilterType {
	fn name(&self) -> &'static str { "SwitchFilterType" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		Self::toggle(host);
		Ok(())
	}

	fn unexecute(&mut self, host: &mut Controller) -> Result<()> {
		Self::toggle(host);
		Ok(())
	}
}

/// Empties the filter set. The engine is rearmed even when it was empty.
pub struct ResetFiltering;

impl Command<Controller> for ResetFiltering {
	fn name(&self) -> &'static str { "ResetFiltering" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		host.update_filters(|set| {
			set.clear();
			true
		});
		Ok(())
	}

	fn is_undoable(&self) -> bool { false }
}

/// Live preview of the pattern being typed in the filter prompt.
pub struct UpdateCurrentFilterEntry {
	pub text: String,
}

impl Command<Controller> for UpdateCurrentFilterEntry {
	fn name(&self) -> &'static str { "UpdateCurrentFilterEntry" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		let long_enough = self.text.chars().count() >= host.config().filter_min_len;
		let pattern = if long_enough {
			match Pattern::new(&self.text) {
				Ok(pattern) => Some(pattern),
				Err(err) => {
					debug!("{err}");
					return Ok(());
				}
			}
		} else {
			None
		};
		host.update_filters(|set| match (set.is_dynamic(), pattern) {
			(false, Some(pattern)) => {
				set.push(pattern);
				set.set_dynamic(true);
				true
			}
			(true, Some(pattern)) => {
				if set.last() == Some(&pattern) {
					return false;
				}
				set.replace_last(pattern);
				true
			}
			(true, None) => {
				set.pop();
				set.set_dynamic(false);
				true
			}
			(false, None) => false,
		});
		Ok(())
	}

	fn is_undoable(&self) -> bool { false }
}

/// Drops the previewed entry, if any.
pub struct CancelCurrentFilterEntry;

impl Command<Controller> for CancelCurrentFilterEntry {
	fn name(&self) -> &'static str { "CancelCurrentFilterEntry" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		host.update_filters(|set| {
			if !set.is_dynamic() {
				return false;
			}
			set.pop();
			set.set_dynamic(false);
			true
		});
		Ok(())
	}

	fn is_undoable(&self) -> bool { false }
}

/// Commits the prompt text as a filter entry, replacing the preview.
pub struct EnterCurrentFilterEntry {
	text:      String,
	committed: bool,
}

impl EnterCurrentFilterEntry {
	pub fn new(text: impl Into<String>) -> Self { Self { text: text.into(), committed: false } }
}

impl Command<Controller> for EnterCurrentFilterEntry {
	fn name(&self) -> &'static str { "EnterCurrentFilterEntry" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		if self.text.is_empty() {
			return Ok(());
		}
		let pattern = Pattern::new(&self.text)?;
		self.committed = host.update_filters(|set| {
			if set.is_dynamic() {
				set.replace_last(pattern);
				set.set_dynamic(false);
			} else {
				set.push(pattern);
			}
			true
		});
		Ok(())
	}

	fn unexecute(&mut self, host: &mut Controller) -> Result<()> {
		if std::mem::take(&mut self.committed) {
			host.update_filters(|set| set.pop().is_some());
		}
		Ok(())
	}
}
