use super::Command;
use crate::{controller::Controller, error::Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
	Up,
	Down,
	PageUp,
	PageDown,
	Home,
	End,
}

/// Moves the first displayed line; undo restores the recorded one.
pub struct ScrollCommand {
	scroll: Scroll,
	before: Option<usize>,
}

impl ScrollCommand {
	pub fn new(scroll: Scroll) -> Self { Self { scroll, before: None } }
}

impl Command<Controller> for ScrollCommand {
	fn name(&self) -> &'static str {
		match self.scroll {
			Scroll::Up => "Up",
			Scroll::Down => "Down",
			Scroll::PageUp => "PageUp",
			Scroll::PageDown => "PageDown",
			Scroll::Home => "Home",
			Scroll::End => "End",
		}
	}

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		let Some(first) = host.first_line() else {
			return Ok(());
		};
		let page = host.view_height().max(1);
		let target = match self.scroll {
			Scroll::Up => first.saturating_sub(1),
			Scroll::Down => first + 1,
			Scroll::PageUp => first.saturating_sub(page),
			Scroll::PageDown => first + page,
			Scroll::Home => 0,
			Scroll::End => host.displayed_len().saturating_sub(page),
		};
		self.before = Some(first);
		host.set_first_line(target);
		Ok(())
	}

	fn unexecute(&mut self, host: &mut Controller) -> Result<()> {
		if let Some(before) = self.before.take() {
			host.set_first_line(before);
		}
		Ok(())
	}
}

#[derive(Default)]
pub struct ToggleAttributes {
	before: Option<bool>,
}

impl Command<Controller> for ToggleAttributes {
	fn name(&self) -> &'static str { "ToggleAttributes" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		let shown = host.active_model().map(|model| model.shows_attributes());
		if let Some(shown) = shown {
			self.before = host.set_attributes(!shown);
		}
		Ok(())
	}

	fn unexecute(&mut self, host: &mut Controller) -> Result<()> {
		if let Some(before) = self.before.take() {
			host.set_attributes(before);
		}
		Ok(())
	}
}
