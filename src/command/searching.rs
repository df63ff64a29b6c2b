use super::Command;
use crate::{controller::Controller, error::Result};

/// Restarts the search engine with the prompt text.
pub struct UpdateSearchTerm {
	pub text: String,
}

impl Command<Controller> for UpdateSearchTerm {
	fn name(&self) -> &'static str { "UpdateSearchTerm" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		host.set_search_term(&self.text);
		Ok(())
	}

	fn is_undoable(&self) -> bool { false }
}

pub struct ClearSearch;

impl Command<Controller> for ClearSearch {
	fn name(&self) -> &'static str { "ClearSearch" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		host.set_search_term("");
		Ok(())
	}

	fn is_undoable(&self) -> bool { false }
}

pub struct NextFoundItem;

impl Command<Controller> for NextFoundItem {
	fn name(&self) -> &'static str { "NextFoundItem" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		host.jump_to_found(true, false);
		Ok(())
	}

	fn is_undoable(&self) -> bool { false }
}

pub struct PreviousFoundItem;

impl Command<Controller> for PreviousFoundItem {
	fn name(&self) -> &'static str { "PreviousFoundItem" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		host.jump_to_found(false, false);
		Ok(())
	}

	fn is_undoable(&self) -> bool { false }
}
