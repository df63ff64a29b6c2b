//! State-machine navigation wrapped as (non-undoable) commands.

use super::Command;
use crate::{
	controller::Controller,
	error::Result,
	event::Event,
	state::{Context, StateId},
};

pub struct ChangeState {
	pub to:    StateId,
	pub event: Event,
}

impl Command<Controller> for ChangeState {
	fn name(&self) -> &'static str { "ChangeState" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> { Context::change_state(host, self.to, &self.event) }

	fn is_undoable(&self) -> bool { false }
}

pub struct EnterState {
	pub to:    StateId,
	pub event: Event,
}

impl Command<Controller> for EnterState {
	fn name(&self) -> &'static str { "EnterState" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> { Context::enter_state(host, self.to, &self.event) }

	fn is_undoable(&self) -> bool { false }
}

pub struct ExitState {
	pub event: Event,
}

impl Command<Controller> for ExitState {
	fn name(&self) -> &'static str { "ExitState" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> { Context::exit_state(host, &self.event) }

	fn is_undoable(&self) -> bool { false }
}

pub struct Backtrack {
	pub event: Event,
}

impl Command<Controller> for Backtrack {
	fn name(&self) -> &'static str { "Backtrack" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> { Context::backtrack(host, &self.event) }

	fn is_undoable(&self) -> bool { false }
}

/// Re-inject an event into whatever state is current now.
pub struct Inject {
	pub event: Event,
}

impl Command<Controller> for Inject {
	fn name(&self) -> &'static str { "Inject" }

	fn execute(&mut self, host: &mut Controller) -> Result<()> { Context::inject(host, &self.event) }

	fn is_undoable(&self) -> bool { false }
}
