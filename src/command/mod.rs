//! Command pattern: every user or system action is an executable and
//! (optionally) undoable unit run through an [`Invoker`].

pub mod browsing;
pub mod editing;
pub mod filtering;
pub mod process;
pub mod searching;
pub mod transition;

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{Error, Result};

pub trait Command<H> {
	fn name(&self) -> &'static str;

	fn execute(&mut self, host: &mut H) -> Result<()>;

	/// Inverse of `execute`. A no-op for commands that are not undoable.
	fn unexecute(&mut self, _host: &mut H) -> Result<()> { Ok(()) }

	fn is_undoable(&self) -> bool { true }
}

struct Stacks<H> {
	executed: Vec<Box<dyn Command<H>>>,
	undone:   Vec<Box<dyn Command<H>>>,
}

/// Keeps the executed and undone stacks. The stacks are locked only around
/// bookkeeping, never while a command runs, so a command may execute further
/// commands through the same invoker.
pub struct Invoker<H> {
	stacks: Mutex<Stacks<H>>,
}

impl<H> Invoker<H> {
	pub fn new() -> Self { Self { stacks: Mutex::new(Stacks { executed: Vec::new(), undone: Vec::new() }) } }

	pub fn execute(&self, host: &mut H, mut command: Box<dyn Command<H>>) -> Result<()> {
		debug!("about to execute {}", command.name());
		command.execute(host)?;
		let mut stacks = self.stacks();
		stacks.undone.clear();
		stacks.executed.push(command);
		Ok(())
	}

	pub fn undo(&self, host: &mut H) -> Result<()> {
		let mut command = self.stacks().executed.pop().ok_or(Error::EmptyUndoStack)?;
		debug!("about to undo {}", command.name());
		if let Err(err) = command.unexecute(host) {
			self.stacks().executed.push(command);
			return Err(err);
		}
		self.stacks().undone.push(command);
		Ok(())
	}

	pub fn can_undo(&self) -> bool { !self.stacks().executed.is_empty() }

	pub fn executed_len(&self) -> usize { self.stacks().executed.len() }

	pub fn undone_len(&self) -> usize { self.stacks().undone.len() }

	pub fn last_executed(&self) -> Option<&'static str> { self.stacks().executed.last().map(|command| command.name()) }

	/// Whether the command the next `undo` pops has an inverse. `None` when
	/// nothing was executed.
	pub fn next_undo_reverts(&self) -> Option<bool> {
		self.stacks().executed.last().map(|command| command.is_undoable())
	}

	fn stacks(&self) -> MutexGuard<'_, Stacks<H>> { self.stacks.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl<H> Default for Invoker<H> {
	fn default() -> Self { Self::new() }
}
