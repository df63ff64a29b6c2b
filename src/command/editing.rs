//! Prompt editing. Each command edits the text of the state that issued it
//! and records the text and cursor it replaced.

use super::Command;
use crate::{
	controller::Controller,
	error::Result,
	event::Topic,
	state::{Host, StateId, text::EditableText},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
	EnterChar(char),
	Backspace,
	Delete,
	Left,
	Right,
	LeftWord,
	RightWord,
	BegLine,
	EndLine,
}

impl Edit {
	/// Whether the edit can change the text itself, not only the cursor.
	pub fn changes_text(self) -> bool { matches!(self, Self::EnterChar(_) | Self::Backspace | Self::Delete) }

	fn apply(self, text: &mut dyn EditableText) {
		match self {
			Self::EnterChar(ch) => text.insert(ch),
			Self::Backspace => {
				text.remove();
			}
			Self::Delete => {
				text.delete();
			}
			Self::Left => text.shift_left(),
			Self::Right => text.shift_right(),
			Self::LeftWord => text.shift_word_left(),
			Self::RightWord => text.shift_word_right(),
			Self::BegLine => text.begline(),
			Self::EndLine => text.endline(),
		}
	}
}

pub struct EditCommand {
	state:  StateId,
	edit:   Edit,
	before: Option<(String, usize)>,
}

impl EditCommand {
	pub fn new(state: StateId, edit: Edit) -> Self { Self { state, edit, before: None } }
}

impl Command<Controller> for EditCommand {
	fn name(&self) -> &'static str {
		match self.edit {
			Edit::EnterChar(_) => "EnterChar",
			Edit::Backspace => "Backspace",
			Edit::Delete => "Delete",
			Edit::Left => "Left",
			Edit::Right => "Right",
			Edit::LeftWord => "LeftWord",
			Edit::RightWord => "RightWord",
			Edit::BegLine => "BegLine",
			Edit::EndLine => "EndLine",
		}
	}

	fn execute(&mut self, host: &mut Controller) -> Result<()> {
		let text = host.context_mut().text_mut(self.state)?;
		self.before = Some((text.text().to_string(), text.cursor()));
		self.edit.apply(text);
		host.notify(Topic::Prompt);
		Ok(())
	}

	fn unexecute(&mut self, host: &mut Controller) -> Result<()> {
		let Some((before, cursor)) = self.before.take() else {
			return Ok(());
		};
		let text = host.context_mut().text_mut(self.state)?;
		text.set(&before);
		text.set_cursor(cursor);
		host.notify(Topic::Prompt);
		Ok(())
	}
}
