//! One-line editable text shared by the prompt states.

/// Capability a prompt state delegates its text editing to.
pub trait EditableText {
	fn text(&self) -> &str;
	fn cursor(&self) -> usize;
	fn set(&mut self, text: &str);
	fn insert(&mut self, ch: char);
	/// Remove the character left of the cursor (backspace).
	fn remove(&mut self) -> Option<char>;
	/// Remove the character under the cursor.
	fn delete(&mut self) -> Option<char>;
	fn shift_left(&mut self);
	fn shift_right(&mut self);
	fn shift_word_left(&mut self);
	fn shift_word_right(&mut self);
	fn begline(&mut self);
	fn endline(&mut self);
	fn set_cursor(&mut self, cursor: usize) -> bool;
	fn clear(&mut self);
}

/// Cursor positions are in characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
	text:   String,
	cursor: usize,
}

impl LineEditor {
	pub fn new() -> Self { Self::default() }

	fn len(&self) -> usize { self.text.chars().count() }

	fn byte_at(&self, cursor: usize) -> usize {
		self.text.char_indices().nth(cursor).map(|(idx, _)| idx).unwrap_or(self.text.len())
	}

	fn char_at(&self, cursor: usize) -> Option<char> { self.text.chars().nth(cursor) }
}

impl EditableText for LineEditor {
	fn text(&self) -> &str { &self.text }

	fn cursor(&self) -> usize { self.cursor }

	fn set(&mut self, text: &str) {
		self.text = text.to_string();
		self.cursor = self.len();
	}

	fn insert(&mut self, ch: char) {
		let at = self.byte_at(self.cursor);
		self.text.insert(at, ch);
		self.cursor += 1;
	}

	fn remove(&mut self) -> Option<char> {
		if self.cursor == 0 {
			return None;
		}
		self.cursor -= 1;
		let at = self.byte_at(self.cursor);
		Some(self.text.remove(at))
	}

	fn delete(&mut self) -> Option<char> {
		if self.cursor >= self.len() {
			return None;
		}
		let at = self.byte_at(self.cursor);
		Some(self.text.remove(at))
	}

	fn shift_left(&mut self) { self.cursor = self.cursor.saturating_sub(1); }

	fn shift_right(&mut self) {
		if self.cursor < self.len() {
			self.cursor += 1;
		}
	}

	fn shift_word_left(&mut self) {
		let mut cursor = self.cursor;
		while cursor > 0 && self.char_at(cursor - 1).is_some_and(char::is_alphanumeric) {
			cursor -= 1;
		}
		while cursor > 0 && self.char_at(cursor - 1).is_some_and(|ch| !ch.is_alphanumeric()) {
			cursor -= 1;
		}
		self.cursor = cursor;
	}

	fn shift_word_right(&mut self) {
		let len = self.len();
		let mut cursor = self.cursor;
		while cursor < len && self.char_at(cursor).is_some_and(char::is_alphanumeric) {
			cursor += 1;
		}
		while cursor < len && self.char_at(cursor).is_some_and(|ch| !ch.is_alphanumeric()) {
			cursor += 1;
		}
		self.cursor = cursor;
	}

	fn begline(&mut self) { self.cursor = 0; }

	fn endline(&mut self) { self.cursor = self.len(); }

	fn set_cursor(&mut self, cursor: usize) -> bool {
		if cursor > self.len() {
			return false;
		}
		self.cursor = cursor;
		true
	}

	fn clear(&mut self) {
		self.text.clear();
		self.cursor = 0;
	}
}
