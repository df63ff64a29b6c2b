use std::ops::Range;

/// Immutable lines owned once and referenced by index everywhere else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineArena {
	text:  Box<str>,
	lines: Box<[Range<usize>]>,
}

impl LineArena {
	/// Split on `\n` (and `\r\n`); a trailing newline does not add an empty
	/// last line.
	pub fn from_text(text: &str) -> Self { Self::from_lines(text.lines()) }

	pub fn from_lines<I, S>(lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut text = String::new();
		let mut ranges = Vec::new();
		for line in lines {
			let start = text.len();
			text.push_str(line.as_ref());
			ranges.push(start..text.len());
		}
		Self { text: text.into_boxed_str(), lines: ranges.into_boxed_slice() }
	}

	pub fn len(&self) -> usize { self.lines.len() }

	pub fn is_empty(&self) -> bool { self.lines.is_empty() }

	pub fn line(&self, idx: usize) -> Option<&str> { self.lines.get(idx).map(|range| &self.text[range.clone()]) }

	pub fn iter(&self) -> impl Iterator<Item = &str> + '_ { self.lines.iter().map(|range| &self.text[range.clone()]) }
}
