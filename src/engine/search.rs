use tracing::debug;

use super::ScanTask;
use crate::{
	buffer::{Buffer, FoundItem, attrs::SEARCH_MATCH},
	error::Result,
	event::Topic,
};

/// Incremental literal search expanding from a pinned focus line.
///
/// `[low, high)` is the range already examined. Forward search grows `high`,
/// backward search shrinks `low`; each step examines one line whether it
/// matches or not.
#[derive(Debug, Default)]
pub struct SearchTask {
	term:    String,
	forward: bool,
	focus:   usize,
	low:     usize,
	high:    usize,
}

impl SearchTask {
	pub fn new() -> Self { Self::default() }

	pub fn boundaries(&self) -> (usize, usize) { (self.low, self.high) }

	pub fn focus(&self) -> usize { self.focus }

	fn examine(&self, buffer: &Buffer, line: usize) {
		let Some(text) = buffer.lines().line(line) else {
			return;
		};
		if let Some(start) = text.find(&self.term) {
			let end = start + self.term.len();
			buffer.search_attrs().set(line, SEARCH_MATCH, start..end);
			buffer.push_found(FoundItem { line, start, end });
			buffer.notify(Topic::Buffer);
		}
	}
}

impl ScanTask for SearchTask {
	const NAME: &'static str = "search";

	fn rearm(&mut self, buffer: &Buffer) {
		buffer.search_attrs().clear();
		buffer.clear_found();
		let params = buffer.search_params();
		self.term = params.term;
		self.forward = params.forward;
		self.focus = params.focus.min(buffer.len());
		// Both directions examine the focus line first.
		let start = if self.forward { self.focus } else { (self.focus + 1).min(buffer.len()) };
		self.low = start;
		self.high = start;
		debug!("search rearmed: {:?} {} from line {}", self.term, if self.forward { "forward" } else { "backward" }, self.focus);
		buffer.notify(Topic::Buffer);
	}

	fn is_idle(&self, buffer: &Buffer) -> bool {
		if self.term.is_empty() {
			return true;
		}
		if self.forward { self.high >= buffer.len() } else { self.low == 0 }
	}

	fn step(&mut self, buffer: &Buffer) -> Result<()> {
		if self.forward {
			self.examine(buffer, self.high);
			self.high += 1;
		} else {
			self.low -= 1;
			self.examine(buffer, self.low);
		}
		Ok(())
	}
}
