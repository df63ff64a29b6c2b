use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};

/// Indices of the lines selected by the current filter set.
///
/// A single scan thread appends; any thread may read. An index is written
/// before the length that covers it is published.
#[derive(Debug)]
pub struct FilteredView {
	lines: Box<[AtomicUsize]>,
	len:   AtomicUsize,
}

impl FilteredView {
	pub fn new(capacity: usize) -> Self {
		Self { lines: (0..capacity).map(|_| AtomicUsize::new(0)).collect(), len: AtomicUsize::new(0) }
	}

	pub fn capacity(&self) -> usize { self.lines.len() }

	pub fn len(&self) -> usize { self.len.load(Ordering::Acquire) }

	pub fn is_empty(&self) -> bool { self.len() == 0 }

	/// Index into the original buffer of the `idx`-th selected line.
	pub fn get(&self, idx: usize) -> Option<usize> {
		if idx >= self.len() {
			return None;
		}
		self.lines.get(idx).map(|line| line.load(Ordering::Relaxed))
	}

	/// Appending past the buffer's line count means the scan cursor and the
	/// view went out of sync.
	pub fn add_line(&self, line: usize) -> Result<()> {
		let len = self.len.load(Ordering::Relaxed);
		let slot = self.lines.get(len).ok_or(Error::FilteredViewOverflow { capacity: self.capacity() })?;
		slot.store(line, Ordering::Relaxed);
		self.len.store(len + 1, Ordering::Release);
		Ok(())
	}

	pub fn clear(&self) { self.len.store(0, Ordering::Release); }

	pub fn to_vec(&self) -> Vec<usize> { (0..self.len()).filter_map(|idx| self.get(idx)).collect() }

	/// Position of the first selected line at or after `line`.
	pub fn position_from(&self, line: usize) -> Option<usize> { (0..self.len()).find(|&idx| self.get(idx).is_some_and(|l| l >= line)) }
}
