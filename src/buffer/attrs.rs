//! Per-line match attributes written by a scan engine and read by the
//! renderer without locking.
//!
//! A slot is published by storing its span first and its mask last with
//! `Release`; a reader that observes a non-zero mask with `Acquire` sees the
//! matching span.

use std::{
	ops::Range,
	sync::atomic::{AtomicU32, AtomicUsize, Ordering},
};

pub const FILTER_MATCH: u32 = 1;
pub const SEARCH_MATCH: u32 = 1 << 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
	pub mask:  u32,
	pub start: usize,
	pub end:   usize,
}

#[derive(Debug, Default)]
struct Slot {
	mask:  AtomicU32,
	start: AtomicUsize,
	end:   AtomicUsize,
}

#[derive(Debug)]
pub struct AttributeStore {
	slots: Box<[Slot]>,
}

impl AttributeStore {
	pub fn new(len: usize) -> Self { Self { slots: (0..len).map(|_| Slot::default()).collect() } }

	pub fn len(&self) -> usize { self.slots.len() }

	pub fn is_empty(&self) -> bool { self.slots.is_empty() }

	/// Returns false when `line` is outside the buffer.
	pub fn set(&self, line: usize, mask: u32, span: Range<usize>) -> bool {
		let Some(slot) = self.slots.get(line) else {
			return false;
		};
		slot.start.store(span.start, Ordering::Relaxed);
		slot.end.store(span.end, Ordering::Relaxed);
		slot.mask.store(mask, Ordering::Release);
		true
	}

	pub fn get(&self, line: usize) -> Option<Attribute> {
		let slot = self.slots.get(line)?;
		let mask = slot.mask.load(Ordering::Acquire);
		if mask == 0 {
			return None;
		}
		Some(Attribute { mask, start: slot.start.load(Ordering::Relaxed), end: slot.end.load(Ordering::Relaxed) })
	}

	pub fn clear(&self) {
		for slot in self.slots.iter() {
			slot.mask.store(0, Ordering::Release);
			slot.start.store(0, Ordering::Relaxed);
			slot.end.store(0, Ordering::Relaxed);
		}
	}

	pub fn count(&self) -> usize { self.slots.iter().filter(|slot| slot.mask.load(Ordering::Acquire) != 0).count() }
}
