//! Shared buffer store: the lines of one open file plus everything the scan
//! engines derive from them.

pub mod attrs;
pub mod filter_set;
pub mod filtered;
pub mod lines;
pub mod loader;

use std::{
	path::{Path, PathBuf},
	sync::{
		Arc, Mutex, MutexGuard, PoisonError,
		atomic::{AtomicU8, Ordering},
	},
};

pub use self::{
	attrs::{Attribute, AttributeStore},
	filter_set::{Combine, FilterSet, Pattern},
	filtered::FilteredView,
	lines::LineArena,
	loader::{BufferLoader, FileLoader},
};
use crate::{event::Topic, pipeline::ChangeSink};

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> { mutex.lock().unwrap_or_else(PoisonError::into_inner) }

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
	pub term:    String,
	pub forward: bool,
	/// Line the search expands from.
	pub focus:   usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoundItem {
	pub line:  usize,
	pub start: usize,
	pub end:   usize,
}

pub struct Buffer {
	path:            PathBuf,
	lines:           LineArena,
	filter_attrs:    AttributeStore,
	search_attrs:    AttributeStore,
	filtered:        FilteredView,
	filter_set:      Mutex<FilterSet>,
	search:          Mutex<SearchParams>,
	found:           Mutex<Vec<FoundItem>>,
	filter_progress: AtomicU8,
	last_scan_error: Mutex<Option<String>>,
	sink:            Arc<dyn ChangeSink>,
}

impl Buffer {
	pub fn new(path: impl Into<PathBuf>, lines: LineArena, combine: Combine, sink: Arc<dyn ChangeSink>) -> Self {
		let len = lines.len();
		Self {
			path: path.into(),
			lines,
			filter_attrs: AttributeStore::new(len),
			search_attrs: AttributeStore::new(len),
			filtered: FilteredView::new(len),
			filter_set: Mutex::new(FilterSet::new(combine)),
			search: Mutex::new(SearchParams { forward: true, ..SearchParams::default() }),
			found: Mutex::new(Vec::new()),
			filter_progress: AtomicU8::new(0),
			last_scan_error: Mutex::new(None),
			sink,
		}
	}

	pub fn path(&self) -> &Path { &self.path }

	pub fn name(&self) -> String {
		self.path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_else(|| self.path.display().to_string())
	}

	pub fn lines(&self) -> &LineArena { &self.lines }

	pub fn len(&self) -> usize { self.lines.len() }

	pub fn is_empty(&self) -> bool { self.lines.is_empty() }

	pub fn filter_attrs(&self) -> &AttributeStore { &self.filter_attrs }

	pub fn search_attrs(&self) -> &AttributeStore { &self.search_attrs }

	/// Search attributes win over filter attributes on the same line.
	pub fn attribute(&self, line: usize) -> Option<Attribute> {
		self.search_attrs.get(line).or_else(|| self.filter_attrs.get(line))
	}

	pub fn filtered(&self) -> &FilteredView { &self.filtered }

	pub fn filter_set(&self) -> MutexGuard<'_, FilterSet> { lock(&self.filter_set) }

	pub fn filter_snapshot(&self) -> FilterSet { self.filter_set().clone() }

	pub fn search_params(&self) -> SearchParams { lock(&self.search).clone() }

	pub fn update_search(&self, update: impl FnOnce(&mut SearchParams)) { update(&mut lock(&self.search)); }

	pub fn found_items(&self) -> Vec<FoundItem> { lock(&self.found).clone() }

	pub fn push_found(&self, item: FoundItem) { lock(&self.found).push(item); }

	pub fn clear_found(&self) { lock(&self.found).clear(); }

	pub fn filter_progress(&self) -> u8 { self.filter_progress.load(Ordering::Acquire) }

	pub fn set_filter_progress(&self, percent: u8) { self.filter_progress.store(percent, Ordering::Release); }

	pub fn last_scan_error(&self) -> Option<String> { lock(&self.last_scan_error).clone() }

	pub fn set_last_scan_error(&self, message: Option<String>) { *lock(&self.last_scan_error) = message; }

	pub fn notify(&self, topic: Topic) { self.sink.notify(topic); }

	pub fn report_error(&self, message: &str) { self.sink.report_error(message); }

	pub fn report_fault(&self, message: &str) { self.sink.report_fault(message); }
}

impl std::fmt::Debug for Buffer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Buffer").field("path", &self.path).field("lines", &self.lines.len()).finish_non_exhaustive()
	}
}
