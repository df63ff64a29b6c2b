//! The reactor: owns the state machine and every model, consumes the work
//! queue on the main thread and dispatches each event into the machine.

mod states;

#[cfg(test)]
mod tests;

use std::{
	path::Path,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
};

use slotmap::{SlotMap, new_key_type};
use tracing::{debug, info, warn};

use crate::{
	buffer::{Attribute, Buffer, BufferLoader, Combine, FilterSet, FoundItem},
	config::Config,
	engine::{FilterTask, Processor, SearchTask},
	error::{Error, Result},
	event::{AppEvent, Event, Key, Topic},
	pipeline::{CONTROLLER, ChangeSink, Consumer, PROCESSOR_SIGNAL, Producer, RedrawRouter, View, WorkQueue},
	state::{Context, Host, StateId},
};

new_key_type! { pub struct BufferId; }

/// Raised to stop the consumer loop and the input pump.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
	pub fn raise(&self) { self.0.store(true, Ordering::SeqCst); }

	pub fn is_raised(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

/// One open file with its scan engines and browsing position.
pub struct BufferModel {
	buffer:          Arc<Buffer>,
	filter:          Processor<FilterTask>,
	search:          Processor<SearchTask>,
	first_line:      usize,
	filtering:       bool,
	show_attributes: bool,
}

impl BufferModel {
	fn open(buffer: Arc<Buffer>, show_attributes: bool) -> Result<Self> {
		let mut filter = Processor::new(Arc::clone(&buffer), FilterTask::new());
		let mut search = Processor::new(Arc::clone(&buffer), SearchTask::new());
		filter.start()?;
		search.start()?;
		Ok(Self { buffer, filter, search, first_line: 0, filtering: false, show_attributes })
	}

	pub fn buffer(&self) -> &Arc<Buffer> { &self.buffer }

	pub fn first_line(&self) -> usize { self.first_line }

	pub fn is_filtering(&self) -> bool { self.filtering }

	pub fn shows_attributes(&self) -> bool { self.show_attributes }

	/// Number of rows in the displayed sequence.
	pub fn displayed_len(&self) -> usize {
		if self.filtering { self.buffer.filtered().len() } else { self.buffer.len() }
	}

	/// Buffer line shown at displayed row `row`.
	pub fn displayed_line(&self, row: usize) -> Option<usize> {
		if self.filtering {
			self.buffer.filtered().get(row)
		} else {
			(row < self.buffer.len()).then_some(row)
		}
	}

	/// Displayed row of buffer line `line`, or of the next selected line
	/// while filtering.
	fn row_of(&self, line: usize) -> Option<usize> {
		if self.filtering { self.buffer.filtered().position_from(line) } else { (line < self.buffer.len()).then_some(line) }
	}

	fn clamp(&self, row: usize) -> usize { row.min(self.displayed_len().saturating_sub(1)) }

	pub fn attribute(&self, line: usize) -> Option<Attribute> {
		if self.show_attributes { self.buffer.attribute(line) } else { None }
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptLine {
	pub label:  String,
	pub text:   String,
	/// In characters, relative to `text`.
	pub cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
	pub name:       String,
	pub first:      usize,
	pub total:      usize,
	pub at_top:     bool,
	pub at_end:     bool,
	pub progress:   Option<u8>,
	pub filtering:  bool,
	pub filters:    String,
	pub combine:    Combine,
	pub attributes: bool,
}

pub struct Controller {
	context:        Context<Controller>,
	config:         Config,
	loader:         Box<dyn BufferLoader>,
	browser:        SlotMap<BufferId, BufferModel>,
	active:         Option<BufferId>,
	prompt:         Option<String>,
	search_forward: bool,
	search_focus:   usize,
	view_height:    usize,
	router:         Arc<RedrawRouter>,
	consumer:       Consumer,
	producer:       Producer,
	interrupt:      Interrupt,
}

impl Host for Controller {
	fn context(&self) -> &Context<Self> { &self.context }

	fn context_mut(&mut self) -> &mut Context<Self> { &mut self.context }

	fn state_changed(&mut self, state: StateId) {
		debug!(state = %state, "current state");
		self.notify(Topic::State);
	}
}

impl Controller {
	pub fn new(config: Config, loader: Box<dyn BufferLoader>) -> Self {
		let queue = WorkQueue::new();
		let router = Arc::new(RedrawRouter::new(queue.producer(PROCESSOR_SIGNAL)));
		let producer = queue.producer(CONTROLLER);
		Self {
			context: states::build(),
			config,
			loader,
			browser: SlotMap::with_key(),
			active: None,
			prompt: None,
			search_forward: true,
			search_focus: 0,
			view_height: 24,
			router,
			consumer: queue.into_consumer(),
			producer,
			interrupt: Interrupt::default(),
		}
	}

	pub fn config(&self) -> &Config { &self.config }

	pub fn bind_view(&self, view: Arc<dyn View>) { self.router.bind_view(view); }

	pub fn producer(&self, name: &'static str) -> Producer { self.consumer.producer(name) }

	pub fn interrupt(&self) -> Interrupt { self.interrupt.clone() }

	pub fn state(&self) -> StateId { self.context.current() }

	pub fn state_stack(&self) -> &[StateId] { self.context.stack() }

	/// Leave the root state for the no-file state, then open `file` when
	/// one was given.
	pub fn boot(&mut self, file: Option<&Path>) -> Result<()> {
		let started = Event::app(AppEvent::Started);
		Context::change_state(self, StateId::Close, &started)?;
		if let Some(file) = file {
			self.context.text_mut(StateId::Opening)?.set(&file.to_string_lossy());
			self.notify(Topic::Prompt);
			self.dispatch(&Event::key(Key::Enter))?;
		}
		Ok(())
	}

	/// Inject one event. Recoverable errors become the error state; defects
	/// are returned.
	pub fn dispatch(&mut self, event: &Event) -> Result<()> {
		match Context::inject(self, event) {
			Ok(()) => Ok(()),
			Err(err) if err.is_recoverable() => self.recover(err),
			Err(err) => Err(err),
		}
	}

	fn recover(&mut self, err: Error) -> Result<()> {
		warn!("{err}");
		if self.context.current() == StateId::Error {
			return Ok(());
		}
		Context::enter_state(self, StateId::Error, &Event::error(err.to_string()))
	}

	/// Dispatch everything already queued. Returns the number of dispatches.
	pub fn drain_pending(&mut self) -> Result<usize> {
		let mut dispatched = 0;
		while self.consumer.peek().is_some() && !self.interrupt.is_raised() {
			let event = self.consumer.try_take()?;
			let event = self.consumer.coalesce(event);
			self.dispatch(&event)?;
			dispatched += 1;
		}
		Ok(dispatched)
	}

	/// Consumer loop. Runs on the calling thread, which becomes the main
	/// thread, until the interrupt is raised. `on_idle` runs once up front
	/// and whenever the queue has been drained.
	pub fn start<E: From<Error>>(&mut self, mut on_idle: impl FnMut(&mut Controller) -> Result<(), E>) -> Result<(), E> {
		self.router.attach_main_thread();
		info!("consumer loop started");
		on_idle(self)?;
		let poll = self.config.poll_interval();
		while !self.interrupt.is_raised() {
			let Some(event) = self.consumer.take_timeout(poll)? else {
				continue;
			};
			let event = self.consumer.coalesce(event);
			self.dispatch(&event)?;
			if self.consumer.is_empty() {
				on_idle(self)?;
			}
		}
		info!("consumer loop stopped");
		Ok(())
	}

	pub(crate) fn notify(&self, topic: Topic) { self.router.notify(topic); }

	pub(crate) fn route(&self, topic: Topic) { self.router.route(topic); }

	pub(crate) fn exit(&self) {
		info!("exit requested");
		self.interrupt.raise();
	}

	pub fn buffers(&self) -> impl Iterator<Item = (BufferId, &BufferModel)> { self.browser.iter() }

	pub fn active_id(&self) -> Option<BufferId> { self.active }

	pub fn active_model(&self) -> Option<&BufferModel> { self.active.and_then(|id| self.browser.get(id)) }

	fn active_model_mut(&mut self) -> Option<&mut BufferModel> { self.active.and_then(|id| self.browser.get_mut(id)) }

	pub(crate) fn open_buffer(&mut self, path: &Path) -> Result<()> {
		let lines = self.loader.load(path)?;
		let sink: Arc<dyn ChangeSink> = self.router.clone();
		let buffer = Arc::new(Buffer::new(path, lines, self.config.combine, sink));
		info!("opened {} ({} lines)", path.display(), buffer.len());
		let model = BufferModel::open(buffer, self.config.show_attributes)?;
		self.active = Some(self.browser.insert(model));
		self.notify(Topic::Browser);
		self.producer.push(Event::app(AppEvent::FileOpened))
	}

	pub(crate) fn close_active_buffer(&mut self) -> bool {
		let Some(model) = self.active.and_then(|id| self.browser.remove(id)) else {
			return false;
		};
		info!("closed {}", model.buffer.path().display());
		drop(model);
		self.active = self.browser.keys().next();
		self.notify(Topic::All);
		true
	}

	pub fn view_height(&self) -> usize { self.view_height }

	pub fn set_view_size(&mut self, height: usize) {
		if self.view_height != height {
			self.view_height = height;
			self.notify(Topic::All);
		}
	}

	pub fn first_line(&self) -> Option<usize> { self.active_model().map(BufferModel::first_line) }

	/// Clamped to the displayed sequence. Returns the row actually set.
	pub(crate) fn set_first_line(&mut self, row: usize) -> Option<usize> {
		let model = self.active_model_mut()?;
		let row = model.clamp(row);
		model.first_line = row;
		self.notify(Topic::Buffer);
		Some(row)
	}

	pub(crate) fn displayed_len(&self) -> usize { self.active_model().map_or(0, BufferModel::displayed_len) }

	pub(crate) fn set_filtering(&mut self, filtering: bool, first_line: usize) -> Option<(bool, usize)> {
		let model = self.active_model_mut()?;
		let before = (model.filtering, model.first_line);
		model.filtering = filtering;
		model.first_line = first_line;
		self.notify(Topic::Buffer);
		self.notify(Topic::FBar);
		Some(before)
	}

	pub(crate) fn set_attributes(&mut self, show: bool) -> Option<bool> {
		let model = self.active_model_mut()?;
		let before = model.show_attributes;
		model.show_attributes = show;
		self.notify(Topic::Buffer);
		Some(before)
	}

	pub fn filter_count(&self) -> usize { self.active_model().map_or(0, |model| model.buffer.filter_set().len()) }

	/// Mutate the active filter set. The filter engine is rearmed when
	/// `update` reports a change.
	pub(crate) fn update_filters(&self, update: impl FnOnce(&mut FilterSet) -> bool) -> bool {
		let Some(model) = self.active_model() else {
			return false;
		};
		let changed = update(&mut *model.buffer.filter_set());
		if changed {
			debug!("filter set is now [{}]", model.buffer.filter_set());
			model.filter.signal();
			self.notify(Topic::FBar);
		}
		changed
	}

	pub(crate) fn search_forward(&self) -> bool { self.search_forward }

	/// Direction and focus used by the next search term update.
	pub(crate) fn pin_search(&mut self, forward: bool) {
		self.search_forward = forward;
		self.search_focus =
			self.active_model().and_then(|model| model.displayed_line(model.first_line)).unwrap_or_default();
	}

	pub(crate) fn set_search_term(&self, term: &str) {
		let Some(model) = self.active_model() else {
			return;
		};
		let (forward, focus) = (self.search_forward, self.search_focus);
		model.buffer.update_search(|params| {
			params.term = term.to_string();
			params.forward = forward;
			params.focus = focus;
		});
		model.search.signal();
	}

	pub fn found_items(&self) -> Vec<FoundItem> { self.active_model().map(|model| model.buffer.found_items()).unwrap_or_default() }

	/// Move to the nearest found item after (`forward`) or before the
	/// buffer line shown first. `inclusive` also accepts that line itself.
	pub(crate) fn jump_to_found(&mut self, forward: bool, inclusive: bool) -> Option<usize> {
		let model = self.active_model()?;
		let current = model.displayed_line(model.first_line).unwrap_or_default();
		let mut lines: Vec<usize> = model.buffer.found_items().iter().map(|item| item.line).collect();
		lines.sort_unstable();
		let target = if forward {
			lines.into_iter().find(|&line| line > current || (inclusive && line == current))
		} else {
			lines.into_iter().rev().find(|&line| line < current || (inclusive && line == current))
		}?;
		let row = model.row_of(target)?;
		debug!("jump to found item at line {target}");
		self.set_first_line(row)
	}

	pub(crate) fn set_prompt(&mut self, label: Option<String>) {
		self.prompt = label;
		self.notify(Topic::Prompt);
	}

	/// Prompt of the current state, if it shows one.
	pub fn prompt(&self) -> Option<PromptLine> {
		let label = self.prompt.clone()?;
		let (text, cursor) = match self.context.text(self.context.current()) {
			Ok(text) => (text.text().to_string(), text.cursor()),
			Err(_) => (String::new(), 0),
		};
		Some(PromptLine { label, text, cursor })
	}

	pub fn status(&self) -> Option<StatusLine> {
		let model = self.active_model()?;
		let total = model.displayed_len();
		let filters = model.buffer.filter_set();
		let progress = model.buffer.filter_progress();
		Some(StatusLine {
			name: model.buffer.name(),
			first: if total == 0 { 0 } else { model.first_line + 1 },
			total,
			at_top: model.first_line == 0,
			at_end: model.first_line + self.view_height >= total,
			progress: (model.filtering && !filters.is_empty() && progress < 100).then_some(progress),
			filtering: model.filtering,
			filters: filters.to_string(),
			combine: filters.combine(),
			attributes: model.show_attributes,
		})
	}
}
