//! Application events.
//!
//! An event is an immutable `(id, payload)` pair. User keys and synthetic
//! application events share the same type and are told apart by [`Category`],
//! a predicate over the id rather than a concrete subtype.

pub mod keymap;

use std::{fmt, sync::Arc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
	Char(char),
	Up,
	Down,
	Left,
	Right,
	CtrlUp,
	CtrlDown,
	CtrlLeft,
	CtrlRight,
	Home,
	End,
	PageUp,
	PageDown,
	CtrlHome,
	CtrlEnd,
	CtrlPageUp,
	CtrlPageDown,
	Tab,
	BackTab,
	F(u8),
	Enter,
	Esc,
	Backspace,
	Delete,
	Insert,
	Ctrl(char),
}

/// What part of the screen a model mutation invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
	Buffer,
	Browser,
	FBar,
	Prompt,
	State,
	All,
}

impl Topic {
	pub fn merge(self, other: Topic) -> Topic {
		if self == other { self } else { Topic::All }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppEvent {
	Started,
	FileOpened,
	FileClosed,
	Error,
	/// A scan engine broke an internal invariant. Ends the run loop.
	Fault,
	Redraw(Topic),
	Backtrack,
	Undo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventId {
	Key(Key),
	App(AppEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
	Printable,
	Arrow,
	Nav,
	Function,
	Ctrl,
	Redraw,
	App,
}

impl Category {
	pub fn of(id: EventId) -> Category {
		match id {
			EventId::Key(Key::Char(_)) => Category::Printable,
			EventId::Key(
				Key::Up
				| Key::Down
				| Key::Left
				| Key::Right
				| Key::CtrlUp
				| Key::CtrlDown
				| Key::CtrlLeft
				| Key::CtrlRight,
			) => Category::Arrow,
			EventId::Key(
				Key::Home
				| Key::End
				| Key::PageUp
				| Key::PageDown
				| Key::CtrlHome
				| Key::CtrlEnd
				| Key::CtrlPageUp
				| Key::CtrlPageDown
				| Key::Tab
				| Key::BackTab,
			) => Category::Nav,
			EventId::Key(Key::F(_)) => Category::Function,
			EventId::Key(Key::Enter | Key::Esc | Key::Backspace | Key::Delete | Key::Insert | Key::Ctrl(_)) => {
				Category::Ctrl
			}
			EventId::App(AppEvent::Redraw(_)) => Category::Redraw,
			EventId::App(_) => Category::App,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	id:      EventId,
	payload: Option<Arc<str>>,
}

impl Event {
	pub fn new(id: EventId) -> Self { Self { id, payload: None } }

	pub fn with_payload(id: EventId, payload: impl Into<Arc<str>>) -> Self {
		Self { id, payload: Some(payload.into()) }
	}

	pub fn key(key: Key) -> Self { Self::new(EventId::Key(key)) }

	pub fn app(event: AppEvent) -> Self { Self::new(EventId::App(event)) }

	pub fn redraw(topic: Topic) -> Self { Self::app(AppEvent::Redraw(topic)) }

	pub fn error(message: impl Into<Arc<str>>) -> Self {
		Self::with_payload(EventId::App(AppEvent::Error), message)
	}

	pub fn fault(message: impl Into<Arc<str>>) -> Self {
		Self::with_payload(EventId::App(AppEvent::Fault), message)
	}

	pub fn backtrack() -> Self { Self::app(AppEvent::Backtrack) }

	pub fn undo() -> Self { Self::app(AppEvent::Undo) }

	pub fn id(&self) -> EventId { self.id }

	pub fn payload(&self) -> Option<&str> { self.payload.as_deref() }

	pub fn category(&self) -> Category { Category::of(self.id) }

	pub fn is_redraw(&self) -> bool { self.category() == Category::Redraw }

	pub fn redraw_topic(&self) -> Option<Topic> {
		match self.id {
			EventId::App(AppEvent::Redraw(topic)) => Some(topic),
			_ => None,
		}
	}

	pub fn as_key(&self) -> Option<Key> {
		match self.id {
			EventId::Key(key) => Some(key),
			EventId::App(_) => None,
		}
	}

	pub fn as_char(&self) -> Option<char> {
		match self.id {
			EventId::Key(Key::Char(ch)) => Some(ch),
			_ => None,
		}
	}
}

impl From<Key> for Event {
	fn from(key: Key) -> Self { Self::key(key) }
}

impl fmt::Display for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.id {
			EventId::Key(key) => write!(f, "key {key:?}")?,
			EventId::App(event) => write!(f, "app {event:?}")?,
		}
		if let Some(payload) = &self.payload {
			write!(f, " [{payload}]")?;
		}
		Ok(())
	}
}

/// Left-hand side of an action-map entry: either one concrete id or every id
/// of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
	Exact(EventId),
	Any(Category),
}

impl Matcher {
	pub fn key(key: Key) -> Self { Self::Exact(EventId::Key(key)) }

	pub fn app(event: AppEvent) -> Self { Self::Exact(EventId::App(event)) }

	pub fn any(category: Category) -> Self { Self::Any(category) }

	pub fn matches(&self, event: &Event) -> bool {
		match self {
			Self::Exact(id) => *id == event.id(),
			Self::Any(category) => *category == event.category(),
		}
	}
}

impl From<Key> for Matcher {
	fn from(key: Key) -> Self { Self::key(key) }
}

impl From<AppEvent> for Matcher {
	fn from(event: AppEvent) -> Self { Self::app(event) }
}
