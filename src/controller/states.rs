//! The application state graph: which state binds which keys, and what each
//! state does when it is entered, left, suspended or resumed.

use tracing::debug;

use super::Controller;
use crate::{
	command::{
		Command,
		browsing::{Scroll, ScrollCommand, ToggleAttributes},
		editing::{Edit, EditCommand},
		filtering::{
			CancelCurrentFilterEntry, DisableFiltering, EnableFiltering, EnterCurrentFilterEntry, ResetFiltering,
			SwitchFilterType, UpdateCurrentFilterEntry,
		},
		process::{Exit, FileClosed, OpenFile},
		searching::{ClearSearch, NextFoundItem, PreviousFoundItem, UpdateSearchTerm},
		transition::{Backtrack, ChangeState, EnterState, ExitState, Inject},
	},
	error::{Error, Result},
	event::{AppEvent, Category, Event, Key, Matcher},
	state::{ActionMap, Context, Host, Lifecycle, State, StateId, text::LineEditor},
};

const OPENING_PROMPT: &str = "Open file: ";
const FILTER_PROMPT: &str = "Filter: ";

pub(super) fn build() -> Context<Controller> {
	let mut context = Context::new(State::new(StateId::Default, None, default_actions()));
	context.register(State::new(StateId::Close, Some(StateId::Default), ActionMap::new()).with_hooks(CloseHooks));
	context.register(
		State::new(StateId::Opening, Some(StateId::Default), opening_actions())
			.with_hooks(PromptHooks::fixed(StateId::Opening, OPENING_PROMPT))
			.with_text(LineEditor::new()),
	);
	context.register(State::new(StateId::Open, Some(StateId::Default), open_actions()).with_hooks(OpenHooks));
	context.register(State::new(StateId::Browse, Some(StateId::Open), browse_actions()));
	context.register(State::new(StateId::Filter, Some(StateId::Browse), filter_actions()).with_hooks(FilterHooks));
	context.register(
		State::new(StateId::AddFilter, Some(StateId::Default), add_filter_actions())
			.with_hooks(PromptHooks::fixed(StateId::AddFilter, FILTER_PROMPT))
			.with_text(LineEditor::new()),
	);
	context.register(
		State::new(StateId::Search, Some(StateId::Default), search_actions())
			.with_hooks(SearchHooks)
			.with_text(LineEditor::new()),
	);
	context.register(State::new(StateId::Error, Some(StateId::Default), error_actions()).with_hooks(ErrorHooks));
	context
}

fn run(host: &mut Controller, owner: StateId, command: impl Command<Controller> + 'static) -> Result<()> {
	Context::execute(host, owner, command)
}

fn prompt_text(host: &Controller, owner: StateId) -> Result<String> {
	Ok(host.context().text(owner)?.text().to_string())
}

/// Reacts to a prompt text change of `owner`.
fn follow_up(host: &mut Controller, owner: StateId) -> Result<()> {
	match owner {
		StateId::AddFilter => {
			let text = prompt_text(host, owner)?;
			run(host, owner, UpdateCurrentFilterEntry { text })
		}
		StateId::Search => {
			let text = prompt_text(host, owner)?;
			run(host, owner, UpdateSearchTerm { text })
		}
		_ => Ok(()),
	}
}

fn edit_prompt(host: &mut Controller, owner: StateId, op: Edit) -> Result<()> {
	run(host, owner, EditCommand::new(owner, op))?;
	if op.changes_text() { follow_up(host, owner) } else { Ok(()) }
}

/// Line-editing keys shared by the prompt states.
fn editing(actions: ActionMap<Controller>, owner: StateId) -> ActionMap<Controller> {
	let keys = [
		(Key::Backspace, Edit::Backspace),
		(Key::Delete, Edit::Delete),
		(Key::Left, Edit::Left),
		(Key::Right, Edit::Right),
		(Key::CtrlLeft, Edit::LeftWord),
		(Key::CtrlRight, Edit::RightWord),
		(Key::Home, Edit::BegLine),
		(Key::End, Edit::EndLine),
	];
	let actions = keys.into_iter().fold(actions, |actions, (key, op)| actions.bind(key, move |host, _| edit_prompt(host, owner, op)));
	actions.bind(Matcher::any(Category::Printable), move |host, event| match event.as_char() {
		Some(ch) => edit_prompt(host, owner, Edit::EnterChar(ch)),
		None => Ok(()),
	})
}

/// Undo the most recent revertible command of the current state. Commands
/// without an inverse stacked above it are popped on the way.
fn undo_current(host: &mut Controller) -> Result<()> {
	let current = host.state();
	let invoker = host.context().invoker(current)?;
	while let Some(reverts) = invoker.next_undo_reverts() {
		invoker.undo(host)?;
		if reverts {
			return follow_up(host, current);
		}
	}
	debug!(state = %current, "nothing to undo");
	Ok(())
}

fn default_actions() -> ActionMap<Controller> {
	ActionMap::new()
		.bind(Matcher::any(Category::Redraw), |host: &mut Controller, event: &Event| {
			if let Some(topic) = event.redraw_topic() {
				host.route(topic);
			}
			Ok(())
		})
		.bind(Key::Ctrl('c'), |host, _| run(host, StateId::Default, Exit))
		.bind(AppEvent::Error, |host, event| {
			if host.state() == StateId::Error {
				host.set_prompt(Some(event.payload().unwrap_or_default().to_string()));
				return Ok(());
			}
			run(host, StateId::Default, EnterState { to: StateId::Error, event: event.clone() })
		})
		.bind(AppEvent::Fault, |_, event| {
			Err(Error::EngineFault { message: event.payload().unwrap_or_default().to_string() })
		})
		.bind(Key::Ctrl('z'), |host, _| undo_current(host))
		.bind(AppEvent::Undo, |host, _| undo_current(host))
		.bind(AppEvent::Backtrack, |host, event| run(host, StateId::Default, Backtrack { event: event.clone() }))
}

fn opening_actions() -> ActionMap<Controller> {
	let actions = ActionMap::new()
		.bind(Key::Esc, |host: &mut Controller, _: &Event| run(host, StateId::Opening, Exit))
		.bind(Key::Enter, |host, _| {
			let path = prompt_text(host, StateId::Opening)?;
			run(host, StateId::Opening, OpenFile::new(&path))
		})
		.bind(AppEvent::FileOpened, |host, event| {
			run(host, StateId::Opening, ChangeState { to: StateId::Open, event: event.clone() })
		});
	editing(actions, StateId::Opening)
}

fn open_actions() -> ActionMap<Controller> {
	let search = |host: &mut Controller, event: &Event| {
		run(host, StateId::Open, EnterState { to: StateId::Search, event: event.clone() })?;
		run(host, StateId::Open, Inject { event: event.clone() })
	};
	ActionMap::new()
		.bind(Key::Esc, |host: &mut Controller, _: &Event| run(host, StateId::Open, Exit))
		.bind(Key::Char('q'), |host, _| run(host, StateId::Open, Exit))
		.bind(AppEvent::FileClosed, |host, _| run(host, StateId::Open, FileClosed))
		.bind(Key::Char('/'), search)
		.bind(Key::Char('?'), search)
}

fn browse_actions() -> ActionMap<Controller> {
	let scrolls = [
		(Key::Up, Scroll::Up),
		(Key::Down, Scroll::Down),
		(Key::PageUp, Scroll::PageUp),
		(Key::PageDown, Scroll::PageDown),
		(Key::Home, Scroll::Home),
		(Key::End, Scroll::End),
		(Key::CtrlHome, Scroll::Home),
		(Key::CtrlEnd, Scroll::End),
	];
	let actions = ActionMap::new()
		.bind(Key::Ctrl('f'), |host: &mut Controller, event: &Event| {
			run(host, StateId::Browse, EnterState { to: StateId::Filter, event: event.clone() })?;
			run(host, StateId::Browse, Inject { event: event.clone() })
		})
		.bind(Key::Ctrl('a'), |host, _| run(host, StateId::Browse, ToggleAttributes::default()))
		.bind(Key::Char('n'), |host, _| run(host, StateId::Browse, NextFoundItem))
		.bind(Key::Char('N'), |host, _| run(host, StateId::Browse, PreviousFoundItem));
	scrolls.into_iter().fold(actions, |actions, (key, scroll)| {
		actions.bind(key, move |host, _| run(host, StateId::Browse, ScrollCommand::new(scroll)))
	})
}

fn filter_actions() -> ActionMap<Controller> {
	ActionMap::new()
		.bind(Key::Ctrl('f'), |host: &mut Controller, event: &Event| {
			run(host, StateId::Filter, EnterState { to: StateId::AddFilter, event: event.clone() })
		})
		.bind(Key::Esc, |host, event| run(host, StateId::Filter, Backtrack { event: event.clone() }))
		.bind(Key::Ctrl('o'), |host, _| run(host, StateId::Filter, SwitchFilterType))
}

fn add_filter_actions() -> ActionMap<Controller> {
	let actions = ActionMap::new()
		.bind(Key::Esc, |host: &mut Controller, event: &Event| {
			run(host, StateId::AddFilter, CancelCurrentFilterEntry)?;
			run(host, StateId::AddFilter, ExitState { event: event.clone() })
		})
		.bind(Key::Enter, |host, event| {
			let text = prompt_text(host, StateId::AddFilter)?;
			// Owned by the filter state so that undo there drops the entry.
			run(host, StateId::Filter, EnterCurrentFilterEntry::new(text))?;
			run(host, StateId::AddFilter, ExitState { event: event.clone() })
		});
	editing(actions, StateId::AddFilter)
}

fn search_actions() -> ActionMap<Controller> {
	let actions = ActionMap::new()
		.bind(Key::Char('/'), |_: &mut Controller, _: &Event| Ok(()))
		.bind(Key::Char('?'), |_, _| Ok(()))
		.bind(Key::Enter, |host, event| {
			run(host, StateId::Search, ExitState { event: event.clone() })?;
			let forward = host.search_forward();
			host.jump_to_found(forward, true);
			Ok(())
		})
		.bind(Key::Esc, |host, event| {
			run(host, StateId::Search, ClearSearch)?;
			run(host, StateId::Search, ExitState { event: event.clone() })
		});
	editing(actions, StateId::Search)
}

fn error_actions() -> ActionMap<Controller> {
	let leave = |host: &mut Controller, event: &Event| run(host, StateId::Error, ExitState { event: event.clone() });
	ActionMap::new().bind(Key::Enter, leave).bind(Key::Esc, leave)
}

struct CloseHooks;

impl Lifecycle<Controller> for CloseHooks {
	fn enter(&self, host: &mut Controller, event: &Event) -> Result<()> {
		run(host, StateId::Close, EnterState { to: StateId::Opening, event: event.clone() })
	}
}

/// A prompt with a fixed label whose text starts empty on every entry.
struct PromptHooks {
	state: StateId,
	label: &'static str,
}

impl PromptHooks {
	fn fixed(state: StateId, label: &'static str) -> Self { Self { state, label } }

	fn reset(&self, host: &mut Controller, label: Option<&str>) -> Result<()> {
		host.context_mut().text_mut(self.state)?.clear();
		host.set_prompt(label.map(str::to_string));
		Ok(())
	}
}

impl Lifecycle<Controller> for PromptHooks {
	fn enter(&self, host: &mut Controller, _event: &Event) -> Result<()> { self.reset(host, Some(self.label)) }

	fn exit(&self, host: &mut Controller, _event: &Event) -> Result<()> { self.reset(host, None) }

	fn resume(&self, host: &mut Controller, _event: &Event) -> Result<()> {
		host.set_prompt(Some(self.label.to_string()));
		Ok(())
	}
}

struct OpenHooks;

impl Lifecycle<Controller> for OpenHooks {
	fn enter(&self, host: &mut Controller, event: &Event) -> Result<()> {
		run(host, StateId::Open, EnterState { to: StateId::Browse, event: event.clone() })
	}
}

struct FilterHooks;

impl Lifecycle<Controller> for FilterHooks {
	fn enter(&self, host: &mut Controller, _event: &Event) -> Result<()> {
		run(host, StateId::Filter, EnableFiltering::default())
	}

	fn exit(&self, host: &mut Controller, _event: &Event) -> Result<()> {
		run(host, StateId::Filter, DisableFiltering::default())?;
		run(host, StateId::Filter, ResetFiltering)
	}

	/// Nothing left to filter by once the prompt closes empty-handed.
	fn resume(&self, host: &mut Controller, event: &Event) -> Result<()> {
		if host.filter_count() == 0 {
			return run(host, StateId::Filter, Backtrack { event: event.clone() });
		}
		Ok(())
	}
}

struct SearchHooks;

impl SearchHooks {
	fn label(forward: bool) -> String { if forward { "/" } else { "?" }.to_string() }
}

impl Lifecycle<Controller> for SearchHooks {
	fn enter(&self, host: &mut Controller, event: &Event) -> Result<()> {
		let forward = event.as_char() != Some('?');
		host.context_mut().text_mut(StateId::Search)?.clear();
		host.pin_search(forward);
		host.set_prompt(Some(Self::label(forward)));
		Ok(())
	}

	fn exit(&self, host: &mut Controller, _event: &Event) -> Result<()> {
		host.context_mut().text_mut(StateId::Search)?.clear();
		host.set_prompt(None);
		Ok(())
	}

	fn resume(&self, host: &mut Controller, _event: &Event) -> Result<()> {
		host.set_prompt(Some(Self::label(host.search_forward())));
		Ok(())
	}
}

struct ErrorHooks;

impl Lifecycle<Controller> for ErrorHooks {
	fn enter(&self, host: &mut Controller, event: &Event) -> Result<()> {
		host.set_prompt(Some(event.payload().unwrap_or("error").to_string()));
		Ok(())
	}

	fn exit(&self, host: &mut Controller, _event: &Event) -> Result<()> {
		host.set_prompt(None);
		Ok(())
	}
}
