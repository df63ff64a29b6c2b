//! Hierarchical state machine.
//!
//! States form a static parent tree used for event escalation and a dynamic
//! `previous` link used by [`Context::backtrack`]. All transitions are
//! associated functions over the [`Host`] so that actions and lifecycle hooks
//! can mutate the whole application while the machine is being driven.

pub mod text;

#[cfg(test)]
mod tests;

use std::{collections::HashMap, fmt, rc::Rc};

use tracing::{debug, trace};

use self::text::EditableText;
use crate::{
	command::{Command, Invoker},
	error::{Error, Result},
	event::{Event, Matcher},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateId {
	Default,
	Close,
	Opening,
	Open,
	Browse,
	Filter,
	AddFilter,
	Search,
	Error,
}

impl fmt::Display for StateId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Default => "DEFAULT",
			Self::Close => "CLOSE",
			Self::Opening => "OPENING",
			Self::Open => "OPEN",
			Self::Browse => "BROWSE",
			Self::Filter => "FILTER",
			Self::AddFilter => "ADD_FILTER",
			Self::Search => "SEARCH",
			Self::Error => "ERROR",
		};
		f.write_str(name)
	}
}

/// The application object a state machine drives.
pub trait Host: Sized + 'static {
	fn context(&self) -> &Context<Self>;

	fn context_mut(&mut self) -> &mut Context<Self>;

	/// Called after every transition once `current` points at `state`.
	fn state_changed(&mut self, _state: StateId) {}
}

pub type Action<H> = Rc<dyn Fn(&mut H, &Event) -> Result<()>>;

/// Ordered `(matcher, action)` bindings; the first matching entry wins.
pub struct ActionMap<H> {
	entries: Vec<(Matcher, Action<H>)>,
}

impl<H> ActionMap<H> {
	pub fn new() -> Self { Self { entries: Vec::new() } }

	pub fn bind(mut self, matcher: impl Into<Matcher>, action: impl Fn(&mut H, &Event) -> Result<()> + 'static) -> Self {
		self.entries.push((matcher.into(), Rc::new(action)));
		self
	}

	pub fn find(&self, event: &Event) -> Option<&Action<H>> {
		self.entries.iter().find(|(matcher, _)| matcher.matches(event)).map(|(_, action)| action)
	}

	pub fn len(&self) -> usize { self.entries.len() }

	pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

impl<H> Default for ActionMap<H> {
	fn default() -> Self { Self::new() }
}

/// Lifecycle hooks of a state. All default to no-ops.
pub trait Lifecycle<H> {
	fn enter(&self, _host: &mut H, _event: &Event) -> Result<()> { Ok(()) }

	fn exit(&self, _host: &mut H, _event: &Event) -> Result<()> { Ok(()) }

	fn suspend(&self, _host: &mut H, _event: &Event) -> Result<()> { Ok(()) }

	fn resume(&self, _host: &mut H, _event: &Event) -> Result<()> { Ok(()) }
}

pub struct NoHooks;

impl<H> Lifecycle<H> for NoHooks {}

pub struct State<H> {
	id:       StateId,
	parent:   Option<StateId>,
	previous: Option<StateId>,
	actions:  ActionMap<H>,
	hooks:    Rc<dyn Lifecycle<H>>,
	invoker:  Rc<Invoker<H>>,
	text:     Option<Box<dyn EditableText>>,
}

impl<H: 'static> State<H> {
	pub fn new(id: StateId, parent: Option<StateId>, actions: ActionMap<H>) -> Self {
		Self {
			id,
			parent,
			previous: None,
			actions,
			hooks: Rc::new(NoHooks),
			invoker: Rc::new(Invoker::new()),
			text: None,
		}
	}

	pub fn with_hooks(mut self, hooks: impl Lifecycle<H> + 'static) -> Self {
		self.hooks = Rc::new(hooks);
		self
	}

	pub fn with_text(mut self, text: impl EditableText + 'static) -> Self {
		self.text = Some(Box::new(text));
		self
	}
}

impl<H> State<H> {
	pub fn id(&self) -> StateId { self.id }

	pub fn parent(&self) -> Option<StateId> { self.parent }

	pub fn previous(&self) -> Option<StateId> { self.previous }

	pub fn actions(&self) -> &ActionMap<H> { &self.actions }

	pub fn invoker(&self) -> &Invoker<H> { &self.invoker }

	pub fn text(&self) -> Option<&dyn EditableText> { self.text.as_deref() }
}

pub struct Context<H> {
	current:  StateId,
	stack:    Vec<StateId>,
	registry: HashMap<StateId, State<H>>,
}

impl<H> Context<H> {
	/// `initial` becomes `current`, so `current` always names a registered
	/// state.
	pub fn new(initial: State<H>) -> Self {
		let current = initial.id;
		let mut registry = HashMap::new();
		registry.insert(current, initial);
		Self { current, stack: Vec::new(), registry }
	}

	pub fn register(&mut self, state: State<H>) { self.registry.insert(state.id, state); }

	pub fn current(&self) -> StateId { self.current }

	pub fn stack(&self) -> &[StateId] { &self.stack }

	pub fn state(&self, id: StateId) -> Result<&State<H>> {
		self.registry.get(&id).ok_or(Error::UnknownState { state: id })
	}

	fn state_mut(&mut self, id: StateId) -> Result<&mut State<H>> {
		self.registry.get_mut(&id).ok_or(Error::UnknownState { state: id })
	}

	pub fn previous_of(&self, id: StateId) -> Option<StateId> { self.registry.get(&id).and_then(|state| state.previous) }

	pub fn text(&self, id: StateId) -> Result<&dyn EditableText> {
		self.state(id)?.text.as_deref().ok_or(Error::MissingText { state: id })
	}

	pub fn text_mut(&mut self, id: StateId) -> Result<&mut dyn EditableText> {
		match self.state_mut(id)?.text.as_deref_mut() {
			Some(text) => Ok(text),
			None => Err(Error::MissingText { state: id }),
		}
	}

	pub fn invoker(&self, id: StateId) -> Result<Rc<Invoker<H>>> { Ok(Rc::clone(&self.state(id)?.invoker)) }

	fn hooks(&self, id: StateId) -> Result<Rc<dyn Lifecycle<H>>> { Ok(Rc::clone(&self.state(id)?.hooks)) }
}

impl<H: Host> Context<H> {
	/// Dispatch to the current state. An event no state in the ancestor chain
	/// binds is reported as [`Error::UnhandledEvent`].
	pub fn inject(host: &mut H, event: &Event) -> Result<()> {
		let current = host.context().current;
		trace!(state = %current, %event, "inject");
		if Self::handle(host, current, event)? {
			Ok(())
		} else {
			Err(Error::UnhandledEvent { state: current, event: event.clone() })
		}
	}

	/// Fire the first matching action of `state`, escalating to the parent
	/// chain when nothing matches. Returns whether some state handled it.
	pub fn handle(host: &mut H, state: StateId, event: &Event) -> Result<bool> {
		let mut next = Some(state);
		while let Some(id) = next {
			let state = host.context().state(id)?;
			if let Some(action) = state.actions.find(event) {
				let action = Rc::clone(action);
				action(host, event)?;
				return Ok(true);
			}
			next = state.parent;
		}
		Ok(false)
	}

	pub fn change_state(host: &mut H, new_state: StateId, event: &Event) -> Result<()> {
		let old = host.context().current;
		let entering = host.context().hooks(new_state)?;
		debug!(from = %old, to = %new_state, "change state");
		host.context().hooks(old)?.exit(host, event)?;

		let context = host.context_mut();
		context.state_mut(new_state)?.previous = None;
		context.current = new_state;
		host.state_changed(new_state);
		entering.enter(host, event)
	}

	pub fn enter_state(host: &mut H, new_state: StateId, event: &Event) -> Result<()> {
		let old = host.context().current;
		let entering = host.context().hooks(new_state)?;
		debug!(from = %old, to = %new_state, "enter state");
		host.context().hooks(old)?.suspend(host, event)?;

		let context = host.context_mut();
		context.state_mut(new_state)?.previous = Some(old);
		context.stack.push(old);
		context.current = new_state;
		host.state_changed(new_state);
		entering.enter(host, event)
	}

	pub fn exit_state(host: &mut H, event: &Event) -> Result<()> {
		let old = host.context().current;
		if host.context().stack.is_empty() {
			return Err(Error::EmptyStateStack { state: old });
		}
		host.context().hooks(old)?.exit(host, event)?;

		let context = host.context_mut();
		let resumed = context.stack.pop().ok_or(Error::EmptyStateStack { state: old })?;
		context.current = resumed;
		debug!(from = %old, to = %resumed, "exit state");
		let hooks = context.hooks(resumed)?;
		host.state_changed(resumed);
		hooks.resume(host, event)
	}

	/// Return to the recorded previous state without resume or enter. The
	/// stack entry pushed when that state was suspended is dropped with it so
	/// the stack never holds the current state.
	pub fn backtrack(host: &mut H, event: &Event) -> Result<()> {
		let old = host.context().current;
		let previous = host.context().state(old)?.previous.ok_or(Error::NoPreviousState { state: old })?;
		debug!(from = %old, to = %previous, "backtrack");
		host.context().hooks(old)?.exit(host, event)?;

		let context = host.context_mut();
		context.current = previous;
		if context.stack.last() == Some(&previous) {
			context.stack.pop();
		}
		host.state_changed(previous);
		Ok(())
	}

	/// Run `command` through the invoker owned by `owner`.
	pub fn execute(host: &mut H, owner: StateId, command: impl Command<H> + 'static) -> Result<()> {
		let invoker = host.context().invoker(owner)?;
		invoker.execute(host, Box::new(command))
	}

	pub fn undo(host: &mut H, owner: StateId) -> Result<()> {
		let invoker = host.context().invoker(owner)?;
		invoker.undo(host)
	}
}
