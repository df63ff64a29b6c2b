use super::{ActionMap, Context, Host, Lifecycle, State, StateId, text::LineEditor};
use crate::{
	error::Error,
	event::{Category, Event, Key, Matcher},
};

struct Recorder {
	context: Context<Recorder>,
	fired:   Vec<&'static str>,
	hooks:   Vec<String>,
	changes: Vec<StateId>,
}

impl Host for Recorder {
	fn context(&self) -> &Context<Self> { &self.context }

	fn context_mut(&mut self) -> &mut Context<Self> { &mut self.context }

	fn state_changed(&mut self, state: StateId) { self.changes.push(state); }
}

struct Trace(StateId);

impl Lifecycle<Recorder> for Trace {
	fn enter(&self, host: &mut Recorder, _event: &Event) -> crate::error::Result<()> {
		host.hooks.push(format!("enter {}", self.0));
		Ok(())
	}

	fn exit(&self, host: &mut Recorder, _event: &Event) -> crate::error::Result<()> {
		host.hooks.push(format!("exit {}", self.0));
		Ok(())
	}

	fn suspend(&self, host: &mut Recorder, _event: &Event) -> crate::error::Result<()> {
		host.hooks.push(format!("suspend {}", self.0));
		Ok(())
	}

	fn resume(&self, host: &mut Recorder, _event: &Event) -> crate::error::Result<()> {
		host.hooks.push(format!("resume {}", self.0));
		Ok(())
	}
}

fn fire(name: &'static str) -> impl Fn(&mut Recorder, &Event) -> crate::error::Result<()> {
	move |host: &mut Recorder, _event: &Event| {
		host.fired.push(name);
		Ok(())
	}
}

/// Default (root) <- Open <- Browse, plus Search as a sibling under Default.
fn recorder() -> Recorder {
	let root = State::new(
		StateId::Default,
		None,
		ActionMap::new().bind(Key::Char('a'), fire("h")).bind(Key::Ctrl('c'), fire("exit")),
	)
	.with_hooks(Trace(StateId::Default));
	let mut context = Context::new(root);
	context.register(State::new(StateId::Open, Some(StateId::Default), ActionMap::new()).with_hooks(Trace(StateId::Open)));
	context.register(
		State::new(
			StateId::Browse,
			Some(StateId::Open),
			ActionMap::new().bind(Key::Char('a'), fire("f")).bind(Key::Char('b'), fire("g")),
		)
		.with_hooks(Trace(StateId::Browse)),
	);
	context.register(
		State::new(StateId::Search, Some(StateId::Default), ActionMap::new().bind(Matcher::any(Category::Printable), fire("any")))
			.with_hooks(Trace(StateId::Search))
			.with_text(LineEditor::new()),
	);
	Recorder { context, fired: Vec::new(), hooks: Vec::new(), changes: Vec::new() }
}

fn event() -> Event { Event::key(Key::Enter) }

#[test]
fn child_binding_should_shadow_parent_binding() {
	let mut host = recorder();
	Context::change_state(&mut host, StateId::Browse, &event()).expect("change to browse");

	Context::inject(&mut host, &Event::key(Key::Char('a'))).expect("a is bound");
	assert_eq!(host.fired, vec!["f"]);
}

#[test]
fn unbound_event_should_escalate_through_parents() {
	let mut host = recorder();
	Context::change_state(&mut host, StateId::Browse, &event()).expect("change to browse");

	Context::inject(&mut host, &Event::key(Key::Ctrl('c'))).expect("root binds ctrl-c");
	assert_eq!(host.fired, vec!["exit"]);
}

#[test]
fn event_no_ancestor_binds_should_be_reported() {
	let mut host = recorder();
	Context::change_state(&mut host, StateId::Browse, &event()).expect("change to browse");

	let err = Context::inject(&mut host, &Event::key(Key::F(5))).expect_err("f5 is unbound");
	assert!(matches!(err, Error::UnhandledEvent { state: StateId::Browse, .. }));
	assert!(err.is_recoverable());
}

#[test]
fn wildcard_binding_should_accept_any_printable() {
	let mut host = recorder();
	Context::enter_state(&mut host, StateId::Search, &event()).expect("enter search");
	Context::inject(&mut host, &Event::key(Key::Char('z'))).expect("printable is bound");
	Context::inject(&mut host, &Event::key(Key::Char('a'))).expect("printable is bound");
	assert_eq!(host.fired, vec!["any", "any"]);
}

#[test]
fn enter_then_exit_should_suspend_and_resume_exactly_once() {
	let mut host = recorder();
	Context::change_state(&mut host, StateId::Browse, &event()).expect("change to browse");
	host.hooks.clear();

	Context::enter_state(&mut host, StateId::Search, &event()).expect("enter search");
	assert_eq!(host.context.stack(), &[StateId::Browse]);
	assert_eq!(host.context.previous_of(StateId::Search), Some(StateId::Browse));

	Context::exit_state(&mut host, &event()).expect("exit search");
	assert_eq!(host.context.current(), StateId::Browse);
	assert!(host.context.stack().is_empty());
	assert_eq!(host.hooks, vec!["suspend BROWSE", "enter SEARCH", "exit SEARCH", "resume BROWSE"]);
}

#[test]
fn change_state_should_exit_old_enter_new_and_clear_previous() {
	let mut host = recorder();
	Context::enter_state(&mut host, StateId::Search, &event()).expect("enter search");
	Context::exit_state(&mut host, &event()).expect("exit search");
	assert_eq!(host.context.previous_of(StateId::Search), Some(StateId::Default));
	host.hooks.clear();

	Context::change_state(&mut host, StateId::Search, &event()).expect("change to search");
	assert_eq!(host.hooks, vec!["exit DEFAULT", "enter SEARCH"]);
	assert_eq!(host.context.previous_of(StateId::Search), None);
	assert_eq!(host.changes.last(), Some(&StateId::Search));
}

#[test]
fn exit_state_with_empty_stack_should_fail() {
	let mut host = recorder();
	let err = Context::exit_state(&mut host, &event()).expect_err("stack is empty");
	assert!(matches!(err, Error::EmptyStateStack { state: StateId::Default }));
	assert!(host.hooks.is_empty());
}

#[test]
fn backtrack_without_previous_should_fail() {
	let mut host = recorder();
	Context::change_state(&mut host, StateId::Browse, &event()).expect("change to browse");
	let err = Context::backtrack(&mut host, &event()).expect_err("browse has no previous");
	assert!(matches!(err, Error::NoPreviousState { state: StateId::Browse }));
	assert!(!err.is_recoverable());
}

#[test]
fn backtrack_should_skip_resume_and_drop_stack_entry() {
	let mut host = recorder();
	Context::enter_state(&mut host, StateId::Search, &event()).expect("enter search");
	host.hooks.clear();

	Context::backtrack(&mut host, &event()).expect("backtrack to default");
	assert_eq!(host.context.current(), StateId::Default);
	assert!(host.context.stack().is_empty());
	assert_eq!(host.hooks, vec!["exit SEARCH"]);
}

#[test]
fn action_may_drive_transitions_reentrantly() {
	let mut host = recorder();
	let actions = ActionMap::new().bind(Key::Tab, |host: &mut Recorder, event: &Event| {
		Context::enter_state(host, StateId::Search, event)?;
		Context::inject(host, &Event::key(Key::Char('x')))
	});
	host.context.register(State::new(StateId::Close, Some(StateId::Default), actions));
	Context::change_state(&mut host, StateId::Close, &event()).expect("change to close");

	Context::inject(&mut host, &Event::key(Key::Tab)).expect("tab is bound");
	assert_eq!(host.context.current(), StateId::Search);
	assert_eq!(host.fired, vec!["any"]);
}

#[test]
fn text_should_only_exist_on_prompt_states() {
	let mut host = recorder();
	host.context.text_mut(StateId::Search).expect("search has text").insert('q');
	assert_eq!(host.context.text(StateId::Search).expect("search has text").text(), "q");
	assert!(matches!(host.context.text(StateId::Browse), Err(Error::MissingText { .. })));
	assert!(!host.context.invoker(StateId::Browse).expect("browse is registered").can_undo());
}
