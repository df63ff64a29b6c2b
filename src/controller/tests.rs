use std::{
	collections::HashMap,
	path::{Path, PathBuf},
};

use super::Controller;
use crate::{
	buffer::{BufferLoader, Combine, LineArena},
	config::Config,
	engine::testing::wait_until,
	error::{Error, Result},
	event::{AppEvent, Event, Key},
	state::StateId,
};

struct MemoryLoader(HashMap<PathBuf, String>);

impl BufferLoader for MemoryLoader {
	fn load(&self, path: &Path) -> Result<LineArena> {
		self.0
			.get(path)
			.map(|text| LineArena::from_text(text))
			.ok_or_else(|| Error::OpenFile { path: path.to_path_buf(), reason: "no such file".to_string() })
	}
}

/// Thirty lines; every third one (0, 3, ..., 27) is an error about the disk.
fn log_text() -> String {
	(0..30)
		.map(|n| if n % 3 == 0 { format!("{n} error disk full\n") } else { format!("{n} info ok\n") })
		.collect()
}

fn controller() -> Controller {
	let files = HashMap::from([(PathBuf::from("app.log"), log_text())]);
	let mut controller = Controller::new(Config::default(), Box::new(MemoryLoader(files)));
	controller.set_view_size(10);
	controller
}

fn opened() -> Controller {
	let mut controller = controller();
	controller.boot(Some(Path::new("app.log"))).expect("boot with file");
	controller.drain_pending().expect("drain after boot");
	controller
}

fn press(controller: &mut Controller, keys: &[Key]) {
	for &key in keys {
		controller.dispatch(&Event::key(key)).expect("dispatch key");
		controller.drain_pending().expect("drain after key");
	}
}

fn type_text(controller: &mut Controller, text: &str) {
	for ch in text.chars() {
		press(controller, &[Key::Char(ch)]);
	}
}

fn settle(controller: &mut Controller, done: impl Fn(&Controller) -> bool) -> bool {
	wait_until(|| {
		controller.drain_pending().expect("drain while settling");
		done(controller)
	})
}

fn displayed(controller: &Controller) -> Vec<String> {
	let model = controller.active_model().expect("active buffer");
	(0..model.displayed_len())
		.filter_map(|row| model.displayed_line(row))
		.filter_map(|line| model.buffer().lines().line(line).map(str::to_string))
		.collect()
}

#[test]
fn boot_without_file_should_prompt_for_one() {
	let mut controller = controller();
	controller.boot(None).expect("boot");

	assert_eq!(controller.state(), StateId::Opening);
	assert_eq!(controller.state_stack(), &[StateId::Close]);
	let prompt = controller.prompt().expect("opening prompt");
	assert_eq!(prompt.label, "Open file: ");
	assert!(prompt.text.is_empty());
}

#[test]
fn file_typed_into_prompt_should_open_and_browse() {
	let mut controller = controller();
	controller.boot(None).expect("boot");
	type_text(&mut controller, "app.log");
	press(&mut controller, &[Key::Enter]);

	assert_eq!(controller.state(), StateId::Browse);
	assert_eq!(controller.state_stack(), &[StateId::Close, StateId::Open]);
	assert_eq!(controller.prompt(), None);
	let status = controller.status().expect("status of open buffer");
	assert_eq!(status.name, "app.log");
	assert_eq!(status.total, 30);
	assert!(status.at_top);
}

#[test]
fn undo_in_prompt_should_restore_text() {
	let mut controller = controller();
	controller.boot(None).expect("boot");
	type_text(&mut controller, "ab");
	press(&mut controller, &[Key::Ctrl('z')]);

	assert_eq!(controller.prompt().expect("opening prompt").text, "a");
	assert_eq!(controller.state(), StateId::Opening);
}

#[test]
fn missing_file_should_show_error_then_return_to_prompt() {
	let mut controller = controller();
	controller.boot(Some(Path::new("absent.log"))).expect("boot");

	assert_eq!(controller.state(), StateId::Error);
	assert!(controller.prompt().expect("error prompt").label.contains("absent.log"));

	press(&mut controller, &[Key::Enter]);
	assert_eq!(controller.state(), StateId::Opening);
	let prompt = controller.prompt().expect("opening prompt");
	assert_eq!(prompt.label, "Open file: ");
	assert_eq!(prompt.text, "absent.log");
}

#[test]
fn scrolling_should_clamp_and_undo_should_restore() {
	let mut controller = opened();

	press(&mut controller, &[Key::PageDown]);
	assert_eq!(controller.first_line(), Some(10));
	press(&mut controller, &[Key::End]);
	assert_eq!(controller.first_line(), Some(20));
	assert!(controller.status().expect("status").at_end);
	press(&mut controller, &[Key::Down]);
	assert_eq!(controller.first_line(), Some(21));
	press(&mut controller, &[Key::Ctrl('z')]);
	assert_eq!(controller.first_line(), Some(20));
	press(&mut controller, &[Key::CtrlHome, Key::Up]);
	assert_eq!(controller.first_line(), Some(0));
}

#[test]
fn attributes_toggle_should_be_undoable() {
	let mut controller = opened();
	press(&mut controller, &[Key::Ctrl('a')]);
	assert!(!controller.status().expect("status").attributes);
	press(&mut controller, &[Key::Ctrl('z')]);
	assert!(controller.status().expect("status").attributes);
}

#[test]
fn committed_filter_should_narrow_display_until_reset() {
	let mut controller = opened();
	press(&mut controller, &[Key::Ctrl('f')]);
	assert_eq!(controller.state(), StateId::AddFilter);
	assert_eq!(controller.state_stack(), &[StateId::Close, StateId::Open, StateId::Browse, StateId::Filter]);
	assert_eq!(controller.prompt().expect("filter prompt").label, "Filter: ");

	type_text(&mut controller, "error");
	press(&mut controller, &[Key::Enter]);
	assert_eq!(controller.state(), StateId::Filter);
	assert_eq!(controller.filter_count(), 1);
	assert!(settle(&mut controller, |controller| controller.status().is_some_and(|status| status.total == 10)));
	assert!(displayed(&controller).iter().all(|line| line.contains("error")));

	press(&mut controller, &[Key::Esc]);
	assert_eq!(controller.state(), StateId::Browse);
	assert_eq!(controller.state_stack(), &[StateId::Close, StateId::Open]);
	assert_eq!(controller.filter_count(), 0);
	assert!(!controller.active_model().expect("active buffer").is_filtering());
}

#[test]
fn typing_a_filter_should_preview_it_as_dynamic_entry() {
	let mut controller = opened();
	press(&mut controller, &[Key::Ctrl('f')]);
	type_text(&mut controller, "e");
	assert_eq!(controller.filter_count(), 0);
	type_text(&mut controller, "r");
	assert_eq!(controller.filter_count(), 1);
	press(&mut controller, &[Key::Backspace]);
	assert_eq!(controller.filter_count(), 0);
}

#[test]
fn empty_filter_prompt_should_fall_back_to_browse() {
	let mut controller = opened();
	press(&mut controller, &[Key::Ctrl('f'), Key::Esc]);

	assert_eq!(controller.state(), StateId::Browse);
	assert_eq!(controller.state_stack(), &[StateId::Close, StateId::Open]);
	assert!(!controller.active_model().expect("active buffer").is_filtering());
}

#[test]
fn invalid_pattern_should_show_error_and_resume_prompt() {
	let mut controller = opened();
	press(&mut controller, &[Key::Ctrl('f')]);
	type_text(&mut controller, "(");
	press(&mut controller, &[Key::Enter]);
	assert_eq!(controller.state(), StateId::Error);

	press(&mut controller, &[Key::Esc]);
	assert_eq!(controller.state(), StateId::AddFilter);
	let prompt = controller.prompt().expect("filter prompt");
	assert_eq!(prompt.label, "Filter: ");
	assert_eq!(prompt.text, "(");
}

#[test]
fn undo_in_filter_should_drop_last_committed_entry() {
	let mut controller = opened();
	press(&mut controller, &[Key::Ctrl('f')]);
	type_text(&mut controller, "error");
	press(&mut controller, &[Key::Enter, Key::Ctrl('f')]);
	type_text(&mut controller, "disk");
	press(&mut controller, &[Key::Enter]);
	assert_eq!(controller.filter_count(), 2);
	assert_eq!(controller.status().expect("status").filters, "error & disk");

	press(&mut controller, &[Key::Ctrl('z')]);
	assert_eq!(controller.filter_count(), 1);
	assert_eq!(controller.state(), StateId::Filter);
}

#[test]
fn ctrl_o_should_switch_combine_mode() {
	let mut controller = opened();
	press(&mut controller, &[Key::Ctrl('f')]);
	type_text(&mut controller, "error");
	press(&mut controller, &[Key::Enter, Key::Ctrl('o')]);
	assert_eq!(controller.status().expect("status").combine, Combine::Or);
	press(&mut controller, &[Key::Ctrl('z')]);
	assert_eq!(controller.status().expect("status").combine, Combine::And);
}

#[test]
fn search_should_jump_between_found_items() {
	let mut controller = opened();
	press(&mut controller, &[Key::Char('/')]);
	assert_eq!(controller.state(), StateId::Search);
	assert_eq!(controller.prompt().expect("search prompt").label, "/");

	type_text(&mut controller, "disk");
	assert!(settle(&mut controller, |controller| controller.found_items().len() == 10));
	press(&mut controller, &[Key::Enter]);
	assert_eq!(controller.state(), StateId::Browse);
	assert_eq!(controller.first_line(), Some(0));

	press(&mut controller, &[Key::Char('n')]);
	assert_eq!(controller.first_line(), Some(3));
	press(&mut controller, &[Key::Char('n'), Key::Char('N')]);
	assert_eq!(controller.first_line(), Some(3));
}

#[test]
fn backward_search_should_accept_match_on_top_line() {
	let mut controller = opened();
	press(&mut controller, &[Key::Down, Key::Down, Key::Down, Key::Char('?')]);
	type_text(&mut controller, "disk");
	assert!(settle(&mut controller, |controller| controller.found_items().len() == 2));
	press(&mut controller, &[Key::Enter]);
	assert_eq!(controller.first_line(), Some(3));
	press(&mut controller, &[Key::Char('N')]);
	assert_eq!(controller.first_line(), Some(0));
}

#[test]
fn escaped_search_should_clear_found_items() {
	let mut controller = opened();
	press(&mut controller, &[Key::End, Key::Char('?')]);
	assert_eq!(controller.prompt().expect("search prompt").label, "?");
	type_text(&mut controller, "disk");
	assert!(settle(&mut controller, |controller| controller.found_items().len() == 7));
	press(&mut controller, &[Key::Esc]);

	assert_eq!(controller.state(), StateId::Browse);
	assert!(settle(&mut controller, |controller| controller.found_items().is_empty()));
}

#[test]
fn engine_error_should_enter_error_state_once() {
	let mut controller = opened();
	controller.dispatch(&Event::error("scan failed")).expect("first error");
	controller.dispatch(&Event::error("scan failed again")).expect("second error");

	assert_eq!(controller.state(), StateId::Error);
	assert_eq!(controller.prompt().expect("error prompt").label, "scan failed again");
	press(&mut controller, &[Key::Enter]);
	assert_eq!(controller.state(), StateId::Browse);
}

#[test]
fn engine_fault_should_end_dispatch_with_defect() {
	let mut controller = opened();
	let buffer = controller.active_model().expect("active buffer").buffer().clone();
	std::thread::spawn(move || buffer.report_fault("filter scan failed: buffer overflow in filtered view of capacity 30"))
		.join()
		.expect("engine thread");

	let err = controller.drain_pending().expect_err("fault is fatal");
	assert!(!err.is_recoverable());
	assert!(matches!(err, Error::EngineFault { ref message } if message.contains("overflow")));
	assert_ne!(controller.state(), StateId::Error);
}

#[test]
fn unbound_key_should_be_reported_as_error() {
	let mut controller = opened();
	press(&mut controller, &[Key::F(9)]);
	assert_eq!(controller.state(), StateId::Error);
	assert!(controller.prompt().expect("error prompt").label.contains("unhandled event"));
}

#[test]
fn file_closed_should_drop_active_buffer() {
	let mut controller = opened();
	controller.dispatch(&Event::app(AppEvent::FileClosed)).expect("close");
	assert!(controller.active_id().is_none());
	assert_eq!(controller.buffers().count(), 0);
}

#[test]
fn ctrl_c_should_raise_interrupt() {
	let mut controller = opened();
	let interrupt = controller.interrupt();
	press(&mut controller, &[Key::Ctrl('c')]);
	assert!(interrupt.is_raised());
}
