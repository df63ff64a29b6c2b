//! Terminal input pump: reads crossterm events on its own thread and feeds
//! the classified ones into the work queue.

use std::{
	io,
	thread::{self, JoinHandle},
	time::Duration,
};

use crossterm::event::{self, Event as TerminalEvent};
use tracing::{error, info};

use crate::{
	controller::Interrupt,
	event::{Event, Topic, keymap::classify},
	pipeline::Producer,
};

pub struct InputHandler;

impl InputHandler {
	pub fn new() -> Self { Self }

	pub fn event(&self, event: &TerminalEvent) -> Option<Event> {
		match event {
			TerminalEvent::Resize(..) => Some(Event::redraw(Topic::All)),
			TerminalEvent::Key(key) => classify(key),
			_ => None,
		}
	}
}

impl Default for InputHandler {
	fn default() -> Self { Self::new() }
}

/// Polls with `poll` so a raised interrupt is observed within one period.
pub fn start_input_pump(producer: Producer, interrupt: Interrupt, poll: Duration) -> io::Result<JoinHandle<()>> {
	let handler = InputHandler::new();
	thread::Builder::new().name("tbrowse-input".to_string()).spawn(move || {
		while !interrupt.is_raised() {
			match event::poll(poll) {
				Ok(true) => {}
				Ok(false) => continue,
				Err(err) => {
					error!("input pump stopped: failed to poll terminal: {err}");
					interrupt.raise();
					break;
				}
			}
			let terminal_event = match event::read() {
				Ok(terminal_event) => terminal_event,
				Err(err) => {
					error!("input pump stopped: failed to read terminal event: {err}");
					interrupt.raise();
					break;
				}
			};
			let Some(event) = handler.event(&terminal_event) else {
				continue;
			};
			if let Err(err) = producer.push(event) {
				error!("input pump stopped: {err}");
				break;
			}
		}
		info!("input pump finished");
	})
}
