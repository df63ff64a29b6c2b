use std::time::Duration;

use flume::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use tracing::{error, trace};

use crate::{
	error::{Error, Result},
	event::Event,
};

pub const USER_INPUT: &str = "user-input";
pub const PROCESSOR_SIGNAL: &str = "processor-signal";
pub const CONTROLLER: &str = "controller";

/// Unbounded multi-producer FIFO of events with a single consumer.
pub struct WorkQueue {
	tx: Sender<Event>,
	rx: Receiver<Event>,
}

impl WorkQueue {
	pub fn new() -> Self {
		let (tx, rx) = flume::unbounded();
		Self { tx, rx }
	}

	pub fn producer(&self, name: &'static str) -> Producer { Producer { name, tx: self.tx.clone() } }

	pub fn into_consumer(self) -> Consumer { Consumer { tx: self.tx, rx: self.rx, lookahead: None } }
}

impl Default for WorkQueue {
	fn default() -> Self { Self::new() }
}

/// Named handle pushing into a [`WorkQueue`]. Order is FIFO per producer.
#[derive(Clone)]
pub struct Producer {
	name: &'static str,
	tx:   Sender<Event>,
}

impl Producer {
	pub fn name(&self) -> &'static str { self.name }

	pub fn push(&self, event: Event) -> Result<()> {
		trace!(producer = self.name, %event, "push");
		self.tx.send(event).map_err(|_| {
			error!("event queue disconnected while pushing from {}", self.name);
			Error::QueueDisconnected { producer: self.name }
		})
	}
}

impl std::fmt::Debug for Producer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.debug_tuple("Producer").field(&self.name).finish() }
}

/// Receiving end. Holds one event of lookahead so it can offer `peek`.
pub struct Consumer {
	tx:        Sender<Event>,
	rx:        Receiver<Event>,
	lookahead: Option<Event>,
}

impl Consumer {
	pub fn producer(&self, name: &'static str) -> Producer { Producer { name, tx: self.tx.clone() } }

	/// Blocks until an event is available.
	pub fn take(&mut self) -> Result<Event> {
		if let Some(event) = self.lookahead.take() {
			return Ok(event);
		}
		self.rx.recv().map_err(|_| Error::QueueDisconnected { producer: "consumer" })
	}

	/// Non-blocking pop; an empty queue is a caller error.
	pub fn try_take(&mut self) -> Result<Event> {
		if let Some(event) = self.lookahead.take() {
			return Ok(event);
		}
		match self.rx.try_recv() {
			Ok(event) => Ok(event),
			Err(TryRecvError::Empty) => Err(Error::EmptyQueue),
			Err(TryRecvError::Disconnected) => Err(Error::QueueDisconnected { producer: "consumer" }),
		}
	}

	pub fn take_timeout(&mut self, timeout: Duration) -> Result<Option<Event>> {
		if let Some(event) = self.lookahead.take() {
			return Ok(Some(event));
		}
		match self.rx.recv_timeout(timeout) {
			Ok(event) => Ok(Some(event)),
			Err(RecvTimeoutError::Timeout) => Ok(None),
			Err(RecvTimeoutError::Disconnected) => Err(Error::QueueDisconnected { producer: "consumer" }),
		}
	}

	pub fn peek(&mut self) -> Option<&Event> {
		if self.lookahead.is_none() {
			self.lookahead = self.rx.try_recv().ok();
		}
		self.lookahead.as_ref()
	}

	pub fn is_empty(&self) -> bool { self.lookahead.is_none() && self.rx.is_empty() }

	pub fn pending(&self) -> usize { self.rx.len() + usize::from(self.lookahead.is_some()) }

	/// Swallow the redraws queued right behind `event` when it is a redraw,
	/// merging their topics into the one that is returned.
	pub fn coalesce(&mut self, event: Event) -> Event {
		let Some(mut topic) = event.redraw_topic() else {
			return event;
		};
		let mut dropped = 0usize;
		while let Some(next) = self.peek().and_then(Event::redraw_topic) {
			topic = topic.merge(next);
			self.lookahead = None;
			dropped += 1;
		}
		if dropped == 0 {
			return event;
		}
		trace!("coalesced {dropped} redraw events into {topic:?}");
		Event::redraw(topic)
	}
}

#[cfg(test)]
mod tests {
	use std::{thread, time::Duration};

	use super::{PROCESSOR_SIGNAL, USER_INPUT, WorkQueue};
	use crate::{
		error::Error,
		event::{Event, Key, Topic},
	};

	#[test]
	fn try_take_on_empty_queue_should_fail() {
		let mut consumer = WorkQueue::new().into_consumer();
		assert!(matches!(consumer.try_take(), Err(Error::EmptyQueue)));
		assert!(consumer.peek().is_none());
	}

	#[test]
	fn peek_should_not_consume() {
		let queue = WorkQueue::new();
		let producer = queue.producer(USER_INPUT);
		let mut consumer = queue.into_consumer();
		producer.push(Event::key(Key::Char('a'))).expect("push");

		assert_eq!(consumer.peek(), Some(&Event::key(Key::Char('a'))));
		assert_eq!(consumer.pending(), 1);
		assert_eq!(consumer.try_take().expect("take"), Event::key(Key::Char('a')));
		assert!(consumer.is_empty());
	}

	#[test]
	fn consecutive_redraws_should_dispatch_once_before_next_event() {
		let queue = WorkQueue::new();
		let producer = queue.producer(PROCESSOR_SIGNAL);
		let mut consumer = queue.into_consumer();
		for _ in 0..4 {
			producer.push(Event::redraw(Topic::Buffer)).expect("push redraw");
		}
		producer.push(Event::key(Key::Down)).expect("push key");

		let first = consumer.take().expect("take");
		assert_eq!(consumer.coalesce(first), Event::redraw(Topic::Buffer));
		assert_eq!(consumer.take().expect("take"), Event::key(Key::Down));
		assert!(consumer.is_empty());
	}

	#[test]
	fn coalescing_mixed_topics_should_redraw_all() {
		let queue = WorkQueue::new();
		let producer = queue.producer(PROCESSOR_SIGNAL);
		let mut consumer = queue.into_consumer();
		producer.push(Event::redraw(Topic::Prompt)).expect("push");
		producer.push(Event::redraw(Topic::Buffer)).expect("push");

		let first = consumer.take().expect("take");
		assert_eq!(consumer.coalesce(first), Event::redraw(Topic::All));
	}

	#[test]
	fn non_redraw_should_not_coalesce() {
		let queue = WorkQueue::new();
		let producer = queue.producer(USER_INPUT);
		let mut consumer = queue.into_consumer();
		producer.push(Event::redraw(Topic::Buffer)).expect("push");

		let event = Event::key(Key::Enter);
		assert_eq!(consumer.coalesce(event.clone()), event);
		assert_eq!(consumer.pending(), 1);
	}

	#[test]
	fn take_should_block_until_another_thread_pushes() {
		let queue = WorkQueue::new();
		let producer = queue.producer(USER_INPUT);
		let mut consumer = queue.into_consumer();
		let pusher = thread::spawn(move || {
			thread::sleep(Duration::from_millis(20));
			producer.push(Event::key(Key::Esc)).expect("push from thread");
		});
		assert_eq!(consumer.take().expect("blocking take"), Event::key(Key::Esc));
		pusher.join().expect("pusher thread");
	}

	#[test]
	fn take_timeout_should_return_none_when_idle() {
		let mut consumer = WorkQueue::new().into_consumer();
		assert_eq!(consumer.take_timeout(Duration::from_millis(5)).expect("connected"), None);
	}
}
