use std::{
	sync::{Arc, OnceLock, PoisonError, RwLock},
	thread::{self, ThreadId},
};

use tracing::{trace, warn};

use super::queue::Producer;
use crate::event::{Event, Topic};

/// Where model mutations are reported.
pub trait ChangeSink: Send + Sync {
	fn notify(&self, topic: Topic);

	fn report_error(&self, message: &str);

	fn report_fault(&self, message: &str);
}

/// A renderer observing the models. Only ever called on the main thread.
pub trait View: Send + Sync {
	fn notify(&self, topic: Topic);
}

/// Routes change notifications to views: synchronously on the main thread,
/// as a queued redraw event from any other thread.
pub struct RedrawRouter {
	main:     OnceLock<ThreadId>,
	views:    RwLock<Vec<Arc<dyn View>>>,
	producer: Producer,
}

impl RedrawRouter {
	pub fn new(producer: Producer) -> Self { Self { main: OnceLock::new(), views: RwLock::new(Vec::new()), producer } }

	/// Record the calling thread as the main thread. Only the first call
	/// counts; returns whether the caller is the main thread.
	pub fn attach_main_thread(&self) -> bool {
		let current = thread::current().id();
		*self.main.get_or_init(|| current) == current
	}

	pub fn is_main_thread(&self) -> bool { self.main.get().is_some_and(|main| *main == thread::current().id()) }

	pub fn bind_view(&self, view: Arc<dyn View>) {
		self.views.write().unwrap_or_else(PoisonError::into_inner).push(view);
	}

	/// Invoke every view directly.
	pub fn route(&self, topic: Topic) {
		trace!("route {topic:?}");
		for view in self.views.read().unwrap_or_else(PoisonError::into_inner).iter() {
			view.notify(topic);
		}
	}
}

impl ChangeSink for RedrawRouter {
	fn notify(&self, topic: Topic) {
		if self.is_main_thread() {
			self.route(topic);
		} else if let Err(err) = self.producer.push(Event::redraw(topic)) {
			warn!("drop redraw {topic:?}: {err}");
		}
	}

	fn report_error(&self, message: &str) {
		if let Err(err) = self.producer.push(Event::error(message)) {
			warn!("drop error report {message:?}: {err}");
		}
	}

	fn report_fault(&self, message: &str) {
		if let Err(err) = self.producer.push(Event::fault(message)) {
			warn!("drop fault report {message:?}: {err}");
		}
	}
}
