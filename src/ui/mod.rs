mod content;
mod status_bar;
mod terminal_session;
mod top_bar;

use std::sync::atomic::{AtomicBool, Ordering};

use ratatui::layout::{Constraint, Layout, Rect};
use tracing::trace;

use crate::{controller::Controller, event::Topic, pipeline::View};
use content::ContentWidget;
use status_bar::{PromptWidget, StatusBarWidget};
pub use terminal_session::{TerminalSession, TerminalSessionError, TerminalStep};
use top_bar::TopBarWidget;

/// The terminal as a [`View`]: notifications only mark it dirty, the frame
/// is drawn when the consumer loop goes idle.
#[derive(Debug)]
pub struct TerminalView {
	dirty: AtomicBool,
}

impl TerminalView {
	pub fn new() -> Self { Self { dirty: AtomicBool::new(true) } }

	/// Whether anything changed since the last call.
	pub fn take_dirty(&self) -> bool { self.dirty.swap(false, Ordering::AcqRel) }
}

impl Default for TerminalView {
	fn default() -> Self { Self::new() }
}

impl View for TerminalView {
	fn notify(&self, topic: Topic) {
		trace!("view invalidated by {topic:?}");
		self.dirty.store(true, Ordering::Release);
	}
}

pub struct Renderer {
	last_content_area: Option<Rect>,
}

impl Renderer {
	pub fn new() -> Self { Self { last_content_area: None } }

	pub fn render(&mut self, frame: &mut ratatui::Frame<'_>, controller: &Controller) {
		let chunks =
			Layout::vertical([Constraint::Length(1), Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
				.split(frame.area());
		self.last_content_area = Some(chunks[1]);

		frame.render_widget(TopBarWidget::from_controller(controller), chunks[0]);
		frame.render_widget(ContentWidget::from_controller(controller, chunks[1]), chunks[1]);
		frame.render_widget(StatusBarWidget::from_controller(controller), chunks[2]);
		let (prompt, cursor) = PromptWidget::from_controller(controller, chunks[3]);
		frame.render_widget(prompt, chunks[3]);
		if let Some(cursor) = cursor {
			frame.set_cursor_position(cursor);
		}
	}

	/// Rows of the content area in the last frame; one page when scrolling.
	pub fn content_height(&self) -> Option<usize> { self.last_content_area.map(|area| usize::from(area.height)) }
}

impl Default for Renderer {
	fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
	use super::TerminalView;
	use crate::{event::Topic, pipeline::View};

	#[test]
	fn view_should_start_dirty_and_clear_on_take() {
		let view = TerminalView::new();
		assert!(view.take_dirty());
		assert!(!view.take_dirty());
		view.notify(Topic::Buffer);
		assert!(view.take_dirty());
	}
}
