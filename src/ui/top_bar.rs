use ratatui::{
	buffer::Buffer,
	layout::Rect,
	style::{Color, Modifier, Style},
	text::{Line, Span},
	widgets::{Paragraph, Widget},
};

use crate::controller::Controller;

/// Names of the open buffers, the active one highlighted.
pub(super) struct TopBarWidget {
	buffer_spans: Vec<Span<'static>>,
}

impl TopBarWidget {
	pub(super) fn from_controller(controller: &Controller) -> Self {
		let active = controller.active_id();
		let mut buffer_spans = Vec::new();
		for (idx, (id, model)) in controller.buffers().enumerate() {
			let style = if active == Some(id) {
				Style::default().fg(Color::White).bg(Color::DarkGray).add_modifier(Modifier::BOLD)
			} else {
				Style::default().fg(Color::Gray)
			};
			if idx > 0 {
				buffer_spans.push(Span::raw(" "));
			}
			buffer_spans.push(Span::styled(format!(" {} ", model.buffer().name()), style));
		}
		if buffer_spans.is_empty() {
			buffer_spans.push(Span::styled(" no file ", Style::default().fg(Color::DarkGray)));
		}
		Self { buffer_spans }
	}
}

impl Widget for TopBarWidget {
	fn render(self, area: Rect, buf: &mut Buffer) { Paragraph::new(Line::from(self.buffer_spans)).render(area, buf); }
}
