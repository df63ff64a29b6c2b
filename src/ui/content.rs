use ratatui::{
	buffer::Buffer,
	layout::Rect,
	style::{Color, Modifier, Style},
	text::{Line, Span},
	widgets::{Paragraph, Widget},
};

use crate::{
	buffer::{Attribute, attrs::SEARCH_MATCH},
	controller::Controller,
};

/// The displayed rows of the active buffer, each prefixed with its line
/// number in the file.
pub(super) struct ContentWidget {
	lines: Vec<Line<'static>>,
}

impl ContentWidget {
	pub(super) fn from_controller(controller: &Controller, area: Rect) -> Self {
		let Some(model) = controller.active_model() else {
			return Self { lines: Vec::new() };
		};
		let buffer = model.buffer();
		let number_width = buffer.len().max(1).to_string().len();
		let lines = (model.first_line()..model.first_line() + usize::from(area.height))
			.map_while(|row| model.displayed_line(row))
			.map(|line| {
				let text = buffer.lines().line(line).unwrap_or_default();
				let mut spans = vec![Span::styled(format!("{:>number_width$} ", line + 1), Style::default().fg(Color::DarkGray))];
				spans.extend(highlight(text, model.attribute(line)));
				Line::from(spans)
			})
			.collect();
		Self { lines }
	}
}

/// Split `text` around the attribute span. Spans that do not fall on char
/// boundaries are drawn plain.
fn highlight(text: &str, attribute: Option<Attribute>) -> Vec<Span<'static>> {
	let Some(attribute) = attribute else {
		return vec![Span::raw(text.to_string())];
	};
	let (Some(head), Some(matched), Some(tail)) =
		(text.get(..attribute.start), text.get(attribute.start..attribute.end), text.get(attribute.end..))
	else {
		return vec![Span::raw(text.to_string())];
	};
	let style = if attribute.mask & SEARCH_MATCH != 0 {
		Style::default().add_modifier(Modifier::REVERSED)
	} else {
		Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
	};
	vec![Span::raw(head.to_string()), Span::styled(matched.to_string(), style), Span::raw(tail.to_string())]
}

impl Widget for ContentWidget {
	fn render(self, area: Rect, buf: &mut Buffer) { Paragraph::new(self.lines).render(area, buf); }
}
