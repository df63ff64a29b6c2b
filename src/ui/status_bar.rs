use ratatui::{
	buffer::Buffer,
	layout::{Constraint, Layout, Position, Rect},
	style::{Color, Modifier, Style},
	text::{Line, Span},
	widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::controller::{Controller, StatusLine};

pub(super) struct StatusBarWidget {
	state:    String,
	status:   Option<StatusLine>,
	position: String,
}

impl StatusBarWidget {
	pub(super) fn from_controller(controller: &Controller) -> Self {
		let status = controller.status();
		let position = status.as_ref().map(position).unwrap_or_default();
		Self { state: controller.state().to_string(), status, position }
	}
}

fn position(status: &StatusLine) -> String {
	let mut position = format!("{}/{}", status.first, status.total);
	if status.at_top {
		position.push_str(" Top");
	}
	if status.at_end {
		position.push_str(" End");
	}
	if let Some(progress) = status.progress {
		position.push_str(&format!(" {progress}%"));
	}
	position.push(' ');
	position
}

impl Widget for StatusBarWidget {
	fn render(self, area: Rect, buf: &mut Buffer) {
		let mut left = vec![Span::styled(
			format!(" {} ", self.state),
			Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD),
		)];
		if let Some(status) = &self.status {
			left.push(Span::raw(format!(" {}", status.name)));
			if status.filtering {
				left.push(Span::styled(" [filter]", Style::default().fg(Color::Yellow)));
			}
			if !status.filters.is_empty() {
				left.push(Span::raw(format!(" {}", status.filters)));
			}
			if !status.attributes {
				left.push(Span::styled(" [plain]", Style::default().fg(Color::DarkGray)));
			}
		}
		let width = u16::try_from(self.position.width()).unwrap_or(u16::MAX).min(area.width);
		let chunks = Layout::horizontal([Constraint::Min(1), Constraint::Length(width)]).split(area);
		Paragraph::new(Line::from(left)).render(chunks[0], buf);
		Paragraph::new(self.position).render(chunks[1], buf);
	}
}

/// Label plus editable text of the current prompt state.
pub(super) struct PromptWidget {
	label: String,
	text:  String,
}

impl PromptWidget {
	/// Also returns where the terminal cursor belongs, if a prompt is shown.
	pub(super) fn from_controller(controller: &Controller, area: Rect) -> (Self, Option<Position>) {
		let Some(prompt) = controller.prompt() else {
			return (Self { label: String::new(), text: String::new() }, None);
		};
		let before_cursor: String = prompt.text.chars().take(prompt.cursor).collect();
		let offset = prompt.label.width() + before_cursor.width();
		let x = area.x.saturating_add(u16::try_from(offset).unwrap_or(u16::MAX));
		let cursor = Position::new(x.min(area.right().saturating_sub(1)), area.y);
		(Self { label: prompt.label, text: prompt.text }, Some(cursor))
	}
}

impl Widget for PromptWidget {
	fn render(self, area: Rect, buf: &mut Buffer) {
		Paragraph::new(Line::from(vec![Span::styled(self.label, Style::default().add_modifier(Modifier::BOLD)), Span::raw(self.text)]))
			.render(area, buf);
	}
}
