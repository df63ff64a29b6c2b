use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Event, Key};

/// Classify a raw terminal key into an application event. Pure; returns `None`
/// for keys the browser has no category for (media keys, releases, ...).
pub fn classify(key: &KeyEvent) -> Option<Event> {
	if key.kind == KeyEventKind::Release {
		return None;
	}
	let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

	let key = match key.code {
		KeyCode::Char(ch) if ctrl => Key::Ctrl(ch.to_ascii_lowercase()),
		KeyCode::Char(ch) => Key::Char(ch),
		KeyCode::Up if ctrl => Key::CtrlUp,
		KeyCode::Down if ctrl => Key::CtrlDown,
		KeyCode::Left if ctrl => Key::CtrlLeft,
		KeyCode::Right if ctrl => Key::CtrlRight,
		KeyCode::Up => Key::Up,
		KeyCode::Down => Key::Down,
		KeyCode::Left => Key::Left,
		KeyCode::Right => Key::Right,
		KeyCode::Home if ctrl => Key::CtrlHome,
		KeyCode::End if ctrl => Key::CtrlEnd,
		KeyCode::PageUp if ctrl => Key::CtrlPageUp,
		KeyCode::PageDown if ctrl => Key::CtrlPageDown,
		KeyCode::Home => Key::Home,
		KeyCode::End => Key::End,
		KeyCode::PageUp => Key::PageUp,
		KeyCode::PageDown => Key::PageDown,
		KeyCode::Tab => Key::Tab,
		KeyCode::BackTab => Key::BackTab,
		KeyCode::F(n) => Key::F(n),
		KeyCode::Enter => Key::Enter,
		KeyCode::Esc => Key::Esc,
		KeyCode::Backspace => Key::Backspace,
		KeyCode::Delete => Key::Delete,
		KeyCode::Insert => Key::Insert,
		_ => return None,
	};
	Some(Event::key(key))
}
