use std::{fmt, io};

use crossterm::{
	cursor::SetCursorStyle,
	execute,
	terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use thiserror::Error;

/// Which terminal operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalStep {
	RawMode,
	AlternateScreen,
	Backend,
	Draw,
	CursorShape,
}

impl fmt::Display for TerminalStep {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::RawMode => "enable raw mode",
			Self::AlternateScreen => "enter alternate screen",
			Self::Backend => "create backend",
			Self::Draw => "draw",
			Self::CursorShape => "set cursor shape",
		})
	}
}

#[derive(Debug, Error)]
#[error("terminal: {step} failed")]
pub struct TerminalSessionError {
	pub step: TerminalStep,
	#[source]
	source:   io::Error,
}

fn failed(step: TerminalStep) -> impl FnOnce(io::Error) -> TerminalSessionError {
	move |source| TerminalSessionError { step, source }
}

/// Armed once raw mode is on; dropping it puts the terminal back.
struct Restore;

impl Drop for Restore {
	fn drop(&mut self) {
		if let Err(err) = disable_raw_mode() {
			tracing::warn!("leave raw mode: {err}");
		}
		let _ = execute!(io::stdout(), SetCursorStyle::DefaultUserShape, LeaveAlternateScreen);
	}
}

pub struct TerminalSession {
	terminal:   Terminal<CrosstermBackend<io::Stdout>>,
	bar_cursor: Option<bool>,
	_restore:   Restore,
}

impl TerminalSession {
	pub fn enter(title: &str) -> Result<Self, TerminalSessionError> {
		enable_raw_mode().map_err(failed(TerminalStep::RawMode))?;
		let restore = Restore;
		let mut stdout = io::stdout();
		execute!(stdout, EnterAlternateScreen, SetTitle(title)).map_err(failed(TerminalStep::AlternateScreen))?;
		let terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(failed(TerminalStep::Backend))?;
		Ok(Self { terminal, bar_cursor: None, _restore: restore })
	}

	pub fn draw(&mut self, render: impl FnOnce(&mut Frame<'_>)) -> Result<(), TerminalSessionError> {
		self.terminal.draw(render).map(drop).map_err(failed(TerminalStep::Draw))
	}

	/// Bar cursor while a prompt is edited, block otherwise. Only touches
	/// the terminal when the shape changes.
	pub fn sync_cursor_style(&mut self, prompt: bool) -> Result<(), TerminalSessionError> {
		if self.bar_cursor == Some(prompt) {
			return Ok(());
		}
		let style = if prompt { SetCursorStyle::SteadyBar } else { SetCursorStyle::SteadyBlock };
		execute!(self.terminal.backend_mut(), style).map_err(failed(TerminalStep::CursorShape))?;
		self.bar_cursor = Some(prompt);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::{error::Error as _, io};

	use super::{TerminalStep, failed};

	#[test]
	fn error_should_name_the_failed_step_and_keep_source() {
		let err = failed(TerminalStep::CursorShape)(io::Error::other("tty gone"));
		assert_eq!(err.to_string(), "terminal: set cursor shape failed");
		assert_eq!(err.step, TerminalStep::CursorShape);
		assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("tty gone"));
	}
}
