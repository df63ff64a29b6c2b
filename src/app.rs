use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, anyhow};
use tracing::{info, trace};

use crate::{
	buffer::FileLoader,
	config::Config,
	controller::Controller,
	input::start_input_pump,
	pipeline::USER_INPUT,
	ui::{Renderer, TerminalSession, TerminalView},
};

pub struct App {
	controller: Controller,
	view:       Arc<TerminalView>,
	renderer:   Renderer,
}

impl App {
	pub fn new(config: Config) -> Self {
		let controller = Controller::new(config, Box::new(FileLoader));
		let view = Arc::new(TerminalView::new());
		controller.bind_view(view.clone());
		Self { controller, view, renderer: Renderer::new() }
	}

	/// Take over the terminal until the user quits.
	pub fn run(self, file: Option<PathBuf>) -> Result<()> {
		let Self { mut controller, view, mut renderer } = self;
		let mut session = TerminalSession::enter("tbrowse").context("enter terminal session failed")?;
		let interrupt = controller.interrupt();
		let pump = start_input_pump(controller.producer(USER_INPUT), interrupt.clone(), controller.config().poll_interval())
			.context("start input pump failed")?;

		let result = controller.boot(file.as_deref()).context("boot failed").and_then(|()| {
			controller.start(|controller| -> Result<()> {
				if !view.take_dirty() {
					return Ok(());
				}
				session.sync_cursor_style(controller.prompt().is_some())?;
				session.draw(|frame| renderer.render(frame, controller))?;
				trace!("redraw");
				if let Some(height) = renderer.content_height() {
					controller.set_view_size(height);
				}
				Ok(())
			})
			.context("consumer loop failed")
		});

		interrupt.raise();
		pump.join().map_err(|_| anyhow!("input pump panicked"))?;
		info!("terminal released");
		result
	}
}
