//! Background scan engines.
//!
//! A [`Processor`] owns one worker thread running a [`ScanTask`] over a
//! shared [`Buffer`]. The thread is driven by a control channel: `Rearm`
//! restarts the scan from fresh parameters, `Stop` ends the thread. Pending
//! control messages are drained before every line, and an idle task blocks
//! on the channel.

pub mod filter;
pub mod search;

use std::{
	sync::Arc,
	thread::{self, JoinHandle},
};

use flume::{Receiver, Sender, TryRecvError};
use tracing::{debug, error, info};

pub use self::{filter::FilterTask, search::SearchTask};
use crate::{
	buffer::Buffer,
	error::{Error, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
	Rearm,
	Stop,
}

pub trait ScanTask: Send + 'static {
	const NAME: &'static str;

	/// Reset progress and derived results from the current parameters.
	fn rearm(&mut self, buffer: &Buffer);

	fn is_idle(&self, buffer: &Buffer) -> bool;

	/// Examine exactly one line.
	fn step(&mut self, buffer: &Buffer) -> Result<()>;
}

enum Worker<T> {
	Ready(T, Receiver<Signal>),
	Running(JoinHandle<()>),
	Stopped,
}

pub struct Processor<T: ScanTask> {
	buffer:  Arc<Buffer>,
	control: Sender<Signal>,
	worker:  Worker<T>,
}

impl<T: ScanTask> Processor<T> {
	pub fn new(buffer: Arc<Buffer>, task: T) -> Self {
		let (control, rx) = flume::unbounded();
		Self { buffer, control, worker: Worker::Ready(task, rx) }
	}

	/// Spawn the worker once; later calls do nothing.
	pub fn start(&mut self) -> Result<()> {
		let (task, rx) = match std::mem::replace(&mut self.worker, Worker::Stopped) {
			Worker::Ready(task, rx) => (task, rx),
			other => {
				self.worker = other;
				return Ok(());
			}
		};
		let buffer = Arc::clone(&self.buffer);
		let handle = thread::Builder::new()
			.name(format!("tbrowse-{}", T::NAME))
			.spawn(move || run(task, buffer, rx))
			.map_err(|source| Error::EngineSpawn { name: T::NAME, source })?;
		self.worker = Worker::Running(handle);
		self.signal();
		Ok(())
	}

	/// Parameters changed: restart the scan.
	pub fn signal(&self) {
		if self.control.send(Signal::Rearm).is_err() {
			debug!("{} worker is gone, rearm ignored", T::NAME);
		}
	}

	pub fn stop(&mut self) {
		let Worker::Running(handle) = std::mem::replace(&mut self.worker, Worker::Stopped) else {
			return;
		};
		let _ = self.control.send(Signal::Stop);
		if handle.join().is_err() {
			error!("{} worker panicked", T::NAME);
		}
	}

	pub fn is_running(&self) -> bool { matches!(self.worker, Worker::Running(_)) }

	pub fn buffer(&self) -> &Arc<Buffer> { &self.buffer }
}

impl<T: ScanTask> Drop for Processor<T> {
	fn drop(&mut self) { self.stop(); }
}

fn run<T: ScanTask>(mut task: T, buffer: Arc<Buffer>, control: Receiver<Signal>) {
	info!("{} worker started", T::NAME);
	let mut failed = false;
	loop {
		let mut rearm = false;
		loop {
			match control.try_recv() {
				Ok(Signal::Rearm) => rearm = true,
				Ok(Signal::Stop) | Err(TryRecvError::Disconnected) => {
					info!("{} worker stopped", T::NAME);
					return;
				}
				Err(TryRecvError::Empty) => break,
			}
		}
		if rearm {
			task.rearm(&buffer);
			failed = false;
		}

		if failed || task.is_idle(&buffer) {
			match control.recv() {
				Ok(Signal::Rearm) => {
					task.rearm(&buffer);
					failed = false;
				}
				Ok(Signal::Stop) | Err(_) => {
					info!("{} worker stopped", T::NAME);
					return;
				}
			}
			continue;
		}

		if let Err(err) = task.step(&buffer) {
			let message = format!("{} scan failed: {err}", T::NAME);
			error!("{message}");
			buffer.set_last_scan_error(Some(message.clone()));
			if err.is_recoverable() {
				buffer.report_error(&message);
			} else {
				buffer.report_fault(&message);
			}
			failed = true;
		}
	}
}
