use std::path::PathBuf;

use thiserror::Error;

use crate::{event::Event, state::StateId};

#[derive(Debug, Error)]
pub enum Error {
	#[error("unhandled event ({event}) injected into state machine from state {state}")]
	UnhandledEvent { state: StateId, event: Event },
	#[error("state {state} has no previous state to backtrack to")]
	NoPreviousState { state: StateId },
	#[error("cannot exit state {state}: state stack is empty")]
	EmptyStateStack { state: StateId },
	#[error("state {state} is not registered")]
	UnknownState { state: StateId },
	#[error("state {state} has no editable text")]
	MissingText { state: StateId },
	#[error("buffer overflow in filtered view of capacity {capacity}")]
	FilteredViewOverflow { capacity: usize },
	#[error("pop on empty queue")]
	EmptyQueue,
	#[error("event queue disconnected while producing from {producer}")]
	QueueDisconnected { producer: &'static str },
	#[error("undo with no executed command")]
	EmptyUndoStack,
	#[error("Cannot open file: {} ({reason})", path.display())]
	OpenFile { path: PathBuf, reason: String },
	#[error("invalid filter pattern {pattern:?}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source:  regex::Error,
	},
	#[error("scan engine failed: {message}")]
	EngineFault { message: String },
	#[error("no active buffer")]
	NoActiveBuffer,
	#[error("spawn {name} worker failed")]
	EngineSpawn {
		name:   &'static str,
		#[source]
		source: std::io::Error,
	},
}

impl Error {
	/// Recoverable errors are routed into the error state; everything else is a
	/// defect in the state graph or in the engines' bookkeeping.
	pub fn is_recoverable(&self) -> bool {
		matches!(self, Self::UnhandledEvent { .. } | Self::OpenFile { .. } | Self::InvalidPattern { .. })
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
