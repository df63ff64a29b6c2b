//! Event pipeline between the producers (user input, scan engines) and the
//! single consuming thread.

pub mod queue;
pub mod router;

pub use self::{
	queue::{CONTROLLER, Consumer, PROCESSOR_SIGNAL, Producer, USER_INPUT, WorkQueue},
	router::{ChangeSink, RedrawRouter, View},
};
