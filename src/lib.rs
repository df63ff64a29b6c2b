pub mod app;
pub mod buffer;
pub mod cli;
pub mod command;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod event;
pub mod input;
pub mod logging;
pub mod paths;
pub mod pipeline;
pub mod state;
pub mod ui;

pub use error::{Error, Result};
