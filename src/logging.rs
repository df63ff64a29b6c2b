use thiserror::Error;
use time::macros::format_description;
use tracing_subscriber::{EnvFilter, fmt::time::UtcTime};

use crate::paths::user_log_dir;

pub const LOG_FILE: &str = "tbrowse.log";

#[derive(Debug, Error)]
pub enum LoggingError {
	#[error("create log directory failed")]
	CreateLogDir {
		#[source]
		source: std::io::Error,
	},
	#[error("initialize tracing subscriber failed")]
	InitSubscriber {
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
}

/// Log to `tbrowse.log` in the user log directory. `RUST_LOG` wins over
/// `default_filter`. Never writes to the terminal, which is in raw mode
/// while the browser runs.
pub fn init_logging(default_filter: &str) -> Result<(), LoggingError> {
	let log_dir = user_log_dir();
	std::fs::create_dir_all(&log_dir).map_err(|source| LoggingError::CreateLogDir { source })?;

	let timer = UtcTime::new(format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"));
	let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
	tracing_subscriber::fmt()
		.with_timer(timer)
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
		.with_writer(file_appender)
		.with_thread_names(true)
		.with_ansi(false)
		.try_init()
		.map_err(|source| LoggingError::InitSubscriber { source })?;

	Ok(())
}
