use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "tbrowse", version, about = "Browse text files with live regex filters and incremental search")]
pub struct Cli {
	/// File to open at startup. Without it the browser asks for one.
	pub file: Option<PathBuf>,

	/// Config file (defaults to `<config dir>/tbrowse/config.toml`).
	#[arg(short, long)]
	pub config: Option<PathBuf>,

	/// Log filter used when `RUST_LOG` is unset, e.g. `debug` or `tbrowse=trace`.
	#[arg(long = "log-filter")]
	pub log_filter: Option<String>,
}
