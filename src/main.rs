use anyhow::{Context, Result};
use clap::Parser;
use tbrowse::{app::App, cli::Cli, config::Config, logging};

fn main() {
	if let Err(err) = run() {
		eprintln!("{:#}", err);
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let cli = Cli::parse();
	let mut config = Config::load(cli.config.as_deref()).context("load config failed")?;
	if let Some(filter) = cli.log_filter {
		config.log_filter = filter;
	}
	logging::init_logging(&config.log_filter).context("initialize logging failed")?;
	App::new(config).run(cli.file).context("run app failed")
}
