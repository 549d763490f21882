use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use upload_plotter::{run_batch, Cli, Config};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from(Cli::parse());

    match run_batch(&config, io::stdout().lock()) {
        Ok(summary) if summary.has_failures() => {
            error!("{} of {} files failed", summary.failed.len(), summary.total());
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
