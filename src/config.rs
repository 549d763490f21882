use std::path::PathBuf;

use clap::Parser;

use crate::plot::PlotStyle;

/// Where upload-time CSVs are read from when no directory is given.
pub const DEFAULT_INPUT_DIR: &str = "/data/users/sburnett/upload-times-csv";
/// Output subdirectory, relative to the input directory.
pub const DEFAULT_PLOTS_SUBDIR: &str = "plots";

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Plot upload received-vs-created times, one PNG per `<experiment>_<node>.csv`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the CSV files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,

    /// Directory for the PNG files [default: <INPUT_DIR>/plots]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Report bad files as failed and continue instead of stopping the batch
    #[arg(long)]
    pub keep_going: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "FILE")]
    pub summary_json: Option<PathBuf>,

    /// Plot width in pixels
    #[arg(long, default_value_t = PlotStyle::default().width)]
    pub width: u32,

    /// Plot height in pixels
    #[arg(long, default_value_t = PlotStyle::default().height)]
    pub height: u32,
}

// ---------------------------------------------------------------------------
// Resolved run configuration
// ---------------------------------------------------------------------------

/// Everything one batch run needs.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub keep_going: bool,
    pub summary_json: Option<PathBuf>,
    pub style: PlotStyle,
}

impl Config {
    /// Defaults for `input_dir`: plots go to `<input_dir>/plots`, the batch
    /// stops on the first bad file.
    pub fn for_input_dir(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        Config {
            output_dir: input_dir.join(DEFAULT_PLOTS_SUBDIR),
            input_dir,
            keep_going: false,
            summary_json: None,
            style: PlotStyle::default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::for_input_dir(DEFAULT_INPUT_DIR)
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        let mut config = Config::for_input_dir(cli.input_dir);
        if let Some(output_dir) = cli.output_dir {
            config.output_dir = output_dir;
        }
        config.keep_going = cli.keep_going;
        config.summary_json = cli.summary_json;
        config.style.width = cli.width;
        config.style.height = cli.height;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_reproduce_fixed_paths() {
        let config = Config::from(Cli::parse_from(["upload-plotter"]));
        assert_eq!(config.input_dir, PathBuf::from(DEFAULT_INPUT_DIR));
        assert_eq!(
            config.output_dir,
            PathBuf::from("/data/users/sburnett/upload-times-csv/plots")
        );
        assert!(!config.keep_going);
        assert_eq!(config.style, PlotStyle::default());
    }

    #[test]
    fn output_dir_follows_input_dir() {
        let config = Config::from(Cli::parse_from(["upload-plotter", "--input-dir", "/tmp/csv"]));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/csv/plots"));
    }

    #[test]
    fn explicit_flags_override_defaults() {
        let config = Config::from(Cli::parse_from([
            "upload-plotter",
            "--output-dir",
            "/tmp/out",
            "--keep-going",
            "--summary-json",
            "/tmp/summary.json",
            "--width",
            "1024",
        ]));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(config.keep_going);
        assert_eq!(config.summary_json, Some(PathBuf::from("/tmp/summary.json")));
        assert_eq!(config.style.width, 1024);
        assert_eq!(config.style.height, 600);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
