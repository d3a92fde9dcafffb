//! Command line arguments

use crate::core::logging::{LogFormat, LoggingOptions};
use crate::report::api::Threshold;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "lucidshark")]
#[command(about = "Run code scanners in parallel and report their findings as one JSON document")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// Paths to scan, relative to the project root (default: the whole project)
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Project root directory
    #[arg(short = 'r', long = "project-root", value_name = "DIR", default_value = ".")]
    pub project_root: PathBuf,

    /// Configuration file path (default: lucidshark.toml in the project root)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Scanners to run* (default: every enabled configured scanner)
    #[arg(short = 's', long = "scanner", value_name = "NAMES", action = ArgAction::Append, value_delimiter = ',')]
    pub scanners: Vec<String>,

    /// Run scanners one at a time
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Maximum scanners running at once
    #[arg(short = 'j', long = "max-workers", value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_workers: Option<u16>,

    /// Fail when issues reach this threshold (severity, error, any or none)
    #[arg(long = "fail-on", value_name = "THRESHOLD", value_parser = parse_threshold)]
    pub fail_on: Option<Threshold>,

    /// Stream tool output to the log while scanners run (shown at log level info)
    #[arg(long = "stream")]
    pub stream: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", default_value = "warn",
          value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: String,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", default_value = "text",
          value_parser = ["text", "ext", "json"])]
    pub log_format: String,

    /// Log file path (default: stderr)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Force colored log output
    #[arg(long = "color", overrides_with = "no_color")]
    pub color: bool,

    /// Disable colored log output
    #[arg(long = "no-color", overrides_with = "color")]
    pub no_color: bool,
}

fn parse_threshold(value: &str) -> Result<Threshold, String> {
    value.parse()
}

impl Args {
    /// Colour choice: explicit flags win, otherwise colour when stderr is a terminal
    pub fn use_color(&self) -> bool {
        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            std::io::IsTerminal::is_terminal(&std::io::stderr())
        }
    }

    pub fn logging_options(&self) -> LoggingOptions {
        LoggingOptions {
            level: self.log_level.clone(),
            format: self.log_format.parse().unwrap_or(LogFormat::Text),
            file: self
                .log_file
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            color: self.log_file.is_none() && self.use_color(),
        }
    }

    /// Target paths resolved against `project_root`
    pub fn target_paths(&self, project_root: &std::path::Path) -> Vec<PathBuf> {
        self.paths
            .iter()
            .map(|p| {
                if p.is_absolute() {
                    p.clone()
                } else {
                    project_root.join(p)
                }
            })
            .collect()
    }
}
