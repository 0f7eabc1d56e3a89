use crate::config::Features;
use crate::error::{AppError, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "gc-pulse")]
#[command(version)]
#[command(
    about = "Frame-time and GC pause monitor for a managed runtime",
    long_about = "Renders an animated scene at a fixed frame rate, flags frames that stall, \
                  and overlays the GC activity read from a JVM's unified GC log.\n\n\
                  Either run the JVM as a child (`gc-pulse -- java -jar app.jar`) or follow \
                  an existing log (`gc-pulse --gc-log gc.log --pid 1234`)."
)]
pub struct Cli {
    #[arg(
        short = 'l',
        long,
        help = "Follow this GC log file instead of spawning a command",
        conflicts_with = "command"
    )]
    pub gc_log: Option<String>,

    #[arg(long, help = "Read the GC log file from the beginning", requires = "gc_log")]
    pub from_start: bool,

    #[arg(short, long, help = "Process ID used for explicit GC requests")]
    pub pid: Option<u32>,

    #[arg(
        short = 'c',
        long,
        help = "Path to configuration file",
        env = "GC_PULSE_CONFIG"
    )]
    pub config: Option<String>,

    #[arg(long, help = "Write diagnostics to this file", env = "GC_PULSE_LOG")]
    pub debug_log: Option<String>,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(long, help = "Override the configured target frame rate")]
    pub fps: Option<u32>,

    #[arg(
        long,
        help = "Override the warm-up period (e.g. 500ms, 3s)",
        value_parser = parse_duration
    )]
    pub stabilization: Option<Duration>,

    #[arg(
        last = true,
        help = "Command to run and monitor, e.g. -- java -jar app.jar"
    )]
    pub command: Vec<String>,
}

impl Cli {
    pub fn gc_log_path(&self) -> Option<PathBuf> {
        self.gc_log.as_deref().map(expand_path)
    }

    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.as_deref().map(expand_path)
    }

    pub fn debug_log_path(&self) -> Option<PathBuf> {
        self.debug_log.as_deref().map(expand_path)
    }

    /// A log source only has a reader when GC statistics are enabled, so
    /// naming one with the feature off is a usage error.
    pub fn check_features(&self, features: &Features) -> Result<()> {
        if features.gc_stats {
            return Ok(());
        }
        if !self.command.is_empty() {
            return Err(AppError::Config(format!(
                "cannot run `{}`: GC statistics are disabled ([features] gc_stats = false)",
                self.command.join(" ")
            )));
        }
        if self.gc_log.is_some() {
            return Err(AppError::Config(
                "--gc-log needs GC statistics, which are disabled ([features] gc_stats = false)"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Expands `~` and environment variables. Unresolvable variables leave the
/// path as written.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(raw),
    }
}

fn parse_duration(s: &str) -> std::result::Result<Duration, humantime::DurationError> {
    humantime::parse_duration(s)
}
