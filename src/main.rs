// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{error, info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

use srt2docx::app_controller::Controller;
use srt2docx::file_utils::{FileManager, RunPaths};
use srt2docx::Config;

/// Version line printed by `-v/--version`
const VERSION_LINE: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " | scott@bitwise.ninja | https://dreamcyclesetudios.com"
);

/// srt2docx - SubRip caption tables as Word documents
///
/// Converts every subtitle file matching the configured glob in the current
/// directory into a .docx document holding a start/end/duration/text table.
/// Behavior is controlled by srt2docx_settings.yaml next to the program
/// (or in the directory named by SRT2DOCX_HOME).
#[derive(Parser, Debug)]
#[command(name = "srt2docx")]
#[command(disable_version_flag = true)]
#[command(about = "Convert SRT subtitle files into DOCX caption tables")]
#[command(after_help = "Please contact scott@bitwise.ninja with problems/issues")]
struct CommandLineOptions {
    /// Print version information
    #[arg(short = 'v', long = "version")]
    version: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        // The logger accepts everything; the max level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Info until the settings file says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();
    if cli.version {
        println!("srt2docx {}", VERSION_LINE);
        return Ok(());
    }

    info!("Script started");

    let program_dir = FileManager::program_dir()?;
    let settings_path = Config::settings_path(&program_dir);
    let config = Config::load(&settings_path)
        .with_context(|| format!("Cannot start without settings from {}", settings_path.display()))?;
    log::set_max_level(config.log_level.to_level_filter());

    let work_dir = std::env::current_dir().context("Failed to read the current directory")?;
    let controller = Controller::with_config(config, RunPaths::new(work_dir, program_dir));

    let report = controller.run(env!("CARGO_PKG_VERSION"))?;
    if !report.is_success() {
        for failure in &report.failures {
            error!("Failed: {} ({})", failure.path.display(), failure.error);
        }
        return Err(anyhow!("{} of the inputs failed to convert", report.failures.len()));
    }

    Ok(())
}
