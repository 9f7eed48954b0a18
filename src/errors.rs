/*!
 * Error types for the srt2docx application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating the settings file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file does not exist
    #[error("Settings file not found: {}", path.display())]
    NotFound {
        /// Where the settings file was expected
        path: PathBuf,
    },

    /// The settings file exists but could not be read
    #[error("Failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid YAML or does not match the schema
    #[error("Failed to parse settings file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// A single field holds an unusable value
    #[error("Invalid setting `{field}`: {message}")]
    InvalidField {
        /// Dotted path of the offending key, e.g. `layout.title.color`
        field: String,
        message: String,
    },
}

impl ConfigError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors that can occur during subtitle parsing
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The subtitle file could not be read
    #[error("Failed to read subtitle file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A block does not start with a numeric index
    #[error("Invalid subtitle index at line {line}: {value:?}")]
    InvalidIndex { line: usize, value: String },

    /// A block ended before its time range line
    #[error("Missing time range at line {line}")]
    MissingTimestamp { line: usize },

    /// The time range line could not be parsed
    #[error("Invalid time range at line {line}: {value:?}")]
    InvalidTimestamp { line: usize, value: String },

    /// The caption ends before it starts
    #[error("Invalid time range in entry {seq_num}: end {end_ms}ms is before start {start_ms}ms")]
    InvalidTimeRange {
        seq_num: usize,
        start_ms: u64,
        end_ms: u64,
    },
}

/// Errors that can occur while assembling or saving a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document library could not pack the document
    #[error("Failed to pack document: {0}")]
    Package(String),

    /// Failure while rewriting the packed zip container
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The footer image could not be loaded
    #[error("Failed to load image {}: {message}", path.display())]
    Image { path: PathBuf, message: String },

    /// The finished package could not be moved into place
    #[error("Failed to save {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from loading the configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Error from parsing one input file
    #[error("Failed to parse {}: {source}", path.display())]
    InputParse {
        path: PathBuf,
        #[source]
        source: SubtitleError,
    },

    /// Error from building or saving one output document
    #[error("Failed to write document {name}: {source}")]
    DocumentWrite {
        name: String,
        #[source]
        source: DocumentError,
    },

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),
}
