/*!
 * # srt2docx - SubRip caption tables as Word documents
 *
 * A Rust library that turns SubRip (`.srt`) subtitle files into `.docx`
 * documents holding one caption table per input.
 *
 * ## Features
 *
 * - Select inputs with a filename glob and order them by name, size or age
 * - Render start, end, duration and text columns with whole-second times
 * - One document per input, or every input stacked into one document
 * - Styled heading, page margins, document properties and an optional
 *   image footer, all driven by a YAML settings file
 * - Fail-fast batches, or collect per-file failures and keep going
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Settings file loading and validation
 * - `subtitle_processor`: SubRip parsing into caption entries
 * - `file_utils`: Input listing, ordering and atomic file writes
 * - `table_renderer`: Caption rows and table rendering
 * - `document`: Document model, capability traits and the `.docx` writer:
 *   - `document::builder`: Document creation and finalization
 *   - `document::docx`: `docx-rs` backed document writer
 *   - `document::model`: Tables, styles, layout and properties
 * - `app_controller`: Batch orchestration
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod file_utils;
pub mod subtitle_processor;
pub mod table_renderer;
pub mod document;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BatchReport, Controller};
pub use subtitle_processor::{SubtitleCollection, SubtitleEntry};
pub use document::{DocumentSink, DocxDocument, TableBuilder};
pub use errors::{AppError, ConfigError, DocumentError, SubtitleError};
