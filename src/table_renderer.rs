use log::debug;

use crate::app_config::Config;
use crate::document::builder::{heading_style_id, table_style_id};
use crate::document::model::{inches_to_twips, Table};
use crate::document::{DocumentSink, TableBuilder};
use crate::subtitle_processor::SubtitleEntry;

// @module: Caption table rendering

/// Format whole seconds as `H:MM:SS` (hours are not padded)
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Table row for one caption: start, end, duration, text.
///
/// Times are truncated to whole seconds, never rounded up. The duration is
/// taken from the exact times and then truncated.
pub fn caption_row(entry: &SubtitleEntry) -> Vec<String> {
    vec![
        format_clock(entry.start_seconds()),
        format_clock(entry.end_seconds()),
        format_clock(entry.duration_ms() / 1_000),
        entry.text.clone(),
    ]
}

/// Build the caption table without attaching it to a document
pub fn build_table(config: &Config, captions: &[SubtitleEntry]) -> Table {
    let widths = config
        .layout
        .table_cols
        .iter()
        .map(|inches| inches_to_twips(*inches))
        .collect();

    let mut table = Table::new(widths, table_style_id(config));
    table.set_header(&config.table.headers);
    for entry in captions {
        table.add_row(caption_row(entry));
    }
    table
}

/// Add a heading with `title` followed by the caption table
pub fn render_table<D: DocumentSink + ?Sized>(
    config: &Config,
    captions: &[SubtitleEntry],
    title: &str,
    document: &mut D,
) {
    document.add_heading(title, &heading_style_id(config));

    let table = build_table(config, captions);
    debug!("Rendered table '{}' with {} rows", title, table.row_count());
    document.add_table(table);
}
