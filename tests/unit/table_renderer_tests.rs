/*!
 * Tests for caption table rendering
 */

use std::path::Path;
use srt2docx::app_config::Config;
use srt2docx::document::{CoreProperties, DocumentSink, FooterImage, PageLayout, Table};
use srt2docx::errors::DocumentError;
use srt2docx::subtitle_processor::SubtitleEntry;
use srt2docx::table_renderer::{build_table, render_table};

/// Records everything the renderer does to a document
#[derive(Default)]
struct RecordingSink {
    headings: Vec<(String, String)>,
    tables: Vec<Table>,
}

impl DocumentSink for RecordingSink {
    fn add_heading(&mut self, text: &str, style_id: &str) {
        self.headings.push((text.to_string(), style_id.to_string()));
    }

    fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    fn set_page_layout(&mut self, _layout: PageLayout) {}

    fn set_metadata(&mut self, _properties: CoreProperties) {}

    fn set_footer(&mut self, _footer: FooterImage) {}

    fn save(&self, _path: &Path) -> Result<(), DocumentError> {
        Ok(())
    }
}

fn captions(count: usize) -> Vec<SubtitleEntry> {
    (0..count)
        .map(|i| {
            let start = i as u64 * 3_000;
            SubtitleEntry::new(i + 1, start, start + 2_000, format!("caption {}", i + 1))
        })
        .collect()
}

/// Test that row count is header plus one row per caption, including zero
#[test]
fn test_buildTable_forAnyCaptionCount_shouldHaveHeaderPlusRows() {
    let config = Config::default();
    for count in [0, 1, 2, 17] {
        let table = build_table(&config, &captions(count));
        assert_eq!(table.row_count(), count + 1);
        assert_eq!(table.rows().len(), count);
    }
}

/// Test that the Nth row belongs to the Nth caption
#[test]
fn test_buildTable_withCaptions_shouldPreserveOrder() {
    let config = Config::default();
    let entries = vec![
        SubtitleEntry::new(1, 10_000, 11_000, "late".to_string()),
        SubtitleEntry::new(2, 1_000, 2_000, "early".to_string()),
    ];

    let table = build_table(&config, &entries);
    assert_eq!(table.rows()[0][3], "late");
    assert_eq!(table.rows()[1][3], "early");
}

/// Test that headers, widths and style come from configuration
#[test]
fn test_buildTable_withCustomConfig_shouldUseConfiguredLayout() {
    let mut config = Config::default();
    config.table.headers = ["In", "Out", "Len", "Line"].iter().map(|s| s.to_string()).collect();
    config.layout.table_cols = vec![1.0, 1.0, 0.5, 4.0];
    config.table.style = "Light Grid".to_string();

    let table = build_table(&config, &captions(1));
    assert_eq!(table.header(), ["In", "Out", "Len", "Line"]);
    assert_eq!(table.column_widths, vec![1440, 1440, 720, 5760]);
    assert_eq!(table.style_id.as_deref(), Some("LightGrid"));
}

/// Test that the clip scenario renders the expected cells
#[test]
fn test_renderTable_withClipScenario_shouldRenderTruncatedTimes() {
    let config = Config::default();
    let entries = vec![
        SubtitleEntry::new(1, 0, 2_500, "Hello".to_string()),
        SubtitleEntry::new(2, 2_500, 5_000, "World".to_string()),
    ];
    let mut sink = RecordingSink::default();

    render_table(&config, &entries, "clip", &mut sink);

    assert_eq!(sink.headings, vec![("clip".to_string(), "SRTTitle".to_string())]);
    assert_eq!(sink.tables.len(), 1);
    let rows = sink.tables[0].rows();
    assert_eq!(rows[0], vec!["0:00:00", "0:00:02", "0:00:02", "Hello"]);
    assert_eq!(rows[1], vec!["0:00:02", "0:00:05", "0:00:02", "World"]);
}

/// Test that a start of 1.9 seconds renders as 0:00:01
#[test]
fn test_renderTable_withSubSecondStart_shouldTruncate() {
    let config = Config::default();
    let entries = vec![SubtitleEntry::new(1, 1_900, 3_000, "x".to_string())];
    let mut sink = RecordingSink::default();

    render_table(&config, &entries, "t", &mut sink);
    assert_eq!(sink.tables[0].rows()[0][0], "0:00:01");
}

/// Test that repeated rendering stacks headed tables in call order
#[test]
fn test_renderTable_calledRepeatedly_shouldStackTables() {
    let config = Config::default();
    let mut sink = RecordingSink::default();

    for title in ["one", "two", "three"] {
        render_table(&config, &captions(2), title, &mut sink);
    }

    let titles: Vec<&str> = sink.headings.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
    assert_eq!(sink.tables.len(), 3);
}
