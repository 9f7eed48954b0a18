/*!
 * In-memory document model shared by the renderer, the builder and the
 * package writer. Lengths are stored in the units WordprocessingML uses:
 * twips (1/1440 inch) for page geometry, EMU for drawings and half-points
 * for font sizes.
 */

use chrono::{DateTime, Utc};

use super::TableBuilder;

pub const TWIPS_PER_INCH: f64 = 1440.0;
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Convert inches to twips, clamping negatives to zero
pub fn inches_to_twips(inches: f64) -> u32 {
    (inches * TWIPS_PER_INCH).round().max(0.0) as u32
}

/// Convert inches to English Metric Units
pub fn inches_to_emu(inches: f64) -> u32 {
    (inches * EMU_PER_INCH).round().max(0.0) as u32
}

/// Convert points to the half-point unit used by `w:sz`
pub fn points_to_half_points(points: f32) -> u32 {
    (points * 2.0).round().max(1.0) as u32
}

/// Style ids every document already defines or that Word treats as built in.
/// Configured style names must not map onto them.
pub const RESERVED_STYLE_IDS: &[&str] = &["Normal", "Heading1", "TableNormal"];

/// Derive a style id from a display name ("Table Grid" -> "TableGrid")
pub fn style_id(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Paragraph style derived from a standard heading
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingStyle {
    pub style_id: String,
    pub name: String,
    /// Style id of the parent, e.g. `Heading1`
    pub based_on: String,
    pub font: String,
    pub size_half_points: u32,
    /// Six hex digits, no `#`
    pub color: String,
}

/// Styles defined by a document
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    /// Default body font
    pub normal_font: String,
    pub heading: HeadingStyle,
    /// Display name of the bordered table style, if any
    pub table_style: Option<String>,
}

/// A table with a header row and data rows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Column widths in twips
    pub column_widths: Vec<u32>,
    /// Table style id
    pub style_id: Option<String>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(column_widths: Vec<u32>, style_id: Option<String>) -> Self {
        Self {
            column_widths,
            style_id,
            header: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Total row count including the header row
    pub fn row_count(&self) -> usize {
        let header = if self.header.is_empty() { 0 } else { 1 };
        header + self.rows.len()
    }

    /// Total width in twips
    pub fn width(&self) -> u32 {
        self.column_widths.iter().sum()
    }
}

impl TableBuilder for Table {
    fn set_header(&mut self, labels: &[String]) {
        self.header = labels.to_vec();
    }

    fn add_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }
}

/// Body content in order of appearance
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { text: String, style_id: String },
    Table(Table),
}

/// Page geometry of the single document section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// Twips
    pub margin_left: u32,
    /// Twips
    pub margin_right: u32,
    /// Twips from the page bottom to the footer
    pub footer_distance: u32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            margin_left: 1440,
            margin_right: 1440,
            footer_distance: 720,
        }
    }
}

/// Core document properties (`docProps/core.xml`)
#[derive(Debug, Clone, PartialEq)]
pub struct CoreProperties {
    pub title: String,
    pub author: String,
    pub category: String,
    pub comments: String,
    pub content_status: String,
    pub keywords: String,
    pub language: String,
    pub subject: String,
    pub version: String,
    pub last_modified_by: String,
    pub identifier: String,
    pub revision: u32,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Right-aligned image placed in the page footer
#[derive(Debug, Clone, PartialEq)]
pub struct FooterImage {
    /// PNG encoded, whatever the source format was
    pub png: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
    /// Display size
    pub width_emu: u32,
    pub height_emu: u32,
}
