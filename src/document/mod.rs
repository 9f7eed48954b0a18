/*!
 * Document assembly for caption tables.
 *
 * The renderer and builder only talk to the capability traits below, so the
 * `docx-rs` backed writer can be swapped (tests use an in-memory recorder):
 * - `DocumentSink`: headings, tables, page layout, metadata, footer, save
 * - `TableBuilder`: header row and data rows of one table
 */

pub mod builder;
pub mod docx;
pub mod model;

use std::path::Path;

use crate::errors::DocumentError;

pub use builder::{close_document, create_document, DOCUMENT_EXTENSION};
pub use docx::DocxDocument;
pub use model::{
    Block, CoreProperties, FooterImage, HeadingStyle, PageLayout, StyleSheet, Table,
};

/// A document under construction
pub trait DocumentSink {
    /// Append a heading paragraph using the given paragraph style id
    fn add_heading(&mut self, text: &str, style_id: &str);

    /// Append a finished table
    fn add_table(&mut self, table: Table);

    /// Set page margins and footer distance
    fn set_page_layout(&mut self, layout: PageLayout);

    /// Set the core document properties
    fn set_metadata(&mut self, properties: CoreProperties);

    /// Set an image footer
    fn set_footer(&mut self, footer: FooterImage);

    /// Serialize the document to `path`, replacing any existing file
    fn save(&self, path: &Path) -> Result<(), DocumentError>;
}

/// Row-by-row construction of a table
pub trait TableBuilder {
    /// Set the header labels
    fn set_header(&mut self, labels: &[String]);

    /// Append one data row
    fn add_row(&mut self, cells: Vec<String>);
}
