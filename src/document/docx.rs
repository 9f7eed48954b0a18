/*!
 * Word documents built with `docx-rs`.
 *
 * `DocxDocument` records headings and tables as they are rendered and turns
 * them into a `docx_rs::Docx` when saved. Styles, tables, page margins and
 * the footer picture all go through the crate.
 *
 * `docx-rs` only lets callers set the created and modified dates of the
 * core properties. Title, creator, keywords, category, contentStatus,
 * identifier, language and version have no setter, so the packed
 * `docProps/core.xml` part is replaced with one carrying every property.
 */

use std::borrow::Cow;
use std::io::{Cursor, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use docx_rs::{
    AlignmentType, BreakType, Docx, Footer, PageMargin, Paragraph, Pic, Run, RunFonts, Style,
    StyleType, TableCell, TableLayoutType, TableRow, WidthType,
};
use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::model::{style_id, Block, CoreProperties, FooterImage, PageLayout, StyleSheet, Table};
use super::DocumentSink;
use crate::errors::DocumentError;
use crate::file_utils::FileManager;

const CORE_PART: &str = "docProps/core.xml";

// US Letter, twips
const PAGE_WIDTH: u32 = 12240;
const PAGE_HEIGHT: u32 = 15840;
const PAGE_MARGIN_VERTICAL: i32 = 1440;
const HEADER_DISTANCE: i32 = 720;

// Half-points
const BODY_FONT_SIZE: usize = 22;
const HEADING1_FONT_SIZE: usize = 32;

// Used for columns that have no configured width
const FALLBACK_COLUMN_WIDTH: u32 = 1440;

/// In-memory Word document
#[derive(Debug, Clone)]
pub struct DocxDocument {
    styles: StyleSheet,
    blocks: Vec<Block>,
    layout: PageLayout,
    properties: Option<CoreProperties>,
    footer: Option<FooterImage>,
}

impl DocxDocument {
    /// Create a blank document with the given styles
    pub fn new(styles: StyleSheet) -> Self {
        Self {
            styles,
            blocks: Vec::new(),
            layout: PageLayout::default(),
            properties: None,
            footer: None,
        }
    }

    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            Block::Heading { .. } => None,
        })
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn properties(&self) -> Option<&CoreProperties> {
        self.properties.as_ref()
    }

    pub fn footer(&self) -> Option<&FooterImage> {
        self.footer.as_ref()
    }

    /// The `docx-rs` document for everything recorded so far
    pub fn to_docx(&self) -> Docx {
        let mut docx = Docx::new()
            .default_fonts(run_fonts(&self.styles.normal_font))
            .default_size(BODY_FONT_SIZE)
            .add_style(heading1_style())
            .add_style(self.heading_style());

        if let Some(name) = &self.styles.table_style {
            docx = docx.add_style(Style::new(style_id(name), StyleType::Table).name(name.as_str()));
        }

        for block in &self.blocks {
            docx = match block {
                Block::Heading { text, style_id } => {
                    docx.add_paragraph(Paragraph::new().style(style_id.as_str()).add_run(text_run(text)))
                }
                Block::Table(table) => docx.add_table(docx_table(table)),
            };
        }

        docx = docx.page_size(PAGE_WIDTH, PAGE_HEIGHT).page_margin(
            PageMargin::new()
                .top(PAGE_MARGIN_VERTICAL)
                .bottom(PAGE_MARGIN_VERTICAL)
                .left(twips(self.layout.margin_left))
                .right(twips(self.layout.margin_right))
                .header(HEADER_DISTANCE)
                .footer(twips(self.layout.footer_distance)),
        );

        if let Some(footer) = &self.footer {
            let picture = Pic::new_with_dimensions(footer.png.clone(), footer.width_px, footer.height_px)
                .size(footer.width_emu, footer.height_emu);
            let paragraph = Paragraph::new()
                .align(AlignmentType::Right)
                .add_run(Run::new().add_image(picture));
            docx = docx.footer(Footer::new().add_paragraph(paragraph));
        }

        docx
    }

    /// Serialize the package into memory
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut packed = Cursor::new(Vec::new());
        self.to_docx()
            .build()
            .pack(&mut packed)
            .map_err(|e| DocumentError::Package(e.to_string()))?;

        match &self.properties {
            Some(properties) => replace_part(packed.into_inner(), CORE_PART, &core_xml(properties)),
            None => Ok(packed.into_inner()),
        }
    }

    fn heading_style(&self) -> Style {
        let heading = &self.styles.heading;
        Style::new(heading.style_id.as_str(), StyleType::Paragraph)
            .name(heading.name.as_str())
            .based_on(heading.based_on.as_str())
            .fonts(run_fonts(&heading.font))
            .size(heading.size_half_points as usize)
            .color(heading.color.as_str())
    }
}

impl DocumentSink for DocxDocument {
    fn add_heading(&mut self, text: &str, style_id: &str) {
        self.blocks.push(Block::Heading {
            text: text.to_string(),
            style_id: style_id.to_string(),
        });
    }

    fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    fn set_page_layout(&mut self, layout: PageLayout) {
        self.layout = layout;
    }

    fn set_metadata(&mut self, properties: CoreProperties) {
        self.properties = Some(properties);
    }

    fn set_footer(&mut self, footer: FooterImage) {
        self.footer = Some(footer);
    }

    fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let bytes = self.to_bytes()?;
        debug!("Writing {} bytes to {:?}", bytes.len(), path);

        FileManager::write_atomic(path, &bytes).map_err(|source| DocumentError::Persist {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn run_fonts(font: &str) -> RunFonts {
    RunFonts::new().ascii(font).hi_ansi(font).east_asia(font).cs(font)
}

fn twips(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn heading1_style() -> Style {
    Style::new("Heading1", StyleType::Paragraph)
        .name("heading 1")
        .bold()
        .size(HEADING1_FONT_SIZE)
}

fn docx_table(table: &Table) -> docx_rs::Table {
    let columns = table
        .rows()
        .iter()
        .map(Vec::len)
        .chain([table.column_widths.len(), table.header().len()])
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| table.column_widths.get(i).copied().unwrap_or(FALLBACK_COLUMN_WIDTH) as usize)
        .collect();

    let mut rows = Vec::with_capacity(table.row_count());
    if !table.header().is_empty() {
        rows.push(docx_row(table.header(), &widths, true));
    }
    rows.extend(table.rows().iter().map(|row| docx_row(row, &widths, false)));

    let mut docx_table = docx_rs::Table::new(rows)
        .set_grid(widths.clone())
        .width(widths.iter().sum(), WidthType::Dxa)
        .layout(TableLayoutType::Fixed);
    if let Some(id) = &table.style_id {
        docx_table = docx_table.style(id.as_str());
    }
    docx_table
}

fn docx_row(cells: &[String], widths: &[usize], bold: bool) -> TableRow {
    let cells = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let text = cells.get(i).map(String::as_str).unwrap_or("");
            let mut paragraph = Paragraph::new();
            if !text.is_empty() {
                let run = text_run(text);
                paragraph = paragraph.add_run(if bold { run.bold() } else { run });
            }
            TableCell::new().add_paragraph(paragraph).width(*width, WidthType::Dxa)
        })
        .collect();
    TableRow::new(cells)
}

/// One run; embedded newlines become line breaks
fn text_run(text: &str) -> Run {
    let mut run = Run::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(xml_text(line.trim_end_matches('\r')));
    }
    run
}

/// Rebuild a packed zip with `part` swapped for `content`
fn replace_part(package: Vec<u8>, part: &str, content: &str) -> Result<Vec<u8>, DocumentError> {
    let mut archive = ZipArchive::new(Cursor::new(package))?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if entry.name() != part {
            writer.raw_copy_file(entry)?;
        }
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(part, options)?;
    writer.write_all(content.as_bytes())?;
    Ok(writer.finish()?.into_inner())
}

fn w3cdtf(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn core_xml(props: &CoreProperties) -> String {
    let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);

    let fields = [
        ("dc:title", props.title.as_str()),
        ("dc:subject", props.subject.as_str()),
        ("dc:creator", props.author.as_str()),
        ("cp:keywords", props.keywords.as_str()),
        ("dc:description", props.comments.as_str()),
        ("cp:lastModifiedBy", props.last_modified_by.as_str()),
        ("dc:identifier", props.identifier.as_str()),
        ("dc:language", props.language.as_str()),
        ("cp:category", props.category.as_str()),
        ("cp:contentStatus", props.content_status.as_str()),
        ("cp:version", props.version.as_str()),
    ];
    for (tag, value) in fields {
        if !value.is_empty() {
            xml.push_str(&format!("<{tag}>{}</{tag}>", escape(value), tag = tag));
        }
    }

    xml.push_str(&format!("<cp:revision>{}</cp:revision>", props.revision));
    xml.push_str(&format!(
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        w3cdtf(&props.created)
    ));
    xml.push_str(&format!(
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        w3cdtf(&props.modified)
    ));
    xml.push_str("</cp:coreProperties>");
    xml
}

// Characters XML 1.0 cannot carry at all
fn is_forbidden_xml_char(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}')
}

/// Caption text with characters XML cannot represent removed
fn xml_text(text: &str) -> Cow<'_, str> {
    if text.chars().any(is_forbidden_xml_char) {
        Cow::Owned(text.chars().filter(|c| !is_forbidden_xml_char(*c)).collect())
    } else {
        Cow::Borrowed(text)
    }
}

/// Escape text for element content in the core properties part
fn escape(text: &str) -> Cow<'_, str> {
    let needs_work = text
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"' | '\'') || is_forbidden_xml_char(c));
    if !needs_work {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if is_forbidden_xml_char(c) => {}
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
