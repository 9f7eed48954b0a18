use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use uuid::Uuid;

use super::model::{
    inches_to_emu, inches_to_twips, points_to_half_points, style_id, CoreProperties, FooterImage,
    HeadingStyle, PageLayout, StyleSheet,
};
use super::{DocumentSink, DocxDocument};
use crate::app_config::Config;
use crate::errors::DocumentError;

// @module: Document shell creation and finalization

/// Extension of every output file
pub const DOCUMENT_EXTENSION: &str = "docx";

const BASE_HEADING_STYLE: &str = "Heading1";
const FALLBACK_HEADING_STYLE_ID: &str = "SRTTitle";

/// Style id of the heading placed above each table
pub fn heading_style_id(config: &Config) -> String {
    let id = style_id(&config.layout.title.style);
    if id.is_empty() {
        FALLBACK_HEADING_STYLE_ID.to_string()
    } else {
        id
    }
}

/// Style id of the caption table, if a table style is configured
pub fn table_style_id(config: &Config) -> Option<String> {
    let id = style_id(&config.table.style);
    if id.is_empty() { None } else { Some(id) }
}

/// Create a blank document with the body font and the derived heading style
pub fn create_document(config: &Config) -> DocxDocument {
    let title = &config.layout.title;
    let table_style = if table_style_id(config).is_some() {
        Some(config.table.style.trim().to_string())
    } else {
        None
    };

    let styles = StyleSheet {
        normal_font: config.layout.fonts.normal.clone(),
        heading: HeadingStyle {
            style_id: heading_style_id(config),
            name: title.style.trim().to_string(),
            based_on: BASE_HEADING_STYLE.to_string(),
            font: config.layout.fonts.title.clone(),
            size_half_points: points_to_half_points(title.size),
            color: title.color_hex(),
        },
        table_style,
    };

    DocxDocument::new(styles)
}

/// Identifier stamped on every document: tool version plus a fresh v4 UUID
pub fn document_identifier(version: &str) -> String {
    format!("v{}-{}", version, Uuid::new_v4())
}

/// Core properties for a document saved now
pub fn core_properties(config: &Config, name: &str, version: &str) -> CoreProperties {
    let meta = &config.meta;
    // Stored in UTC; readers localize on display
    let now = Utc::now();

    CoreProperties {
        title: name.to_string(),
        author: meta.author.clone(),
        category: meta.category.clone(),
        comments: meta.comments.clone(),
        content_status: meta.content_status.clone(),
        keywords: meta.keywords.clone(),
        language: meta.language.clone(),
        subject: meta.subject.clone(),
        version: meta.version.clone(),
        last_modified_by: meta.author.clone(),
        identifier: document_identifier(version),
        revision: 1,
        created: now,
        modified: now,
    }
}

/// Load the footer image from the assets directory, scaled to the configured
/// width and re-encoded as PNG
pub fn load_footer_image(config: &Config, assets_dir: &Path) -> Result<FooterImage, DocumentError> {
    let path = assets_dir.join(config.footer.watermark.trim());
    let image_error = |message: String| DocumentError::Image {
        path: path.clone(),
        message,
    };

    let image = image::open(&path).map_err(|e| image_error(e.to_string()))?;
    let (width_px, height_px) = (image.width(), image.height());
    if width_px == 0 || height_px == 0 {
        return Err(image_error("image has no pixels".to_string()));
    }

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|e| image_error(e.to_string()))?;

    let width_emu = inches_to_emu(config.footer.width_in);
    let height_emu = u64::from(width_emu) * u64::from(height_px) / u64::from(width_px);
    let height_emu = u32::try_from(height_emu).unwrap_or(u32::MAX);
    debug!(
        "Footer image {:?}: {}x{} px scaled to {}x{} EMU",
        path, width_px, height_px, width_emu, height_emu
    );

    Ok(FooterImage {
        png: png.into_inner(),
        width_px,
        height_px,
        width_emu,
        height_emu,
    })
}

/// Apply layout, metadata and footer, then save `<name>.docx` into `output_dir`.
///
/// An existing file with the same name is replaced.
pub fn close_document<D: DocumentSink + ?Sized>(
    config: &Config,
    name: &str,
    version: &str,
    document: &mut D,
    output_dir: &Path,
    assets_dir: &Path,
) -> Result<PathBuf, DocumentError> {
    let footer_distance = if config.footer.show {
        inches_to_twips(config.footer.distance_in)
    } else {
        PageLayout::default().footer_distance
    };
    document.set_page_layout(PageLayout {
        margin_left: inches_to_twips(config.layout.margin_left),
        margin_right: inches_to_twips(config.layout.margin_right),
        footer_distance,
    });

    let properties = core_properties(config, name, version);
    info!("Document unique id: [{}]", properties.identifier);
    document.set_metadata(properties);

    if config.footer.show {
        document.set_footer(load_footer_image(config, assets_dir)?);
    }

    let file_name = format!("{}.{}", name, DOCUMENT_EXTENSION);
    info!("Saving: [{}]", file_name);

    let path = output_dir.join(file_name);
    document.save(&path)?;
    Ok(path)
}
