/*!
 * Common test utilities for the srt2docx test suite
 */

#![allow(dead_code)]

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use srt2docx::app_controller::Controller;
use srt2docx::file_utils::RunPaths;
use srt2docx::Config;

/// Two captions from the `clip.srt` scenario
pub const CLIP_SRT: &str = "1\n00:00:00,000 --> 00:00:02,500\nHello\n\n2\n00:00:02,500 --> 00:00:05,000\nWorld\n";

/// Initialize env_logger once so failing tests show debug output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample subtitle file with three captions
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#;
    create_test_file(dir, filename, content)
}

/// Writes a small solid PNG usable as a footer image
pub fn create_test_png(dir: &Path, filename: &str, width: u32, height: u32) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    image.save(&path)?;
    Ok(path)
}

/// Controller over `work_dir` with settings resolved from `program_dir`
pub fn controller(config: Config, work_dir: &Path, program_dir: &Path) -> Controller {
    Controller::with_config(config, RunPaths::new(work_dir, program_dir)).without_progress()
}

/// Read one part of a saved .docx package as text
pub fn read_docx_part(docx: &Path, part: &str) -> Result<String> {
    let file = fs::File::open(docx)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut entry = archive.by_name(part)?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

/// Names of all parts in a saved .docx package
pub fn docx_part_names(docx: &Path) -> Result<Vec<String>> {
    let file = fs::File::open(docx)?;
    let archive = zip::ZipArchive::new(file)?;
    Ok(archive.file_names().map(|n| n.to_string()).collect())
}

/// Number of `<tag>` or `<tag ...>` start tags in an XML string
pub fn count_elements(xml: &str, tag: &str) -> usize {
    let bare = format!("<{}>", tag);
    let with_attributes = format!("<{} ", tag);
    xml.matches(&bare).count() + xml.matches(&with_attributes).count()
}

/// Value of a simple element such as `dc:identifier` in an XML string
pub fn xml_element(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = xml.find(&open)? + open.len();
    let end = xml[start..].find(&close)? + start;
    Some(xml[start..end].to_string())
}

/// Files with the given extension directly inside `dir`, sorted by name
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == extension))
        .collect();
    files.sort();
    Ok(files)
}
