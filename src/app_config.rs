use log::LevelFilter;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

use crate::document::builder::{heading_style_id, table_style_id};
use crate::document::model::RESERVED_STYLE_IDS;
use crate::errors::ConfigError;

/// Application configuration module
/// This module handles the settings file: locating, loading and validating it.
/// The settings are read once at startup and passed by reference to every
/// component afterwards.

/// Name of the settings file kept next to the program
pub const SETTINGS_FILE_NAME: &str = "srt2docx_settings.yaml";

/// Number of columns in a caption table (start, end, duration, text)
pub const TABLE_COLUMNS: usize = 4;

static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?[0-9A-Fa-f]{6}$").unwrap()
});

/// Represents the application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Input file selection
    #[serde(default)]
    pub filetypes: FileTypesConfig,

    /// Ordering of the input files
    #[serde(default)]
    pub sort: SortConfig,

    /// Caption table settings
    #[serde(default)]
    pub table: TableConfig,

    /// Page layout, fonts and heading style
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Document properties stamped on every output
    #[serde(default)]
    pub meta: MetaConfig,

    /// Optional image footer
    #[serde(default)]
    pub footer: FooterConfig,

    /// Render every input into one combined document
    #[serde(default)]
    pub single_file: bool,

    /// Keep going when a single file fails and report failures at the end
    #[serde(default)]
    pub continue_on_error: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Input file selection
#[derive(Debug, Deserialize, Clone)]
pub struct FileTypesConfig {
    /// Filename pattern, resolved against the working directory
    #[serde(default = "default_glob")]
    pub glob: String,
}

impl Default for FileTypesConfig {
    fn default() -> Self {
        Self { glob: default_glob() }
    }
}

/// Key the input files are ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Lexical path comparison
    #[default]
    Name,
    /// File length in bytes
    Size,
    /// Time elapsed since last modification
    Age,
}

impl From<String> for SortKey {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "size" => Self::Size,
            "age" => Self::Age,
            // Unknown keys fall back to name ordering
            _ => Self::Name,
        }
    }
}

impl<'de> Deserialize<'de> for SortKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(String::deserialize(deserializer)?))
    }
}

/// Direction of the input ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl From<String> for SortDirection {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "descending" | "desc" => Self::Descending,
            _ => Self::Ascending,
        }
    }
}

impl<'de> Deserialize<'de> for SortDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from(String::deserialize(deserializer)?))
    }
}

/// Ordering of the input files
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SortConfig {
    #[serde(default, rename = "type")]
    pub key: SortKey,

    #[serde(default)]
    pub direction: SortDirection,
}

/// Caption table settings
#[derive(Debug, Deserialize, Clone)]
pub struct TableConfig {
    /// Header labels, one per column
    #[serde(default = "default_headers")]
    pub headers: Vec<String>,

    /// Column count, fixed at four
    #[serde(default = "default_table_cols")]
    pub cols: usize,

    /// Table style name; empty for an unstyled table
    #[serde(default = "default_table_style")]
    pub style: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            headers: default_headers(),
            cols: default_table_cols(),
            style: default_table_style(),
        }
    }
}

/// Font families
#[derive(Debug, Deserialize, Clone)]
pub struct FontsConfig {
    /// Default body font
    #[serde(default = "default_normal_font", rename = "Normal")]
    pub normal: String,

    /// Font of the heading style placed above each table
    #[serde(default = "default_title_font", rename = "Title")]
    pub title: String,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            normal: default_normal_font(),
            title: default_title_font(),
        }
    }
}

/// Heading style placed above each table
#[derive(Debug, Deserialize, Clone)]
pub struct TitleConfig {
    /// Font size in points
    #[serde(default = "default_title_size")]
    pub size: f32,

    /// RGB hex color, with or without a leading `#`
    #[serde(default = "default_title_color")]
    pub color: String,

    /// Display name of the derived heading style
    #[serde(default = "default_title_style")]
    pub style: String,
}

impl TitleConfig {
    /// Color as six uppercase hex digits without the `#`
    pub fn color_hex(&self) -> String {
        self.color.trim().trim_start_matches('#').to_uppercase()
    }
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            size: default_title_size(),
            color: default_title_color(),
            style: default_title_style(),
        }
    }
}

/// Page layout, fonts and heading style
#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    /// Left page margin in inches
    #[serde(default = "default_margin")]
    pub margin_left: f64,

    /// Right page margin in inches
    #[serde(default = "default_margin")]
    pub margin_right: f64,

    #[serde(default)]
    pub fonts: FontsConfig,

    #[serde(default)]
    pub title: TitleConfig,

    /// Column widths in inches
    #[serde(default = "default_column_widths")]
    pub table_cols: Vec<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin_left: default_margin(),
            margin_right: default_margin(),
            fonts: FontsConfig::default(),
            title: TitleConfig::default(),
            table_cols: default_column_widths(),
        }
    }
}

/// Document properties copied verbatim into every output
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetaConfig {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub author: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub comments: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub content_status: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub keywords: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub language: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub subject: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub version: String,
}

/// Optional image footer
#[derive(Debug, Deserialize, Clone)]
pub struct FooterConfig {
    #[serde(default)]
    pub show: bool,

    /// Image file name inside the `assets` directory
    #[serde(default = "default_watermark")]
    pub watermark: String,

    /// Rendered image width in inches
    #[serde(default = "default_footer_width")]
    pub width_in: f64,

    /// Distance between the footer and the page bottom in inches
    #[serde(default = "default_footer_distance")]
    pub distance_in: f64,
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            show: false,
            watermark: default_watermark(),
            width_in: default_footer_width(),
            distance_in: default_footer_distance(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

// Metadata values are free text, but YAML happily types `version: 1.0`
// as a number and `keywords: [a, b]` as a list.
fn deserialize_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(scalar_to_text(&value))
}

fn scalar_to_text(value: &serde_yaml::Value) -> String {
    use serde_yaml::Value;

    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(scalar_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Mapping(_) => String::new(),
        Value::Tagged(tagged) => scalar_to_text(&tagged.value),
    }
}

fn default_glob() -> String {
    "*.srt".to_string()
}

fn default_headers() -> Vec<String> {
    ["Start", "End", "Duration", "Text"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

fn default_table_cols() -> usize {
    TABLE_COLUMNS
}

fn default_table_style() -> String {
    "Table Grid".to_string()
}

fn default_normal_font() -> String {
    "Calibri".to_string()
}

fn default_title_font() -> String {
    "Calibri Light".to_string()
}

fn default_title_size() -> f32 {
    16.0
}

fn default_title_color() -> String {
    "2F5496".to_string()
}

fn default_title_style() -> String {
    "SRT Title".to_string()
}

fn default_margin() -> f64 {
    0.5
}

fn default_column_widths() -> Vec<f64> {
    vec![0.75, 0.75, 0.75, 5.65]
}

fn default_watermark() -> String {
    "watermark.png".to_string()
}

fn default_footer_width() -> f64 {
    1.0
}

fn default_footer_distance() -> f64 {
    0.2
}

impl Config {
    /// Path of the settings file inside the program directory
    pub fn settings_path(program_dir: &Path) -> PathBuf {
        program_dir.join(SETTINGS_FILE_NAME)
    }

    /// Load and validate the settings file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_yaml_str(&content, path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse settings from YAML text without validating them.
    ///
    /// Accepts both a bare settings mapping and one nested under a
    /// top-level `settings:` key.
    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let parse_error = |e: serde_yaml::Error| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        };

        let mut root: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_error)?;
        if root.is_null() {
            root = serde_yaml::Value::Mapping(serde_yaml::Mapping::new());
        }

        let settings = match root.get("settings") {
            Some(nested) if nested.is_mapping() => nested.clone(),
            _ => root,
        };

        serde_yaml::from_value(settings).map_err(parse_error)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let glob = self.filetypes.glob.trim();
        if glob.is_empty() {
            return Err(ConfigError::invalid("filetypes.glob", "pattern must not be empty"));
        }
        globset::Glob::new(glob)
            .map_err(|e| ConfigError::invalid("filetypes.glob", e.to_string()))?;

        if self.table.cols != TABLE_COLUMNS {
            return Err(ConfigError::invalid(
                "table.cols",
                format!("expected {} columns, found {}", TABLE_COLUMNS, self.table.cols),
            ));
        }

        if self.table.headers.len() != TABLE_COLUMNS {
            return Err(ConfigError::invalid(
                "table.headers",
                format!("expected {} labels, found {}", TABLE_COLUMNS, self.table.headers.len()),
            ));
        }

        if self.layout.table_cols.len() != TABLE_COLUMNS {
            return Err(ConfigError::invalid(
                "layout.table_cols",
                format!("expected {} widths, found {}", TABLE_COLUMNS, self.layout.table_cols.len()),
            ));
        }

        if let Some(width) = self.layout.table_cols.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(ConfigError::invalid(
                "layout.table_cols",
                format!("column widths must be positive, found {}", width),
            ));
        }

        for (field, value) in [
            ("layout.margin_left", self.layout.margin_left),
            ("layout.margin_right", self.layout.margin_right),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, format!("margin must be zero or more, found {}", value)));
            }
        }

        if self.layout.fonts.normal.trim().is_empty() {
            return Err(ConfigError::invalid("layout.fonts.Normal", "font name must not be empty"));
        }

        if self.layout.fonts.title.trim().is_empty() {
            return Err(ConfigError::invalid("layout.fonts.Title", "font name must not be empty"));
        }

        if !self.layout.title.size.is_finite() || self.layout.title.size <= 0.0 {
            return Err(ConfigError::invalid(
                "layout.title.size",
                format!("font size must be positive, found {}", self.layout.title.size),
            ));
        }

        if !HEX_COLOR_REGEX.is_match(self.layout.title.color.trim()) {
            return Err(ConfigError::invalid(
                "layout.title.color",
                format!("expected a hex color like 2F5496, found {:?}", self.layout.title.color),
            ));
        }

        if self.layout.title.style.trim().is_empty() {
            return Err(ConfigError::invalid("layout.title.style", "style name must not be empty"));
        }

        // The heading style is a new style based on Heading1, so it needs an id of its own
        let heading_id = heading_style_id(self);
        if RESERVED_STYLE_IDS.contains(&heading_id.as_str()) {
            return Err(ConfigError::invalid(
                "layout.title.style",
                format!("{:?} maps to the built-in style id {}", self.layout.title.style, heading_id),
            ));
        }

        if let Some(table_id) = table_style_id(self) {
            if RESERVED_STYLE_IDS.contains(&table_id.as_str()) || table_id == heading_id {
                return Err(ConfigError::invalid(
                    "table.style",
                    format!("{:?} maps to the style id {}, which is already taken", self.table.style, table_id),
                ));
            }
        }

        if self.footer.show {
            if self.footer.watermark.trim().is_empty() {
                return Err(ConfigError::invalid("footer.watermark", "image name must not be empty"));
            }
            if !self.footer.width_in.is_finite() || self.footer.width_in <= 0.0 {
                return Err(ConfigError::invalid(
                    "footer.width_in",
                    format!("width must be positive, found {}", self.footer.width_in),
                ));
            }
            if !self.footer.distance_in.is_finite() || self.footer.distance_in < 0.0 {
                return Err(ConfigError::invalid(
                    "footer.distance_in",
                    format!("distance must be zero or more, found {}", self.footer.distance_in),
                ));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            filetypes: FileTypesConfig::default(),
            sort: SortConfig::default(),
            table: TableConfig::default(),
            layout: LayoutConfig::default(),
            meta: MetaConfig::default(),
            footer: FooterConfig::default(),
            single_file: false,
            continue_on_error: false,
            log_level: LogLevel::default(),
        }
    }
}
