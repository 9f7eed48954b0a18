use anyhow::{Result, Context};
use globset::GlobBuilder;
use log::{debug, warn};
use std::cmp::Ordering;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

use crate::app_config::{Config, SortConfig, SortDirection, SortKey};

// @module: File and directory utilities

/// Environment variable overriding the program directory
pub const HOME_ENV_VAR: &str = "SRT2DOCX_HOME";

/// Directory holding footer images, inside the program directory
pub const ASSETS_DIR_NAME: &str = "assets";

/// Fallback name for a combined document whose directory has no name
const COMBINED_FALLBACK_NAME: &str = "combined";

/// Directories a run works with
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// Where inputs are found and outputs are written
    pub work_dir: PathBuf,
    /// Where the settings file and the `assets` directory live
    pub program_dir: PathBuf,
}

impl RunPaths {
    pub fn new<P1: Into<PathBuf>, P2: Into<PathBuf>>(work_dir: P1, program_dir: P2) -> Self {
        Self {
            work_dir: work_dir.into(),
            program_dir: program_dir.into(),
        }
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.program_dir.join(ASSETS_DIR_NAME)
    }
}

// Sort value of one candidate; one variant per key
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Name(PathBuf),
    Size(u64),
    Age(Duration),
}

impl SortValue {
    fn for_path(path: &Path, key: SortKey, now: SystemTime) -> Self {
        match key {
            SortKey::Name => SortValue::Name(path.to_path_buf()),
            SortKey::Size => SortValue::Size(match fs::metadata(path) {
                Ok(meta) => meta.len(),
                Err(e) => {
                    warn!("Cannot read size of {:?}: {}", path, e);
                    0
                }
            }),
            SortKey::Age => {
                let modified = fs::metadata(path).and_then(|meta| meta.modified());
                SortValue::Age(match modified {
                    // Timestamps in the future count as brand new
                    Ok(time) => now.duration_since(time).unwrap_or(Duration::ZERO),
                    Err(e) => {
                        warn!("Cannot read modification time of {:?}: {}", path, e);
                        Duration::ZERO
                    }
                })
            }
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    /// Directory the settings file and assets are resolved against.
    ///
    /// `SRT2DOCX_HOME` wins when set; otherwise the directory holding the
    /// running executable.
    pub fn program_dir() -> Result<PathBuf> {
        if let Some(home) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(home));
        }

        let exe = std::env::current_exe().context("Failed to locate the running executable")?;
        let exe = fs::canonicalize(&exe).unwrap_or(exe);
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow::anyhow!("Executable has no parent directory: {:?}", exe))
    }

    /// Candidate input files under `work_dir` matching the configured glob,
    /// ordered by the configured sort key and direction.
    ///
    /// No match is not an error; the result is simply empty.
    pub fn list_inputs<P: AsRef<Path>>(config: &Config, work_dir: P) -> Result<Vec<PathBuf>> {
        let work_dir = work_dir.as_ref();
        let files = Self::find_files(work_dir, &config.filetypes.glob)?;
        debug!("Glob matched {} file(s) in {:?}", files.len(), work_dir);
        Ok(Self::sort_inputs(files, &config.sort, SystemTime::now()))
    }

    /// Files under `dir` whose relative path matches `pattern`.
    ///
    /// `*` does not cross directory separators, so only patterns with a `/`
    /// or `**` look into subdirectories.
    pub fn find_files<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        let pattern = pattern.trim();
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Invalid file pattern: {}", pattern))?
            .compile_matcher();

        let recursive = pattern.contains('/') || pattern.contains("**");
        let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
        if !recursive {
            walker = walker.max_depth(1);
        }

        let mut result = Vec::new();
        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            let relative = relative.to_string_lossy().replace('\\', "/");
            if matcher.is_match(relative.as_str()) {
                result.push(entry.path().to_path_buf());
            }
        }

        Ok(result)
    }

    /// Stable sort; ties keep the listing order in both directions
    pub fn sort_inputs(files: Vec<PathBuf>, sort: &SortConfig, now: SystemTime) -> Vec<PathBuf> {
        let mut keyed: Vec<(SortValue, PathBuf)> = files
            .into_iter()
            .map(|path| (SortValue::for_path(&path, sort.key, now), path))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| {
            let ordering: Ordering = a.cmp(b);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        keyed.into_iter().map(|(_, path)| path).collect()
    }

    /// Output name for a single input: its file name without extension
    pub fn output_stem<P: AsRef<Path>>(input_file: P) -> String {
        input_file
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "output".to_string())
    }

    /// Output name for a combined document: the name of the directory
    /// holding the first input
    pub fn combined_output_name<P: AsRef<Path>>(first_input: P) -> String {
        let first_input = first_input.as_ref();
        let parent = match first_input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let parent = fs::canonicalize(&parent).unwrap_or(parent);

        parent
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| COMBINED_FALLBACK_NAME.to_string())
    }

    /// Write `bytes` to a temporary file next to `path`, then rename it over
    /// `path`. Readers never observe a half-written file.
    ///
    /// A replaced file keeps its permissions; a new one gets the same mode
    /// `File::create` would give it under the current umask.
    pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> std::io::Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        builder.prefix(".srt2docx-").suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }

        let mut temp = builder.tempfile_in(dir)?;
        temp.write_all(bytes)?;
        if let Ok(existing) = fs::metadata(path) {
            temp.as_file().set_permissions(existing.permissions())?;
        }
        temp.as_file().sync_all()?;

        temp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
