use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use log::{debug, warn};

use crate::errors::SubtitleError;

// @module: SubRip parsing and caption records

// @const: SRT time range line; trailing position hints are ignored
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+:\d{2}:\d{2}[,.]\d{1,3})\s*-->\s*(\d+:\d{2}:\d{2}[,.]\d{1,3})").unwrap()
});

// @struct: Single subtitle entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Start time in ms
    pub start_time_ms: u64,

    // @field: End time in ms
    pub end_time_ms: u64,

    // @field: Subtitle text, lines joined with '\n'
    pub text: String,
}

impl SubtitleEntry {
    /// Creates a new subtitle entry without validation
    pub fn new(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_time_ms,
            end_time_ms,
            text,
        }
    }

    // @creates: Validated subtitle entry
    // @validates: end >= start
    pub fn new_validated(seq_num: usize, start_time_ms: u64, end_time_ms: u64, text: String) -> Result<Self, SubtitleError> {
        if end_time_ms < start_time_ms {
            return Err(SubtitleError::InvalidTimeRange {
                seq_num,
                start_ms: start_time_ms,
                end_ms: end_time_ms,
            });
        }

        Ok(Self::new(seq_num, start_time_ms, end_time_ms, text))
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm`, `.` also accepted) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Option<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();
        if parts.len() != 4 {
            return None;
        }

        let hours: u64 = parts[0].parse().ok()?;
        let minutes: u64 = parts[1].parse().ok()?;
        let seconds: u64 = parts[2].parse().ok()?;

        // "5" after the separator means 500ms, not 5ms
        let fraction = parts[3];
        if fraction.is_empty() || fraction.len() > 3 {
            return None;
        }
        let millis: u64 = format!("{:0<3}", fraction).parse().ok()?;

        if minutes >= 60 || seconds >= 60 {
            return None;
        }

        // The hours field is unbounded; an absurd value is a bad timestamp
        hours
            .checked_mul(3_600_000)?
            .checked_add(minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Start time with the sub-second part dropped
    pub fn start_seconds(&self) -> u64 {
        self.start_time_ms / 1_000
    }

    /// End time with the sub-second part dropped
    pub fn end_seconds(&self) -> u64 {
        self.end_time_ms / 1_000
    }

    /// Exact duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_time_ms.saturating_sub(self.start_time_ms)
    }
}

/// Captions parsed from one subtitle file
#[derive(Debug)]
pub struct SubtitleCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// Entries in file order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleCollection {
    /// Read and parse a subtitle file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SubtitleError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let entries = Self::parse_srt_string(&content)?;
        debug!("Parsed {} captions from {:?}", entries.len(), path);

        Ok(SubtitleCollection {
            source_file: path.to_path_buf(),
            entries,
        })
    }

    /// Parse SRT format string into subtitle entries.
    ///
    /// Entries keep the order they appear in. Empty content is valid and
    /// yields no entries.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>, SubtitleError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut entries = Vec::new();
        let mut block: Vec<(usize, &str)> = Vec::new();

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                if !block.is_empty() {
                    entries.push(Self::parse_block(&block)?);
                    block.clear();
                }
                continue;
            }
            block.push((index + 1, line));
        }

        if !block.is_empty() {
            entries.push(Self::parse_block(&block)?);
        }

        let overlap_count = entries
            .windows(2)
            .filter(|pair| pair[0].end_time_ms > pair[1].start_time_ms)
            .count();
        if overlap_count > 0 {
            warn!("Found {} overlapping subtitle entries", overlap_count);
        }

        Ok(entries)
    }

    /// Parse one blank-line delimited block: index, time range, text lines
    fn parse_block(block: &[(usize, &str)]) -> Result<SubtitleEntry, SubtitleError> {
        let (index_line, index_text) = block[0];
        let seq_num: usize = index_text
            .trim()
            .parse()
            .map_err(|_| SubtitleError::InvalidIndex {
                line: index_line,
                value: index_text.trim().to_string(),
            })?;

        let &(time_line, time_text) = block
            .get(1)
            .ok_or(SubtitleError::MissingTimestamp { line: index_line + 1 })?;

        let invalid_timestamp = || SubtitleError::InvalidTimestamp {
            line: time_line,
            value: time_text.trim().to_string(),
        };

        let caps = TIMESTAMP_REGEX
            .captures(time_text.trim())
            .ok_or_else(invalid_timestamp)?;
        let start_ms = SubtitleEntry::parse_timestamp(&caps[1]).ok_or_else(invalid_timestamp)?;
        let end_ms = SubtitleEntry::parse_timestamp(&caps[2]).ok_or_else(invalid_timestamp)?;

        let text = block[2..]
            .iter()
            .map(|(_, line)| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n");

        SubtitleEntry::new_validated(seq_num, start_ms, end_ms, text)
    }
}
