use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::app_config::Config;
use crate::document::{close_document, create_document, DocumentSink};
use crate::errors::AppError;
use crate::file_utils::{FileManager, RunPaths};
use crate::subtitle_processor::SubtitleCollection;
use crate::table_renderer::render_table;

// @module: Batch conversion controller

/// One input that could not be converted
#[derive(Debug)]
pub struct FileFailure {
    /// Input file, or the combined output name when the final save failed
    pub path: PathBuf,
    pub error: AppError,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Documents written, in the order they were saved
    pub outputs: Vec<PathBuf>,
    /// Inputs skipped because of an error (only with `continue_on_error`)
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch completed: {} document(s) written, {} failure(s)",
            self.outputs.len(),
            self.failures.len()
        )
    }
}

/// Main application controller for subtitle table conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Working and program directories
    paths: RunPaths,
    // @field: Draw the progress bar
    show_progress: bool,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config, paths: RunPaths) -> Self {
        Self {
            config,
            paths,
            show_progress: true,
        }
    }

    /// Hide the progress bar, e.g. when output is not a terminal
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Convert every matching input in the working directory.
    ///
    /// Stops at the first failure unless `continue_on_error` is set, in
    /// which case failures are collected in the report.
    pub fn run(&self, version: &str) -> Result<BatchReport, AppError> {
        let start_time = std::time::Instant::now();

        if !self.paths.work_dir.is_dir() {
            return Err(AppError::File(format!(
                "Working directory does not exist: {:?}",
                self.paths.work_dir
            )));
        }

        info!("Glob in effect is: [{}]", self.config.filetypes.glob);
        let inputs = FileManager::list_inputs(&self.config, &self.paths.work_dir)
            .map_err(|e| AppError::File(format!("{:#}", e)))?;
        if inputs.is_empty() {
            warn!("No files matched [{}] in {:?}", self.config.filetypes.glob, self.paths.work_dir);
            return Ok(BatchReport::default());
        }

        let progress = self.progress_bar(inputs.len() as u64);
        let result = if self.config.single_file {
            self.run_combined(&inputs, version, &progress)
        } else {
            self.run_per_file(&inputs, version, &progress)
        };
        progress.finish_and_clear();

        let report = result?;
        info!("{} in {:.1}s", report.summary(), start_time.elapsed().as_secs_f64());
        Ok(report)
    }

    // One document per input, saved as soon as its table is rendered
    fn run_per_file(&self, inputs: &[PathBuf], version: &str, progress: &ProgressBar) -> Result<BatchReport, AppError> {
        let mut report = BatchReport::default();

        for input in inputs {
            let name = FileManager::output_stem(input);
            progress.set_message(format!("Processing: {}", name));

            match self.convert_file(input, &name, version) {
                Ok(output) => report.outputs.push(output),
                Err(e) => self.record_failure(&mut report, input, e)?,
            }
            progress.inc(1);
        }

        Ok(report)
    }

    // All inputs stacked into one document named after the first input's directory
    fn run_combined(&self, inputs: &[PathBuf], version: &str, progress: &ProgressBar) -> Result<BatchReport, AppError> {
        let mut report = BatchReport::default();
        let mut document = create_document(&self.config);
        let mut rendered = 0usize;

        for input in inputs {
            let title = FileManager::output_stem(input);
            progress.set_message(format!("Processing: {}", title));

            match self.load_captions(input) {
                Ok(captions) => {
                    render_table(&self.config, &captions.entries, &title, &mut document);
                    rendered += 1;
                }
                Err(e) => self.record_failure(&mut report, input, e)?,
            }
            progress.inc(1);
        }

        if rendered == 0 {
            warn!("No tables rendered, combined document not saved");
            return Ok(report);
        }

        let name = FileManager::combined_output_name(&inputs[0]);
        match self.save(&name, version, &mut document) {
            Ok(output) => report.outputs.push(output),
            Err(e) => self.record_failure(&mut report, Path::new(&name), e)?,
        }

        Ok(report)
    }

    fn convert_file(&self, input: &Path, name: &str, version: &str) -> Result<PathBuf, AppError> {
        let captions = self.load_captions(input)?;
        let mut document = create_document(&self.config);
        render_table(&self.config, &captions.entries, name, &mut document);
        self.save(name, version, &mut document)
    }

    fn load_captions(&self, input: &Path) -> Result<SubtitleCollection, AppError> {
        info!("Processing: [{}]", input.display());
        let captions = SubtitleCollection::from_file(input).map_err(|source| AppError::InputParse {
            path: input.to_path_buf(),
            source,
        })?;
        debug!("Parsed {} caption(s) from {:?}", captions.entries.len(), input);
        Ok(captions)
    }

    fn save<D: DocumentSink + ?Sized>(&self, name: &str, version: &str, document: &mut D) -> Result<PathBuf, AppError> {
        close_document(
            &self.config,
            name,
            version,
            document,
            &self.paths.work_dir,
            &self.paths.assets_dir(),
        )
        .map_err(|source| AppError::DocumentWrite {
            name: name.to_string(),
            source,
        })
    }

    // Fail-fast hands the error back; continue mode keeps it for the report
    fn record_failure(&self, report: &mut BatchReport, path: &Path, error: AppError) -> Result<(), AppError> {
        if !self.config.continue_on_error {
            return Err(error);
        }

        error!("Error processing {}: {}", path.display(), error);
        report.failures.push(FileFailure {
            path: path.to_path_buf(),
            error,
        });
        Ok(())
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }

        let folder_pb = ProgressBar::new(len);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");
        folder_pb
    }
}
