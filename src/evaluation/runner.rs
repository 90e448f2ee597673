use std::path::Path;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Local;
use image::GrayImage;
use log::{debug, warn};

use crate::evaluation::config::{MrzStrategy, PipelineConfig};
use crate::models::{
    DatasetEntry, EvaluationRecord, EvaluationReport, MrzFieldSet, RecognitionResult,
};
use crate::processing::ocr::Recognizer;
use crate::processing::{FieldExtractor, ImagePreprocessor, MatchEvaluator, MrzLocalizer};
use crate::utils::MrzEvalError;

/// BatchRunner drives the evaluation pipeline over discovered dataset
/// entries, strictly one at a time, converting every per-entry error into
/// a failure record so a bad image never aborts the run.
pub struct BatchRunner {
    recognizer: Arc<dyn Recognizer>,
    config: PipelineConfig,
}

impl BatchRunner {
    pub fn new(recognizer: Arc<dyn Recognizer>, config: PipelineConfig) -> Self {
        BatchRunner { recognizer, config }
    }

    /// Evaluate every entry, reporting (processed, total) after each one.
    /// The accumulated report is owned by this call and returned by value.
    pub fn run_with_progress<F>(&self, entries: &[DatasetEntry], mut on_progress: F) -> EvaluationReport
    where
        F: FnMut(usize, usize),
    {
        let started_at = Local::now();
        let total = entries.len();
        let mut records = Vec::with_capacity(total);

        for (index, entry) in entries.iter().enumerate() {
            let record = self.evaluate_entry(entry);
            match &record.failure {
                Some(message) => warn!(
                    "{}/{}: failed: {}",
                    record.group_label, record.filename, message
                ),
                None => debug!(
                    "{}/{}: match={}",
                    record.group_label, record.filename, record.is_match
                ),
            }
            records.push(record);
            on_progress(index + 1, total);
        }

        EvaluationReport {
            records,
            started_at,
            finished_at: Local::now(),
        }
    }

    /// Evaluate every entry without progress reporting.
    pub fn run(&self, entries: &[DatasetEntry]) -> EvaluationReport {
        self.run_with_progress(entries, |_, _| {})
    }

    fn evaluate_entry(&self, entry: &DatasetEntry) -> EvaluationRecord {
        let filename = entry
            .image_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        let ground_truth_path = match &entry.ground_truth_path {
            Some(path) => path,
            None => {
                return EvaluationRecord {
                    group_label: entry.group_label.clone(),
                    filename,
                    expected_raw: None,
                    detected_raw: None,
                    is_match: false,
                    failure: Some("missing ground truth".to_string()),
                }
            }
        };

        match self.process_entry(entry, ground_truth_path) {
            Ok((expected_raw, detected_raw, is_match)) => EvaluationRecord {
                group_label: entry.group_label.clone(),
                filename,
                expected_raw: Some(expected_raw),
                detected_raw,
                is_match,
                failure: None,
            },
            Err(e) => EvaluationRecord {
                group_label: entry.group_label.clone(),
                filename,
                expected_raw: None,
                detected_raw: None,
                is_match: false,
                failure: Some(e.to_string()),
            },
        }
    }

    fn process_entry(
        &self,
        entry: &DatasetEntry,
        ground_truth_path: &Path,
    ) -> Result<(String, Option<String>, bool), MrzEvalError> {
        let ground_truth = std::fs::read_to_string(ground_truth_path)?;
        let expected_raw = ground_truth.trim().to_string();
        let expected = FieldExtractor::extract_from_lines(&expected_raw);

        let image_bytes = std::fs::read(&entry.image_path)?;
        let image = image::load_from_memory(&image_bytes).map_err(|e| {
            MrzEvalError::ImageDecode(format!("{}: {}", entry.image_path.display(), e))
        })?;

        let cropped = ImagePreprocessor::crop_mrz_region(
            &image,
            self.config.crop_bottom_fraction,
            self.config.crop_left_margin,
        )?;
        let binarized = ImagePreprocessor::preprocess(&cropped)?;

        let recognized = self.recognize_with_timeout(binarized)?;

        let (detected_raw, detected) = match self.config.strategy {
            MrzStrategy::LineLocate => match MrzLocalizer::locate(&recognized.text) {
                Some(candidate) => {
                    let fields = FieldExtractor::extract_from_lines(&candidate);
                    (Some(candidate), fields)
                }
                // No candidate is not fatal: null fields simply fail the match
                None => (None, MrzFieldSet::default()),
            },
            MrzStrategy::JoinedBlocks => {
                let joined = FieldExtractor::join_blocks(&recognized);
                let candidate = FieldExtractor::joined_candidate(&joined);
                let fields = FieldExtractor::extract_from_joined(&joined);
                (candidate, fields)
            }
        };

        let is_match = MatchEvaluator::is_match(&expected, &detected);
        Ok((expected_raw, detected_raw, is_match))
    }

    /// Run recognition on a worker thread so a hung engine call cannot
    /// stall the whole batch. On timeout the entry fails and the worker is
    /// left to finish in the background, which is why the recognizer sits
    /// behind an Arc.
    fn recognize_with_timeout(&self, image: GrayImage) -> Result<RecognitionResult, MrzEvalError> {
        let timeout_secs = match self.config.recognition_timeout_secs {
            Some(secs) => secs,
            None => return self.recognizer.recognize(&image),
        };

        let recognizer = Arc::clone(&self.recognizer);
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let result = recognizer.recognize(&image);
            let _ = sender.send(result);
        });

        match receiver.recv_timeout(Duration::from_secs(timeout_secs)) {
            Ok(result) => result,
            Err(_) => Err(MrzEvalError::RecognitionTimeout(timeout_secs)),
        }
    }
}
