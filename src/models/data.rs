use std::path::PathBuf;

use chrono::{DateTime, Local};

/// The MRZ fields this harness scores, extracted either from a ground-truth
/// file or from recognized text. Dates are six-digit YYMMDD strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MrzFieldSet {
    pub document_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub expiration_date: Option<String>,
}

impl MrzFieldSet {
    pub fn is_empty(&self) -> bool {
        self.document_number.is_none()
            && self.date_of_birth.is_none()
            && self.expiration_date.is_none()
    }
}

/// Output of the external recognizer: the flat transcript plus its
/// block/line structure. Read-only once produced.
#[derive(Debug, Clone, Default)]
pub struct RecognitionResult {
    pub text: String,
    pub blocks: Vec<TextBlock>,
}

#[derive(Debug, Clone, Default)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone)]
pub struct TextLine {
    pub text: String,
}

/// One discovered dataset image. The ground-truth file may be absent,
/// which forces a failure record without running recognition.
#[derive(Debug, Clone)]
pub struct DatasetEntry {
    pub group_label: String,
    pub image_path: PathBuf,
    pub ground_truth_path: Option<PathBuf>,
}

/// Per-image verdict. `failure` is set only for pipeline errors; a
/// localization miss simply leaves `detected_raw` empty and fails the match.
#[derive(Debug, Clone)]
pub struct EvaluationRecord {
    pub group_label: String,
    pub filename: String,
    pub expected_raw: Option<String>,
    pub detected_raw: Option<String>,
    pub is_match: bool,
    pub failure: Option<String>,
}

impl EvaluationRecord {
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Aggregate counts for one dataset group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    pub group_label: String,
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub failed: usize,
}

/// Result of one dataset run: every record in discovery order plus the
/// run timestamps. Owned by the caller; a new run builds a new report.
#[derive(Debug)]
pub struct EvaluationReport {
    pub records: Vec<EvaluationRecord>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl EvaluationReport {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn matched(&self) -> usize {
        self.records.iter().filter(|r| r.is_match).count()
    }

    pub fn mismatched(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.is_match && !r.is_failed())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.records.iter().filter(|r| r.is_failed()).count()
    }

    pub fn match_rate(&self) -> f32 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.matched() as f32 / self.records.len() as f32
    }

    /// Full detail for a single record, by position in the run.
    pub fn record(&self, index: usize) -> Option<&EvaluationRecord> {
        self.records.get(index)
    }

    /// Per-group counts, in first-seen (discovery) order.
    pub fn group_summary(&self) -> Vec<GroupSummary> {
        let mut groups: Vec<GroupSummary> = Vec::new();
        for record in &self.records {
            let position = match groups
                .iter()
                .position(|g| g.group_label == record.group_label)
            {
                Some(position) => position,
                None => {
                    groups.push(GroupSummary {
                        group_label: record.group_label.clone(),
                        total: 0,
                        matched: 0,
                        mismatched: 0,
                        failed: 0,
                    });
                    groups.len() - 1
                }
            };
            let summary = &mut groups[position];
            summary.total += 1;
            if record.is_failed() {
                summary.failed += 1;
            } else if record.is_match {
                summary.matched += 1;
            } else {
                summary.mismatched += 1;
            }
        }
        groups
    }
}
