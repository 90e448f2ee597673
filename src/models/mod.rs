pub mod data;

pub use data::{
    DatasetEntry, EvaluationRecord, EvaluationReport, GroupSummary, MrzFieldSet,
    RecognitionResult, TextBlock, TextLine,
};
