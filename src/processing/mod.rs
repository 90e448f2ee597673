pub mod field_extractor;
pub mod image_processor;
pub mod localizer;
pub mod matcher;
pub mod ocr;

pub use field_extractor::FieldExtractor;
pub use image_processor::ImagePreprocessor;
pub use localizer::MrzLocalizer;
pub use matcher::MatchEvaluator;
pub use ocr::{Recognizer, TesseractRecognizer};
