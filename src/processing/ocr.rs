use std::io::{Cursor, Write};

use image::{DynamicImage, GrayImage, ImageFormat};
use log::debug;
use tempfile::NamedTempFile;
use tesseract::Tesseract;

use crate::models::{RecognitionResult, TextBlock, TextLine};
use crate::utils::MrzEvalError;

/// Characters that can legally appear in an MRZ.
const MRZ_CHAR_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789<";

/// Recognizer is the seam to the external OCR engine. Implementations
/// take the binarized MRZ crop and return the raw transcript together
/// with its block/line structure.
pub trait Recognizer: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<RecognitionResult, MrzEvalError>;
}

/// Tesseract-backed recognizer restricted to the MRZ character set.
pub struct TesseractRecognizer {
    lang: String,
}

impl TesseractRecognizer {
    pub fn new(lang: &str) -> Self {
        TesseractRecognizer {
            lang: lang.to_string(),
        }
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<RecognitionResult, MrzEvalError> {
        // Tesseract reads from a file path, so round-trip through a temp PNG
        let mut png_bytes = Vec::new();
        let mut cursor = Cursor::new(&mut png_bytes);
        DynamicImage::ImageLuma8(image.clone())
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| MrzEvalError::Recognition(format!("Failed to encode image: {}", e)))?;

        let mut temp_file = NamedTempFile::new()
            .map_err(|e| MrzEvalError::Recognition(format!("Failed to create temp file: {}", e)))?;
        temp_file
            .write_all(&png_bytes)
            .map_err(|e| MrzEvalError::Recognition(format!("Failed to write temp file: {}", e)))?;

        let path_str = temp_file
            .path()
            .to_str()
            .ok_or_else(|| MrzEvalError::Recognition("Failed to convert temp path to string".to_string()))?;

        let text = Tesseract::new(None, Some(&self.lang))
            .map_err(|e| MrzEvalError::Recognition(format!("Tesseract init error: {}", e)))?
            .set_variable("tessedit_char_whitelist", MRZ_CHAR_WHITELIST)
            .map_err(|e| MrzEvalError::Recognition(format!("Tesseract set variable error: {}", e)))?
            .set_image(path_str)
            .map_err(|e| MrzEvalError::Recognition(format!("Tesseract set image error: {}", e)))?
            .get_text()
            .map_err(|e| MrzEvalError::Recognition(format!("Tesseract error: {}", e)))?;

        debug!("Recognizer transcript:\n{}", text);

        // The plain-text API has no block segmentation; expose the
        // transcript as a single block of per-line entries.
        let lines = text
            .lines()
            .map(|line| TextLine {
                text: line.to_string(),
            })
            .collect();

        Ok(RecognitionResult {
            text,
            blocks: vec![TextBlock { lines }],
        })
    }
}
