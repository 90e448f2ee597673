use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::MrzEvalError;

/// Which localization strategy feeds the field extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MrzStrategy {
    /// Pair adjacent 44-character lines, regex fallbacks after.
    LineLocate,
    /// Flatten every recognized block and run the TD3 capture pattern.
    JoinedBlocks,
}

impl Default for MrzStrategy {
    fn default() -> Self {
        MrzStrategy::LineLocate
    }
}

/// Tunable pipeline parameters. The crop values are dataset heuristics
/// that varied between tuning rounds, so they live in configuration
/// rather than constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Fraction of the page height kept at the bottom of the image.
    pub crop_bottom_fraction: f32,
    /// Pixels discarded on the left of the crop.
    pub crop_left_margin: u32,
    pub strategy: MrzStrategy,
    /// Per-image recognition timeout; None disables the limit.
    pub recognition_timeout_secs: Option<u64>,
    /// Tesseract language code.
    pub ocr_lang: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            crop_bottom_fraction: 0.25,
            crop_left_margin: 0,
            strategy: MrzStrategy::default(),
            recognition_timeout_secs: Some(30),
            ocr_lang: "eng".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing fields keep their
    /// defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, MrzEvalError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&raw).map_err(|e| {
            MrzEvalError::Config(format!(
                "Failed to parse config {}: {}",
                path.as_ref().display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.crop_bottom_fraction, 0.25);
        assert_eq!(config.crop_left_margin, 0);
        assert_eq!(config.strategy, MrzStrategy::LineLocate);
        assert_eq!(config.recognition_timeout_secs, Some(30));
        assert_eq!(config.ocr_lang, "eng");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"crop_left_margin": 150, "strategy": "joined_blocks"}}"#).unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.crop_left_margin, 150);
        assert_eq!(config.strategy, MrzStrategy::JoinedBlocks);
        assert_eq!(config.crop_bottom_fraction, 0.25);
        assert_eq!(config.ocr_lang, "eng");
    }

    #[test]
    fn test_invalid_json_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(PipelineConfig::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = PipelineConfig {
            crop_bottom_fraction: 0.3,
            crop_left_margin: 200,
            strategy: MrzStrategy::JoinedBlocks,
            recognition_timeout_secs: None,
            ocr_lang: "ocrb".to_string(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.crop_left_margin, 200);
        assert_eq!(back.strategy, MrzStrategy::JoinedBlocks);
        assert_eq!(back.recognition_timeout_secs, None);
    }
}
