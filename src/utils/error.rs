use thiserror::Error;

#[derive(Debug, Error)]
pub enum MrzEvalError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("Image has zero area ({width}x{height})")]
    ZeroAreaImage { width: u32, height: u32 },
    #[error("Recognition error: {0}")]
    Recognition(String),
    #[error("Recognition timed out after {0} seconds")]
    RecognitionTimeout(u64),
    #[error("Dataset layout error: {0}")]
    DatasetLayout(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
