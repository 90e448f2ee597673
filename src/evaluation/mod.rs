pub mod config;
pub mod dataset;
pub mod export;
pub mod runner;

pub use config::{MrzStrategy, PipelineConfig};
pub use runner::BatchRunner;
