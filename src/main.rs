// MRZ OCR evaluation harness
// Runs the recognizer over a labeled dataset and scores field extraction

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use mrz_eval::evaluation::{dataset, export, BatchRunner, MrzStrategy, PipelineConfig};
use mrz_eval::models::EvaluationReport;
use mrz_eval::processing::TesseractRecognizer;

#[derive(Parser)]
#[command(
    name = "mrz-eval",
    about = "Evaluate OCR-based MRZ extraction against a labeled dataset"
)]
struct Cli {
    /// Dataset root: one subdirectory per country with paired .jpg/.txt files
    dataset_root: PathBuf,

    /// JSON pipeline configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the per-image results to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// MRZ localization strategy
    #[arg(long, value_enum)]
    strategy: Option<MrzStrategy>,

    /// Pixels discarded on the left of the MRZ crop
    #[arg(long)]
    left_margin: Option<u32>,

    /// Fraction of the page height kept at the bottom of the crop
    #[arg(long)]
    bottom_fraction: Option<f32>,

    /// Per-image recognition timeout in seconds (0 disables the limit)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Tesseract language code
    #[arg(long)]
    lang: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match PipelineConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if let Some(margin) = cli.left_margin {
        config.crop_left_margin = margin;
    }
    if let Some(fraction) = cli.bottom_fraction {
        config.crop_bottom_fraction = fraction;
    }
    if let Some(secs) = cli.timeout_secs {
        config.recognition_timeout_secs = if secs == 0 { None } else { Some(secs) };
    }
    if let Some(lang) = cli.lang {
        config.ocr_lang = lang;
    }

    log::info!("Pipeline config: {:?}", config);

    let entries = match dataset::discover_entries(&cli.dataset_root) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error discovering dataset: {}", e);
            std::process::exit(1);
        }
    };
    if entries.is_empty() {
        eprintln!("No images found under {}", cli.dataset_root.display());
        std::process::exit(1);
    }

    let recognizer = Arc::new(TesseractRecognizer::new(&config.ocr_lang));
    let runner = BatchRunner::new(recognizer, config);

    println!("Evaluating {} images...", entries.len());
    let report = runner.run_with_progress(&entries, |current, total| {
        let entry = &entries[current - 1];
        let filename = entry
            .image_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        println!("  [{}/{}] {}/{}", current, total, entry.group_label, filename);
    });

    print_summary(&report);

    if let Some(csv_path) = &cli.csv {
        if let Err(e) = export::write_csv(&report, csv_path) {
            eprintln!("Error writing CSV: {}", e);
            std::process::exit(1);
        }
        println!("Results written to {}", csv_path.display());
    }
}

fn print_summary(report: &EvaluationReport) {
    println!("\n==================================================================");
    println!("      MRZ EVALUATION SUMMARY");
    println!("==================================================================");
    println!("  Total images     : {}", report.total());
    println!("  Matched          : {}", report.matched());
    println!("  Mismatched       : {}", report.mismatched());
    println!("  Failed           : {}", report.failed());
    println!("  Match rate       : {:.1}%", report.match_rate() * 100.0);
    let elapsed = report.finished_at.signed_duration_since(report.started_at);
    println!(
        "  Elapsed          : {}.{:03}s",
        elapsed.num_seconds(),
        elapsed.num_milliseconds().rem_euclid(1000)
    );

    let groups = report.group_summary();
    if groups.len() > 1 {
        println!("------------------------------------------------------------------");
        for group in &groups {
            println!(
                "  {:<16} {:>4} total {:>4} matched {:>4} mismatched {:>4} failed",
                group.group_label, group.total, group.matched, group.mismatched, group.failed
            );
        }
    }
    println!("==================================================================");
}
