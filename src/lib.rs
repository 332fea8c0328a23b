pub mod error;
pub mod types;
pub mod model;
pub mod ml;
pub mod evaluation;
pub mod report;

pub use error::{EvalError, Result};
pub use model::EvalConfig;

use evaluation::{EvaluationOutcome, Evaluator};
use ml::{Classifier, LabelCatalog};
use report::{load_font, ReportPaths, ReportWriter};

/// Heatmap title for a split, e.g. "test" -> "Confusion Matrix (Test)"
pub fn heatmap_title(split: &str) -> String {
    let mut chars = split.chars();
    let split = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("Confusion Matrix ({})", split)
}

/// Evaluate the configured split with an already loaded classifier and write
/// the evidence artifacts.
pub fn evaluate_and_report<C: Classifier + ?Sized>(
    classifier: &C,
    config: &EvalConfig,
) -> Result<(EvaluationOutcome, ReportPaths)> {
    let font = load_font(config.font_path.as_deref())?;
    let catalog = LabelCatalog::default();
    let evaluator = Evaluator::new(classifier, catalog.clone())
        .with_missing_class_policy(config.missing_class_policy)
        .with_decode_error_policy(config.decode_error_policy);
    let outcome = evaluator.evaluate(&config.split_dir())?;

    let paths = ReportWriter::new(config.evidence_dir(), &catalog)
        .with_font(font)
        .with_title(heatmap_title(&config.split))
        .write_all(&outcome)?;

    Ok((outcome, paths))
}

/// Load the model, evaluate, write evidence and print the status lines
#[cfg(feature = "ml")]
pub fn run(config: &EvalConfig) -> anyhow::Result<evaluation::SummaryMetrics> {
    use anyhow::Context;

    let classifier = ml::TfliteClassifier::load(&config.model_path, config.image_size)
        .with_context(|| format!("Failed to load model {}", config.model_path.display()))?;
    println!("[OK] Loaded INT8 model: {}", config.model_path.display());
    classifier.info().print_info();

    let (outcome, _paths) = evaluate_and_report(&classifier, config)
        .with_context(|| format!("Evaluation of {} failed", config.split_dir().display()))?;

    println!("[DONE] Evidence saved to: {}", config.evidence_dir().display());
    println!("Accuracy: {}", serde_json::to_string(&outcome.summary)?);
    Ok(outcome.summary)
}
