//! Evaluation run: scan, infer, aggregate

use std::path::{Path, PathBuf};

use crate::error::{EvalError, Result};
use crate::evaluation::metrics::{
    ClassificationReport, Confusion, ConfusionMatrix, SummaryMetrics,
};
use crate::ml::{argmax, predict_path, Classifier, LabelCatalog, TestDataset};
use crate::types::{DecodeErrorPolicy, MissingClassPolicy};

/// Everything the report writer needs from one run
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    /// Split directory that was evaluated
    pub split_dir: PathBuf,
    pub y_true: Vec<usize>,
    pub y_pred: Vec<usize>,
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
    pub summary: SummaryMetrics,
    pub top_confusions: Vec<Confusion>,
    /// Images left out under `DecodeErrorPolicy::Skip`
    pub skipped: Vec<PathBuf>,
}

impl EvaluationOutcome {
    /// Number of evaluated samples
    pub fn num_samples(&self) -> usize {
        self.y_true.len()
    }
}

/// Runs a classifier over a labeled split
pub struct Evaluator<'a, C: Classifier + ?Sized> {
    classifier: &'a C,
    catalog: LabelCatalog,
    missing_class_policy: MissingClassPolicy,
    decode_error_policy: DecodeErrorPolicy,
}

impl<'a, C: Classifier + ?Sized> Evaluator<'a, C> {
    pub fn new(classifier: &'a C, catalog: LabelCatalog) -> Self {
        Self {
            classifier,
            catalog,
            missing_class_policy: MissingClassPolicy::default(),
            decode_error_policy: DecodeErrorPolicy::default(),
        }
    }

    pub fn with_missing_class_policy(mut self, policy: MissingClassPolicy) -> Self {
        self.missing_class_policy = policy;
        self
    }

    pub fn with_decode_error_policy(mut self, policy: DecodeErrorPolicy) -> Self {
        self.decode_error_policy = policy;
        self
    }

    /// Evaluate every image of `split_dir`, one at a time in scan order
    pub fn evaluate(&self, split_dir: &Path) -> Result<EvaluationOutcome> {
        let dataset = TestDataset::scan(split_dir, &self.catalog, self.missing_class_policy)?;
        if dataset.is_empty() {
            return Err(EvalError::EmptyDataset(split_dir.to_path_buf()));
        }
        tracing::info!(
            "Evaluating {} samples from {}",
            dataset.len(),
            split_dir.display()
        );

        let num_classes = self.catalog.len();
        tracing::debug!("Samples per class: {:?}", dataset.class_counts(num_classes));
        let mut y_true = Vec::with_capacity(dataset.len());
        let mut y_pred = Vec::with_capacity(dataset.len());
        let mut skipped = Vec::new();

        for (i, sample) in dataset.samples().iter().enumerate() {
            let scores = match predict_path(self.classifier, &sample.path) {
                Ok(scores) => scores,
                Err(EvalError::Decode { path, source })
                    if self.decode_error_policy == DecodeErrorPolicy::Skip =>
                {
                    tracing::warn!("Skipping undecodable image {}: {}", path.display(), source);
                    skipped.push(path);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if scores.len() != num_classes {
                return Err(EvalError::Inference {
                    path: sample.path.clone(),
                    message: format!(
                        "expected {} scores, model returned {}",
                        num_classes,
                        scores.len()
                    ),
                });
            }
            let predicted = argmax(&scores).ok_or_else(|| EvalError::Inference {
                path: sample.path.clone(),
                message: "score vector has no comparable values".to_string(),
            })?;

            tracing::debug!(
                "[{}/{}] {} => {} (true {})",
                i + 1,
                dataset.len(),
                sample.path.display(),
                self.catalog.name(predicted).unwrap_or("?"),
                self.catalog.name(sample.label).unwrap_or("?")
            );

            y_true.push(sample.label);
            y_pred.push(predicted);
        }

        if y_true.is_empty() {
            return Err(EvalError::EmptyDataset(split_dir.to_path_buf()));
        }
        if !skipped.is_empty() {
            tracing::warn!("{} images could not be decoded and were skipped", skipped.len());
        }

        let confusion = ConfusionMatrix::from_pairs(&y_true, &y_pred, num_classes);
        let report = ClassificationReport::from_confusion(&confusion);
        let summary = SummaryMetrics::from_report(&report);
        let top_confusions = confusion.top_confusions();

        Ok(EvaluationOutcome {
            split_dir: split_dir.to_path_buf(),
            y_true,
            y_pred,
            confusion,
            report,
            summary,
            top_confusions,
            skipped,
        })
    }
}
