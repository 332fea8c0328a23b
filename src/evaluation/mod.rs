pub mod metrics;
pub mod evaluator;

pub use metrics::{
    accuracy_score, f1_score, percent, ClassMetrics, ClassificationReport, Confusion,
    ConfusionMatrix, SummaryMetrics,
};
pub use evaluator::{EvaluationOutcome, Evaluator};
