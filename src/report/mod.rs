//! Evidence artifacts of an evaluation run
//!
//! Every artifact is rewritten on each run; nothing is versioned and a failed
//! write leaves whatever an earlier run produced.

pub mod text;
pub mod tables;
pub mod heatmap;

pub use text::format_classification_report;
pub use tables::{
    confusion_rows, per_class_rows, write_per_class_csv, write_top_confusions_csv, ConfusionRow,
    PerClassRow,
};
pub use heatmap::{load_font, render_confusion_heatmap, write_confusion_heatmap};

use ab_glyph::FontVec;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::evaluation::{EvaluationOutcome, SummaryMetrics};
use crate::ml::LabelCatalog;

pub const CLASSIFICATION_REPORT_FILE: &str = "classification_report.txt";
pub const PER_CLASS_FILE: &str = "per_class.csv";
pub const CONFUSION_MATRIX_FILE: &str = "confusion_matrix.png";
pub const TOP_CONFUSIONS_FILE: &str = "top_confusions.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Decimals in the text report
const REPORT_DIGITS: usize = 2;

/// Paths of the written artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub classification_report: PathBuf,
    pub per_class: PathBuf,
    pub confusion_matrix: PathBuf,
    pub top_confusions: PathBuf,
    pub summary: PathBuf,
}

impl ReportPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            classification_report: dir.join(CLASSIFICATION_REPORT_FILE),
            per_class: dir.join(PER_CLASS_FILE),
            confusion_matrix: dir.join(CONFUSION_MATRIX_FILE),
            top_confusions: dir.join(TOP_CONFUSIONS_FILE),
            summary: dir.join(SUMMARY_FILE),
        }
    }
}

/// Writes the artifact set into one output directory
pub struct ReportWriter<'a> {
    output_dir: PathBuf,
    catalog: &'a LabelCatalog,
    font: Option<FontVec>,
    title: String,
}

impl<'a> ReportWriter<'a> {
    pub fn new(output_dir: impl Into<PathBuf>, catalog: &'a LabelCatalog) -> Self {
        Self {
            output_dir: output_dir.into(),
            catalog,
            font: None,
            title: "Confusion Matrix".to_string(),
        }
    }

    /// Font for heatmap text; without one the heatmap carries no labels
    pub fn with_font(mut self, font: Option<FontVec>) -> Self {
        self.font = font;
        self
    }

    /// Heatmap title, e.g. "Confusion Matrix (Test)"
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Write every artifact, creating the output directory when needed
    pub fn write_all(&self, outcome: &EvaluationOutcome) -> Result<ReportPaths> {
        std::fs::create_dir_all(&self.output_dir)?;
        let paths = ReportPaths::in_dir(&self.output_dir);

        let text = format_classification_report(&outcome.report, self.catalog, REPORT_DIGITS);
        std::fs::write(&paths.classification_report, text)?;

        write_per_class_csv(
            &paths.per_class,
            &per_class_rows(&outcome.report, self.catalog),
        )?;

        if self.font.is_none() {
            tracing::warn!("No font available, confusion matrix is rendered without labels");
        }
        let labels: Vec<String> = (0..self.catalog.len())
            .map(|i| self.catalog.display_name(i))
            .collect();
        write_confusion_heatmap(
            &paths.confusion_matrix,
            &outcome.confusion,
            &labels,
            &self.title,
            self.font.as_ref(),
        )?;

        write_top_confusions_csv(
            &paths.top_confusions,
            &confusion_rows(&outcome.top_confusions, self.catalog),
        )?;

        write_summary_json(&paths.summary, &outcome.summary)?;

        tracing::info!("Wrote evidence to {}", self.output_dir.display());
        Ok(paths)
    }
}

/// `summary.json`, two-space indented
pub fn write_summary_json(path: &Path, summary: &SummaryMetrics) -> Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{ClassificationReport, ConfusionMatrix};

    fn outcome(y_true: Vec<usize>, y_pred: Vec<usize>) -> EvaluationOutcome {
        let confusion = ConfusionMatrix::from_pairs(&y_true, &y_pred, 10);
        let report = ClassificationReport::from_confusion(&confusion);
        EvaluationOutcome {
            split_dir: PathBuf::from("test"),
            summary: SummaryMetrics::from_report(&report),
            top_confusions: confusion.top_confusions(),
            y_true,
            y_pred,
            confusion,
            report,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_summary_json_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SUMMARY_FILE);
        let summary = SummaryMetrics {
            accuracy: 92.5,
            precision: 90.12,
            recall: 88.0,
            f1: 89.01,
        };
        write_summary_json(&path, &summary).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "{\n  \"accuracy\": 92.5,\n  \"precision\": 90.12,\n  \"recall\": 88.0,\n  \"f1\": 89.01\n}"
        );
    }

    #[test]
    fn test_write_all_creates_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("evidence");
        let catalog = LabelCatalog::default();

        let paths = ReportWriter::new(&out, &catalog)
            .with_title("Confusion Matrix (Test)")
            .write_all(&outcome(vec![0, 0, 9], vec![0, 9, 9]))
            .unwrap();

        assert_eq!(paths, ReportPaths::in_dir(&out));
        for path in [
            &paths.classification_report,
            &paths.per_class,
            &paths.confusion_matrix,
            &paths.top_confusions,
            &paths.summary,
        ] {
            assert!(path.is_file(), "missing {}", path.display());
        }

        let confusions = std::fs::read_to_string(&paths.top_confusions).unwrap();
        assert_eq!(confusions, "true,predicted,count\ncar,van,1\n");
    }

    #[test]
    fn test_rewrite_overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = LabelCatalog::default();
        let writer = ReportWriter::new(dir.path(), &catalog);

        writer.write_all(&outcome(vec![0, 0], vec![0, 9])).unwrap();
        let paths = writer.write_all(&outcome(vec![0, 0], vec![0, 0])).unwrap();

        let confusions = std::fs::read_to_string(&paths.top_confusions).unwrap();
        assert_eq!(confusions, "true,predicted,count\n");
        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.summary).unwrap()).unwrap();
        assert_eq!(summary["accuracy"], 100.0);
    }

    #[test]
    fn test_unwritable_output_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("evidence");
        std::fs::write(&blocker, b"a file where the directory should be").unwrap();

        let catalog = LabelCatalog::default();
        let result = ReportWriter::new(&blocker, &catalog).write_all(&outcome(vec![0], vec![0]));
        assert!(result.is_err());
    }
}
