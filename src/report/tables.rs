//! CSV tables of the evaluation report

use csv::WriterBuilder;
use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::evaluation::{ClassificationReport, Confusion};
use crate::ml::LabelCatalog;

/// One row of `per_class.csv`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerClassRow {
    pub class: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// One row of `top_confusions.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfusionRow {
    #[serde(rename = "true")]
    pub true_class: String,
    pub predicted: String,
    pub count: usize,
}

const PER_CLASS_HEADER: [&str; 5] = ["class", "precision", "recall", "f1", "support"];
const CONFUSION_HEADER: [&str; 3] = ["true", "predicted", "count"];

/// Rows for every catalog class, absent classes included with zeros
pub fn per_class_rows(report: &ClassificationReport, catalog: &LabelCatalog) -> Vec<PerClassRow> {
    (0..catalog.len())
        .map(|i| {
            let m = report.per_class.get(i).copied().unwrap_or_default();
            PerClassRow {
                class: catalog.display_name(i),
                precision: m.precision,
                recall: m.recall,
                f1: m.f1,
                support: m.support,
            }
        })
        .collect()
}

pub fn confusion_rows(confusions: &[Confusion], catalog: &LabelCatalog) -> Vec<ConfusionRow> {
    confusions
        .iter()
        .map(|c| ConfusionRow {
            true_class: catalog.display_name(c.true_label),
            predicted: catalog.display_name(c.predicted),
            count: c.count,
        })
        .collect()
}

/// Write rows under an explicit header, so an empty table still has one
fn write_table<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_per_class_csv(path: &Path, rows: &[PerClassRow]) -> Result<()> {
    write_table(path, &PER_CLASS_HEADER, rows)
}

pub fn write_top_confusions_csv(path: &Path, rows: &[ConfusionRow]) -> Result<()> {
    write_table(path, &CONFUSION_HEADER, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::ConfusionMatrix;

    #[test]
    fn test_per_class_rows_cover_all_classes() {
        let catalog = LabelCatalog::default();
        let cm = ConfusionMatrix::from_pairs(&[0, 1], &[0, 1], catalog.len());
        let rows = per_class_rows(&ClassificationReport::from_confusion(&cm), &catalog);

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[3].class, "emergency exit");
        assert_eq!(rows[3].precision, 0.0);
        assert_eq!(rows[3].support, 0);
        assert_eq!(rows[0].f1, 1.0);
    }

    #[test]
    fn test_per_class_csv_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("per_class.csv");
        let rows = vec![
            PerClassRow {
                class: "traffic green".to_string(),
                precision: 0.5,
                recall: 1.0,
                f1: 0.0,
                support: 4,
            },
        ];
        write_per_class_csv(&path, &rows).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "class,precision,recall,f1,support\ntraffic green,0.5,1.0,0.0,4\n"
        );
    }

    #[test]
    fn test_empty_confusions_csv_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top_confusions.csv");
        write_top_confusions_csv(&path, &[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "true,predicted,count\n");
    }

    #[test]
    fn test_confusion_rows_use_display_names() {
        let catalog = LabelCatalog::default();
        let confusions = vec![Confusion {
            true_label: 5,
            predicted: 7,
            count: 3,
        }];
        let rows = confusion_rows(&confusions, &catalog);
        assert_eq!(rows[0].true_class, "traffic green");
        assert_eq!(rows[0].predicted, "traffic yellow");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("top_confusions.csv");
        write_top_confusions_csv(&path, &rows).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "true,predicted,count\ntraffic green,traffic yellow,3\n");
    }
}
