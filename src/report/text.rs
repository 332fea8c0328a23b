//! Plain-text classification report
//!
//! Fixed-width table, one row per class followed by the accuracy, macro and
//! weighted rows. Class names are printed in their canonical form.

use crate::evaluation::{ClassMetrics, ClassificationReport};
use crate::ml::LabelCatalog;

const HEADERS: [&str; 4] = ["precision", "recall", "f1-score", "support"];
const LAST_ROW_HEADING: &str = "weighted avg";
const COLUMN_WIDTH: usize = 9;

/// Render the report with `digits` decimals
pub fn format_classification_report(
    report: &ClassificationReport,
    catalog: &LabelCatalog,
    digits: usize,
) -> String {
    let width = catalog
        .names()
        .iter()
        .map(|n| n.len())
        .chain([LAST_ROW_HEADING.len(), digits])
        .max()
        .unwrap_or(0);

    let mut out = format!("{:>width$} ", "");
    for header in HEADERS {
        out.push_str(&format!(" {:>w$}", header, w = COLUMN_WIDTH));
    }
    out.push_str("\n\n");

    for (name, metrics) in catalog.names().iter().zip(&report.per_class) {
        out.push_str(&format_row(name, metrics, width, digits));
    }
    out.push('\n');

    // accuracy has no precision/recall columns
    out.push_str(&format!("{:>width$} ", "accuracy"));
    out.push_str(&format!(" {:>w$} {:>w$}", "", "", w = COLUMN_WIDTH));
    out.push_str(&format!(
        " {:>w$.digits$} {:>w$}\n",
        report.accuracy,
        report.support(),
        w = COLUMN_WIDTH
    ));

    out.push_str(&format_row("macro avg", &report.macro_avg, width, digits));
    out.push_str(&format_row(LAST_ROW_HEADING, &report.weighted_avg, width, digits));
    out
}

fn format_row(heading: &str, m: &ClassMetrics, width: usize, digits: usize) -> String {
    format!(
        "{:>width$}  {:>w$.digits$} {:>w$.digits$} {:>w$.digits$} {:>w$}\n",
        heading,
        m.precision,
        m.recall,
        m.f1,
        m.support,
        w = COLUMN_WIDTH
    )
}
