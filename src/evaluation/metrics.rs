//! Classification metrics
//!
//! Everything here is derived from the confusion matrix, which is built once
//! from the (true, predicted) pairs of a run. Divisions by zero yield 0.

use serde::{Deserialize, Serialize};

/// Square count table indexed `[true][predicted]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Build from label pairs. Labels outside `0..num_classes` are ignored.
    pub fn from_pairs(y_true: &[usize], y_pred: &[usize], num_classes: usize) -> Self {
        let mut counts = vec![vec![0; num_classes]; num_classes];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            if t < num_classes && p < num_classes {
                counts[t][p] += 1;
            }
        }
        Self { counts }
    }

    pub fn num_classes(&self) -> usize {
        self.counts.len()
    }

    pub fn get(&self, true_label: usize, predicted: usize) -> usize {
        self.counts[true_label][predicted]
    }

    pub fn rows(&self) -> &[Vec<usize>] {
        &self.counts
    }

    /// Sum of all cells (number of evaluated samples)
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal (number of correct predictions)
    pub fn trace(&self) -> usize {
        (0..self.num_classes()).map(|i| self.counts[i][i]).sum()
    }

    /// Largest cell value
    pub fn max(&self) -> usize {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Samples whose true label is `class` (row sum)
    pub fn support(&self, class: usize) -> usize {
        self.counts[class].iter().sum()
    }

    /// Samples predicted as `class` (column sum)
    pub fn predicted_count(&self, class: usize) -> usize {
        self.counts.iter().map(|row| row[class]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.trace(), self.total())
    }

    /// Non-zero off-diagonal cells, largest count first.
    /// Equal counts keep row-major order.
    pub fn top_confusions(&self) -> Vec<Confusion> {
        let n = self.num_classes();
        let mut confusions: Vec<Confusion> = (0..n)
            .flat_map(|t| (0..n).map(move |p| (t, p)))
            .filter(|&(t, p)| t != p && self.counts[t][p] > 0)
            .map(|(t, p)| Confusion {
                true_label: t,
                predicted: p,
                count: self.counts[t][p],
            })
            .collect();
        // sort_by is stable
        confusions.sort_by(|a, b| b.count.cmp(&a.count));
        confusions
    }

    /// Precision, recall, F1 and support for one class
    pub fn class_metrics(&self, class: usize) -> ClassMetrics {
        let tp = self.counts[class][class];
        let support = self.support(class);
        let precision = ratio(tp, self.predicted_count(class));
        let recall = ratio(tp, support);
        ClassMetrics {
            precision,
            recall,
            f1: f1_score(precision, recall),
            support,
        }
    }
}

/// One misclassification bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confusion {
    pub true_label: usize,
    pub predicted: usize,
    pub count: usize,
}

/// Per-class scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Per-class metrics plus aggregate rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub per_class: Vec<ClassMetrics>,
    pub accuracy: f64,
    /// Unweighted mean over every class, including classes without samples
    pub macro_avg: ClassMetrics,
    /// Mean weighted by support
    pub weighted_avg: ClassMetrics,
}

impl ClassificationReport {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let n = cm.num_classes();
        let per_class: Vec<ClassMetrics> = (0..n).map(|c| cm.class_metrics(c)).collect();
        let total = cm.total();

        let mean = |f: fn(&ClassMetrics) -> f64| -> f64 {
            if n == 0 {
                0.0
            } else {
                per_class.iter().map(f).sum::<f64>() / n as f64
            }
        };
        let weighted = |f: fn(&ClassMetrics) -> f64| -> f64 {
            if total == 0 {
                0.0
            } else {
                per_class
                    .iter()
                    .map(|m| f(m) * m.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };

        let macro_avg = ClassMetrics {
            precision: mean(|m| m.precision),
            recall: mean(|m| m.recall),
            f1: mean(|m| m.f1),
            support: total,
        };
        let weighted_avg = ClassMetrics {
            precision: weighted(|m| m.precision),
            recall: weighted(|m| m.recall),
            f1: weighted(|m| m.f1),
            support: total,
        };

        Self {
            accuracy: cm.accuracy(),
            per_class,
            macro_avg,
            weighted_avg,
        }
    }

    /// Total number of samples
    pub fn support(&self) -> usize {
        self.macro_avg.support
    }
}

/// Aggregate scores as percentages rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl SummaryMetrics {
    pub fn from_report(report: &ClassificationReport) -> Self {
        Self {
            accuracy: percent(report.accuracy),
            precision: percent(report.macro_avg.precision),
            recall: percent(report.macro_avg.recall),
            f1: percent(report.macro_avg.f1),
        }
    }
}

/// Fraction of pairs where prediction equals truth
pub fn accuracy_score(y_true: &[usize], y_pred: &[usize]) -> f64 {
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    ratio(correct, y_true.len().min(y_pred.len()))
}

/// Harmonic mean of precision and recall, 0 when both are 0
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

/// `x` in [0, 1] as a percentage with two decimals.
///
/// Rounds the exact binary value of `x * 100`, ties to even, so 29/32
/// (exactly 90.625) becomes 90.62.
pub fn percent(x: f64) -> f64 {
    let scaled = x * 100.0;
    format!("{:.2}", scaled).parse().unwrap_or(scaled)
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
