use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One labeled test image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub path: PathBuf,
    pub label: usize, // index into the label catalog
}

/// What the scanner does when a class has no folder in the split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingClassPolicy {
    /// Contribute zero samples (some splits omit rare classes)
    Skip,
    /// Abort the scan
    Fail,
}

impl Default for MissingClassPolicy {
    fn default() -> Self {
        MissingClassPolicy::Skip
    }
}

impl std::fmt::Display for MissingClassPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingClassPolicy::Skip => write!(f, "skip"),
            MissingClassPolicy::Fail => write!(f, "fail"),
        }
    }
}

/// What the evaluator does when an image cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrorPolicy {
    /// The whole run fails
    Abort,
    /// Warn, record the path and leave the sample out of every metric
    Skip,
}

impl Default for DecodeErrorPolicy {
    fn default() -> Self {
        DecodeErrorPolicy::Abort
    }
}

impl std::fmt::Display for DecodeErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeErrorPolicy::Abort => write!(f, "abort"),
            DecodeErrorPolicy::Skip => write!(f, "skip"),
        }
    }
}
