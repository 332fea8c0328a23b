//! Test split scanning

use std::path::Path;

use crate::error::{EvalError, Result};
use crate::ml::LabelCatalog;
use crate::types::{MissingClassPolicy, Sample};

/// Extensions recognized as images (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Labeled images of one split (paths only, images are decoded on demand)
#[derive(Debug, Clone)]
pub struct TestDataset {
    samples: Vec<Sample>,
}

impl TestDataset {
    /// Scan `split_dir/<folder>/` for every catalog class, in catalog order.
    ///
    /// Files inside a class folder are visited in sorted path order so that
    /// repeated runs see the samples in the same sequence.
    pub fn scan(
        split_dir: &Path,
        catalog: &LabelCatalog,
        missing_policy: MissingClassPolicy,
    ) -> Result<Self> {
        let mut samples = Vec::new();

        for (class_id, class_name) in catalog.names().iter().enumerate() {
            let class_dir = split_dir.join(catalog.folder_name(class_name));
            if !class_dir.is_dir() {
                match missing_policy {
                    MissingClassPolicy::Skip => {
                        tracing::debug!(
                            "Class folder missing, skipping '{}': {}",
                            class_name,
                            class_dir.display()
                        );
                        continue;
                    }
                    MissingClassPolicy::Fail => return Err(EvalError::MissingClass(class_dir)),
                }
            }

            let mut paths = Vec::new();
            for entry in std::fs::read_dir(&class_dir)? {
                let path = entry?.path();
                if path.is_file() && is_image_file(&path) {
                    paths.push(path);
                }
            }
            paths.sort();

            tracing::debug!("Class '{}': {} images", class_name, paths.len());
            samples.extend(paths.into_iter().map(|path| Sample {
                path,
                label: class_id,
            }));
        }

        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples per class index
    pub fn class_counts(&self, num_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; num_classes];
        for sample in &self.samples {
            if let Some(c) = counts.get_mut(sample.label) {
                *c += 1;
            }
        }
        counts
    }
}

/// Whether the file extension is one of `IMAGE_EXTENSIONS`
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}
