//! Evaluation configuration
//!
//! Paths and policies for one evaluation run, stored as JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{DecodeErrorPolicy, MissingClassPolicy};

/// Evaluation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Path to the quantized .tflite model
    pub model_path: PathBuf,
    /// Dataset root containing one directory per split
    pub dataset_root: PathBuf,
    /// Split directory evaluated under the dataset root
    #[serde(default = "default_split")]
    pub split: String,
    /// Output directory for the evidence artifacts (defaults to `<dataset_root>/evidence`)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Input edge used when the model does not declare a concrete input shape
    #[serde(default = "default_image_size")]
    pub image_size: u32,
    /// TrueType font used for heatmap labels
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    #[serde(default)]
    pub missing_class_policy: MissingClassPolicy,
    #[serde(default)]
    pub decode_error_policy: DecodeErrorPolicy,
}

fn default_split() -> String {
    "test".to_string()
}

fn default_image_size() -> u32 {
    224
}

impl Default for EvalConfig {
    fn default() -> Self {
        let dataset_root = PathBuf::from("Combined_Dataset_V9");
        Self {
            model_path: dataset_root.join("effb0_meta.tflite"),
            dataset_root,
            split: default_split(),
            output_dir: None,
            image_size: default_image_size(),
            font_path: None,
            missing_class_policy: MissingClassPolicy::default(),
            decode_error_policy: DecodeErrorPolicy::default(),
        }
    }
}

impl EvalConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        PathBuf::from("eval_config.json")
    }

    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: EvalConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to the defaults.
    /// A file that exists but cannot be parsed is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let config = Self::load(path)?;
            tracing::info!("Loaded config: {}", path.display());
            Ok(config)
        } else {
            tracing::info!("Config {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save the config as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Directory holding the evaluated split
    pub fn split_dir(&self) -> PathBuf {
        self.dataset_root.join(&self.split)
    }

    /// Directory the evidence artifacts are written to
    pub fn evidence_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.dataset_root.join("evidence"))
    }

    /// Print the settings
    pub fn display(&self) {
        println!("=== Evaluation config ===");
        println!("Model: {}", self.model_path.display());
        println!("Split: {}", self.split_dir().display());
        println!("Evidence: {}", self.evidence_dir().display());
        println!("Fallback input size: {}x{}", self.image_size, self.image_size);
        if let Some(ref font) = self.font_path {
            println!("Font: {}", font.display());
        }
        println!("Missing class folders: {}", self.missing_class_policy);
        println!("Undecodable images: {}", self.decode_error_policy);
        println!("=========================\n");
    }
}
