//! Class labels of the SeeIt classifier
//!
//! The order of `CLASS_NAMES` is the order of the model's output scores.

use crate::error::{EvalError, Result};

/// Number of classes
pub const NUM_CLASSES: usize = 10;

/// Class names, in model output order
pub const CLASS_NAMES: [&str; NUM_CLASSES] = [
    "car",
    "crosswalk",
    "cycle",
    "emergency_exit",
    "stop",
    "traffic_green",
    "traffic_red",
    "traffic_yellow",
    "truck",
    "van",
];

/// Classes stored under a space-separated folder name in the dataset.
/// This is dataset legacy and must not be inferred from the class name.
pub const FOLDER_OVERRIDES: [(&str, &str); 3] = [
    ("traffic_green", "traffic green"),
    ("traffic_red", "traffic red"),
    ("traffic_yellow", "traffic yellow"),
];

/// Ordered class list with folder lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCatalog {
    names: Vec<String>,
    folder_overrides: Vec<(String, String)>,
}

impl Default for LabelCatalog {
    fn default() -> Self {
        Self {
            names: CLASS_NAMES.iter().map(|s| s.to_string()).collect(),
            folder_overrides: FOLDER_OVERRIDES
                .iter()
                .map(|(class, folder)| (class.to_string(), folder.to_string()))
                .collect(),
        }
    }
}

impl LabelCatalog {
    /// Build a catalog; names must be non-empty and unique
    pub fn new(names: Vec<String>, folder_overrides: Vec<(String, String)>) -> Result<Self> {
        if names.is_empty() {
            return Err(EvalError::InvalidCatalog("no class names".to_string()));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(EvalError::InvalidCatalog(format!(
                    "duplicate class name '{}'",
                    name
                )));
            }
        }
        Ok(Self {
            names,
            folder_overrides,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Class name for a score index
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Score index for a class name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Folder name of a class inside a split directory
    pub fn folder_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.folder_overrides
            .iter()
            .find(|(class, _)| class == name)
            .map(|(_, folder)| folder.as_str())
            .unwrap_or(name)
    }

    /// Human-readable name used in CSV tables and the heatmap
    pub fn display_name(&self, index: usize) -> String {
        self.name(index)
            .map(|n| n.replace('_', " "))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order() {
        let catalog = LabelCatalog::default();
        assert_eq!(catalog.len(), NUM_CLASSES);
        assert_eq!(catalog.name(0), Some("car"));
        assert_eq!(catalog.name(3), Some("emergency_exit"));
        assert_eq!(catalog.name(9), Some("van"));
        assert_eq!(catalog.name(10), None);
        assert_eq!(catalog.index_of("traffic_red"), Some(6));
    }

    #[test]
    fn test_override_folders_use_spaces() {
        let catalog = LabelCatalog::default();
        assert_eq!(catalog.folder_name("traffic_green"), "traffic green");
        assert_eq!(catalog.folder_name("traffic_red"), "traffic red");
        assert_eq!(catalog.folder_name("traffic_yellow"), "traffic yellow");
    }

    #[test]
    fn test_other_folders_are_verbatim() {
        let catalog = LabelCatalog::default();
        // Underscores are kept for classes outside the override table
        assert_eq!(catalog.folder_name("emergency_exit"), "emergency_exit");
        assert_eq!(catalog.folder_name("car"), "car");
    }

    #[test]
    fn test_display_name() {
        let catalog = LabelCatalog::default();
        assert_eq!(catalog.display_name(3), "emergency exit");
        assert_eq!(catalog.display_name(5), "traffic green");
        assert_eq!(catalog.display_name(0), "car");
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let names = vec!["car".to_string(), "van".to_string(), "car".to_string()];
        assert!(matches!(
            LabelCatalog::new(names, Vec::new()),
            Err(EvalError::InvalidCatalog(_))
        ));
        assert!(LabelCatalog::new(Vec::new(), Vec::new()).is_err());
    }
}
