pub mod labels;
pub mod preprocess;
pub mod dataset;
pub mod inference;

pub use labels::{LabelCatalog, CLASS_NAMES, FOLDER_OVERRIDES, NUM_CLASSES};
pub use preprocess::{image_to_tensor, load_image_tensor, ImageTensor};
pub use dataset::{is_image_file, TestDataset, IMAGE_EXTENSIONS};
pub use inference::{argmax, predict_path, Classifier};
#[cfg(feature = "ml")]
pub use inference::TfliteClassifier;
