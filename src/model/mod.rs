pub mod model_metadata;
pub mod model_storage;
pub mod config;

pub use model_metadata::{InputType, ModelInfo};
pub use model_storage::{ensure_model_exists, find_tflite_slice, load_model_binary};
pub use config::EvalConfig;
