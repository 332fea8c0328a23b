//! Model inference

use std::path::Path;

use crate::error::{EvalError, Result};
use crate::ml::preprocess::{load_image_tensor, ImageTensor};
use crate::model::ModelInfo;

/// A loaded classifier that turns one preprocessed image into class scores.
///
/// Implementations are used read-only; a single instance serves every call.
pub trait Classifier {
    /// Input/output descriptors of the model
    fn info(&self) -> &ModelInfo;

    /// One synchronous forward pass, returning the raw score vector
    fn predict(&self, input: &ImageTensor) -> std::result::Result<Vec<f32>, String>;
}

/// Preprocess an image file and run it through the classifier
pub fn predict_path<C: Classifier + ?Sized>(classifier: &C, path: &Path) -> Result<Vec<f32>> {
    let input = load_image_tensor(path, classifier.info().input_size)?;
    classifier
        .predict(&input)
        .map_err(|message| EvalError::Inference {
            path: path.to_path_buf(),
            message,
        })
}

/// Index of the largest score; ties go to the lowest index and NaN never wins
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in scores.iter().enumerate() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(feature = "ml")]
pub use self::tflite::TfliteClassifier;

#[cfg(feature = "ml")]
mod tflite {
    use std::io::Cursor;
    use std::path::Path;
    use tract_tflite::prelude::*;

    use super::Classifier;
    use crate::error::{EvalError, Result};
    use crate::ml::preprocess::ImageTensor;
    use crate::model::{load_model_binary, InputType, ModelInfo};

    /// TensorFlow Lite inference engine
    pub struct TfliteClassifier {
        plan: TypedRunnableModel<TypedModel>,
        input_dt: DatumType,
        info: ModelInfo,
    }

    impl TfliteClassifier {
        /// Load the model once and prepare it for repeated single-image runs
        ///
        /// # Arguments
        /// - `model_path`: .tflite file
        /// - `fallback_size`: input edge used when the model input shape is symbolic
        pub fn load(model_path: &Path, fallback_size: u32) -> Result<Self> {
            let model_bytes = load_model_binary(model_path)?;
            let load_err = |e: TractError| EvalError::ModelLoad {
                path: model_path.to_path_buf(),
                message: format!("{:#}", e),
            };

            let mut cursor = Cursor::new(model_bytes);
            let model = tract_tflite::tflite()
                .model_for_read(&mut cursor)
                .map_err(load_err)?;

            // Input descriptor
            let inlet = model.input_outlets().map_err(load_err)?[0];
            let orig = model.outlet_fact(inlet).map_err(load_err)?.clone();
            let input_size = concrete_nhwc_edge(&orig).unwrap_or(fallback_size);
            let input_type = match orig.datum_type {
                DatumType::U8 => InputType::U8,
                dt @ DatumType::QU8(_) => {
                    let (zero_point, scale) = dt.zp_scale();
                    InputType::QU8 { zero_point, scale }
                }
                dt => {
                    return Err(EvalError::UnsupportedInput(format!(
                        "{:?} (only unsigned 8-bit inputs are supported)",
                        dt
                    )))
                }
            };

            // Output descriptor
            let outlet = model.output_outlets().map_err(load_err)?[0];
            let num_outputs = model
                .outlet_fact(outlet)
                .map_err(load_err)?
                .shape
                .as_concrete()
                .and_then(|dims| dims.last().copied());

            let info = ModelInfo {
                input_size,
                input_type,
                num_outputs,
            };
            let s = input_size as usize;
            let fact = TypedFact::dt_shape(orig.datum_type, tvec!(1, s, s, 3));

            let plan = model
                .with_input_fact(0, fact)
                .and_then(|m| m.into_optimized())
                .and_then(|m| m.into_runnable())
                .map_err(load_err)?;

            tracing::info!(
                "Model ready: input {:?} {}, outputs {:?}",
                info.input_shape(),
                info.input_type,
                info.num_outputs
            );

            Ok(Self {
                plan,
                input_dt: orig.datum_type,
                info,
            })
        }

        fn input_tensor(&self, input: &ImageTensor) -> TractResult<Tensor> {
            let s = input.size as usize;
            let tensor: Tensor =
                tract_ndarray::Array4::from_shape_vec((1, s, s, 3), input.data.clone())?.into();
            // Quantized inputs take the raw bytes; only the datum type label changes
            if self.input_dt.is_quantized() {
                Ok(tensor.cast_to_dt(self.input_dt)?.into_owned())
            } else {
                Ok(tensor)
            }
        }

        fn run(&self, input: &ImageTensor) -> TractResult<Vec<f32>> {
            let tensor = self.input_tensor(input)?;
            let outputs = self.plan.run(tvec!(tensor.into()))?;
            let output = outputs
                .first()
                .ok_or_else(|| anyhow::anyhow!("model produced no outputs"))?;

            // Quantized outputs are dequantized here; arg-max is unaffected
            let scores = output.cast_to::<f32>()?;
            Ok(scores.as_slice::<f32>()?.to_vec())
        }
    }

    impl Classifier for TfliteClassifier {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn predict(&self, input: &ImageTensor) -> std::result::Result<Vec<f32>, String> {
            self.run(input).map_err(|e| format!("{:#}", e))
        }
    }

    /// Height of a concrete `[1, h, w, 3]` input with `h == w`
    fn concrete_nhwc_edge(fact: &TypedFact) -> Option<u32> {
        let dims = fact.shape.as_concrete()?;
        match dims {
            [_, h, w, 3] if h == w => Some(*h as u32),
            _ => None,
        }
    }
}
