//! Tensor descriptors of a loaded model
//!
//! The preprocessor and the evaluator only need to know the square input edge,
//! how the input bytes are interpreted and how many scores come back.

use serde::{Deserialize, Serialize};

/// Element type of the model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputType {
    /// Plain unsigned 8-bit
    U8,
    /// Quantized unsigned 8-bit (`real = scale * (q - zero_point)`)
    QU8 { zero_point: i32, scale: f32 },
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputType::U8 => write!(f, "u8"),
            InputType::QU8 { zero_point, scale } => {
                write!(f, "qu8 (zero_point={}, scale={})", zero_point, scale)
            }
        }
    }
}

/// Input/output description of a loaded classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Square input edge in pixels
    pub input_size: u32,
    /// Input element type
    pub input_type: InputType,
    /// Length of the score vector, when the model declares it
    pub num_outputs: Option<usize>,
}

impl ModelInfo {
    /// Input shape `[batch, height, width, channels]`
    pub fn input_shape(&self) -> [usize; 4] {
        let s = self.input_size as usize;
        [1, s, s, 3]
    }

    /// Print the descriptors
    pub fn print_info(&self) {
        println!("\n=== Model ===");
        println!("Input: {:?} {}", self.input_shape(), self.input_type);
        match self.num_outputs {
            Some(n) => println!("Outputs: {} scores", n),
            None => println!("Outputs: unknown until first run"),
        }
        println!("=============");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_shape() {
        let info = ModelInfo {
            input_size: 224,
            input_type: InputType::U8,
            num_outputs: Some(10),
        };
        assert_eq!(info.input_shape(), [1, 224, 224, 3]);
    }

    #[test]
    fn test_input_type_display() {
        assert_eq!(format!("{}", InputType::U8), "u8");
        let q = InputType::QU8 {
            zero_point: 0,
            scale: 0.5,
        };
        assert_eq!(format!("{}", q), "qu8 (zero_point=0, scale=0.5)");
    }
}
