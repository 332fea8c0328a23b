//! Image preprocessing for the quantized classifier

use image::{imageops, imageops::FilterType, RgbImage};
use std::path::Path;

use crate::error::{EvalError, Result};

/// Model input: one RGB image as `[1, size, size, 3]` bytes (NHWC)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTensor {
    pub size: u32,
    pub data: Vec<u8>,
}

impl ImageTensor {
    pub fn shape(&self) -> [usize; 4] {
        [1, self.size as usize, self.size as usize, 3]
    }

    /// Channel value at (y, x, c), `None` outside the tensor
    pub fn pixel(&self, y: usize, x: usize, c: usize) -> Option<u8> {
        let s = self.size as usize;
        if y >= s || x >= s || c >= 3 {
            return None;
        }
        self.data.get((y * s + x) * 3 + c).copied()
    }
}

/// Load an image file and prepare it for the model
///
/// # Arguments
/// - `path`: image file
/// - `size`: square input edge of the model
pub fn load_image_tensor(path: &Path, size: u32) -> Result<ImageTensor> {
    let img = image::open(path)
        .map_err(|source| EvalError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    Ok(image_to_tensor(&img, size))
}

/// Resize an RGB image to `size x size` and flatten it in HWC order.
/// Bicubic (Catmull-Rom) keeps the result deterministic for a given input.
pub fn image_to_tensor(img: &RgbImage, size: u32) -> ImageTensor {
    let data = if img.dimensions() == (size, size) {
        img.as_raw().clone()
    } else {
        imageops::resize(img, size, size, FilterType::CatmullRom).into_raw()
    };

    ImageTensor { size, data }
}
