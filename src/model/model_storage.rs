//! Model artifact access
//!
//! The artifact is a single .tflite file. Exporters sometimes wrap the
//! flatbuffer with a metadata prefix, so the buffer is located by its
//! `TFL3` file identifier rather than assumed to start at offset 0.

use std::path::Path;

use crate::error::{EvalError, Result};

/// Flatbuffer file identifier of TensorFlow Lite models (bytes 4..8)
const TFLITE_IDENTIFIER: &[u8; 4] = b"TFL3";

/// Fail fast when the model file is missing
pub fn ensure_model_exists(model_path: &Path) -> Result<()> {
    if !model_path.is_file() {
        return Err(EvalError::ModelNotFound(model_path.to_path_buf()));
    }
    Ok(())
}

/// Read the model file and return the TFLite flatbuffer it contains
pub fn load_model_binary(model_path: &Path) -> Result<Vec<u8>> {
    ensure_model_exists(model_path)?;

    let raw = std::fs::read(model_path)?;
    let slice = find_tflite_slice(&raw).ok_or_else(|| EvalError::ModelLoad {
        path: model_path.to_path_buf(),
        message: "no TFL3 flatbuffer identifier found".to_string(),
    })?;

    Ok(slice.to_vec())
}

/// Locate the flatbuffer start: the identifier sits 4 bytes after the root offset
pub fn find_tflite_slice(buf: &[u8]) -> Option<&[u8]> {
    if buf.len() < 8 {
        return None;
    }
    (0..=buf.len() - 8)
        .find(|&i| &buf[i + 4..i + 8] == TFLITE_IDENTIFIER)
        .map(|i| &buf[i..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effb0_meta.tflite");
        match load_model_binary(&path) {
            Err(EvalError::ModelNotFound(p)) => assert_eq!(p, path),
            other => panic!("expected ModelNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_find_slice_at_start() {
        let buf = b"\x1c\x00\x00\x00TFL3rest";
        assert_eq!(find_tflite_slice(buf), Some(&buf[..]));
    }

    #[test]
    fn test_find_slice_with_prefix() {
        let buf = b"META\x1c\x00\x00\x00TFL3rest";
        assert_eq!(find_tflite_slice(buf), Some(&buf[4..]));
    }

    #[test]
    fn test_find_slice_absent() {
        assert_eq!(find_tflite_slice(b"not a model"), None);
        assert_eq!(find_tflite_slice(b"TFL3"), None);
    }

    #[test]
    fn test_file_without_identifier_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.tflite");
        std::fs::write(&path, b"garbage bytes without identifier").unwrap();
        assert!(matches!(
            load_model_binary(&path),
            Err(EvalError::ModelLoad { .. })
        ));
    }
}
