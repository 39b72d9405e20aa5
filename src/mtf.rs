//! Capability interfaces for the external decode and measurement steps.
//!
//! DICOM decoding, edge-region detection, and the MTF curve math live
//! outside this crate. The workbench consumes them through these two traits
//! and can be exercised with test doubles.

use crate::error::MtfResult;
use crate::types::{EdgePosition, PreprocessedImage};
use std::path::Path;

/// Number of frequency samples per MTF curve.
pub const SAMPLE_COUNT: usize = 104;

/// One edge's MTF curve: shared frequency axis plus response values.
#[derive(Debug, Clone, PartialEq)]
pub struct MtfCurve {
    pub frequency: Vec<f64>,
    pub response: Vec<f64>,
}

/// Decode and preprocess an input image, extracting acquisition metadata.
pub trait ImagePreprocessor {
    fn preprocess(&self, path: &Path) -> MtfResult<PreprocessedImage>;
}

/// Compute the MTF curve for one edge region of a preprocessed image.
pub trait MtfEngine {
    fn measure_edge(
        &self,
        image: &PreprocessedImage,
        position: EdgePosition,
        sample_spacing: f64,
    ) -> MtfResult<MtfCurve>;

    /// Samples per curve; measured curves are expected to have this length.
    fn sample_count(&self) -> usize {
        SAMPLE_COUNT
    }
}
