use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

//==============================================================================
// Edge vocabulary
//==============================================================================

/// The four canonical edge locations on a mammography test image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgePosition {
    Left,
    Right,
    Top,
    Bottom,
}

/// Whether an edge region is sampled across or along the detector rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Vertical,
    Horizontal,
}

impl EdgePosition {
    /// Fixed iteration/output order: left, right, top, bottom.
    pub const ALL: [EdgePosition; 4] = [
        EdgePosition::Left,
        EdgePosition::Right,
        EdgePosition::Top,
        EdgePosition::Bottom,
    ];

    /// Column of this edge in the n x 5 result matrix (column 0 is frequency).
    pub fn column_index(&self) -> usize {
        match self {
            EdgePosition::Left => 1,
            EdgePosition::Right => 2,
            EdgePosition::Top => 3,
            EdgePosition::Bottom => 4,
        }
    }

    pub fn direction(&self) -> EdgeDirection {
        match self {
            EdgePosition::Left | EdgePosition::Right => EdgeDirection::Vertical,
            EdgePosition::Top | EdgePosition::Bottom => EdgeDirection::Horizontal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EdgePosition::Left => "left",
            EdgePosition::Right => "right",
            EdgePosition::Top => "top",
            EdgePosition::Bottom => "bottom",
        }
    }
}

impl fmt::Display for EdgePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EdgePosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(EdgePosition::Left),
            "right" => Ok(EdgePosition::Right),
            "top" => Ok(EdgePosition::Top),
            "bottom" => Ok(EdgePosition::Bottom),
            other => Err(format!("unknown edge position: {}", other)),
        }
    }
}

//==============================================================================
// Records and images
//==============================================================================

/// Processing state of one registered input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStatus {
    Unprocessed,
    Processed,
}

impl EdgeStatus {
    /// Stored as 0/1 in the edges table.
    pub fn as_flag(&self) -> i64 {
        match self {
            EdgeStatus::Unprocessed => 0,
            EdgeStatus::Processed => 1,
        }
    }

    pub fn from_flag(flag: i64) -> Self {
        if flag == 0 {
            EdgeStatus::Unprocessed
        } else {
            EdgeStatus::Processed
        }
    }
}

/// Acquisition metadata extracted during preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionMetadata {
    /// Manufacturer string as found in the image header (e.g. "HOLOGIC, Inc.").
    pub manufacturer: String,
    /// Acquisition mode label (e.g. "contact", "mag", "tomo_recon_top").
    pub mode: String,
    /// Edge-phantom orientation label.
    pub orientation: String,
    /// Detector pixel spacing in mm.
    pub pixel_spacing: f64,
    /// Focus-plane identifier for reconstructed volumes.
    pub focus_plane: Option<String>,
}

/// Decoded pixel data plus extracted metadata, ready for edge detection.
#[derive(Debug, Clone)]
pub struct PreprocessedImage {
    pub pixels: Vec<f32>,
    pub width: usize,
    pub height: usize,
    pub meta: AcquisitionMetadata,
}

/// One row of the edge store: an input image, its status, and its curves.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub path: String,
    pub name: String,
    pub manufacturer: String,
    pub mode: String,
    pub orientation: String,
    pub frequency: Vec<f64>,
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    pub top: Vec<f64>,
    pub bottom: Vec<f64>,
    pub status: EdgeStatus,
}

impl EdgeRecord {
    /// Edge response series for one position.
    pub fn series(&self, position: EdgePosition) -> &[f64] {
        match position {
            EdgePosition::Left => &self.left,
            EdgePosition::Right => &self.right,
            EdgePosition::Top => &self.top,
            EdgePosition::Bottom => &self.bottom,
        }
    }

    /// Assemble the n x 5 result block: frequency, left, right, top, bottom.
    pub fn matrix(&self) -> Vec<Vec<f64>> {
        let n = self.frequency.len();
        let mut rows = Vec::with_capacity(n);
        for i in 0..n {
            let mut row = Vec::with_capacity(5);
            row.push(self.frequency[i]);
            for position in EdgePosition::ALL {
                let series = self.series(position);
                row.push(series.get(i).copied().unwrap_or(f64::NAN));
            }
            rows.push(row);
        }
        rows
    }
}

/// Final path segment, used as the record's display name and cache key.
pub fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_position_order_and_columns() {
        let columns: Vec<usize> = EdgePosition::ALL.iter().map(|p| p.column_index()).collect();
        assert_eq!(columns, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_edge_position_direction() {
        assert_eq!(EdgePosition::Left.direction(), EdgeDirection::Vertical);
        assert_eq!(EdgePosition::Top.direction(), EdgeDirection::Horizontal);
    }

    #[test]
    fn test_edge_position_from_str() {
        assert_eq!("Bottom".parse::<EdgePosition>(), Ok(EdgePosition::Bottom));
        assert!("diagonal".parse::<EdgePosition>().is_err());
    }

    #[test]
    fn test_display_name_takes_final_segment() {
        assert_eq!(display_name("/data/qc/edge_01.dcm"), "edge_01.dcm");
        assert_eq!(display_name("edge_01.dcm"), "edge_01.dcm");
    }

    #[test]
    fn test_matrix_layout() {
        let record = EdgeRecord {
            path: "/a/b.dcm".to_string(),
            name: "b.dcm".to_string(),
            manufacturer: "hologic".to_string(),
            mode: "contact".to_string(),
            orientation: "0".to_string(),
            frequency: vec![0.0, 1.0],
            left: vec![1.0, 0.9],
            right: vec![1.0, 0.8],
            top: vec![1.0, 0.7],
            bottom: vec![1.0, 0.6],
            status: EdgeStatus::Processed,
        };
        let matrix = record.matrix();
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix[1], vec![1.0, 0.9, 0.8, 0.7, 0.6]);
    }
}
