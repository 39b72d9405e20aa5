//! Template parameters document.
//!
//! Per manufacturer: magnification factors by acquisition mode, the
//! destination sheet for template writes, per-mode destination cell keys, and
//! the ordered list of edge columns to emit. Loaded from JSON; code defaults
//! cover the two shipped manufacturers.

use crate::error::{MtfError, MtfResult};
use crate::types::EdgePosition;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Layout parameters for one manufacturer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManufacturerParams {
    /// Geometric magnification by acquisition mode, applied to pixel spacing.
    pub magnification: HashMap<String, f64>,
    /// Destination sheet for template writes.
    pub sheet_name: String,
    /// Top-left destination cell key by acquisition mode (e.g. "E3").
    pub cells: HashMap<String, String>,
    /// Which edge columns the template expects, in emit order.
    pub edge_columns: Vec<EdgePosition>,
}

impl ManufacturerParams {
    /// Magnification for a mode, defaulting to contact geometry.
    pub fn magnification_for(&self, mode: &str) -> f64 {
        self.magnification.get(mode).copied().unwrap_or(1.0)
    }
}

/// The full parameters document, keyed by manufacturer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TemplateParams {
    pub manufacturers: HashMap<String, ManufacturerParams>,
}

impl TemplateParams {
    pub fn from_json(json: &str) -> MtfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> MtfResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Exact-key lookup, used at write time once a record carries the
    /// resolved manufacturer key.
    pub fn get(&self, key: &str) -> MtfResult<&ManufacturerParams> {
        self.manufacturers
            .get(key)
            .ok_or_else(|| MtfError::UnsupportedManufacturer(key.to_string()))
    }

    /// Resolve a raw header manufacturer string ("HOLOGIC, Inc.") to a
    /// configured entry by case-insensitive substring match.
    pub fn resolve(&self, manufacturer: &str) -> MtfResult<(&str, &ManufacturerParams)> {
        let needle = manufacturer.to_lowercase();
        self.manufacturers
            .iter()
            .find(|(key, _)| needle.contains(key.as_str()))
            .map(|(key, params)| (key.as_str(), params))
            .ok_or_else(|| MtfError::UnsupportedManufacturer(manufacturer.to_string()))
    }
}

impl Default for TemplateParams {
    fn default() -> Self {
        let mut manufacturers = HashMap::new();

        let mut hologic_mag = HashMap::new();
        hologic_mag.insert("contact".to_string(), 1.0);
        hologic_mag.insert("mag".to_string(), 1.8);
        hologic_mag.insert("tomo_recon_top".to_string(), 1.0);
        let mut hologic_cells = HashMap::new();
        hologic_cells.insert("contact".to_string(), "E3".to_string());
        hologic_cells.insert("mag".to_string(), "E113".to_string());
        hologic_cells.insert("tomo_recon_top".to_string(), "E223".to_string());
        manufacturers.insert(
            "hologic".to_string(),
            ManufacturerParams {
                magnification: hologic_mag,
                sheet_name: "MTF".to_string(),
                cells: hologic_cells,
                edge_columns: vec![EdgePosition::Left, EdgePosition::Top],
            },
        );

        let mut ge_mag = HashMap::new();
        ge_mag.insert("contact".to_string(), 1.0);
        let mut ge_cells = HashMap::new();
        ge_cells.insert("contact".to_string(), "E3".to_string());
        manufacturers.insert(
            "ge".to_string(),
            ManufacturerParams {
                magnification: ge_mag,
                sheet_name: "MTF".to_string(),
                cells: ge_cells,
                edge_columns: vec![EdgePosition::Left, EdgePosition::Top],
            },
        );

        TemplateParams { manufacturers }
    }
}
