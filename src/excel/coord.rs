//! Spreadsheet coordinate math. Pure functions, no I/O.

use crate::error::{MtfError, MtfResult};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A rectangular sheet region, 1-indexed, inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Top-left row.
    pub row: u32,
    /// Top-left column.
    pub col: u32,
    pub rows: u32,
    pub cols: u32,
}

impl Region {
    pub fn new(row: u32, col: u32, rows: u32, cols: u32) -> Self {
        Region { row, col, rows, cols }
    }

    /// Region covering an `rows x cols` block anchored at (row, col).
    pub fn anchored(anchor: (u32, u32), rows: u32, cols: u32) -> Self {
        Region::new(anchor.0, anchor.1, rows, cols)
    }

    /// Inclusive bottom-right (row, column) index.
    pub fn bottom_right(&self) -> (u32, u32) {
        (self.row + self.rows - 1, self.col + self.cols - 1)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (bottom, right) = self.bottom_right();
        write!(
            f,
            "with ({}, {}) as the top-left index and ({}, {}) as the bottom-right index",
            self.row, self.col, bottom, right
        )
    }
}

fn cell_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\D+)(\d+)$").expect("valid cell key regex"))
}

/// Convert a cell key in `<letters><digits>` form to a 1-indexed
/// (row, column) pair.
///
/// Column letters use base-26 positional arithmetic with 'A' = 1,
/// case-insensitive.
///
/// ```
/// use mtf_workbench::excel::coord::cell_to_rowcol;
/// assert_eq!(cell_to_rowcol("E3").unwrap(), (3, 5));
/// assert_eq!(cell_to_rowcol("AA1").unwrap(), (1, 27));
/// ```
pub fn cell_to_rowcol(key: &str) -> MtfResult<(u32, u32)> {
    let captures = cell_key_regex()
        .captures(key)
        .ok_or_else(|| MtfError::CellAddress(key.to_string()))?;
    let letters = &captures[1];
    let digits = &captures[2];

    let mut col: u32 = 0;
    for ch in letters.chars() {
        let ch = ch.to_ascii_lowercase();
        if !ch.is_ascii_lowercase() {
            return Err(MtfError::CellAddress(key.to_string()));
        }
        col = col * 26 + (ch as u32 - 'a' as u32 + 1);
    }

    let row: u32 = digits
        .parse()
        .map_err(|_| MtfError::CellAddress(key.to_string()))?;
    if row == 0 || col == 0 {
        return Err(MtfError::CellAddress(key.to_string()));
    }
    Ok((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_to_rowcol_single_letter() {
        assert_eq!(cell_to_rowcol("E3").unwrap(), (3, 5));
        assert_eq!(cell_to_rowcol("A1").unwrap(), (1, 1));
        assert_eq!(cell_to_rowcol("Z10").unwrap(), (10, 26));
    }

    #[test]
    fn test_cell_to_rowcol_multi_letter() {
        assert_eq!(cell_to_rowcol("AA1").unwrap(), (1, 27));
        assert_eq!(cell_to_rowcol("AB2").unwrap(), (2, 28));
        assert_eq!(cell_to_rowcol("BA7").unwrap(), (7, 53));
    }

    #[test]
    fn test_cell_to_rowcol_case_insensitive() {
        assert_eq!(cell_to_rowcol("e3").unwrap(), cell_to_rowcol("E3").unwrap());
        assert_eq!(
            cell_to_rowcol("aa10").unwrap(),
            cell_to_rowcol("AA10").unwrap()
        );
    }

    #[test]
    fn test_cell_to_rowcol_rejects_malformed_keys() {
        for key in ["", "E", "3", "3E", "E-3", "$E$3", "E3F"] {
            assert!(
                cell_to_rowcol(key).is_err(),
                "expected '{}' to be rejected",
                key
            );
        }
    }

    #[test]
    fn test_region_bottom_right() {
        let region = Region::anchored((3, 5), 104, 4);
        assert_eq!(region.bottom_right(), (106, 8));
    }

    #[test]
    fn test_region_display_carries_bounds() {
        let text = Region::new(3, 5, 2, 2).to_string();
        assert!(text.contains("(3, 5)"));
        assert!(text.contains("(4, 6)"));
    }
}
