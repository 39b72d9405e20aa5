//! The spreadsheet boundary: workbooks addressed by (book, sheet, region).
//!
//! The workbench never talks to a spreadsheet application directly; it goes
//! through the [`Spreadsheet`] trait, which models the host as a remote store
//! of rectangular cell regions. [`MemoryWorkbooks`] is the in-process
//! implementation used by tests and headless embedding; the `.xlsx` file
//! backend lives in [`crate::excel::xlsx`].

use crate::error::{MtfError, MtfResult};
use crate::excel::coord::Region;
use std::collections::BTreeMap;

/// One spreadsheet cell value. `Empty` is the emptiness signal used by
/// overwrite protection.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// NaN carries "missing data" through the pipeline and lands as an
    /// empty cell.
    pub fn from_number(value: f64) -> Cell {
        if value.is_nan() {
            Cell::Empty
        } else {
            Cell::Number(value)
        }
    }
}

/// The operator's current selection on the host.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub book: String,
    pub sheet: String,
    /// Cell key of the selection's top-left cell, without `$` anchors.
    pub address: String,
    /// Number of cells spanned by the selection.
    pub size: u32,
}

/// Access to open workbooks, addressed purely by name.
pub trait Spreadsheet {
    /// Names of all open workbooks. Errors with
    /// [`MtfError::SpreadsheetUnavailable`] when there is no live host.
    fn book_names(&self) -> MtfResult<Vec<String>>;

    /// The operator's current selection.
    fn selection(&self) -> MtfResult<Selection>;

    /// Read a rectangular region as a row-major grid. Cells outside the
    /// used range read as [`Cell::Empty`].
    fn read_region(&self, book: &str, sheet: &str, region: Region) -> MtfResult<Vec<Vec<Cell>>>;

    /// Write a row-major grid with its top-left cell at `anchor`.
    fn write_region(
        &mut self,
        book: &str,
        sheet: &str,
        anchor: (u32, u32),
        values: &[Vec<Cell>],
    ) -> MtfResult<()>;
}

type SheetGrid = BTreeMap<(u32, u32), Cell>;

/// In-process workbook host backed by sparse per-sheet grids.
#[derive(Debug)]
pub struct MemoryWorkbooks {
    books: BTreeMap<String, BTreeMap<String, SheetGrid>>,
    selection: Option<Selection>,
    connected: bool,
}

impl MemoryWorkbooks {
    pub fn new() -> Self {
        MemoryWorkbooks {
            books: BTreeMap::new(),
            selection: None,
            connected: true,
        }
    }

    /// Add an open workbook with the given sheet names.
    pub fn add_book(&mut self, book: &str, sheets: &[&str]) {
        let entry = self.books.entry(book.to_string()).or_default();
        for sheet in sheets {
            entry.entry(sheet.to_string()).or_default();
        }
    }

    /// Simulate losing (or regaining) the host connection.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn set_cell(&mut self, book: &str, sheet: &str, row: u32, col: u32, value: Cell) {
        self.books
            .entry(book.to_string())
            .or_default()
            .entry(sheet.to_string())
            .or_default()
            .insert((row, col), value);
    }

    /// Read one cell; missing cells read as empty.
    pub fn cell(&self, book: &str, sheet: &str, row: u32, col: u32) -> Cell {
        self.books
            .get(book)
            .and_then(|sheets| sheets.get(sheet))
            .and_then(|grid| grid.get(&(row, col)))
            .cloned()
            .unwrap_or_default()
    }

    fn grid(&self, book: &str, sheet: &str) -> MtfResult<&SheetGrid> {
        let sheets = self
            .books
            .get(book)
            .ok_or_else(|| MtfError::BookNotFound(book.to_string()))?;
        sheets.get(sheet).ok_or_else(|| MtfError::SheetNotFound {
            book: book.to_string(),
            sheet: sheet.to_string(),
        })
    }

    fn check_connected(&self) -> MtfResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(MtfError::SpreadsheetUnavailable(
                "no running spreadsheet host".to_string(),
            ))
        }
    }
}

impl Default for MemoryWorkbooks {
    fn default() -> Self {
        Self::new()
    }
}

impl Spreadsheet for MemoryWorkbooks {
    fn book_names(&self) -> MtfResult<Vec<String>> {
        self.check_connected()?;
        Ok(self.books.keys().cloned().collect())
    }

    fn selection(&self) -> MtfResult<Selection> {
        self.check_connected()?;
        self.selection
            .clone()
            .ok_or_else(|| MtfError::ActiveCell("no selection on host".to_string()))
    }

    fn read_region(&self, book: &str, sheet: &str, region: Region) -> MtfResult<Vec<Vec<Cell>>> {
        self.check_connected()?;
        let grid = self.grid(book, sheet)?;
        let mut rows = Vec::with_capacity(region.rows as usize);
        for r in 0..region.rows {
            let mut row = Vec::with_capacity(region.cols as usize);
            for c in 0..region.cols {
                let cell = grid
                    .get(&(region.row + r, region.col + c))
                    .cloned()
                    .unwrap_or_default();
                row.push(cell);
            }
            rows.push(row);
        }
        Ok(rows)
    }

    fn write_region(
        &mut self,
        book: &str,
        sheet: &str,
        anchor: (u32, u32),
        values: &[Vec<Cell>],
    ) -> MtfResult<()> {
        self.check_connected()?;
        self.grid(book, sheet)?;
        let grid = self
            .books
            .get_mut(book)
            .and_then(|sheets| sheets.get_mut(sheet))
            .expect("grid checked above");
        for (r, row) in values.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    grid.insert((anchor.0 + r as u32, anchor.1 + c as u32), cell.clone());
                }
            }
        }
        Ok(())
    }
}
