//! `.xlsx` file backend for the spreadsheet boundary.
//!
//! Loads workbook files through `calamine` into in-memory grids, applies
//! region writes there, and saves through `rust_xlsxwriter`. Useful for
//! batch runs against a template file when no live spreadsheet host is
//! attached. File-backed books have no operator selection, so active-cell
//! capture is not available on this backend.

use crate::error::{MtfError, MtfResult};
use crate::excel::coord::Region;
use crate::excel::sheet::{Cell, Selection, Spreadsheet};
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

type SheetGrid = BTreeMap<(u32, u32), Cell>;

struct LoadedBook {
    path: PathBuf,
    sheets: BTreeMap<String, SheetGrid>,
}

/// Workbook host backed by `.xlsx` files on disk.
#[derive(Default)]
pub struct XlsxWorkbooks {
    books: BTreeMap<String, LoadedBook>,
}

impl XlsxWorkbooks {
    pub fn new() -> Self {
        XlsxWorkbooks::default()
    }

    /// Load a workbook file. The book is addressed by its file name, like a
    /// live host addresses open workbooks. Returns the book name.
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> MtfResult<String> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| MtfError::BookNotFound(path.display().to_string()))?;

        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e| MtfError::SpreadsheetUnavailable(format!("{}: {}", path.display(), e)))?;

        let mut sheets = BTreeMap::new();
        for sheet_name in workbook.sheet_names().to_vec() {
            let mut grid = SheetGrid::new();
            if let Ok(range) = workbook.worksheet_range(&sheet_name) {
                let (start_row, start_col) = range.start().unwrap_or((0, 0));
                let (height, width) = range.get_size();
                for r in 0..height {
                    for c in 0..width {
                        if let Some(data) = range.get((r, c)) {
                            let cell = convert_cell(data);
                            if !cell.is_empty() {
                                // calamine is 0-indexed, the boundary is 1-indexed
                                let row = start_row + r as u32 + 1;
                                let col = start_col + c as u32 + 1;
                                grid.insert((row, col), cell);
                            }
                        }
                    }
                }
            }
            sheets.insert(sheet_name, grid);
        }

        self.books.insert(
            name.clone(),
            LoadedBook {
                path: path.to_path_buf(),
                sheets,
            },
        );
        Ok(name)
    }

    /// Save a book back to the file it was loaded from.
    pub fn save(&self, book: &str) -> MtfResult<()> {
        let loaded = self.loaded(book)?;
        self.save_as(book, &loaded.path.clone())
    }

    /// Save a book to an arbitrary path.
    pub fn save_as<P: AsRef<Path>>(&self, book: &str, path: P) -> MtfResult<()> {
        let loaded = self.loaded(book)?;
        let mut workbook = Workbook::new();
        for (sheet_name, grid) in &loaded.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet
                .set_name(sheet_name)
                .map_err(|e| MtfError::SpreadsheetUnavailable(format!("sheet name: {}", e)))?;
            for (&(row, col), cell) in grid {
                let (r, c) = (row - 1, (col - 1) as u16);
                let result = match cell {
                    Cell::Empty => continue,
                    Cell::Number(v) => worksheet.write_number(r, c, *v),
                    Cell::Text(s) => worksheet.write_string(r, c, s),
                };
                result.map_err(|e| {
                    MtfError::SpreadsheetUnavailable(format!("write cell: {}", e))
                })?;
            }
        }
        workbook
            .save(path.as_ref())
            .map_err(|e| MtfError::SpreadsheetUnavailable(format!("save workbook: {}", e)))?;
        Ok(())
    }

    fn loaded(&self, book: &str) -> MtfResult<&LoadedBook> {
        self.books
            .get(book)
            .ok_or_else(|| MtfError::BookNotFound(book.to_string()))
    }

    fn grid(&self, book: &str, sheet: &str) -> MtfResult<&SheetGrid> {
        self.loaded(book)?
            .sheets
            .get(sheet)
            .ok_or_else(|| MtfError::SheetNotFound {
                book: book.to_string(),
                sheet: sheet.to_string(),
            })
    }
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => {
            if s.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Empty,
    }
}

impl Spreadsheet for XlsxWorkbooks {
    fn book_names(&self) -> MtfResult<Vec<String>> {
        Ok(self.books.keys().cloned().collect())
    }

    fn selection(&self) -> MtfResult<Selection> {
        Err(MtfError::ActiveCell(
            "file-backed workbooks have no live selection".to_string(),
        ))
    }

    fn read_region(&self, book: &str, sheet: &str, region: Region) -> MtfResult<Vec<Vec<Cell>>> {
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
        self.grid(book, sheet)?;
        let grid = self
            .books
            .get_mut(book)
            .and_then(|loaded| loaded.sheets.get_mut(sheet))
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
