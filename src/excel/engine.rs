//! The spreadsheet write engine.
//!
//! Places formatted MTF blocks into a workbook using one of two strategies:
//! fixed template cells configured per manufacturer/mode, or an
//! operator-captured active cell with an auto-advancing column cursor.
//! Both strategies refuse to touch a region that already holds values.

use crate::config::TemplateParams;
use crate::error::{MtfError, MtfResult};
use crate::excel::coord::{cell_to_rowcol, Region};
use crate::excel::sheet::{Cell, Spreadsheet};
use tracing::debug;

/// Column stride between consecutive active-cell writes: five data columns,
/// so blocks lay out left-to-right without collision.
pub const ACTIVE_CELL_STRIDE: u32 = 5;

/// Sentinel shown in the workbook picker when nothing is selected.
pub const NO_BOOK: &str = "-";

/// Placement strategy for MTF blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Template,
    ActiveCell,
}

/// Yields successive write anchors from a captured anchor cell, advancing
/// by a fixed column stride per write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteCursor {
    row: u32,
    col: u32,
    stride: u32,
}

impl WriteCursor {
    pub fn new(anchor: (u32, u32), stride: u32) -> Self {
        WriteCursor {
            row: anchor.0,
            col: anchor.1,
            stride,
        }
    }

    /// Current anchor; the cursor then moves one stride to the right.
    pub fn advance(&mut self) -> (u32, u32) {
        let anchor = (self.row, self.col);
        self.col += self.stride;
        anchor
    }

    pub fn position(&self) -> (u32, u32) {
        (self.row, self.col)
    }
}

/// What the orchestrator needs from a write backend.
pub trait SpreadsheetWriter {
    fn selected_book(&self) -> &str;
    fn select_book(&mut self, name: &str);

    /// Workbook picker options: the `"-"` sentinel first, then every open
    /// book except the selected one.
    fn book_names(&self) -> MtfResult<Vec<String>>;

    fn write_mode(&self) -> WriteMode;
    fn set_write_mode(&mut self, mode: WriteMode);

    /// Capture the operator's current selection as the active-cell anchor.
    /// Returns the captured cell key.
    fn capture_active_cell(&mut self) -> MtfResult<String>;

    /// The captured anchor cell key, if any.
    fn active_cell(&self) -> Option<&str>;

    /// Write one record's n x 5 result block (frequency, left, right, top,
    /// bottom) using the current placement strategy.
    fn write_data(
        &mut self,
        file_name: &str,
        manufacturer: &str,
        mode: &str,
        data: &[Vec<f64>],
    ) -> MtfResult<()>;
}

/// Write engine over any [`Spreadsheet`] host.
pub struct WriteEngine<S: Spreadsheet> {
    host: S,
    params: TemplateParams,
    write_mode: WriteMode,
    selected_book: String,
    active_sheet: Option<String>,
    active_cell: Option<String>,
    cursor: Option<WriteCursor>,
}

impl<S: Spreadsheet> WriteEngine<S> {
    pub fn new(host: S, params: TemplateParams) -> Self {
        WriteEngine {
            host,
            params,
            write_mode: WriteMode::default(),
            selected_book: NO_BOOK.to_string(),
            active_sheet: None,
            active_cell: None,
            cursor: None,
        }
    }

    pub fn host(&self) -> &S {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut S {
        &mut self.host
    }

    /// Read the target rectangle, verify every cell is empty, then write.
    /// The sheet is untouched when any cell holds a value.
    fn write_block(
        &mut self,
        sheet: &str,
        anchor: (u32, u32),
        values: &[Vec<Cell>],
    ) -> MtfResult<()> {
        let rows = values.len() as u32;
        let cols = values.iter().map(|row| row.len()).max().unwrap_or(0) as u32;
        if rows == 0 || cols == 0 {
            return Ok(());
        }
        let region = Region::anchored(anchor, rows, cols);

        let current = self.host.read_region(&self.selected_book, sheet, region)?;
        let occupied = current.iter().flatten().any(|cell| !cell.is_empty());
        if occupied {
            return Err(MtfError::Overwrite(region));
        }

        self.host
            .write_region(&self.selected_book, sheet, anchor, values)
    }

    /// Template strategy: per-manufacturer sheet and per-mode top-left cell,
    /// block built from (frequency, value) column pairs for each configured
    /// edge column.
    fn write_template(&mut self, manufacturer: &str, mode: &str, data: &[Vec<f64>]) -> MtfResult<()> {
        let params = self.params.get(manufacturer)?;
        let sheet = params.sheet_name.clone();
        let cell_key = params
            .cells
            .get(mode)
            .ok_or_else(|| {
                MtfError::TemplateConfig(format!(
                    "no destination cell configured for manufacturer '{}' mode '{}'",
                    manufacturer, mode
                ))
            })?
            .clone();
        let edge_columns = params.edge_columns.clone();
        let anchor = cell_to_rowcol(&cell_key)?;

        let mut block: Vec<Vec<Cell>> = Vec::with_capacity(data.len());
        for row in data {
            let mut out = Vec::with_capacity(edge_columns.len() * 2);
            for edge in &edge_columns {
                let frequency = row.first().copied().unwrap_or(f64::NAN);
                let value = row.get(edge.column_index()).copied().unwrap_or(f64::NAN);
                out.push(Cell::from_number(frequency));
                out.push(Cell::from_number(value));
            }
            block.push(out);
        }

        debug!(
            manufacturer,
            mode,
            cell = %cell_key,
            rows = block.len(),
            "template write"
        );
        match self.write_block(&sheet, anchor, &block) {
            Err(MtfError::SheetNotFound { book, sheet }) => Err(MtfError::TemplateConfig(
                format!("template sheet '{}' not found in workbook '{}'", sheet, book),
            )),
            other => other,
        }
    }

    /// Active-cell strategy: two header rows followed by the full block,
    /// placed at the cursor, which then advances one stride.
    fn write_active(&mut self, file_name: &str, mode: &str, data: &[Vec<f64>]) -> MtfResult<()> {
        let sheet = self
            .active_sheet
            .clone()
            .ok_or_else(|| MtfError::ActiveCell("no active cell captured".to_string()))?;
        let cursor = self
            .cursor
            .as_mut()
            .ok_or_else(|| MtfError::ActiveCell("no active cell captured".to_string()))?;
        let anchor = cursor.advance();

        let mut block: Vec<Vec<Cell>> = Vec::with_capacity(data.len() + 2);
        block.push(vec![
            Cell::Text(file_name.to_string()),
            Cell::Text(mode.to_string()),
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
        ]);
        block.push(vec![
            Cell::Text("f".to_string()),
            Cell::Text("left".to_string()),
            Cell::Text("right".to_string()),
            Cell::Text("top".to_string()),
            Cell::Text("bottom".to_string()),
        ]);
        for row in data {
            block.push(row.iter().map(|v| Cell::from_number(*v)).collect());
        }

        debug!(file_name, mode, ?anchor, "active-cell write");
        self.write_block(&sheet, anchor, &block)
    }
}

impl<S: Spreadsheet> SpreadsheetWriter for WriteEngine<S> {
    fn selected_book(&self) -> &str {
        &self.selected_book
    }

    fn select_book(&mut self, name: &str) {
        self.selected_book = name.to_string();
    }

    fn book_names(&self) -> MtfResult<Vec<String>> {
        let mut names = vec![NO_BOOK.to_string()];
        for name in self.host.book_names()? {
            if name != self.selected_book {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    fn set_write_mode(&mut self, mode: WriteMode) {
        self.write_mode = mode;
    }

    fn capture_active_cell(&mut self) -> MtfResult<String> {
        let selection = self.host.selection()?;
        if selection.book != self.selected_book {
            self.active_sheet = None;
            self.active_cell = None;
            self.cursor = None;
            return Err(MtfError::ActiveCell(
                "active cell not in selected workbook".to_string(),
            ));
        }
        if selection.size > 1 {
            return Err(MtfError::ActiveCell(format!(
                "selection spans {} cells, expected one",
                selection.size
            )));
        }

        let address = selection.address.replace('$', "");
        let anchor = cell_to_rowcol(&address)?;
        self.active_sheet = Some(selection.sheet);
        self.active_cell = Some(address.clone());
        self.cursor = Some(WriteCursor::new(anchor, ACTIVE_CELL_STRIDE));
        Ok(address)
    }

    fn active_cell(&self) -> Option<&str> {
        self.active_cell.as_deref()
    }

    fn write_data(
        &mut self,
        file_name: &str,
        manufacturer: &str,
        mode: &str,
        data: &[Vec<f64>],
    ) -> MtfResult<()> {
        match self.write_mode {
            WriteMode::Template => self.write_template(manufacturer, mode, data),
            WriteMode::ActiveCell => self.write_active(file_name, mode, data),
        }
    }
}
