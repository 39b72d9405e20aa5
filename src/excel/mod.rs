//! Spreadsheet side of the workbench: coordinate math, the workbook
//! boundary, and the write engine.

pub mod coord;
pub mod engine;
pub mod sheet;
pub mod xlsx;

pub use coord::{cell_to_rowcol, Region};
pub use engine::{SpreadsheetWriter, WriteCursor, WriteEngine, WriteMode, ACTIVE_CELL_STRIDE, NO_BOOK};
pub use sheet::{Cell, MemoryWorkbooks, Selection, Spreadsheet};
pub use xlsx::XlsxWorkbooks;
