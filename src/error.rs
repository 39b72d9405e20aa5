use crate::excel::coord::Region;
use thiserror::Error;

pub type MtfResult<T> = Result<T, MtfError>;

#[derive(Error, Debug)]
pub enum MtfError {
    /// No live spreadsheet connection / application not found.
    #[error("spreadsheet unavailable: {0}")]
    SpreadsheetUnavailable(String),

    /// The addressed workbook has no sheet with this name.
    #[error("workbook '{book}' has no sheet '{sheet}'")]
    SheetNotFound { book: String, sheet: String },

    /// The addressed workbook is not open on the host.
    #[error("no open workbook named '{0}'")]
    BookNotFound(String),

    /// Destination region already holds values; nothing was written.
    #[error("values detected in region {0}; write aborted")]
    Overwrite(Region),

    /// Template sheet/cell lookup failed for this manufacturer/mode.
    #[error("template write failed: {0}")]
    TemplateConfig(String),

    /// No usable operator selection for active-cell writes.
    #[error("active cell: {0}")]
    ActiveCell(String),

    /// Image metadata matched no configured manufacturer.
    #[error("unsupported manufacturer: {0}")]
    UnsupportedManufacturer(String),

    /// Cell address did not match `<letters><digits>`.
    #[error("invalid cell address: {0}")]
    CellAddress(String),

    /// Decode/preprocess of an input image failed.
    #[error("preprocess error: {0}")]
    Preprocess(String),

    /// MTF computation failed for one edge region.
    #[error("measurement error: {0}")]
    Measurement(String),

    /// Stored numeric series could not be parsed back.
    #[error("malformed series value: {0}")]
    Series(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parameters error: {0}")]
    Params(#[from] serde_json::Error),
}
