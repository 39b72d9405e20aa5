//! MTF workbench - edge-MTF bookkeeping and spreadsheet write engine.
//!
//! This library drives the non-GUI half of a mammography QC workflow:
//! registered edge images are tracked in an in-memory store, measured once
//! each through an external MTF engine (with a decode cache in between),
//! and the resulting curves are deposited into Excel workbooks without ever
//! silently overwriting existing data.
//!
//! # Components
//!
//! - [`store::EdgeStore`] - one row per input image with its status and
//!   text-serialized curves
//! - [`cache::ImageCache`] - memoizes the expensive decode+preprocess step
//! - [`excel`] - coordinate math, the workbook boundary, and the write
//!   engine with its template and active-cell placement strategies
//! - [`model::Model`] - sequences the measure-all and write-all batches
//! - [`presenter::Presenter`] - UI event handling and workbook-list polling
//!
//! DICOM decoding, edge detection, and the MTF math itself are external
//! capabilities consumed through [`mtf::ImagePreprocessor`] and
//! [`mtf::MtfEngine`].
//!
//! # Example
//!
//! ```no_run
//! use mtf_workbench::config::TemplateParams;
//! use mtf_workbench::excel::{MemoryWorkbooks, SpreadsheetWriter, WriteEngine};
//!
//! let params = TemplateParams::default();
//! let mut host = MemoryWorkbooks::new();
//! host.add_book("qc.xlsx", &["MTF"]);
//!
//! let mut engine = WriteEngine::new(host, params);
//! engine.select_book("qc.xlsx");
//! # Ok::<(), mtf_workbench::error::MtfError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod excel;
pub mod model;
pub mod mtf;
pub mod presenter;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{MtfError, MtfResult};
pub use types::{AcquisitionMetadata, EdgePosition, EdgeRecord, EdgeStatus, PreprocessedImage};
