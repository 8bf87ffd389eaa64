//! slurpdf-core: Backend-independent data types.
//!
//! This crate provides the error, warning, option, and page range types
//! shared by the parsing layer and the public API. It has no required
//! external dependencies.

pub mod error;
pub mod extraction;
pub mod page_range;

pub use error::{
    ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode, PageFailurePolicy, PdfError,
};
pub use extraction::{PageError, TextExtraction};
pub use page_range::PageRange;
