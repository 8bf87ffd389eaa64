//! slurpdf: extract plain text from page ranges of PDF documents.
//!
//! This is the public API facade. It re-exports the types of
//! `slurpdf-core` and drives `slurpdf-parse` over a page range.
//!
//! # Architecture
//!
//! - **slurpdf-core**: Backend-independent errors, warnings, options, and page ranges
//! - **slurpdf-parse**: PDF access (Layer 1) and content stream interpretation (Layer 2)
//! - **slurpdf** (this crate): [`Pdf`] and the page-range assembler

mod extract;
mod pdf;

pub use extract::extract_text;
pub use pdf::Pdf;
pub use slurpdf_core::{
    ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode, PageError,
    PageFailurePolicy, PageRange, PdfError, TextExtraction,
};
pub use slurpdf_parse::{FontHandle, PdfBackend, TextEncoding};
pub use {slurpdf_core, slurpdf_parse};
