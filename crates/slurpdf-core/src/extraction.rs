//! Outcome of a page-range text extraction.

use crate::error::{ExtractWarning, PdfError};

/// A page that could not be extracted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageError {
    /// The failing page (1-based).
    pub page: usize,
    /// What went wrong while extracting it.
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_display"))]
    pub error: PdfError,
}

impl PageError {
    /// Convert into a [`PdfError::PageFailed`] naming the page.
    pub fn to_pdf_error(&self) -> PdfError {
        PdfError::PageFailed {
            page: self.page,
            message: self.error.to_string(),
        }
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "page {}: {}", self.page, self.error)
    }
}

#[cfg(feature = "serde")]
fn serialize_display<S: serde::Serializer>(err: &PdfError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(err)
}

/// Text recovered from a page range.
///
/// `text` holds the pages that succeeded, concatenated in page order. Under
/// [`PageFailurePolicy::FailFast`](crate::PageFailurePolicy::FailFast) at most
/// one entry is present in `page_errors` and `text` stops before that page.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TextExtraction {
    /// Concatenated text of the extracted pages.
    pub text: String,
    /// Non-fatal issues, tagged with their page.
    pub warnings: Vec<ExtractWarning>,
    /// Pages that failed, in page order.
    pub page_errors: Vec<PageError>,
}

impl TextExtraction {
    /// Returns true if every page in the range was extracted.
    pub fn is_complete(&self) -> bool {
        self.page_errors.is_empty()
    }

    /// The first page failure, if any.
    pub fn first_error(&self) -> Option<&PageError> {
        self.page_errors.first()
    }

    /// Collapse into the text, or the first page failure as a [`PdfError`].
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::PageFailed`] if any page failed.
    pub fn into_result(self) -> Result<String, PdfError> {
        match self.page_errors.first() {
            Some(err) => Err(err.to_pdf_error()),
            None => Ok(self.text),
        }
    }
}
