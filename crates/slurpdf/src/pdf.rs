//! Top-level PDF document type for opening documents and extracting text.

use slurpdf_core::{ExtractOptions, PageRange, PdfError, TextExtraction};
use slurpdf_parse::{LopdfBackend, LopdfDocument, PdfBackend};

use crate::extract::extract_text;

/// A PDF document opened for text extraction.
///
/// ```ignore
/// let pdf = Pdf::open(bytes, None)?;
/// let extraction = pdf.extract_text(PageRange::new(2, 3))?;
/// println!("{}", extraction.text);
/// ```
pub struct Pdf {
    doc: LopdfDocument,
    options: ExtractOptions,
}

impl Pdf {
    /// Read `path` into memory and [`open`](Pdf::open) it.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the file cannot be read or is not a valid PDF.
    pub fn open_file(
        path: impl AsRef<std::path::Path>,
        options: Option<ExtractOptions>,
    ) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path)?;
        Self::open(&bytes, options)
    }

    /// Load a document from memory. `None` means default [`ExtractOptions`].
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::ResourceLimitExceeded`] if `bytes` is larger than
    /// `max_input_bytes`, [`PdfError::PasswordRequired`] if the PDF is
    /// encrypted, and [`PdfError::ParseError`] if it is not a valid PDF.
    pub fn open(bytes: &[u8], options: Option<ExtractOptions>) -> Result<Self, PdfError> {
        let options = options.unwrap_or_default();
        if let Some(max_bytes) = options.max_input_bytes {
            if bytes.len() > max_bytes {
                return Err(PdfError::ResourceLimitExceeded {
                    limit_name: "max_input_bytes".to_string(),
                    limit_value: max_bytes,
                    actual_value: bytes.len(),
                });
            }
        }
        let doc = LopdfBackend::open(bytes).map_err(PdfError::from)?;
        Ok(Self { doc, options })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        LopdfBackend::page_count(&self.doc)
    }

    /// The options this document was opened with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract the text of a page range.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::InvalidPageRange`] if the range does not fit the
    /// document. Page failures are reported in the returned
    /// [`TextExtraction`].
    pub fn extract_text(&self, range: PageRange) -> Result<TextExtraction, PdfError> {
        extract_text::<LopdfBackend>(&self.doc, range, &self.options)
    }

    /// Extract the text of a page range, treating any page failure as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::InvalidPageRange`] for a bad range, or
    /// [`PdfError::PageFailed`] naming the first page that failed.
    pub fn text(&self, range: PageRange) -> Result<String, PdfError> {
        self.extract_text(range)?.into_result()
    }
}

impl std::fmt::Debug for Pdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pdf")
            .field("page_count", &self.page_count())
            .field("options", &self.options)
            .finish()
    }
}
