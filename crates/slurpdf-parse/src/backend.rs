//! Document access behind a trait.
//!
//! Defines the [`PdfBackend`] trait that abstracts the document access the
//! text extractor needs: opening a document, enumerating pages, resolving a
//! page's fonts, and reading its decompressed content stream. Object
//! parsing, cross-reference resolution and stream filters stay behind this
//! seam.

use slurpdf_core::PdfError;

use crate::font::FontHandle;

/// What the text extractor needs from a PDF library.
///
/// ```ignore
/// let doc = MyBackend::open(bytes)?;
/// let page = MyBackend::get_page(&doc, 0)?;
/// for name in MyBackend::page_font_names(&doc, &page)? {
///     let font = MyBackend::page_font(&doc, &page, &name)?;
/// }
/// let content = MyBackend::page_content(&doc, &page)?;
/// ```
pub trait PdfBackend {
    type Document;

    /// Cheap handle to one page of a `Document`.
    type Page;

    /// Converted to [`PdfError`] at the page boundary.
    type Error: std::error::Error + Into<PdfError>;

    /// Load a document from its bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a valid PDF or the document is
    /// encrypted.
    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error>;

    /// Number of pages in the document.
    fn page_count(doc: &Self::Document) -> usize;

    /// The page at 0-based `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the page object
    /// cannot be resolved.
    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error>;

    /// Resource names of the fonts the page declares (its `/Font`
    /// dictionary, including inherited resources).
    ///
    /// # Errors
    ///
    /// Returns an error if the resource dictionary is malformed.
    fn page_font_names(doc: &Self::Document, page: &Self::Page)
    -> Result<Vec<String>, Self::Error>;

    /// Build the handle for the font declared under `name`.
    ///
    /// Returns `Ok(None)` if the page declares no such font.
    ///
    /// # Errors
    ///
    /// Returns an error if the font dictionary exists but cannot be read.
    fn page_font(
        doc: &Self::Document,
        page: &Self::Page,
        name: &str,
    ) -> Result<Option<FontHandle>, Self::Error>;

    /// The page's decompressed content stream. Multiple `/Contents` streams
    /// are joined with a single space.
    ///
    /// # Errors
    ///
    /// Returns an error if a content stream cannot be resolved or decoded.
    fn page_content(doc: &Self::Document, page: &Self::Page) -> Result<Vec<u8>, Self::Error>;
}
