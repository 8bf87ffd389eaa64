//! Page-range text assembly.
//!
//! Drives the parser over a range of pages: for each page it resolves the
//! page's fonts into a cache shared by the whole run, interprets the content
//! stream, and appends the recovered text. Failures are contained at the
//! page boundary and handled according to [`PageFailurePolicy`].

use slurpdf_core::{
    ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode, PageError,
    PageFailurePolicy, PageRange, PdfError, TextExtraction,
};
use slurpdf_parse::{FontCache, PdfBackend, TextEncoding, interpret_content_stream};
use tracing::{debug, warn};

/// Extract the text of `range` from a document opened with backend `B`.
///
/// Pages are processed in order and their text concatenated without
/// separators. Warnings are tagged with their 1-based page number.
///
/// # Errors
///
/// Returns [`PdfError::InvalidPageRange`] if `range` does not fit the
/// document; no page is read in that case. Per-page failures are not
/// errors: they are recorded in [`TextExtraction::page_errors`].
pub fn extract_text<B: PdfBackend>(
    doc: &B::Document,
    range: PageRange,
    options: &ExtractOptions,
) -> Result<TextExtraction, PdfError> {
    let pages = range.resolve(B::page_count(doc))?;
    debug!(range = %range, first = pages.start(), last = pages.end(), "extracting text");

    let mut fonts = FontCache::new();
    let mut extraction = TextExtraction::default();

    for page in pages {
        match extract_page::<B>(doc, page, &mut fonts, options) {
            Ok(result) => {
                extraction.text.push_str(&result.value);
                extraction
                    .warnings
                    .extend(result.warnings.into_iter().map(|w| w.on_page(page)));
            }
            Err(error) => {
                warn!(page, error = %error, policy = ?options.failure_policy, "page failed");
                extraction.page_errors.push(PageError { page, error });
                match options.failure_policy {
                    PageFailurePolicy::FailFast => break,
                    PageFailurePolicy::SkipPage => {
                        if options.collect_warnings {
                            extraction.warnings.push(
                                ExtractWarning::with_code(
                                    ExtractWarningCode::PageSkipped,
                                    "page skipped after extraction failure",
                                )
                                .on_page(page),
                            );
                        }
                    }
                }
            }
        }
    }

    Ok(extraction)
}

/// Extract one page (1-based `page`).
fn extract_page<B: PdfBackend>(
    doc: &B::Document,
    page: usize,
    fonts: &mut FontCache,
    options: &ExtractOptions,
) -> Result<ExtractResult<String>, PdfError> {
    let handle = B::get_page(doc, page - 1).map_err(Into::<PdfError>::into)?;

    let names = B::page_font_names(doc, &handle).map_err(Into::<PdfError>::into)?;
    let font_warnings = fonts.resolve(names, |name| B::page_font(doc, &handle, name));

    let content = B::page_content(doc, &handle).map_err(Into::<PdfError>::into)?;
    let mut result = interpret_content_stream(&content, fonts, TextEncoding::NoOp, options)?;

    if options.collect_warnings && !font_warnings.is_empty() {
        let page_warnings = std::mem::take(&mut result.warnings);
        result.warnings = font_warnings;
        result.warnings.extend(page_warnings);
    }
    debug!(page, chars = result.value.len(), fonts = fonts.len(), "page extracted");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slurpdf_parse::{CMap, FontDecoder, FontHandle};

    // --- Mock backend ---

    struct MockPage {
        /// Declared fonts; `None` means the declaration cannot be resolved.
        fonts: Vec<(&'static str, Option<FontHandle>)>,
        content: Result<Vec<u8>, &'static str>,
    }

    struct MockDocument {
        pages: Vec<MockPage>,
    }

    struct MockBackend;

    impl PdfBackend for MockBackend {
        type Document = MockDocument;
        type Page = usize;
        type Error = PdfError;

        fn open(_bytes: &[u8]) -> Result<Self::Document, Self::Error> {
            Err(PdfError::Other("mock documents are built in memory".to_string()))
        }

        fn page_count(doc: &Self::Document) -> usize {
            doc.pages.len()
        }

        fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
            if index >= doc.pages.len() {
                return Err(PdfError::ParseError(format!("no page {index}")));
            }
            Ok(index)
        }

        fn page_font_names(
            doc: &Self::Document,
            page: &Self::Page,
        ) -> Result<Vec<String>, Self::Error> {
            Ok(doc.pages[*page]
                .fonts
                .iter()
                .map(|(name, _)| name.to_string())
                .collect())
        }

        fn page_font(
            doc: &Self::Document,
            page: &Self::Page,
            name: &str,
        ) -> Result<Option<FontHandle>, Self::Error> {
            Ok(doc.pages[*page]
                .fonts
                .iter()
                .find(|(n, _)| *n == name)
                .and_then(|(_, handle)| handle.clone()))
        }

        fn page_content(doc: &Self::Document, page: &Self::Page) -> Result<Vec<u8>, Self::Error> {
            doc.pages[*page]
                .content
                .clone()
                .map_err(|msg| PdfError::ParseError(msg.to_string()))
        }
    }

    fn text_page(content: &str) -> MockPage {
        MockPage {
            fonts: Vec::new(),
            content: Ok(content.as_bytes().to_vec()),
        }
    }

    fn broken_page() -> MockPage {
        MockPage {
            fonts: Vec::new(),
            content: Err("corrupt content stream"),
        }
    }

    fn upper_font(name: &str) -> FontHandle {
        let cmap = CMap::parse(b"1 beginbfrange <61> <7A> <0041> endbfrange").unwrap();
        FontHandle::new(name, TextEncoding::font(FontDecoder::new().with_to_unicode(cmap)))
    }

    fn doc(pages: Vec<MockPage>) -> MockDocument {
        MockDocument { pages }
    }

    fn run(doc: &MockDocument, range: PageRange, options: &ExtractOptions) -> TextExtraction {
        extract_text::<MockBackend>(doc, range, options).unwrap()
    }

    #[test]
    fn all_pages_in_order() {
        let d = doc(vec![text_page("(A) Tj"), text_page("(B) Tj"), text_page("(C) Tj")]);
        let out = run(&d, PageRange::ALL, &ExtractOptions::default());
        assert_eq!(out.text, "ABC");
        assert!(out.is_complete());
    }

    #[test]
    fn sub_range_reads_only_requested_pages() {
        let d = doc(vec![
            text_page("(one) Tj"),
            text_page("(two) Tj"),
            text_page("(three) Tj"),
            text_page("(four) Tj"),
        ]);
        let out = run(&d, PageRange::new(2, 3), &ExtractOptions::default());
        assert_eq!(out.text, "twothree");
    }

    #[test]
    fn invalid_range_is_rejected_before_reading() {
        let d = doc(vec![broken_page(), broken_page()]);
        for range in [PageRange::new(2, 1), PageRange::new(1, 3), PageRange::new(0, 1)] {
            let err = extract_text::<MockBackend>(&d, range, &ExtractOptions::default())
                .unwrap_err();
            assert!(matches!(err, PdfError::InvalidPageRange { page_count: 2, .. }));
        }
    }

    #[test]
    fn fail_fast_keeps_earlier_pages() {
        let d = doc(vec![text_page("(ok) Tj"), broken_page(), text_page("(late) Tj")]);
        let out = run(&d, PageRange::ALL, &ExtractOptions::default());
        assert_eq!(out.text, "ok");
        assert_eq!(out.page_errors.len(), 1);
        assert_eq!(out.page_errors[0].page, 2);
        assert!(matches!(
            out.clone().into_result(),
            Err(PdfError::PageFailed { page: 2, .. })
        ));
    }

    #[test]
    fn skip_page_continues_and_records_every_failure() {
        let d = doc(vec![
            broken_page(),
            text_page("(mid) Tj"),
            broken_page(),
            text_page("(end) Tj"),
        ]);
        let options = ExtractOptions {
            failure_policy: PageFailurePolicy::SkipPage,
            ..ExtractOptions::default()
        };
        let out = run(&d, PageRange::ALL, &options);
        assert_eq!(out.text, "midend");
        let failed: Vec<usize> = out.page_errors.iter().map(|e| e.page).collect();
        assert_eq!(failed, vec![1, 3]);
        let skipped: Vec<Option<usize>> = out
            .warnings
            .iter()
            .filter(|w| w.code == ExtractWarningCode::PageSkipped)
            .map(|w| w.page)
            .collect();
        assert_eq!(skipped, vec![Some(1), Some(3)]);
    }

    #[test]
    fn tokenizer_fault_is_page_error() {
        let d = doc(vec![text_page("(unterminated Tj")]);
        let out = run(&d, PageRange::ALL, &ExtractOptions::default());
        assert!(matches!(
            out.page_errors[0].error,
            PdfError::InterpreterError(_)
        ));
    }

    #[test]
    fn fonts_are_shared_across_pages() {
        let d = doc(vec![
            MockPage {
                fonts: vec![("F1", Some(upper_font("F1")))],
                content: Ok(b"/F1 12 Tf (ab) Tj".to_vec()),
            },
            // Page 2 uses F1 without declaring it.
            text_page("/F1 12 Tf (cd) Tj"),
        ]);
        let out = run(&d, PageRange::ALL, &ExtractOptions::default());
        assert_eq!(out.text, "ABCD");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn encoding_resets_to_pass_through_each_page() {
        let d = doc(vec![
            MockPage {
                fonts: vec![("F1", Some(upper_font("F1")))],
                content: Ok(b"/F1 12 Tf (ab) Tj".to_vec()),
            },
            text_page("(cd) Tj"),
        ]);
        let out = run(&d, PageRange::ALL, &ExtractOptions::default());
        assert_eq!(out.text, "ABcd");
    }

    #[test]
    fn unresolvable_font_warns_and_passes_through() {
        let d = doc(vec![MockPage {
            fonts: vec![("F1", None)],
            content: Ok(b"/F1 12 Tf (raw) Tj".to_vec()),
        }]);
        let out = run(&d, PageRange::ALL, &ExtractOptions::default());
        assert_eq!(out.text, "raw");
        assert!(out.is_complete());
        // One from font resolution, one from Tf.
        assert_eq!(out.warnings.len(), 2);
        assert!(out
            .warnings
            .iter()
            .all(|w| w.code == ExtractWarningCode::MissingFont && w.page == Some(1)));
    }

    #[test]
    fn warnings_tagged_with_page_number() {
        let d = doc(vec![text_page("(a) Tj"), text_page("(b) (c) Tj")]);
        let out = run(&d, PageRange::ALL, &ExtractOptions::default());
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].page, Some(2));
        assert_eq!(out.warnings[0].code, ExtractWarningCode::MalformedOperator);
    }

    #[test]
    fn collect_warnings_false_drops_all_warnings() {
        let d = doc(vec![MockPage {
            fonts: vec![("F1", None)],
            content: Ok(b"/F1 12 Tf (b) (c) Tj".to_vec()),
        }]);
        let options = ExtractOptions {
            collect_warnings: false,
            ..ExtractOptions::default()
        };
        let out = run(&d, PageRange::ALL, &options);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn next_line_operator_is_the_only_separator() {
        let d = doc(vec![text_page("(a) Tj T* (b) Tj"), text_page("(c) Tj")]);
        let out = run(&d, PageRange::ALL, &ExtractOptions::default());
        assert_eq!(out.text, "a\nbc");
    }
}
