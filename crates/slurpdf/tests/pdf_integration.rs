//! End-to-end tests for the public API: PDF bytes → Pdf::open → extract_text.
//!
//! Test PDFs are created programmatically using lopdf.

use lopdf::{Object, Stream, dictionary};
use slurpdf::{
    ExtractOptions, ExtractWarningCode, PageFailurePolicy, PageRange, Pdf, PdfError,
};

/// Build a PDF with one page per content stream. Every page declares
/// `F1` (Helvetica, WinAnsi) in its resources.
fn build_pdf(contents: &[&[u8]]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let pages_id = doc.new_object_id();
    let mut kids = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

fn four_pages() -> Vec<u8> {
    build_pdf(&[
        b"BT /F1 12 Tf (Page one) Tj ET",
        b"BT /F1 12 Tf (Page two) Tj ET",
        b"BT /F1 12 Tf (Page three) Tj ET",
        b"BT /F1 12 Tf (Page four) Tj ET",
    ])
}

#[test]
fn open_and_count_pages() {
    let pdf = Pdf::open(&four_pages(), None).unwrap();
    assert_eq!(pdf.page_count(), 4);
}

#[test]
fn all_pages_in_order() {
    let pdf = Pdf::open(&four_pages(), None).unwrap();
    let text = pdf.text(PageRange::ALL).unwrap();
    assert_eq!(text, "Page onePage twoPage threePage four");
}

#[test]
fn middle_range_only() {
    let pdf = Pdf::open(&four_pages(), None).unwrap();
    let extraction = pdf.extract_text(PageRange::new(2, 3)).unwrap();
    assert_eq!(extraction.text, "Page twoPage three");
    assert!(extraction.is_complete());
    assert!(extraction.warnings.is_empty());
}

#[test]
fn range_parsed_from_string() {
    let pdf = Pdf::open(&four_pages(), None).unwrap();
    let range: PageRange = "4".parse().unwrap();
    assert_eq!(pdf.text(range).unwrap(), "Page four");
}

#[test]
fn invalid_ranges_are_rejected() {
    let pdf = Pdf::open(&four_pages(), None).unwrap();
    for (start, end) in [(3, 2), (1, 5), (0, 2)] {
        let err = pdf.extract_text(PageRange::new(start, end)).unwrap_err();
        assert_eq!(
            err,
            PdfError::InvalidPageRange {
                start,
                end,
                page_count: 4
            }
        );
    }
}

#[test]
fn tj_array_with_kerning() {
    let pdf = Pdf::open(&build_pdf(&[b"BT /F1 12 Tf [(Hello) -120 ( World)] TJ ET"]), None)
        .unwrap();
    assert_eq!(pdf.text(PageRange::ALL).unwrap(), "Hello World");
}

#[test]
fn next_line_operator_inserts_newline() {
    let pdf = Pdf::open(
        &build_pdf(&[b"BT /F1 12 Tf 14 TL (first) Tj T* (second) Tj ET"]),
        None,
    )
    .unwrap();
    assert_eq!(pdf.text(PageRange::ALL).unwrap(), "first\nsecond");
}

#[test]
fn win_ansi_font_decodes_euro_sign() {
    let pdf = Pdf::open(&build_pdf(&[b"BT /F1 12 Tf <3580> Tj ET"]), None).unwrap();
    assert_eq!(pdf.text(PageRange::ALL).unwrap(), "5\u{20AC}");
}

#[test]
fn undeclared_font_falls_back_to_raw_bytes() {
    let pdf = Pdf::open(&build_pdf(&[b"BT /F7 12 Tf (raw) Tj ET"]), None).unwrap();
    let extraction = pdf.extract_text(PageRange::ALL).unwrap();
    assert_eq!(extraction.text, "raw");
    assert_eq!(extraction.warnings.len(), 1);
    assert_eq!(extraction.warnings[0].code, ExtractWarningCode::MissingFont);
    assert_eq!(extraction.warnings[0].page, Some(1));
}

#[test]
fn malformed_operator_is_skipped() {
    let pdf = Pdf::open(&build_pdf(&[b"BT (a) Tj (b) \" (c) Tj ET"]), None).unwrap();
    let extraction = pdf.extract_text(PageRange::ALL).unwrap();
    assert_eq!(extraction.text, "ac");
    assert_eq!(
        extraction.warnings[0].code,
        ExtractWarningCode::MalformedOperator
    );
}

#[test]
fn fail_fast_stops_at_broken_page() {
    let bytes = build_pdf(&[b"(one) Tj", b"(two Tj", b"(three) Tj"]);
    let pdf = Pdf::open(&bytes, None).unwrap();
    let extraction = pdf.extract_text(PageRange::ALL).unwrap();
    assert_eq!(extraction.text, "one");
    assert_eq!(extraction.page_errors.len(), 1);
    assert_eq!(extraction.page_errors[0].page, 2);

    let err = pdf.text(PageRange::ALL).unwrap_err();
    assert!(matches!(err, PdfError::PageFailed { page: 2, .. }));
}

#[test]
fn skip_page_policy_continues() {
    let bytes = build_pdf(&[b"(one) Tj", b"(two Tj", b"(three) Tj"]);
    let options = ExtractOptions {
        failure_policy: PageFailurePolicy::SkipPage,
        ..ExtractOptions::default()
    };
    let pdf = Pdf::open(&bytes, Some(options)).unwrap();
    let extraction = pdf.extract_text(PageRange::ALL).unwrap();
    assert_eq!(extraction.text, "onethree");
    assert_eq!(extraction.page_errors.len(), 1);
}

#[test]
fn max_input_bytes_is_enforced() {
    let bytes = four_pages();
    let options = ExtractOptions {
        max_input_bytes: Some(16),
        ..ExtractOptions::default()
    };
    let err = Pdf::open(&bytes, Some(options)).unwrap_err();
    assert!(matches!(err, PdfError::ResourceLimitExceeded { limit_value: 16, .. }));
}

#[test]
fn operator_limit_fails_the_page() {
    let options = ExtractOptions {
        max_operators_per_page: 3,
        ..ExtractOptions::default()
    };
    let pdf = Pdf::open(&build_pdf(&[b"BT /F1 12 Tf (a) Tj ET"]), Some(options)).unwrap();
    let extraction = pdf.extract_text(PageRange::ALL).unwrap();
    assert!(matches!(
        extraction.page_errors[0].error,
        PdfError::ResourceLimitExceeded { .. }
    ));
}

#[test]
fn open_garbage_is_parse_error() {
    let err = Pdf::open(b"%PDF-1.5 nothing here", None).unwrap_err();
    assert!(matches!(err, PdfError::ParseError(_)));
}

#[test]
fn open_file_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("slurpdf-open-file-{}.pdf", std::process::id()));
    std::fs::write(&path, four_pages()).unwrap();
    let pdf = Pdf::open_file(&path, None).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(pdf.page_count(), 4);
}

#[test]
fn open_missing_file_is_io_error() {
    let err = Pdf::open_file("/nonexistent/slurpdf/missing.pdf", None).unwrap_err();
    assert!(matches!(err, PdfError::IoError(_)));
}
