use std::path::Path;

use slurpdf::{ExtractOptions, PageFailurePolicy, PageRange, TextExtraction};

use crate::cli::TextFormat;
use crate::shared::open_pdf;

pub fn run(
    file: &Path,
    pages: PageRange,
    format: &TextFormat,
    skip_failed_pages: bool,
) -> Result<(), i32> {
    let options = ExtractOptions {
        failure_policy: if skip_failed_pages {
            PageFailurePolicy::SkipPage
        } else {
            PageFailurePolicy::FailFast
        },
        ..ExtractOptions::default()
    };
    let pdf = open_pdf(file, options)?;

    let extraction = pdf.extract_text(pages).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;

    match format {
        TextFormat::Text => print_text(&extraction),
        TextFormat::Json => print_json(&extraction)?,
    }

    if extraction.is_complete() { Ok(()) } else { Err(1) }
}

fn print_text(extraction: &TextExtraction) {
    println!("{}", extraction.text);
    for failure in &extraction.page_errors {
        eprintln!("Error: {failure}");
    }
}

fn print_json(extraction: &TextExtraction) -> Result<(), i32> {
    let json = serde_json::to_string(extraction).map_err(|e| {
        eprintln!("Error: failed to serialize output: {e}");
        1
    })?;
    println!("{json}");
    Ok(())
}
