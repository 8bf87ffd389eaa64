use std::path::Path;

use slurpdf::{ExtractOptions, Pdf};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or debug
/// output for the slurpdf crates with `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,slurpdf=debug,slurpdf_parse=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Open a PDF file, printing an error message on failure.
pub fn open_pdf(file: &Path, options: ExtractOptions) -> Result<Pdf, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(1);
    }

    Pdf::open_file(file, Some(options)).map_err(|e| {
        eprintln!("Error: failed to open PDF: {e}");
        1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_pdf_file_not_found() {
        let result = open_pdf(Path::new("/nonexistent/file.pdf"), ExtractOptions::default());
        assert!(matches!(result, Err(1)));
    }

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing(false);
        init_tracing(true);
    }
}
