//! Error types for the backend and interpreter layers.
//!
//! [`BackendError`] wraps backend-specific failures and converts into
//! [`PdfError`] at the public API boundary.

use slurpdf_core::PdfError;
use thiserror::Error;

/// Failures inside the parsing layer.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Broken file structure, object, or reference.
    #[error("malformed PDF: {0}")]
    Parse(String),

    /// Unreadable font dictionary, CMap, or encoding.
    #[error("unusable font: {0}")]
    Font(String),

    /// The content stream could not be tokenized.
    #[error("bad content stream: {0}")]
    Interpreter(String),

    #[error(transparent)]
    Core(#[from] PdfError),
}

impl BackendError {
    /// A resource limit violation.
    pub fn limit(limit_name: &str, limit_value: usize, actual_value: usize) -> Self {
        BackendError::Core(PdfError::ResourceLimitExceeded {
            limit_name: limit_name.to_string(),
            limit_value,
            actual_value,
        })
    }
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::ParseError(msg),
            BackendError::Font(msg) => PdfError::FontError(msg),
            BackendError::Interpreter(msg) => PdfError::InterpreterError(msg),
            BackendError::Core(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpreter_error_maps_to_pdf_error() {
        let pdf_err: PdfError = BackendError::Interpreter("unterminated array".to_string()).into();
        assert_eq!(
            pdf_err,
            PdfError::InterpreterError("unterminated array".to_string())
        );
    }

    #[test]
    fn font_error_maps_to_pdf_error() {
        let pdf_err: PdfError = BackendError::Font("bad ToUnicode".to_string()).into();
        assert_eq!(pdf_err, PdfError::FontError("bad ToUnicode".to_string()));
    }

    #[test]
    fn core_error_passes_through() {
        let err = BackendError::limit("max_operators_per_page", 10, 11);
        let pdf_err: PdfError = err.into();
        assert!(matches!(
            pdf_err,
            PdfError::ResourceLimitExceeded {
                limit_value: 10,
                actual_value: 11,
                ..
            }
        ));
    }

    #[test]
    fn core_error_display_is_transparent() {
        let err = BackendError::Core(PdfError::PasswordRequired);
        assert_eq!(err.to_string(), PdfError::PasswordRequired.to_string());
    }
}
