//! Failures, warnings, and extraction options.
//!
//! A [`PdfError`] ends the current operation. An [`ExtractWarning`] records
//! something the extractor worked around and carries on from; warnings ride
//! along with values in [`ExtractResult`]. [`ExtractOptions`] holds the
//! limits and the [`PageFailurePolicy`] for one run.

use std::fmt;

/// Errors that stop a document or a page from being read.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfError {
    /// The file structure or an object could not be parsed.
    ParseError(String),
    /// Reading the input failed.
    IoError(String),
    /// A font dictionary or one of its encodings is unusable.
    FontError(String),
    /// The content stream could not be tokenized.
    InterpreterError(String),
    /// The requested page range does not fit the document.
    InvalidPageRange {
        /// Requested first page (1-based).
        start: usize,
        /// Requested last page (1-based, inclusive).
        end: usize,
        /// Number of pages in the document.
        page_count: usize,
    },
    /// Extraction of a single page failed.
    PageFailed {
        /// The failing page (1-based).
        page: usize,
        /// Description of the underlying failure.
        message: String,
    },
    /// Input was larger than an [`ExtractOptions`] limit allows.
    ResourceLimitExceeded {
        /// Option name, e.g. `"max_stream_bytes"`.
        limit_name: String,
        limit_value: usize,
        actual_value: usize,
    },
    /// The document is encrypted.
    PasswordRequired,
    Other(String),
}

impl fmt::Display for PdfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PdfError::ParseError(msg) => write!(f, "malformed PDF: {msg}"),
            PdfError::IoError(msg) => write!(f, "cannot read input: {msg}"),
            PdfError::FontError(msg) => write!(f, "unusable font: {msg}"),
            PdfError::InterpreterError(msg) => write!(f, "bad content stream: {msg}"),
            PdfError::InvalidPageRange {
                start,
                end,
                page_count,
            } => write!(
                f,
                "invalid page range {start}-{end} for document with {page_count} page(s)"
            ),
            PdfError::PageFailed { page, message } => {
                write!(f, "page {page} failed: {message}")
            }
            PdfError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(f, "{limit_name} exceeded: {actual_value} > {limit_value}"),
            PdfError::PasswordRequired => f.write_str("document is encrypted, password required"),
            PdfError::Other(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for PdfError {}

impl From<std::io::Error> for PdfError {
    fn from(err: std::io::Error) -> Self {
        PdfError::IoError(err.to_string())
    }
}

/// Category of an [`ExtractWarning`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "detail")
)]
pub enum ExtractWarningCode {
    /// A font name could not be resolved; its text was passed through raw.
    MissingFont,
    /// A text operator had the wrong number or type of operands and was skipped.
    MalformedOperator,
    /// A page failed under [`PageFailurePolicy::SkipPage`].
    PageSkipped,
    Other(String),
}

impl ExtractWarningCode {
    /// Short upper-case tag, e.g. `MISSING_FONT`.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractWarningCode::MissingFont => "MISSING_FONT",
            ExtractWarningCode::MalformedOperator => "MALFORMED_OPERATOR",
            ExtractWarningCode::PageSkipped => "PAGE_SKIPPED",
            ExtractWarningCode::Other(_) => "OTHER",
        }
    }
}

impl fmt::Display for ExtractWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Something the extractor recovered from.
///
/// Examples are a `Tj` whose operand is not a string, or a `Tf` naming a
/// font the page never declared. Location fields are filled in as the
/// warning travels up: the interpreter sets the operator index, the font
/// cache the font name, and the page-range assembler the page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractWarning {
    pub code: ExtractWarningCode,
    pub description: String,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Position of the offending operator within the page's content stream.
    pub operator_index: Option<usize>,
    /// Font resource name, e.g. `F1`.
    pub font_name: Option<String>,
}

impl ExtractWarning {
    pub fn with_code(code: ExtractWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
            operator_index: None,
            font_name: None,
        }
    }

    pub fn at_operator(mut self, operator_index: usize) -> Self {
        self.operator_index = Some(operator_index);
        self
    }

    pub fn for_font(mut self, font_name: impl Into<String>) -> Self {
        self.font_name = Some(font_name.into());
        self
    }

    /// Set the page number if none is recorded yet.
    pub fn on_page(mut self, page: usize) -> Self {
        if self.page.is_none() {
            self.page = Some(page);
        }
        self
    }
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)?;
        let mut at = Vec::new();
        if let Some(page) = self.page {
            at.push(format!("page {page}"));
        }
        if let Some(index) = self.operator_index {
            at.push(format!("op {index}"));
        }
        if let Some(font) = &self.font_name {
            at.push(format!("/{font}"));
        }
        if !at.is_empty() {
            write!(f, " ({})", at.join(", "))?;
        }
        Ok(())
    }
}

/// A value plus the warnings raised while producing it.
#[derive(Debug, Clone)]
pub struct ExtractResult<T> {
    pub value: T,
    pub warnings: Vec<ExtractWarning>,
}

impl<T> ExtractResult<T> {
    pub fn with_warnings(value: T, warnings: Vec<ExtractWarning>) -> Self {
        Self { value, warnings }
    }

    /// True when nothing had to be worked around.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// What the page-range assembler does when one page cannot be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageFailurePolicy {
    /// Stop at the first failing page, keeping the text of earlier pages.
    #[default]
    FailFast,
    /// Skip the failing page (it contributes no text) and continue.
    SkipPage,
}

/// Knobs for one extraction run.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Keep [`ExtractWarning`]s in the output. Default `true`.
    pub collect_warnings: bool,
    /// Default [`PageFailurePolicy::FailFast`].
    pub failure_policy: PageFailurePolicy,
    /// Largest decoded content stream a page may have. Default 100 MiB.
    pub max_stream_bytes: usize,
    /// Most operators interpreted on one page. Default 1,000,000.
    pub max_operators_per_page: usize,
    /// Largest input `Pdf::open` accepts. Default unlimited.
    pub max_input_bytes: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            collect_warnings: true,
            failure_policy: PageFailurePolicy::FailFast,
            max_stream_bytes: 100 << 20,
            max_operators_per_page: 1_000_000,
            max_input_bytes: None,
        }
    }
}
