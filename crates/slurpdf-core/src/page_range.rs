//! Contiguous 1-based page ranges.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::PdfError;

/// An inclusive, 1-based range of pages.
///
/// [`PageRange::ALL`] (both bounds zero) is a sentinel that resolves to every
/// page of the document. Any other value must satisfy
/// `1 <= start <= end <= page_count` when [resolved](PageRange::resolve).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRange {
    /// First page (1-based).
    pub start: usize,
    /// Last page (1-based, inclusive).
    pub end: usize,
}

impl PageRange {
    /// Sentinel meaning "every page in the document".
    pub const ALL: PageRange = PageRange { start: 0, end: 0 };

    /// Create a range covering `start..=end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a range covering a single page.
    pub fn single(page: usize) -> Self {
        Self {
            start: page,
            end: page,
        }
    }

    /// Returns true for the [`PageRange::ALL`] sentinel.
    pub fn is_all(&self) -> bool {
        *self == Self::ALL
    }

    /// Resolve against a document's page count.
    ///
    /// The sentinel becomes `1..=page_count`. The returned range is 1-based
    /// and inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::InvalidPageRange`] if `start < 1`, `start > end`,
    /// or `end > page_count` (which includes any range over an empty document).
    pub fn resolve(self, page_count: usize) -> Result<RangeInclusive<usize>, PdfError> {
        let range = if self.is_all() {
            PageRange::new(1, page_count)
        } else {
            self
        };
        if range.start < 1 || range.start > range.end || range.end > page_count {
            return Err(PdfError::InvalidPageRange {
                start: range.start,
                end: range.end,
                page_count,
            });
        }
        Ok(range.start..=range.end)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            f.write_str("all")
        } else if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Parses `"N"`, `"N-M"`, or `"all"`.
///
/// Only syntax is checked here; bounds are checked by [`PageRange::resolve`].
impl FromStr for PageRange {
    type Err = PdfError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("all") {
            return Ok(PageRange::ALL);
        }

        let parse = |s: &str| -> Result<usize, PdfError> {
            s.trim()
                .parse()
                .map_err(|_| PdfError::Other(format!("invalid page number: '{s}'")))
        };

        match input.split_once('-') {
            Some((start_str, end_str)) => {
                let start = parse(start_str)?;
                let end = parse(end_str)?;
                if start == 0 || end == 0 {
                    return Err(PdfError::Other(
                        "page 0 is invalid (pages start at 1)".to_string(),
                    ));
                }
                Ok(PageRange::new(start, end))
            }
            None => {
                let page = parse(input)?;
                if page == 0 {
                    return Err(PdfError::Other(
                        "page 0 is invalid (pages start at 1)".to_string(),
                    ));
                }
                Ok(PageRange::single(page))
            }
        }
    }
}
