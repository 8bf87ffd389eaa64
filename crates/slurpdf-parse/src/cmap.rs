//! ToUnicode CMap parser.
//!
//! CMap programs are PostScript, so they are read with the content stream
//! tokenizer: `endcodespacerange`, `endbfchar` and `endbfrange` act as
//! operators that consume the hex strings pushed before them. Every other
//! keyword (`begincmap`, `def`, `findresource`, ...) just clears the stack.

use std::collections::HashMap;

use crate::error::BackendError;
use crate::tokenizer::{self, Operand};

/// Most codes one `bfrange` entry may map; wider ranges are truncated.
const MAX_BFRANGE_CODES: u32 = 0x1_0000;

/// A byte range of valid codes, all of the same width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodespaceRange {
    width: usize,
    low: u32,
    high: u32,
}

/// A parsed ToUnicode CMap: character codes to Unicode strings.
#[derive(Debug, Clone, Default)]
pub struct CMap {
    mappings: HashMap<u32, String>,
    codespace: Vec<CodespaceRange>,
    /// Width implied by the source codes when no codespace is declared.
    fallback_width: usize,
}

impl CMap {
    /// Parse a ToUnicode CMap from its decoded stream bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Font`] if the CMap program cannot be tokenized.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let mut cmap = CMap::default();
        tokenizer::scan(data, |stack, op| {
            let args = stack.take_args().into_vec();
            match op {
                "endcodespacerange" => cmap.add_codespace(&args),
                "endbfchar" => cmap.add_bfchar(&args),
                "endbfrange" => cmap.add_bfrange(&args),
                _ => {}
            }
            Ok(())
        })
        .map_err(|e| BackendError::Font(format!("invalid ToUnicode CMap: {e}")))?;

        if cmap.fallback_width == 0 {
            cmap.fallback_width = 1;
        }
        Ok(cmap)
    }

    /// Look up the Unicode string for a character code.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    /// Number of mapped codes.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if the CMap maps no codes.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Split the next character code off the front of `bytes`.
    ///
    /// Returns the code and the number of bytes it spans. The width is the
    /// shortest codespace range that contains the leading bytes; without a
    /// matching range it falls back to the width implied by the mappings.
    /// `bytes` must not be empty.
    pub fn next_code(&self, bytes: &[u8]) -> (u32, usize) {
        for width in 1..=bytes.len().min(4) {
            let code = be_code(&bytes[..width]);
            if self
                .codespace
                .iter()
                .any(|r| r.width == width && (r.low..=r.high).contains(&code))
            {
                return (code, width);
            }
        }
        let width = self.fallback_width.clamp(1, bytes.len().max(1));
        (be_code(&bytes[..width]), width)
    }

    fn add_codespace(&mut self, args: &[Operand]) {
        for pair in args.chunks_exact(2) {
            if let (Some(low), Some(high)) = (pair[0].as_bytes(), pair[1].as_bytes()) {
                if !low.is_empty() && low.len() == high.len() && low.len() <= 4 {
                    self.codespace.push(CodespaceRange {
                        width: low.len(),
                        low: be_code(low),
                        high: be_code(high),
                    });
                    self.note_width(low.len());
                }
            }
        }
    }

    fn add_bfchar(&mut self, args: &[Operand]) {
        for pair in args.chunks_exact(2) {
            let (Some(src), Some(dst)) = (pair[0].as_bytes(), pair[1].as_bytes()) else {
                continue;
            };
            if src.is_empty() || src.len() > 4 {
                continue;
            }
            self.note_width(src.len());
            self.mappings.insert(be_code(src), decode_utf16be(dst));
        }
    }

    fn add_bfrange(&mut self, args: &[Operand]) {
        for triple in args.chunks_exact(3) {
            let (Some(low), Some(high)) = (triple[0].as_bytes(), triple[1].as_bytes()) else {
                continue;
            };
            if low.is_empty() || low.len() > 4 {
                continue;
            }
            self.note_width(low.len());
            let (low, high) = (be_code(low), be_code(high));
            if low > high {
                continue;
            }
            let high = high.min(low.saturating_add(MAX_BFRANGE_CODES - 1));

            match &triple[2] {
                Operand::Array(items) => {
                    for (code, item) in (low..=high).zip(items) {
                        if let Some(dst) = item.as_bytes() {
                            self.mappings.insert(code, decode_utf16be(dst));
                        }
                    }
                }
                dst => {
                    let Some(dst) = dst.as_bytes() else {
                        continue;
                    };
                    let base = decode_utf16be(dst);
                    for (offset, code) in (0..).zip(low..=high) {
                        if let Some(mapped) = offset_last_char(&base, offset) {
                            self.mappings.insert(code, mapped);
                        }
                    }
                }
            }
        }
    }

    fn note_width(&mut self, width: usize) {
        if self.fallback_width == 0 {
            self.fallback_width = width;
        }
    }
}

/// Big-endian integer value of up to four bytes.
fn be_code(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0, |acc, &b| (acc << 8) | u32::from(b))
}

/// Decode UTF-16BE, replacing unpaired surrogates. A single byte is read as
/// its own code point.
fn decode_utf16be(bytes: &[u8]) -> String {
    if let [b] = bytes {
        return char::from(*b).to_string();
    }
    let units = bytes
        .chunks(2)
        .map(|c| u16::from_be_bytes([c[0], c.get(1).copied().unwrap_or(0)]));
    char::decode_utf16(units)
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Advance the last character of `base` by `offset` code points.
fn offset_last_char(base: &str, offset: u32) -> Option<String> {
    let last = base.chars().next_back()?;
    let shifted = char::from_u32(u32::from(last).checked_add(offset)?)?;
    let mut out = String::with_capacity(base.len());
    out.push_str(&base[..base.len() - last.len_utf8()]);
    out.push(shifted);
    Some(out)
}
