//! Font handles and the byte-to-Unicode decoders attached to them.

use std::fmt;
use std::sync::Arc;

use crate::cmap::CMap;
use crate::encoding::SimpleEncoding;

/// Byte-to-Unicode mapping for one font.
///
/// Resolution order per character code: the ToUnicode CMap, then the simple
/// encoding (single-byte codes only), then the code itself as a code point.
#[derive(Debug, Clone, Default)]
pub struct FontDecoder {
    to_unicode: Option<CMap>,
    encoding: Option<SimpleEncoding>,
    two_byte_codes: bool,
}

impl FontDecoder {
    /// A decoder that passes every byte through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a ToUnicode CMap. Its codespace decides the code width.
    pub fn with_to_unicode(mut self, cmap: CMap) -> Self {
        self.to_unicode = Some(cmap);
        self
    }

    /// Attach a simple encoding.
    pub fn with_encoding(mut self, encoding: SimpleEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Read codes as big-endian byte pairs when no CMap is present
    /// (composite fonts).
    pub fn with_two_byte_codes(mut self, two_byte: bool) -> Self {
        self.two_byte_codes = two_byte;
        self
    }

    /// Returns true if a ToUnicode CMap is attached.
    pub fn has_to_unicode(&self) -> bool {
        self.to_unicode.is_some()
    }

    /// Decode `raw` and append the text to `out`. Never fails.
    pub fn decode_into(&self, raw: &[u8], out: &mut String) {
        let mut rest = raw;
        while !rest.is_empty() {
            let (code, width) = match &self.to_unicode {
                Some(cmap) => cmap.next_code(rest),
                None if self.two_byte_codes && rest.len() >= 2 => {
                    (u32::from(u16::from_be_bytes([rest[0], rest[1]])), 2)
                }
                None => (u32::from(rest[0]), 1),
            };
            rest = &rest[width..];

            if let Some(text) = self.to_unicode.as_ref().and_then(|c| c.lookup(code)) {
                out.push_str(text);
                continue;
            }
            let simple = match (width, &self.encoding) {
                (1, Some(enc)) => enc.decode(code as u8),
                _ => None,
            };
            out.push(
                simple
                    .or_else(|| char::from_u32(code))
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
            );
        }
    }
}

/// The decoder selected in the interpreter's text state.
#[derive(Debug, Clone, Default)]
pub enum TextEncoding {
    /// Pass-through: each byte becomes the code point of the same value.
    #[default]
    NoOp,
    /// Decode through a font's mapping.
    Font(Arc<FontDecoder>),
}

impl TextEncoding {
    /// Wrap a font decoder.
    pub fn font(decoder: FontDecoder) -> Self {
        TextEncoding::Font(Arc::new(decoder))
    }

    /// Decode raw string bytes to text.
    pub fn decode(&self, raw: &[u8]) -> String {
        let mut out = String::with_capacity(raw.len());
        self.decode_into(raw, &mut out);
        out
    }

    /// Decode raw string bytes, appending to `out`.
    pub fn decode_into(&self, raw: &[u8], out: &mut String) {
        match self {
            TextEncoding::NoOp => out.extend(raw.iter().map(|&b| char::from(b))),
            TextEncoding::Font(decoder) => decoder.decode_into(raw, out),
        }
    }
}

/// Two encodings are equal when both are pass-through or share a decoder.
impl PartialEq for TextEncoding {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TextEncoding::NoOp, TextEncoding::NoOp) => true,
            (TextEncoding::Font(a), TextEncoding::Font(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A font resource resolved for a page.
#[derive(Debug, Clone, PartialEq)]
pub struct FontHandle {
    /// Resource name in the page's `/Font` dictionary (e.g. `F1`).
    pub name: String,
    /// `/BaseFont`, if declared. Informational only.
    pub base_font: Option<String>,
    /// Decoder used when the font is selected with `Tf`.
    pub encoding: TextEncoding,
}

impl FontHandle {
    /// Create a handle without a base font name.
    pub fn new(name: impl Into<String>, encoding: TextEncoding) -> Self {
        Self {
            name: name.into(),
            base_font: None,
            encoding,
        }
    }

    /// Set the base font name.
    pub fn with_base_font(mut self, base_font: impl Into<String>) -> Self {
        self.base_font = Some(base_font.into());
        self
    }
}

impl fmt::Display for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base_font {
            Some(base) => write!(f, "/{} ({base})", self.name),
            None => write!(f, "/{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::BaseEncoding;

    fn to_unicode(body: &str) -> CMap {
        CMap::parse(body.as_bytes()).unwrap()
    }

    #[test]
    fn noop_maps_bytes_to_code_points() {
        assert_eq!(TextEncoding::NoOp.decode(b"Hello"), "Hello");
        assert_eq!(TextEncoding::NoOp.decode(&[0xE9]), "\u{E9}");
        assert_eq!(TextEncoding::NoOp.decode(b""), "");
    }

    #[test]
    fn simple_encoding_decodes_single_bytes() {
        let enc = TextEncoding::font(
            FontDecoder::new().with_encoding(SimpleEncoding::new(BaseEncoding::WinAnsi)),
        );
        assert_eq!(enc.decode(&[b'a', 0x80, 0x96]), "a\u{20AC}\u{2013}");
    }

    #[test]
    fn unmapped_codes_pass_through() {
        let enc = TextEncoding::font(
            FontDecoder::new().with_encoding(SimpleEncoding::new(BaseEncoding::Standard)),
        );
        // 0xB0 is unassigned in StandardEncoding.
        assert_eq!(enc.decode(&[b'x', 0xB0]), "x\u{B0}");
    }

    #[test]
    fn to_unicode_takes_precedence_over_encoding() {
        let decoder = FontDecoder::new()
            .with_to_unicode(to_unicode("1 beginbfchar <41> <03B1> endbfchar"))
            .with_encoding(SimpleEncoding::new(BaseEncoding::WinAnsi));
        assert!(decoder.has_to_unicode());
        let enc = TextEncoding::font(decoder);
        assert_eq!(enc.decode(b"AB"), "\u{03B1}B");
    }

    #[test]
    fn two_byte_cmap_codes() {
        let cmap = to_unicode(
            "1 begincodespacerange <0000> <FFFF> endcodespacerange \
             2 beginbfchar <0001> <0048> <0002> <0069> endbfchar",
        );
        let enc = TextEncoding::font(FontDecoder::new().with_to_unicode(cmap));
        assert_eq!(enc.decode(&[0, 1, 0, 2]), "Hi");
    }

    #[test]
    fn two_byte_codes_without_cmap() {
        let enc = TextEncoding::font(FontDecoder::new().with_two_byte_codes(true));
        assert_eq!(enc.decode(&[0x00, 0x41, 0x4E, 0x2D]), "A\u{4E2D}");
    }

    #[test]
    fn encoding_equality_is_identity() {
        let a = TextEncoding::font(FontDecoder::new());
        let b = TextEncoding::font(FontDecoder::new());
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(a, TextEncoding::NoOp);
        assert_eq!(TextEncoding::default(), TextEncoding::NoOp);
    }

    #[test]
    fn font_handle_display() {
        let handle = FontHandle::new("F1", TextEncoding::NoOp).with_base_font("Helvetica");
        assert_eq!(handle.to_string(), "/F1 (Helvetica)");
        assert_eq!(FontHandle::new("F2", TextEncoding::NoOp).to_string(), "/F2");
    }
}
