//! Simple (single-byte) font encodings.
//!
//! Covers the base encodings a font's `/Encoding` entry can name
//! (`WinAnsiEncoding`, `MacRomanEncoding`, `StandardEncoding`, and
//! `PDFDocEncoding`) and `/Differences` overrides resolved through glyph
//! names.

/// A named base encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEncoding {
    /// Adobe StandardEncoding, the default for Type 1 fonts.
    Standard,
    /// WinAnsiEncoding (Windows code page 1252).
    WinAnsi,
    /// MacRomanEncoding (Classic Mac OS Roman).
    MacRoman,
    /// PDFDocEncoding, used for text strings outside content streams.
    PdfDoc,
}

impl BaseEncoding {
    /// Resolve an `/Encoding` or `/BaseEncoding` name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StandardEncoding" => Some(BaseEncoding::Standard),
            "WinAnsiEncoding" => Some(BaseEncoding::WinAnsi),
            "MacRomanEncoding" => Some(BaseEncoding::MacRoman),
            "PDFDocEncoding" => Some(BaseEncoding::PdfDoc),
            _ => None,
        }
    }

    /// Build the 256-entry code table for this encoding.
    fn table(self) -> [Option<char>; 256] {
        match self {
            BaseEncoding::Standard => std::array::from_fn(|code| standard_char(code as u8)),
            BaseEncoding::PdfDoc => std::array::from_fn(|code| pdf_doc_char(code as u8)),
            BaseEncoding::WinAnsi => single_byte_table(encoding_rs::WINDOWS_1252),
            BaseEncoding::MacRoman => single_byte_table(encoding_rs::MACINTOSH),
        }
    }
}

/// Decode all 256 byte values through a single-byte `encoding_rs` encoding.
///
/// Bytes that decode to C1 control characters are left unmapped; in
/// WinAnsi those are the undefined code points.
fn single_byte_table(encoding: &'static encoding_rs::Encoding) -> [Option<char>; 256] {
    let bytes: [u8; 256] = std::array::from_fn(|b| b as u8);
    let (text, _) = encoding.decode_without_bom_handling(&bytes);
    let mut table = [None; 256];
    for (slot, ch) in table.iter_mut().zip(text.chars()) {
        if !('\u{80}'..='\u{9F}').contains(&ch) {
            *slot = Some(ch);
        }
    }
    table
}

/// A single-byte encoding: a base table with optional `/Differences`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleEncoding {
    table: [Option<char>; 256],
}

impl SimpleEncoding {
    /// The table of a named base encoding.
    pub fn new(base: BaseEncoding) -> Self {
        Self { table: base.table() }
    }

    /// Override codes from a `/Differences` array, already flattened into
    /// `(code, glyph name)` pairs.
    ///
    /// Glyph names that cannot be resolved unmap the code, so that decoding
    /// falls back to the raw byte instead of the base encoding's glyph.
    pub fn with_differences<'a>(
        mut self,
        differences: impl IntoIterator<Item = (u8, &'a str)>,
    ) -> Self {
        for (code, name) in differences {
            self.table[code as usize] = glyph_name_to_char(name);
        }
        self
    }

    /// Look up a single code.
    pub fn decode(&self, code: u8) -> Option<char> {
        self.table[code as usize]
    }
}

/// Resolve a glyph name to its Unicode character.
///
/// Accepts `uniXXXX`, `uXXXX` to `uXXXXXX`, single ASCII letters, and the
/// common Adobe glyph names. A `.suffix` variant (e.g. `a.sc`) resolves
/// through its base name.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    let name = match name.split_once('.') {
        Some((base, _)) if !base.is_empty() => base,
        _ => name,
    };

    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() == 4 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }

    if let [b] = name.as_bytes() {
        if b.is_ascii_alphabetic() {
            return Some(*b as char);
        }
    }

    GLYPH_NAMES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|i| GLYPH_NAMES[i].1)
}

fn standard_char(code: u8) -> Option<char> {
    let ch = match code {
        0x27 => '\u{2019}',
        0x60 => '\u{2018}',
        0x20..=0x7E => code as char,
        0xA1 => '\u{00A1}',
        0xA2 => '\u{00A2}',
        0xA3 => '\u{00A3}',
        0xA4 => '\u{2044}',
        0xA5 => '\u{00A5}',
        0xA6 => '\u{0192}',
        0xA7 => '\u{00A7}',
        0xA8 => '\u{00A4}',
        0xA9 => '\'',
        0xAA => '\u{201C}',
        0xAB => '\u{00AB}',
        0xAC => '\u{2039}',
        0xAD => '\u{203A}',
        0xAE => '\u{FB01}',
        0xAF => '\u{FB02}',
        0xB1 => '\u{2013}',
        0xB2 => '\u{2020}',
        0xB3 => '\u{2021}',
        0xB4 => '\u{00B7}',
        0xB6 => '\u{00B6}',
        0xB7 => '\u{2022}',
        0xB8 => '\u{201A}',
        0xB9 => '\u{201E}',
        0xBA => '\u{201D}',
        0xBB => '\u{00BB}',
        0xBC => '\u{2026}',
        0xBD => '\u{2030}',
        0xBF => '\u{00BF}',
        0xC1 => '`',
        0xC2 => '\u{00B4}',
        0xC3 => '\u{02C6}',
        0xC4 => '\u{02DC}',
        0xC5 => '\u{00AF}',
        0xC6 => '\u{02D8}',
        0xC7 => '\u{02D9}',
        0xC8 => '\u{00A8}',
        0xCA => '\u{02DA}',
        0xCB => '\u{00B8}',
        0xCD => '\u{02DD}',
        0xCE => '\u{02DB}',
        0xCF => '\u{02C7}',
        0xD0 => '\u{2014}',
        0xE1 => '\u{00C6}',
        0xE3 => '\u{00AA}',
        0xE8 => '\u{0141}',
        0xE9 => '\u{00D8}',
        0xEA => '\u{0152}',
        0xEB => '\u{00BA}',
        0xF1 => '\u{00E6}',
        0xF5 => '\u{0131}',
        0xF8 => '\u{0142}',
        0xF9 => '\u{00F8}',
        0xFA => '\u{0153}',
        0xFB => '\u{00DF}',
        _ => return None,
    };
    Some(ch)
}

fn pdf_doc_char(code: u8) -> Option<char> {
    let ch = match code {
        0x18 => '\u{02D8}',
        0x19 => '\u{02C7}',
        0x1A => '\u{02C6}',
        0x1B => '\u{02D9}',
        0x1C => '\u{02DD}',
        0x1D => '\u{02DB}',
        0x1E => '\u{02DA}',
        0x1F => '\u{02DC}',
        0x7F | 0x9F => return None,
        0x80 => '\u{2022}',
        0x81 => '\u{2020}',
        0x82 => '\u{2021}',
        0x83 => '\u{2026}',
        0x84 => '\u{2014}',
        0x85 => '\u{2013}',
        0x86 => '\u{0192}',
        0x87 => '\u{2044}',
        0x88 => '\u{2039}',
        0x89 => '\u{203A}',
        0x8A => '\u{2212}',
        0x8B => '\u{2030}',
        0x8C => '\u{201E}',
        0x8D => '\u{201C}',
        0x8E => '\u{201D}',
        0x8F => '\u{2018}',
        0x90 => '\u{2019}',
        0x91 => '\u{201A}',
        0x92 => '\u{2122}',
        0x93 => '\u{FB01}',
        0x94 => '\u{FB02}',
        0x95 => '\u{0141}',
        0x96 => '\u{0152}',
        0x97 => '\u{0160}',
        0x98 => '\u{0178}',
        0x99 => '\u{017D}',
        0x9A => '\u{0131}',
        0x9B => '\u{0142}',
        0x9C => '\u{0153}',
        0x9D => '\u{0161}',
        0x9E => '\u{017E}',
        0xA0 => '\u{20AC}',
        // Remaining codes coincide with Latin-1.
        _ => code as char,
    };
    Some(ch)
}

/// Adobe glyph names, sorted by byte order for binary search.
static GLYPH_NAMES: &[(&str, char)] = &[
    ("AE", '\u{00C6}'),
    ("Aacute", '\u{00C1}'),
    ("Acircumflex", '\u{00C2}'),
    ("Adieresis", '\u{00C4}'),
    ("Agrave", '\u{00C0}'),
    ("Aring", '\u{00C5}'),
    ("Atilde", '\u{00C3}'),
    ("Ccedilla", '\u{00C7}'),
    ("Eacute", '\u{00C9}'),
    ("Ecircumflex", '\u{00CA}'),
    ("Edieresis", '\u{00CB}'),
    ("Egrave", '\u{00C8}'),
    ("Eth", '\u{00D0}'),
    ("Euro", '\u{20AC}'),
    ("Iacute", '\u{00CD}'),
    ("Icircumflex", '\u{00CE}'),
    ("Idieresis", '\u{00CF}'),
    ("Igrave", '\u{00CC}'),
    ("Lslash", '\u{0141}'),
    ("Ntilde", '\u{00D1}'),
    ("OE", '\u{0152}'),
    ("Oacute", '\u{00D3}'),
    ("Ocircumflex", '\u{00D4}'),
    ("Odieresis", '\u{00D6}'),
    ("Ograve", '\u{00D2}'),
    ("Oslash", '\u{00D8}'),
    ("Otilde", '\u{00D5}'),
    ("Scaron", '\u{0160}'),
    ("Thorn", '\u{00DE}'),
    ("Uacute", '\u{00DA}'),
    ("Ucircumflex", '\u{00DB}'),
    ("Udieresis", '\u{00DC}'),
    ("Ugrave", '\u{00D9}'),
    ("Yacute", '\u{00DD}'),
    ("Ydieresis", '\u{0178}'),
    ("Zcaron", '\u{017D}'),
    ("aacute", '\u{00E1}'),
    ("acircumflex", '\u{00E2}'),
    ("acute", '\u{00B4}'),
    ("adieresis", '\u{00E4}'),
    ("ae", '\u{00E6}'),
    ("agrave", '\u{00E0}'),
    ("ampersand", '&'),
    ("aring", '\u{00E5}'),
    ("asciicircum", '^'),
    ("asciitilde", '~'),
    ("asterisk", '*'),
    ("at", '@'),
    ("atilde", '\u{00E3}'),
    ("backslash", '\u{005C}'),
    ("bar", '|'),
    ("braceleft", '{'),
    ("braceright", '}'),
    ("bracketleft", '['),
    ("bracketright", ']'),
    ("breve", '\u{02D8}'),
    ("brokenbar", '\u{00A6}'),
    ("bullet", '\u{2022}'),
    ("caron", '\u{02C7}'),
    ("ccedilla", '\u{00E7}'),
    ("cedilla", '\u{00B8}'),
    ("cent", '\u{00A2}'),
    ("circumflex", '\u{02C6}'),
    ("colon", ':'),
    ("comma", ','),
    ("copyright", '\u{00A9}'),
    ("currency", '\u{00A4}'),
    ("dagger", '\u{2020}'),
    ("daggerdbl", '\u{2021}'),
    ("degree", '\u{00B0}'),
    ("dieresis", '\u{00A8}'),
    ("divide", '\u{00F7}'),
    ("dollar", '$'),
    ("dotaccent", '\u{02D9}'),
    ("dotlessi", '\u{0131}'),
    ("eacute", '\u{00E9}'),
    ("ecircumflex", '\u{00EA}'),
    ("edieresis", '\u{00EB}'),
    ("egrave", '\u{00E8}'),
    ("eight", '8'),
    ("ellipsis", '\u{2026}'),
    ("emdash", '\u{2014}'),
    ("endash", '\u{2013}'),
    ("equal", '='),
    ("eth", '\u{00F0}'),
    ("exclam", '!'),
    ("exclamdown", '\u{00A1}'),
    ("ff", '\u{FB00}'),
    ("ffi", '\u{FB03}'),
    ("ffl", '\u{FB04}'),
    ("fi", '\u{FB01}'),
    ("five", '5'),
    ("fl", '\u{FB02}'),
    ("florin", '\u{0192}'),
    ("four", '4'),
    ("fraction", '\u{2044}'),
    ("germandbls", '\u{00DF}'),
    ("grave", '`'),
    ("greater", '>'),
    ("guillemotleft", '\u{00AB}'),
    ("guillemotright", '\u{00BB}'),
    ("guilsinglleft", '\u{2039}'),
    ("guilsinglright", '\u{203A}'),
    ("hungarumlaut", '\u{02DD}'),
    ("hyphen", '-'),
    ("iacute", '\u{00ED}'),
    ("icircumflex", '\u{00EE}'),
    ("idieresis", '\u{00EF}'),
    ("igrave", '\u{00EC}'),
    ("less", '<'),
    ("logicalnot", '\u{00AC}'),
    ("lslash", '\u{0142}'),
    ("macron", '\u{00AF}'),
    ("minus", '\u{2212}'),
    ("mu", '\u{00B5}'),
    ("multiply", '\u{00D7}'),
    ("nbspace", '\u{00A0}'),
    ("nine", '9'),
    ("ntilde", '\u{00F1}'),
    ("numbersign", '#'),
    ("oacute", '\u{00F3}'),
    ("ocircumflex", '\u{00F4}'),
    ("odieresis", '\u{00F6}'),
    ("oe", '\u{0153}'),
    ("ogonek", '\u{02DB}'),
    ("ograve", '\u{00F2}'),
    ("one", '1'),
    ("onehalf", '\u{00BD}'),
    ("onequarter", '\u{00BC}'),
    ("onesuperior", '\u{00B9}'),
    ("ordfeminine", '\u{00AA}'),
    ("ordmasculine", '\u{00BA}'),
    ("oslash", '\u{00F8}'),
    ("otilde", '\u{00F5}'),
    ("paragraph", '\u{00B6}'),
    ("parenleft", '('),
    ("parenright", ')'),
    ("percent", '%'),
    ("period", '.'),
    ("periodcentered", '\u{00B7}'),
    ("perthousand", '\u{2030}'),
    ("plus", '+'),
    ("plusminus", '\u{00B1}'),
    ("question", '?'),
    ("questiondown", '\u{00BF}'),
    ("quotedbl", '"'),
    ("quotedblbase", '\u{201E}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("quoteleft", '\u{2018}'),
    ("quoteright", '\u{2019}'),
    ("quotesinglbase", '\u{201A}'),
    ("quotesingle", '\u{0027}'),
    ("registered", '\u{00AE}'),
    ("ring", '\u{02DA}'),
    ("scaron", '\u{0161}'),
    ("section", '\u{00A7}'),
    ("semicolon", ';'),
    ("seven", '7'),
    ("sfthyphen", '\u{00AD}'),
    ("six", '6'),
    ("slash", '/'),
    ("space", '\u{0020}'),
    ("sterling", '\u{00A3}'),
    ("thorn", '\u{00FE}'),
    ("three", '3'),
    ("threequarters", '\u{00BE}'),
    ("threesuperior", '\u{00B3}'),
    ("tilde", '\u{02DC}'),
    ("trademark", '\u{2122}'),
    ("two", '2'),
    ("twosuperior", '\u{00B2}'),
    ("uacute", '\u{00FA}'),
    ("ucircumflex", '\u{00FB}'),
    ("udieresis", '\u{00FC}'),
    ("ugrave", '\u{00F9}'),
    ("underscore", '_'),
    ("yacute", '\u{00FD}'),
    ("ydieresis", '\u{00FF}'),
    ("yen", '\u{00A5}'),
    ("zcaron", '\u{017E}'),
    ("zero", '0'),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_table_is_sorted() {
        assert!(GLYPH_NAMES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn base_encoding_names() {
        assert_eq!(
            BaseEncoding::from_name("WinAnsiEncoding"),
            Some(BaseEncoding::WinAnsi)
        );
        assert_eq!(
            BaseEncoding::from_name("PDFDocEncoding"),
            Some(BaseEncoding::PdfDoc)
        );
        assert_eq!(BaseEncoding::from_name("Identity-H"), None);
    }

    #[test]
    fn win_ansi_extended_characters() {
        let enc = SimpleEncoding::new(BaseEncoding::WinAnsi);
        assert_eq!(enc.decode(b'A'), Some('A'));
        assert_eq!(enc.decode(0x80), Some('\u{20AC}'));
        assert_eq!(enc.decode(0x93), Some('\u{201C}'));
        assert_eq!(enc.decode(0xE9), Some('é'));
    }

    #[test]
    fn win_ansi_undefined_codes_are_unmapped() {
        let enc = SimpleEncoding::new(BaseEncoding::WinAnsi);
        assert_eq!(enc.decode(0x81), None);
        assert_eq!(enc.decode(0x9D), None);
    }

    #[test]
    fn mac_roman_extended_characters() {
        let enc = SimpleEncoding::new(BaseEncoding::MacRoman);
        assert_eq!(enc.decode(0x8E), Some('é'));
        assert_eq!(enc.decode(0xA5), Some('\u{2022}'));
    }

    #[test]
    fn standard_encoding_quotes_and_ligatures() {
        let enc = SimpleEncoding::new(BaseEncoding::Standard);
        assert_eq!(enc.decode(b'a'), Some('a'));
        assert_eq!(enc.decode(0x27), Some('\u{2019}'));
        assert_eq!(enc.decode(0xAE), Some('\u{FB01}'));
        assert_eq!(enc.decode(0xB0), None);
        assert_eq!(enc.decode(0x0A), None);
    }

    #[test]
    fn pdf_doc_encoding_specials() {
        let enc = SimpleEncoding::new(BaseEncoding::PdfDoc);
        assert_eq!(enc.decode(0xA0), Some('\u{20AC}'));
        assert_eq!(enc.decode(0x92), Some('\u{2122}'));
        assert_eq!(enc.decode(0xE9), Some('é'));
        assert_eq!(enc.decode(0x9F), None);
    }

    #[test]
    fn differences_override_base() {
        let enc = SimpleEncoding::new(BaseEncoding::WinAnsi)
            .with_differences([(0x41, "Euro"), (0x42, "uni03B1"), (0x43, "bogus")]);
        assert_eq!(enc.decode(0x41), Some('\u{20AC}'));
        assert_eq!(enc.decode(0x42), Some('\u{03B1}'));
        assert_eq!(enc.decode(0x43), None);
        assert_eq!(enc.decode(0x44), Some('D'));
    }

    #[test]
    fn glyph_name_forms() {
        assert_eq!(glyph_name_to_char("space"), Some(' '));
        assert_eq!(glyph_name_to_char("eacute"), Some('é'));
        assert_eq!(glyph_name_to_char("uni20AC"), Some('\u{20AC}'));
        assert_eq!(glyph_name_to_char("u1F600"), Some('\u{1F600}'));
        assert_eq!(glyph_name_to_char("Q"), Some('Q'));
        assert_eq!(glyph_name_to_char("a.sc"), Some('a'));
        assert_eq!(glyph_name_to_char("fi"), Some('\u{FB01}'));
        assert_eq!(glyph_name_to_char("g123"), None);
        assert_eq!(glyph_name_to_char("uniZZZZ"), None);
    }
}
