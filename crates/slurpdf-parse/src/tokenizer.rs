//! Content stream tokenizer.
//!
//! Splits raw PDF content stream bytes into operands and operators. Operands
//! are pushed onto an [`OperandStack`]; each operator keyword triggers a
//! callback that receives the stack, mirroring the postfix evaluation model
//! of content streams. Comments are stripped and inline images (BI/ID/EI)
//! are skipped without exposing their binary payload.

use crate::error::BackendError;
use crate::operand_stack::OperandStack;

/// A PDF content stream operand value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer number (e.g., `42`, `-7`).
    Integer(i64),
    /// Real (floating-point) number (e.g., `3.14`, `.5`).
    Real(f64),
    /// Boolean value (`true` or `false`).
    Boolean(bool),
    /// The null object.
    Null,
    /// Name object (e.g., `/F1`). Stored without the leading `/`.
    Name(String),
    /// Literal string delimited by parentheses, stored as raw bytes.
    LiteralString(Vec<u8>),
    /// Hexadecimal string delimited by angle brackets, stored as decoded bytes.
    HexString(Vec<u8>),
    /// Array of operands (e.g., a `TJ` array).
    Array(Vec<Operand>),
    /// Inline dictionary (`<< /Key value >>`), used by marked-content operators.
    Dictionary(Vec<(String, Operand)>),
}

impl Operand {
    /// The name, if this is a name operand.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(name) => Some(name),
            _ => None,
        }
    }

    /// The raw bytes, if this is a literal or hex string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Operand::LiteralString(bytes) | Operand::HexString(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    pub fn as_array(&self) -> Option<&[Operand]> {
        match self {
            Operand::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The numeric value, if this is an integer or real.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Integer(i) => Some(*i as f64),
            Operand::Real(f) => Some(*f),
            _ => None,
        }
    }

    /// Short type label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Integer(_) => "integer",
            Operand::Real(_) => "real",
            Operand::Boolean(_) => "boolean",
            Operand::Null => "null",
            Operand::Name(_) => "name",
            Operand::LiteralString(_) | Operand::HexString(_) => "string",
            Operand::Array(_) => "array",
            Operand::Dictionary(_) => "dictionary",
        }
    }
}

/// Scan a content stream, invoking `on_operator` at every operator keyword.
///
/// The callback receives the operand stack holding every operand read since
/// the previous operator, plus the operator name. Operands the callback
/// leaves on the stack carry over to the next operator.
///
/// # Errors
///
/// Returns [`BackendError::Interpreter`] for malformed streams (unterminated
/// strings, arrays, dictionaries, or inline images; a stray `]`; invalid
/// numbers or hex digits), or any error returned by the callback.
pub fn scan<F>(input: &[u8], mut on_operator: F) -> Result<(), BackendError>
where
    F: FnMut(&mut OperandStack, &str) -> Result<(), BackendError>,
{
    let mut lexer = Lexer::new(input);
    let mut stack = OperandStack::new();

    while let Some(b) = lexer.peek_significant() {
        match b {
            b'(' => {
                let s = lexer.literal_string()?;
                stack.push(Operand::LiteralString(s));
            }
            b'<' if lexer.peek_at(1) == Some(b'<') => {
                let dict = lexer.dictionary()?;
                stack.push(Operand::Dictionary(dict));
            }
            b'<' => {
                let s = lexer.hex_string()?;
                stack.push(Operand::HexString(s));
            }
            b'[' => {
                let arr = lexer.array()?;
                stack.push(Operand::Array(arr));
            }
            b'/' => {
                let name = lexer.name();
                stack.push(Operand::Name(name));
            }
            b'0'..=b'9' | b'+' | b'-' | b'.' => {
                let num = lexer.number()?;
                stack.push(num);
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'*' | b'\'' | b'"' => {
                let keyword = lexer.keyword();
                match keyword.as_str() {
                    "true" => stack.push(Operand::Boolean(true)),
                    "false" => stack.push(Operand::Boolean(false)),
                    "null" => stack.push(Operand::Null),
                    "BI" => {
                        lexer.skip_inline_image()?;
                        on_operator(&mut stack, "BI")?;
                    }
                    op => on_operator(&mut stack, op)?,
                }
            }
            b']' => {
                return Err(BackendError::Interpreter(
                    "unexpected ']' outside array".to_string(),
                ));
            }
            _ => lexer.advance(),
        }
    }

    Ok(())
}

/// Returns `true` if `b` is a PDF whitespace character.
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

/// Returns `true` if `b` is a PDF delimiter character.
fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Convert a hex digit character to its value (0-15).
fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Byte cursor over a content stream.
struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Skip whitespace and comments, then peek at the next byte.
    fn peek_significant(&mut self) -> Option<u8> {
        while let Some(b) = self.peek_at(0) {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while let Some(c) = self.peek_at(0) {
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                    self.pos += 1;
                }
            } else {
                return Some(b);
            }
        }
        None
    }

    /// Parse a literal string `(...)` with balanced parentheses and escapes.
    fn literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek_at(0) {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => self.escape(&mut out)?,
                _ => out.push(b),
            }
        }

        Err(BackendError::Interpreter(
            "unterminated literal string".to_string(),
        ))
    }

    /// Decode the escape sequence following a backslash.
    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), BackendError> {
        let Some(escaped) = self.peek_at(0) else {
            return Err(BackendError::Interpreter(
                "unterminated escape in literal string".to_string(),
            ));
        };
        self.pos += 1;
        match escaped {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            // Line continuation: backslash followed by EOL contributes nothing.
            b'\r' => {
                if self.peek_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut val = u32::from(escaped - b'0');
                for _ in 0..2 {
                    match self.peek_at(0) {
                        Some(d @ b'0'..=b'7') => {
                            val = val * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                // High-order overflow is ignored.
                out.push((val & 0xFF) as u8);
            }
            // `\(`, `\)`, `\\` and unknown escapes yield the character itself.
            other => out.push(other),
        }
        Ok(())
    }

    /// Parse a hex string `<...>`. Whitespace is ignored; an odd final digit
    /// is padded with `0`.
    fn hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut digits = Vec::new();
        loop {
            let Some(b) = self.peek_at(0) else {
                return Err(BackendError::Interpreter(
                    "unterminated hex string".to_string(),
                ));
            };
            self.pos += 1;
            if b == b'>' {
                break;
            }
            if is_whitespace(b) {
                continue;
            }
            let digit = hex_digit(b).ok_or_else(|| {
                BackendError::Interpreter(format!("invalid hex digit: {:?}", b as char))
            })?;
            digits.push(digit);
        }
        if digits.len() % 2 != 0 {
            digits.push(0);
        }
        Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
    }

    /// Parse an array `[...]`, including nested arrays.
    fn array(&mut self) -> Result<Vec<Operand>, BackendError> {
        self.pos += 1;
        let mut elements = Vec::new();
        loop {
            let Some(b) = self.peek_significant() else {
                return Err(BackendError::Interpreter("unterminated array".to_string()));
            };
            if b == b']' {
                self.pos += 1;
                return Ok(elements);
            }
            elements.push(self.value("array")?);
        }
    }

    /// Parse a dictionary `<< /Key value ... >>`.
    fn dictionary(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        self.pos += 2;
        let mut entries = Vec::new();
        loop {
            let Some(b) = self.peek_significant() else {
                return Err(BackendError::Interpreter(
                    "unterminated dictionary".to_string(),
                ));
            };
            if b == b'>' && self.peek_at(1) == Some(b'>') {
                self.pos += 2;
                return Ok(entries);
            }
            if b != b'/' {
                return Err(BackendError::Interpreter(
                    "expected name key in dictionary".to_string(),
                ));
            }
            let key = self.name();
            if self.peek_significant().is_none() {
                return Err(BackendError::Interpreter(
                    "unterminated dictionary value".to_string(),
                ));
            }
            let value = self.value("dictionary")?;
            entries.push((key, value));
        }
    }

    /// Parse one operand nested inside an array or dictionary.
    ///
    /// Bare keywords other than `true`/`false`/`null` are kept as names.
    fn value(&mut self, context: &str) -> Result<Operand, BackendError> {
        let Some(b) = self.peek_at(0) else {
            return Err(BackendError::Interpreter(format!("unterminated {context}")));
        };
        match b {
            b'(' => Ok(Operand::LiteralString(self.literal_string()?)),
            b'<' if self.peek_at(1) == Some(b'<') => Ok(Operand::Dictionary(self.dictionary()?)),
            b'<' => Ok(Operand::HexString(self.hex_string()?)),
            b'[' => Ok(Operand::Array(self.array()?)),
            b'/' => Ok(Operand::Name(self.name())),
            b'0'..=b'9' | b'+' | b'-' | b'.' => self.number(),
            b'a'..=b'z' | b'A'..=b'Z' => Ok(match self.keyword().as_str() {
                "true" => Operand::Boolean(true),
                "false" => Operand::Boolean(false),
                "null" => Operand::Null,
                other => Operand::Name(other.to_string()),
            }),
            _ => Err(BackendError::Interpreter(format!(
                "unexpected byte in {context}: 0x{b:02X}"
            ))),
        }
    }

    /// Parse a `/Name` token, resolving `#XX` escapes.
    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while let Some(b) = self.peek_at(0) {
            if is_whitespace(b) || is_delimiter(b) {
                break;
            }
            self.pos += 1;
        }

        let raw = &self.input[start..self.pos];
        let mut name = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(hi), Some(lo)) = (hex_digit(raw[i + 1]), hex_digit(raw[i + 2])) {
                    name.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            name.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&name).into_owned()
    }

    /// Parse an integer or real number.
    fn number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.peek_at(0), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut has_dot = false;
        while let Some(b) = self.peek_at(0) {
            match b {
                b'.' if !has_dot => has_dot = true,
                b'0'..=b'9' => {}
                _ => break,
            }
            self.pos += 1;
        }

        // The token is ASCII by construction.
        let token = String::from_utf8_lossy(&self.input[start..self.pos]);
        if has_dot {
            token
                .parse::<f64>()
                .map(Operand::Real)
                .map_err(|_| BackendError::Interpreter(format!("invalid real number: {token}")))
        } else {
            token
                .parse::<i64>()
                .map(Operand::Integer)
                .map_err(|_| BackendError::Interpreter(format!("invalid integer: {token}")))
        }
    }

    /// Parse a keyword (alphabetic plus `*`, `'`, `"`).
    fn keyword(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek_at(0) {
            if b.is_ascii_alphanumeric() || b == b'*' || b == b'\'' || b == b'"' {
                self.pos += 1;
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Skip an inline image: dictionary entries up to `ID`, then binary data
    /// up to a whitespace-delimited `EI`. Called after `BI` was consumed.
    fn skip_inline_image(&mut self) -> Result<(), BackendError> {
        loop {
            let Some(b) = self.peek_significant() else {
                return Err(BackendError::Interpreter(
                    "unterminated inline image (missing ID)".to_string(),
                ));
            };
            if b == b'I'
                && self.peek_at(1) == Some(b'D')
                && self.peek_at(2).is_none_or(is_whitespace)
            {
                self.pos += 2;
                if self.peek_at(0).is_some_and(is_whitespace) {
                    self.pos += 1;
                }
                break;
            }
            if b != b'/' {
                return Err(BackendError::Interpreter(
                    "expected name key in inline image dictionary".to_string(),
                ));
            }
            self.name();
            if self.peek_significant().is_none() {
                return Err(BackendError::Interpreter(
                    "unterminated inline image dictionary".to_string(),
                ));
            }
            self.value("inline image dictionary")?;
        }

        let data_start = self.pos;
        while self.pos + 1 < self.input.len() {
            let at_boundary = self.pos == data_start || is_whitespace(self.input[self.pos - 1]);
            if at_boundary
                && self.input[self.pos] == b'E'
                && self.input[self.pos + 1] == b'I'
                && self
                    .peek_at(2)
                    .is_none_or(|b| is_whitespace(b) || is_delimiter(b))
            {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }

        Err(BackendError::Interpreter(
            "unterminated inline image (missing EI)".to_string(),
        ))
    }
}
