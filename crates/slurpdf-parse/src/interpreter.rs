//! Content stream interpreter.
//!
//! Walks one page's content stream and recovers its text. Only the
//! text-showing operators (`Tj`, `TJ`, `'`, `"`), font selection (`Tf`) and
//! the next-line operator (`T*`) have an effect; everything else is
//! tokenized and dropped. Malformed operators produce warnings and are
//! skipped, so a single bad operator never costs the rest of the page.

use slurpdf_core::{ExtractOptions, ExtractResult, ExtractWarning, ExtractWarningCode};
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::font::TextEncoding;
use crate::font_cache::FontCache;
use crate::operand_stack::OperatorArgs;
use crate::tokenizer::{self, Operand};

/// Per-page interpreter state.
#[derive(Debug)]
pub struct InterpreterState {
    encoding: TextEncoding,
    text: String,
    warnings: Vec<ExtractWarning>,
    collect_warnings: bool,
}

impl InterpreterState {
    /// Start a page with `default_encoding` selected.
    pub fn new(default_encoding: TextEncoding, collect_warnings: bool) -> Self {
        Self {
            encoding: default_encoding,
            text: String::new(),
            warnings: Vec::new(),
            collect_warnings,
        }
    }

    /// The currently selected encoding.
    pub fn encoding(&self) -> &TextEncoding {
        &self.encoding
    }

    /// Text recovered so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Warnings collected so far.
    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Finish the page.
    pub fn into_result(self) -> ExtractResult<String> {
        ExtractResult::with_warnings(self.text, self.warnings)
    }

    /// Apply one operator with its operands in source order.
    pub fn apply(&mut self, op: &str, args: &OperatorArgs, fonts: &FontCache, index: usize) {
        match op {
            "T*" => self.text.push('\n'),
            "Tf" => self.select_font(args, fonts, index),
            "Tj" | "'" => self.show_string(op, args, 1, 0, index),
            "\"" => self.show_string(op, args, 3, 2, index),
            "TJ" => self.show_array(args, index),
            _ => {}
        }
    }

    fn select_font(&mut self, args: &OperatorArgs, fonts: &FontCache, index: usize) {
        if args.len() != 2 {
            self.malformed("Tf", index, format!("expected 2 operands, got {}", args.len()));
            return;
        }
        let Some(name) = args.name(0) else {
            let kind = args.get(0).map_or("nothing", Operand::kind);
            self.malformed("Tf", index, format!("font operand is a {kind}, not a name"));
            return;
        };

        match fonts.get(name) {
            Some(handle) => {
                debug!(font = name, index, "font selected");
                self.encoding = handle.encoding.clone();
            }
            None => {
                warn!(font = name, index, "Tf selects unknown font, using pass-through");
                self.encoding = TextEncoding::NoOp;
                self.push_warning(
                    ExtractWarning::with_code(
                        ExtractWarningCode::MissingFont,
                        format!("font /{name} not found in cache, text decoded as raw bytes"),
                    )
                    .at_operator(index)
                    .for_font(name),
                );
            }
        }
    }

    fn show_string(
        &mut self,
        op: &str,
        args: &OperatorArgs,
        arity: usize,
        at: usize,
        index: usize,
    ) {
        if args.len() != arity {
            let detail = format!("expected {arity} operand(s), got {}", args.len());
            self.malformed(op, index, detail);
            return;
        }
        match args.string(at) {
            Some(raw) => self.encoding.decode_into(raw, &mut self.text),
            None => {
                let kind = args.get(at).map_or("nothing", Operand::kind);
                self.malformed(op, index, format!("text operand is a {kind}, not a string"));
            }
        }
    }

    fn show_array(&mut self, args: &OperatorArgs, index: usize) {
        if args.len() != 1 {
            self.malformed("TJ", index, format!("expected 1 operand, got {}", args.len()));
            return;
        }
        let Some(items) = args.array(0) else {
            let kind = args.get(0).map_or("nothing", Operand::kind);
            self.malformed("TJ", index, format!("operand is a {kind}, not an array"));
            return;
        };
        // Kerning adjustments carry no text.
        for raw in items.iter().filter_map(Operand::as_bytes) {
            self.encoding.decode_into(raw, &mut self.text);
        }
    }

    fn malformed(&mut self, op: &str, index: usize, detail: String) {
        warn!(operator = op, index, "{detail}");
        self.push_warning(
            ExtractWarning::with_code(
                ExtractWarningCode::MalformedOperator,
                format!("malformed '{op}' operator: {detail}"),
            )
            .at_operator(index),
        );
    }

    fn push_warning(&mut self, warning: ExtractWarning) {
        if self.collect_warnings {
            self.warnings.push(warning);
        }
    }
}

/// Interpret a page's content stream and return its text.
///
/// `fonts` must already hold every font the page declares; `default_encoding`
/// is in effect until the first `Tf`.
///
/// # Errors
///
/// Returns [`BackendError`] if the stream cannot be tokenized or exceeds
/// `options.max_stream_bytes` or `options.max_operators_per_page`.
pub fn interpret_content_stream(
    stream: &[u8],
    fonts: &FontCache,
    default_encoding: TextEncoding,
    options: &ExtractOptions,
) -> Result<ExtractResult<String>, BackendError> {
    if stream.len() > options.max_stream_bytes {
        return Err(BackendError::limit(
            "max_stream_bytes",
            options.max_stream_bytes,
            stream.len(),
        ));
    }

    let mut state = InterpreterState::new(default_encoding, options.collect_warnings);
    let mut index = 0usize;

    tokenizer::scan(stream, |stack, op| {
        if index >= options.max_operators_per_page {
            return Err(BackendError::limit(
                "max_operators_per_page",
                options.max_operators_per_page,
                index + 1,
            ));
        }
        let args = stack.take_args();
        state.apply(op, &args, fonts, index);
        index += 1;
        Ok(())
    })?;

    debug!(operators = index, chars = state.text().len(), "content stream interpreted");
    Ok(state.into_result())
}
