//! slurpdf-parse: PDF backend, content stream tokenizer, and text interpreter.
//!
//! Layer 1 is the [`PdfBackend`] trait and its lopdf implementation. Layer 2
//! turns a page's content stream into text: the [`tokenizer`] feeds an
//! [`OperandStack`], the [`interpreter`] evaluates the text operators, and
//! fonts resolved into the [`FontCache`] decide how string bytes become
//! Unicode.

pub mod backend;
pub mod cmap;
pub mod encoding;
pub mod error;
pub mod font;
pub mod font_cache;
pub mod interpreter;
pub mod lopdf_backend;
pub mod operand_stack;
pub mod tokenizer;

pub use backend::PdfBackend;
pub use cmap::CMap;
pub use encoding::{BaseEncoding, SimpleEncoding, glyph_name_to_char};
pub use error::BackendError;
pub use font::{FontDecoder, FontHandle, TextEncoding};
pub use font_cache::FontCache;
pub use interpreter::{InterpreterState, interpret_content_stream};
pub use lopdf_backend::{LopdfBackend, LopdfDocument, LopdfPage};
pub use operand_stack::{OperandStack, OperatorArgs};
pub use slurpdf_core;
pub use tokenizer::{Operand, scan};
