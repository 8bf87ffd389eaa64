//! [`PdfBackend`] on top of [lopdf](https://crates.io/crates/lopdf).
//!
//! lopdf parses objects, follows the cross-reference table, and inflates
//! streams. This module adds page-tree resource inheritance and turns font
//! dictionaries into [`FontHandle`]s.

use lopdf::{Dictionary, Object, ObjectId};
use slurpdf_core::PdfError;
use tracing::{debug, warn};

use crate::backend::PdfBackend;
use crate::cmap::CMap;
use crate::encoding::{BaseEncoding, SimpleEncoding};
use crate::error::BackendError;
use crate::font::{FontDecoder, FontHandle, TextEncoding};

/// A loaded document and its flattened page list.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object IDs, in page order.
    page_ids: Vec<ObjectId>,
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// One page of a [`LopdfDocument`].
#[derive(Debug, Clone, Copy)]
pub struct LopdfPage {
    pub object_id: ObjectId,
    /// 0-based.
    pub index: usize,
}

/// Backend reading documents with lopdf.
///
/// # Example
///
/// ```ignore
/// use slurpdf_parse::{LopdfBackend, PdfBackend};
///
/// let doc = LopdfBackend::open(pdf_bytes)?;
/// let page = LopdfBackend::get_page(&doc, 0)?;
/// let content = LopdfBackend::page_content(&doc, &page)?;
/// ```
pub struct LopdfBackend;

impl PdfBackend for LopdfBackend {
    type Document = LopdfDocument;
    type Page = LopdfPage;
    type Error = BackendError;

    fn open(bytes: &[u8]) -> Result<Self::Document, Self::Error> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("cannot load document: {e}")))?;

        if inner.is_encrypted() {
            return Err(BackendError::Core(PdfError::PasswordRequired));
        }

        // get_pages is keyed by 1-based page number, so values are in order.
        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        debug!(pages = page_ids.len(), "document opened");

        Ok(LopdfDocument { inner, page_ids })
    }

    fn page_count(doc: &Self::Document) -> usize {
        doc.page_ids.len()
    }

    fn get_page(doc: &Self::Document, index: usize) -> Result<Self::Page, Self::Error> {
        let object_id = doc.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} requested, document has {} page(s)",
                doc.page_ids.len()
            ))
        })?;
        Ok(LopdfPage { object_id, index })
    }

    fn page_font_names(
        doc: &Self::Document,
        page: &Self::Page,
    ) -> Result<Vec<String>, Self::Error> {
        let Some(fonts) = page_font_dict(&doc.inner, page.object_id)? else {
            return Ok(Vec::new());
        };
        Ok(fonts
            .iter()
            .map(|(name, _)| String::from_utf8_lossy(name).into_owned())
            .collect())
    }

    fn page_font(
        doc: &Self::Document,
        page: &Self::Page,
        name: &str,
    ) -> Result<Option<FontHandle>, Self::Error> {
        let Some(fonts) = page_font_dict(&doc.inner, page.object_id)? else {
            return Ok(None);
        };
        let Ok(font_obj) = fonts.get(name.as_bytes()) else {
            return Ok(None);
        };
        let font = resolve(&doc.inner, font_obj)?
            .as_dict()
            .map_err(|_| BackendError::Font(format!("font /{name} is not a dictionary")))?;

        Ok(Some(build_font_handle(&doc.inner, name, font)))
    }

    fn page_content(doc: &Self::Document, page: &Self::Page) -> Result<Vec<u8>, Self::Error> {
        let page_dict = resolve_dict(&doc.inner, page.object_id)?;
        get_page_content_bytes(&doc.inner, page_dict)
    }
}

/// Follow an indirect reference, if `obj` is one.
fn resolve<'a>(doc: &'a lopdf::Document, obj: &'a Object) -> Result<&'a Object, BackendError> {
    match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| BackendError::Parse(format!("failed to resolve object {id:?}: {e}"))),
        other => Ok(other),
    }
}

fn resolve_dict(doc: &lopdf::Document, id: ObjectId) -> Result<&Dictionary, BackendError> {
    doc.get_object(id)
        .and_then(|o| o.as_dict())
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))
}

/// Look up a key in the page dictionary, walking up the page tree
/// (via /Parent) if the key is not found on the page itself.
fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    // Bounded so a cyclic /Parent chain cannot loop forever.
    for _ in 0..64 {
        let dict = resolve_dict(doc, current_id)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse(
        "page tree /Parent chain is too deep".to_string(),
    ))
}

/// The page's `/Font` resource dictionary, if any.
fn page_font_dict(
    doc: &lopdf::Document,
    page_id: ObjectId,
) -> Result<Option<&Dictionary>, BackendError> {
    let Some(resources) = resolve_inherited(doc, page_id, b"Resources")? else {
        return Ok(None);
    };
    let resources = resolve(doc, resources)?
        .as_dict()
        .map_err(|_| BackendError::Parse("/Resources is not a dictionary".to_string()))?;
    let Ok(fonts) = resources.get(b"Font") else {
        return Ok(None);
    };
    resolve(doc, fonts)?
        .as_dict()
        .map(Some)
        .map_err(|_| BackendError::Parse("/Font resource is not a dictionary".to_string()))
}

/// Build a font handle from its dictionary.
///
/// Damaged ToUnicode streams or encodings degrade the decoder rather than
/// failing the font.
fn build_font_handle(doc: &lopdf::Document, name: &str, font: &Dictionary) -> FontHandle {
    let base_font = match font.get(b"BaseFont") {
        Ok(Object::Name(n)) => Some(String::from_utf8_lossy(n).into_owned()),
        _ => None,
    };
    let composite = matches!(font.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Type0");

    let mut decoder = FontDecoder::new().with_two_byte_codes(composite);

    if let Ok(obj) = font.get(b"ToUnicode") {
        match load_to_unicode(doc, obj) {
            Ok(cmap) => {
                debug!(font = name, mappings = cmap.len(), "ToUnicode CMap loaded");
                decoder = decoder.with_to_unicode(cmap);
            }
            Err(e) => warn!(font = name, error = %e, "ignoring unreadable ToUnicode CMap"),
        }
    }

    if !composite {
        if let Ok(obj) = font.get(b"Encoding") {
            match simple_encoding(doc, obj) {
                Ok(Some(encoding)) => decoder = decoder.with_encoding(encoding),
                Ok(None) => debug!(font = name, "unrecognized /Encoding, bytes pass through"),
                Err(e) => warn!(font = name, error = %e, "ignoring unreadable /Encoding"),
            }
        }
    }

    let handle = FontHandle::new(name, TextEncoding::font(decoder));
    match base_font {
        Some(base) => handle.with_base_font(base),
        None => handle,
    }
}

fn load_to_unicode(doc: &lopdf::Document, obj: &Object) -> Result<CMap, BackendError> {
    let stream = resolve(doc, obj)?
        .as_stream()
        .map_err(|_| BackendError::Font("/ToUnicode is not a stream".to_string()))?;
    CMap::parse(&decode_stream(stream)?)
}

/// Resolve a simple font's `/Encoding`: a base encoding name, or a
/// dictionary with an optional `/BaseEncoding` (default StandardEncoding)
/// and `/Differences`.
fn simple_encoding(
    doc: &lopdf::Document,
    obj: &Object,
) -> Result<Option<SimpleEncoding>, BackendError> {
    match resolve(doc, obj)? {
        Object::Name(n) => Ok(std::str::from_utf8(n)
            .ok()
            .and_then(BaseEncoding::from_name)
            .map(SimpleEncoding::new)),
        Object::Dictionary(dict) => {
            let base = match dict.get(b"BaseEncoding") {
                Ok(Object::Name(n)) => std::str::from_utf8(n)
                    .ok()
                    .and_then(BaseEncoding::from_name)
                    .unwrap_or(BaseEncoding::Standard),
                _ => BaseEncoding::Standard,
            };
            let differences = match dict.get(b"Differences") {
                Ok(obj) => match resolve(doc, obj)? {
                    Object::Array(items) => parse_differences(items),
                    _ => {
                        return Err(BackendError::Font(
                            "/Differences is not an array".to_string(),
                        ));
                    }
                },
                Err(_) => Vec::new(),
            };
            Ok(Some(SimpleEncoding::new(base).with_differences(
                differences.iter().map(|(code, name)| (*code, name.as_str())),
            )))
        }
        _ => Err(BackendError::Font(
            "/Encoding is neither a name nor a dictionary".to_string(),
        )),
    }
}

/// Flatten `[code name name code name ...]` into `(code, glyph name)` pairs.
fn parse_differences(items: &[Object]) -> Vec<(u8, String)> {
    let mut out = Vec::new();
    let mut code: Option<i64> = None;
    for item in items {
        match item {
            Object::Integer(start) => code = Some(*start),
            Object::Name(name) => {
                if let Some(c) = code {
                    if let Ok(byte) = u8::try_from(c) {
                        out.push((byte, String::from_utf8_lossy(name).into_owned()));
                    }
                    code = c.checked_add(1);
                }
            }
            _ => {}
        }
    }
    out
}

/// Get the content stream bytes from a page dictionary.
///
/// Handles both single stream references and arrays of stream references.
fn get_page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &Dictionary,
) -> Result<Vec<u8>, BackendError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match resolve(doc, contents)? {
        Object::Stream(stream) => decode_stream(stream),
        Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = resolve(doc, item)?.as_stream().map_err(|e| {
                    BackendError::Parse(format!("/Contents array item is not a stream: {e}"))
                })?;
                let bytes = decode_stream(stream)?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&bytes);
            }
            Ok(content)
        }
        _ => Err(BackendError::Parse(
            "/Contents is not a stream or array".to_string(),
        )),
    }
}

/// Decode a stream, decompressing if needed.
fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}
