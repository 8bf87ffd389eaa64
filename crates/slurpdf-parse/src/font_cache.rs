//! Name-keyed cache of resolved fonts, shared across the pages of one
//! extraction run.
//!
//! Entries are only ever added. A font is keyed by its resource name alone,
//! so the first page that resolves `F1` decides what `F1` means for every
//! later page in the run.

use std::collections::HashMap;
use std::fmt;

use slurpdf_core::{ExtractWarning, ExtractWarningCode};
use tracing::{debug, warn};

use crate::font::FontHandle;

/// Fonts resolved so far, by resource name.
#[derive(Debug, Clone, Default)]
pub struct FontCache {
    fonts: HashMap<String, FontHandle>,
}

impl FontCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every name in `names` that is not cached yet.
    ///
    /// `lookup` is called once per missing name. `Ok(Some(handle))` is
    /// inserted. `Ok(None)` and `Err(_)` leave the name absent and produce a
    /// [`ExtractWarningCode::MissingFont`] warning; the name is tried again
    /// the next time it is requested.
    pub fn resolve<I, S, F, E>(&mut self, names: I, mut lookup: F) -> Vec<ExtractWarning>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: FnMut(&str) -> Result<Option<FontHandle>, E>,
        E: fmt::Display,
    {
        let mut warnings = Vec::new();
        for name in names {
            let name = name.as_ref();
            if self.fonts.contains_key(name) {
                continue;
            }
            match lookup(name) {
                Ok(Some(handle)) => {
                    debug!(font = name, base_font = ?handle.base_font, "font resolved");
                    self.fonts.insert(name.to_string(), handle);
                }
                Ok(None) => {
                    warn!(font = name, "font resource not found");
                    warnings.push(
                        ExtractWarning::with_code(
                            ExtractWarningCode::MissingFont,
                            format!("font /{name} is not defined in page resources"),
                        )
                        .for_font(name),
                    );
                }
                Err(err) => {
                    warn!(font = name, error = %err, "font could not be loaded");
                    warnings.push(
                        ExtractWarning::with_code(
                            ExtractWarningCode::MissingFont,
                            format!("font /{name} could not be loaded: {err}"),
                        )
                        .for_font(name),
                    );
                }
            }
        }
        warnings
    }

    /// Insert a handle under its own name, replacing any previous entry.
    pub fn insert(&mut self, handle: FontHandle) {
        self.fonts.insert(handle.name.clone(), handle);
    }

    /// The cached handle for `name`.
    pub fn get(&self, name: &str) -> Option<&FontHandle> {
        self.fonts.get(name)
    }

    /// Returns true if `name` is cached.
    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    /// Number of cached fonts.
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Returns true if nothing has been cached.
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Cached names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fonts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
