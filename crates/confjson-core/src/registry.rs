//! Document registry: named configuration trees with one active document.
//!
//! A [`Registry`] is an ordinary value: construct one, load documents into it
//! during setup, then hand out `&Registry` (or an [`Accessor`]) to readers.
//! Loading and selecting take `&mut self`, reading takes `&self`, so the
//! "configure first, then read from many threads" discipline is checked by the
//! borrow checker rather than by convention.
//!
//! The name `"default"` is special in exactly one way: loading under it also
//! makes it the active document. The active document is tracked by *name*, so
//! reloading the active name is visible to the very next read.

use crate::accessor::Accessor;
use crate::error::{ConfigError, Result};
use crate::normalizer::{normalize, BOM};
use crate::types::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Loading under this name also activates the document.
pub const DEFAULT_DOCUMENT: &str = "default";

/// A named configuration tree. The root is always an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    name: String,
    root: Value,
    origin: Option<PathBuf>,
}

impl Document {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The file this document was read from; `None` for text loads.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

/// Name → [`Document`] store with a single active document.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    documents: HashMap<String, Document>,
    active: Option<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` and store it under `name`, replacing any earlier document
    /// with that name.
    ///
    /// Unless `raw_mode` is set the text is run through [`normalize`] first;
    /// in raw mode it must already be strict JSON.
    pub fn load_text(&mut self, name: &str, text: &str, raw_mode: bool) -> Result<()> {
        self.load(name, text, raw_mode, None)
    }

    /// Read the whole file at `path` and load it like [`Registry::load_text`].
    pub fn load_file(&mut self, name: &str, path: impl AsRef<Path>, raw_mode: bool) -> Result<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            tracing::warn!(document = name, path = %path.display(), error = %source, "cannot read configuration file");
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.load(name, &text, raw_mode, Some(path.to_path_buf()))
    }

    fn load(&mut self, name: &str, text: &str, raw_mode: bool, origin: Option<PathBuf>) -> Result<()> {
        let root = parse_document(text, raw_mode).inspect_err(|err| {
            tracing::warn!(document = name, error = %err, "configuration load failed");
        })?;

        let activate = name == DEFAULT_DOCUMENT;
        tracing::debug!(
            document = name,
            bytes = text.len(),
            raw_mode,
            activate,
            "loaded configuration document"
        );

        self.documents.insert(
            name.to_string(),
            Document {
                name: name.to_string(),
                root,
                origin,
            },
        );
        if activate {
            self.active = Some(name.to_string());
        }
        Ok(())
    }

    /// Make `name` the active document.
    pub fn select_active(&mut self, name: &str) -> Result<()> {
        if !self.documents.contains_key(name) {
            return Err(ConfigError::UnknownDocument(name.to_string()));
        }
        tracing::debug!(document = name, "selected active configuration document");
        self.active = Some(name.to_string());
        Ok(())
    }

    /// Root of the active document.
    pub fn active_tree(&self) -> Result<&Value> {
        self.active
            .as_deref()
            .and_then(|name| self.documents.get(name))
            .map(Document::root)
            .ok_or(ConfigError::NoActiveDocument)
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn document(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    /// All loaded document names, sorted.
    pub fn document_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.documents.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Typed, path-based reads over the active document.
    pub fn accessor(&self) -> Accessor<'_> {
        Accessor::new(self)
    }
}

/// Normalize (unless raw), parse, and coerce the root into an object.
fn parse_document(text: &str, raw_mode: bool) -> Result<Value> {
    let json = if raw_mode {
        text.strip_prefix(BOM).unwrap_or(text).to_string()
    } else {
        normalize(text)?
    };
    let parsed: serde_json::Value = serde_json::from_str(&json)?;
    into_root_object(Value::from(parsed))
}

/// Several top-level blocks arrive as an array of objects; fold them into one
/// root object in order. On a key clash the first block's value is kept.
fn into_root_object(value: Value) -> Result<Value> {
    match value {
        Value::Object(_) => Ok(value),
        Value::Array(blocks) if blocks.iter().all(Value::is_object) => {
            let mut merged: Vec<(String, Value)> = Vec::new();
            for block in blocks {
                let Value::Object(pairs) = block else {
                    continue;
                };
                for (key, val) in pairs {
                    if !merged.iter().any(|(k, _)| *k == key) {
                        merged.push((key, val));
                    }
                }
            }
            Ok(Value::Object(merged))
        }
        other => Err(ConfigError::Parse {
            diagnostic: format!("top-level value must be an object, found {}", other.kind()),
        }),
    }
}
