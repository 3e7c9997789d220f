//! Hierarchical accessor: typed, `/`-separated path reads over the active
//! document.
//!
//! # Path resolution
//!
//! `"Primary/energy"` is split on `/` and walked from the root object. A
//! missing key fails the lookup immediately. Objects are descended into; as
//! soon as a non-object value is reached it *is* the match, even if segments
//! remain (those are ignored). So with `{"Run": {"Seed": 7}}`, both
//! `"Run/Seed"` and `"Run/Seed/anything"` resolve to `7`. Empty segments are
//! skipped, and the empty path resolves to the root.
//!
//! # Scalar getters
//!
//! Fail with [`ConfigError::KeyNotFound`] or [`ConfigError::TypeMismatch`].
//! Integer getters truncate toward zero (`12.9` → `12`, `-3.7` → `-3`).
//!
//! # Array getters
//!
//! Clear `out`, then append elements in order. The first element of the wrong
//! kind stops the fill: the call returns `Ok(0)` and `out` keeps the elements
//! appended before it. Callers compare the returned count with the length they
//! expect.

use crate::error::{ConfigError, Result};
use crate::registry::Registry;
use crate::render::render_tree;
use crate::types::Value;

/// Walk `path` from `root`. See the module docs for the truncation rule.
pub fn resolve<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    let mut current = root;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if !current.is_object() {
            break;
        }
        current = current.get(segment)?;
    }
    Some(current)
}

/// Read-only view of a [`Registry`]'s active document.
#[derive(Debug, Clone, Copy)]
pub struct Accessor<'r> {
    registry: &'r Registry,
}

impl<'r> Accessor<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, path: &str) -> Option<&'r Value> {
        let root = self.registry.active_tree().ok()?;
        resolve(root, path)
    }

    /// `true` iff `path` resolves. Never fails, also not without an active
    /// document.
    pub fn contains(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    pub fn get_bool(&self, path: &str) -> Result<bool> {
        self.scalar(path, "bool", Value::as_bool)
    }

    pub fn get_int(&self, path: &str) -> Result<i32> {
        self.scalar(path, "number", |v| v.as_f64().map(|n| n as i32))
    }

    pub fn get_long(&self, path: &str) -> Result<i64> {
        self.scalar(path, "number", |v| v.as_f64().map(|n| n as i64))
    }

    pub fn get_float(&self, path: &str) -> Result<f32> {
        self.scalar(path, "number", |v| v.as_f64().map(|n| n as f32))
    }

    pub fn get_double(&self, path: &str) -> Result<f64> {
        self.scalar(path, "number", Value::as_f64)
    }

    pub fn get_string(&self, path: &str) -> Result<String> {
        self.scalar(path, "string", |v| v.as_str().map(str::to_string))
    }

    pub fn get_bool_array(&self, path: &str, out: &mut Vec<bool>) -> Result<usize> {
        self.array(path, out, "bool", Value::as_bool)
    }

    pub fn get_int_array(&self, path: &str, out: &mut Vec<i32>) -> Result<usize> {
        self.array(path, out, "number", |v| v.as_f64().map(|n| n as i32))
    }

    pub fn get_long_array(&self, path: &str, out: &mut Vec<i64>) -> Result<usize> {
        self.array(path, out, "number", |v| v.as_f64().map(|n| n as i64))
    }

    pub fn get_float_array(&self, path: &str, out: &mut Vec<f32>) -> Result<usize> {
        self.array(path, out, "number", |v| v.as_f64().map(|n| n as f32))
    }

    pub fn get_double_array(&self, path: &str, out: &mut Vec<f64>) -> Result<usize> {
        self.array(path, out, "number", Value::as_f64)
    }

    pub fn get_string_array(&self, path: &str, out: &mut Vec<String>) -> Result<usize> {
        self.array(path, out, "string", |v| v.as_str().map(str::to_string))
    }

    /// Indented dump of the active document.
    pub fn render_tree(&self) -> Result<String> {
        Ok(render_tree(self.registry.active_tree()?))
    }

    fn lookup(&self, path: &str) -> Result<&'r Value> {
        let root = self.registry.active_tree()?;
        resolve(root, path).ok_or_else(|| ConfigError::KeyNotFound {
            path: path.to_string(),
        })
    }

    fn scalar<T>(
        &self,
        path: &str,
        expected: &'static str,
        extract: impl Fn(&Value) -> Option<T>,
    ) -> Result<T> {
        let value = self.lookup(path)?;
        extract(value).ok_or_else(|| mismatch(path, expected, value))
    }

    fn array<T>(
        &self,
        path: &str,
        out: &mut Vec<T>,
        expected: &'static str,
        extract: impl Fn(&Value) -> Option<T>,
    ) -> Result<usize> {
        let value = self.lookup(path)?;
        let items = value
            .as_array()
            .ok_or_else(|| mismatch(path, "array", value))?;

        out.clear();
        for (index, item) in items.iter().enumerate() {
            match extract(item) {
                Some(converted) => out.push(converted),
                None => {
                    tracing::warn!(
                        path,
                        index,
                        expected,
                        actual = item.kind(),
                        "array element has the wrong type; returning partial result"
                    );
                    return Ok(0);
                }
            }
        }
        Ok(items.len())
    }
}

fn mismatch(path: &str, expected: &'static str, value: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        path: path.to_string(),
        expected,
        actual: value.kind(),
    }
}
