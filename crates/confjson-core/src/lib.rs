//! # confjson-core
//!
//! Lenient configuration files → strict JSON → a typed, path-based accessor.
//!
//! Configuration files are written in a forgiving JSON dialect: comments,
//! unquoted keys and values, newline-separated entries, `.5` and `+3` numbers,
//! single-quoted strings. The [`normalizer`] rewrites that text into strict
//! JSON, `serde_json` parses it, and the result is stored as a named
//! [`Document`] in a [`Registry`]. Setup code then reads values by path from
//! the active document through an [`Accessor`].
//!
//! ## Quick start
//!
//! ```rust
//! use confjson_core::Registry;
//!
//! let mut registry = Registry::new();
//! registry
//!     .load_text(
//!         "default",
//!         "{ Primary: { particle: e-, energy: 10. /* GeV */, position: [0, 0, -50] } }",
//!         false,
//!     )
//!     .unwrap();
//!
//! let config = registry.accessor();
//! assert_eq!(config.get_string("Primary/particle").unwrap(), "e-");
//! assert_eq!(config.get_double("Primary/energy").unwrap(), 10.0);
//!
//! let mut position = Vec::new();
//! assert_eq!(config.get_double_array("Primary/position", &mut position).unwrap(), 3);
//! assert!(!config.contains("Primary/direction"));
//! ```
//!
//! ## Modules
//!
//! - [`normalizer`]: lenient text → strict JSON text
//! - [`types`]: the `Value` tree (all numbers `f64`, ordered objects)
//! - [`registry`]: named documents, the `"default"` / active document
//! - [`accessor`]: `/` path resolution and typed getters
//! - [`render`]: indented diagnostic dump
//! - [`error`]: `ConfigError`

pub mod accessor;
pub mod error;
pub mod normalizer;
pub mod registry;
pub mod render;
pub mod types;

pub use accessor::{resolve, Accessor};
pub use error::{ConfigError, Result};
pub use normalizer::normalize;
pub use registry::{Document, Registry, DEFAULT_DOCUMENT};
pub use render::render_tree;
pub use types::Value;
