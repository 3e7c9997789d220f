//! Normalizer: converts lenient configuration text into strict JSON text.
//!
//! The lenient format is "JSON as people actually type it in a config file":
//!
//! - `/* block */` and `// line` comments
//! - unquoted keys and unquoted scalar values (`particle: e-`)
//! - entries separated by commas *or* newlines, trailing commas allowed
//! - numeric literals with a leading `+` or `.` (`+3`, `.5`, `-.25`)
//! - values containing colons (`start: 12:30:00`)
//! - single-quoted strings (`'e-'`)
//! - several top-level `{ }` blocks in one file, or bare top-level `key: value`
//!   pairs with no enclosing braces
//!
//! The output is handed to `serde_json`; nothing here builds a value tree.
//!
//! # Pipeline
//!
//! 1. [`strip_comments`]: excise block comments (failing on an unterminated
//!    one), then truncate every line at `//`, turn tabs into spaces and trim
//!    trailing whitespace.
//! 2. `tokenize`: split on `,` and newlines, and cut out `{ } [ ]` as
//!    structural pieces of their own.
//! 3. `emit`: walk the pieces with a nesting stack, classify each text
//!    piece as a `key: value` pair or a bare scalar, repair numbers, quote what
//!    needs quoting and insert commas between adjacent values.
//!
//! # Key design decisions
//!
//! - **Quote-aware scanning**: every pass tracks whether it is inside a quoted
//!   string, so comment markers, commas, braces and colons inside strings are
//!   left alone. This is what makes `normalize` idempotent on strict JSON.
//! - **Single quotes open a string only at a token start** (after `{ [ , :` or
//!   at the start of a line). An apostrophe inside a bare word (`O'Brien`) is
//!   ordinary text.
//! - **Comma insertion is generic**: a comma goes between any value-ending
//!   piece (scalar, `}`, `]`) and any value-starting piece (key, scalar, `{`,
//!   `[`). Repeated top-level blocks therefore come out as `{..},{..}` and are
//!   wrapped in `[ ]`.
//! - **Inside `[ ]` a colon does not split**: `[12:30, 13:00]` is an array of
//!   two strings, not two broken pairs.

use crate::error::{ConfigError, Result};
use std::borrow::Cow;

/// UTF-8 byte-order mark some editors put at the start of a file.
pub(crate) const BOM: char = '\u{feff}';

/// Normalize lenient configuration text into a strict JSON string.
///
/// A leading byte-order mark is dropped. Input that is empty after comment
/// removal normalizes to `{}`.
///
/// # Examples
///
/// ```
/// use confjson_core::normalize;
///
/// let json = normalize("{ Primary: { particle: e-, energy: .5 } // GeV\n }").unwrap();
/// assert_eq!(json, r#"{"Primary":{"particle":"e-","energy":0.5}}"#);
/// ```
pub fn normalize(text: &str) -> Result<String> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let stripped = strip_comments(text)?;
    let pieces = tokenize(&stripped);
    emit(&pieces)
}

// ============================================================================
// Quote tracking
// ============================================================================

/// Tracks whether a left-to-right scan is inside a quoted string.
#[derive(Debug, Default)]
struct QuoteState {
    open: Option<char>,
    escaped: bool,
    /// Last non-whitespace character seen outside a string on this line.
    last: Option<char>,
}

impl QuoteState {
    fn is_outside(&self) -> bool {
        self.open.is_none()
    }

    /// Feed one character. Returns `true` when `c` is outside any string and
    /// is not itself a quote delimiter.
    fn feed(&mut self, c: char) -> bool {
        if c == '\n' {
            *self = QuoteState::default();
            return true;
        }
        match self.open {
            Some(q) => {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == q {
                    self.open = None;
                    self.last = Some(c);
                }
                false
            }
            None => {
                let opens_single = c == '\'' && self.last.is_none_or(|p| "{[,:".contains(p));
                if c == '"' || opens_single {
                    self.open = Some(c);
                    return false;
                }
                if !c.is_whitespace() {
                    self.last = Some(c);
                }
                true
            }
        }
    }
}

/// Byte offset of the first occurrence of `needle` outside any string.
fn find_unquoted(haystack: &str, needle: &str) -> Option<usize> {
    let mut state = QuoteState::default();
    for (i, c) in haystack.char_indices() {
        if state.is_outside() && haystack[i..].starts_with(needle) {
            return Some(i);
        }
        state.feed(c);
    }
    None
}

// ============================================================================
// Pass 1: comments
// ============================================================================

/// Remove block and line comments, replace tabs with spaces and trim
/// trailing whitespace from every line.
pub fn strip_comments(text: &str) -> Result<String> {
    let without_blocks = remove_block_comments(text)?;

    let mut out = String::with_capacity(without_blocks.len());
    for line in without_blocks.lines() {
        let line = line.replace('\t', " ");
        let code = match find_unquoted(&line, "//") {
            Some(idx) => &line[..idx],
            None => &line[..],
        };
        let code = code.trim_end();
        if !code.is_empty() {
            out.push_str(code);
            out.push('\n');
        }
    }
    Ok(out)
}

fn remove_block_comments(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut state = QuoteState::default();
    let mut i = 0;

    while let Some(c) = text[i..].chars().next() {
        if c == '/' && state.is_outside() && text[i..].starts_with("/*") {
            match text[i + 2..].find("*/") {
                Some(end) => {
                    i += 2 + end + 2;
                    continue;
                }
                None => return Err(unterminated_comment(text, i)),
            }
        }
        state.feed(c);
        out.push(c);
        i += c.len_utf8();
    }

    Ok(out)
}

fn unterminated_comment(text: &str, offset: usize) -> ConfigError {
    let line = text[..offset].matches('\n').count() + 1;
    let excerpt = text[offset..].lines().next().unwrap_or_default();
    ConfigError::UnterminatedComment {
        line,
        excerpt: excerpt.trim_end().to_string(),
    }
}

// ============================================================================
// Pass 2: tokenization
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delim {
    Brace,
    Bracket,
}

impl Delim {
    fn open_char(self) -> char {
        match self {
            Delim::Brace => '{',
            Delim::Bracket => '[',
        }
    }

    fn close_char(self) -> char {
        match self {
            Delim::Brace => '}',
            Delim::Bracket => ']',
        }
    }
}

/// One piece of the token stream: a structural opener/closer or a trimmed,
/// non-empty run of content text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'a> {
    Open(Delim),
    Close(Delim),
    Text(&'a str),
}

fn tokenize(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut state = QuoteState::default();
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if !state.feed(c) {
            continue;
        }
        let structural = match c {
            '{' => Some(Piece::Open(Delim::Brace)),
            '}' => Some(Piece::Close(Delim::Brace)),
            '[' => Some(Piece::Open(Delim::Bracket)),
            ']' => Some(Piece::Close(Delim::Bracket)),
            ',' | '\n' => None,
            _ => continue,
        };
        push_text(&mut pieces, &text[start..i]);
        if let Some(piece) = structural {
            pieces.push(piece);
        }
        start = i + c.len_utf8();
    }
    push_text(&mut pieces, &text[start..]);

    pieces
}

fn push_text<'a>(pieces: &mut Vec<Piece<'a>>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        pieces.push(Piece::Text(trimmed));
    }
}

// ============================================================================
// Pass 3: classification and emission
// ============================================================================

/// What the last emitted piece was, which decides whether a comma is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    Opener,
    Key,
    Value,
}

fn emit(pieces: &[Piece<'_>]) -> Result<String> {
    let mut out = String::new();
    let mut stack: Vec<Delim> = Vec::new();
    let mut prev = Prev::Start;
    let mut top_level_values = 0usize;
    let mut top_level_pairs = false;

    for piece in pieces {
        match *piece {
            Piece::Open(delim) => {
                if prev == Prev::Value {
                    out.push(',');
                }
                if stack.is_empty() {
                    top_level_values += 1;
                }
                out.push(delim.open_char());
                stack.push(delim);
                prev = Prev::Opener;
            }
            Piece::Close(delim) => {
                match stack.pop() {
                    Some(open) if open == delim => {}
                    Some(open) => {
                        return Err(ConfigError::UnbalancedStructure {
                            depth: stack.len() as i64 + 1,
                            detail: format!(
                                "`{}` closes `{}`",
                                delim.close_char(),
                                open.open_char()
                            ),
                        });
                    }
                    None => {
                        return Err(ConfigError::UnbalancedStructure {
                            depth: -1,
                            detail: format!("unexpected `{}`", delim.close_char()),
                        });
                    }
                }
                out.push(delim.close_char());
                prev = Prev::Value;
            }
            Piece::Text(text) => {
                if prev == Prev::Value {
                    out.push(',');
                }
                let in_array = stack.last() == Some(&Delim::Bracket);
                let pair = if in_array {
                    None
                } else {
                    find_unquoted(text, ":").map(|idx| (&text[..idx], &text[idx + 1..]))
                };

                match pair {
                    Some((key, value)) => {
                        if stack.is_empty() {
                            top_level_pairs = true;
                        }
                        out.push_str(&quote_key(key.trim()));
                        out.push(':');
                        let value = value.trim();
                        if value.is_empty() {
                            prev = Prev::Key;
                        } else {
                            out.push_str(&scalar(value));
                            prev = Prev::Value;
                        }
                    }
                    None => {
                        if stack.is_empty() {
                            top_level_values += 1;
                        }
                        out.push_str(&scalar(text));
                        prev = Prev::Value;
                    }
                }
            }
        }
    }

    if !stack.is_empty() {
        return Err(ConfigError::UnbalancedStructure {
            depth: stack.len() as i64,
            detail: format!("{} unclosed", describe_unclosed(&stack)),
        });
    }

    if top_level_pairs {
        Ok(format!("{{{out}}}"))
    } else if top_level_values > 1 {
        Ok(format!("[{out}]"))
    } else if out.is_empty() {
        Ok("{}".to_string())
    } else {
        Ok(out)
    }
}

fn describe_unclosed(stack: &[Delim]) -> String {
    stack.iter().map(|d| d.open_char()).collect()
}

/// Quote an object key. Already-quoted keys pass through; single-quoted keys
/// are re-quoted with double quotes.
fn quote_key(key: &str) -> String {
    requote(key).unwrap_or_else(|| json_string(key))
}

/// Render a scalar token as JSON: quoted strings pass through, literals and
/// (repaired) numbers are emitted bare, everything else becomes a string.
fn scalar(token: &str) -> String {
    if let Some(quoted) = requote(token) {
        return quoted;
    }
    if matches!(token, "true" | "false" | "null") {
        return token.to_string();
    }
    match repair_number(token) {
        Some(number) => number.into_owned(),
        None => json_string(token),
    }
}

/// Returns the token as a double-quoted JSON string if it starts with a quote.
fn requote(token: &str) -> Option<String> {
    if token.starts_with('"') {
        return Some(token.to_string());
    }
    let inner = token.strip_prefix('\'')?;
    let inner = inner.strip_suffix('\'').unwrap_or(inner);

    let mut out = String::with_capacity(inner.len() + 2);
    out.push('"');
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push_str("\\\\"),
            },
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    Some(out)
}

fn json_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Numeric repair: drop a leading `+`, add the missing `0` in front of a
/// leading `.` (also after a `-`). Returns `None` when the result is still not
/// a number.
///
/// Strict JSON numbers come back borrowed and untouched. Numbers that only
/// Rust's float parser accepts (`10.`, `007`, `1.e3`) are re-rendered from
/// their `f64` value.
pub fn repair_number(token: &str) -> Option<Cow<'_, str>> {
    let unsigned = token.strip_prefix('+').unwrap_or(token);
    let repaired: Cow<'_, str> = if unsigned.starts_with('.') {
        Cow::Owned(format!("0{unsigned}"))
    } else if let Some(rest) = unsigned.strip_prefix("-.") {
        Cow::Owned(format!("-0.{rest}"))
    } else {
        Cow::Borrowed(unsigned)
    };

    if is_json_number(&repaired) {
        return Some(repaired);
    }

    let plausible = repaired.bytes().any(|b| b.is_ascii_digit())
        && repaired
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !plausible {
        return None;
    }
    let value: f64 = repaired.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let rendered = format!("{value}");
    is_json_number(&rendered).then_some(Cow::Owned(rendered))
}

/// `-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?`
fn is_json_number(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    let digits = |i: &mut usize| {
        let start = *i;
        while *i < b.len() && b[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - start
    };

    if b.get(i) == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        Some(b'0') => i += 1,
        Some(c) if c.is_ascii_digit() => {
            digits(&mut i);
        }
        _ => return false,
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        if digits(&mut i) == 0 {
            return false;
        }
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return false;
        }
    }
    i == b.len()
}
