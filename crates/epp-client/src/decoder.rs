//! Path-addressed streaming XML dispatch.
//!
//! A [`Scanner`] is built once from a table of `(path, handler)` pairs and then
//! reused for every document. A path names an element by its ancestry from the
//! document root, for example
//!
//! ```text
//! epp > response > resData > domain:infData > domain:name
//! ```
//!
//! Each segment is matched by resolved namespace URI and local name. The
//! prefixes in a registered path are the canonical ones from
//! [`crate::namespace`] (an unprefixed segment means the EPP core namespace, a
//! `{uri}local` segment names the namespace directly). Prefixes used inside a
//! document are resolved through its own `xmlns` declarations, so a server
//! that binds `urn:ietf:params:xml:ns:domain-1.0` to `d:` still matches.
//!
//! While streaming, the scanner keeps the current element path. On a start tag
//! it runs the start handlers registered for that path with the element's
//! attributes; on the matching end tag it runs the text handlers with the
//! element's trimmed character data. Handlers mutate a caller-owned target in
//! place. Paths nobody registered are skipped, so unknown elements and
//! extensions never cause an error.
//!
//! Malformed XML aborts the scan. A handler that rejects a value (say, an
//! unparsable date) does not: the scan continues so unrelated fields still
//! populate, and the first such failure is returned at the end.

use std::collections::HashMap;
use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use crate::namespace;

/// Handler invoked on a start tag with the element's attributes
pub type StartHandler<T> = fn(&mut T, &Attributes) -> Result<(), FieldError>;

/// Handler invoked on an end tag with the element's character data
pub type TextHandler<T> = fn(&mut T, &str) -> Result<(), FieldError>;

/// Attributes of one start tag, keyed by local name
#[derive(Debug, Default, Clone)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parse an attribute as an integer. A missing attribute yields `None`.
    ///
    /// # Errors
    ///
    /// Returns a `FieldError` if the attribute is present but not a number.
    pub fn get_parsed<N: std::str::FromStr>(&self, name: &str) -> Result<Option<N>, FieldError>
    where
        N::Err: fmt::Display,
    {
        self.get(name)
            .map(|v| {
                v.trim()
                    .parse::<N>()
                    .map_err(|e| FieldError::invalid(v, e.to_string()))
            })
            .transpose()
    }

    /// Interpret an XML schema boolean attribute (`1`/`true`/`0`/`false`).
    ///
    /// # Errors
    ///
    /// Returns a `FieldError` if the attribute is present but not a boolean.
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, FieldError> {
        self.get(name).map(parse_bool).transpose()
    }

    fn push(&mut self, key: String, value: String) {
        self.pairs.push((key, value));
    }
}

/// Parse an XML schema boolean.
///
/// # Errors
///
/// Returns a `FieldError` for anything but `1`, `true`, `0` or `false`.
pub fn parse_bool(value: &str) -> Result<bool, FieldError> {
    match value.trim() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(FieldError::invalid(other, "expected boolean")),
    }
}

/// Rejection of a single value by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub value: String,
    pub reason: String,
}

impl FieldError {
    #[must_use]
    pub fn invalid(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while decoding a document
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("undeclared namespace prefix {0:?}")]
    UnknownPrefix(String),

    #[error("document ended inside <{0}>")]
    UnexpectedEof(String),

    #[error("invalid value {value:?} at {path}: {reason}")]
    Field {
        path: String,
        value: String,
        reason: String,
    },

    #[error("missing required element: {0}")]
    Missing(&'static str),
}

/// Invalid path in a handler table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown namespace prefix {prefix:?} in path {path:?}")]
pub struct PathError {
    pub path: String,
    pub prefix: String,
}

/// Append one `{uri}local` segment to a path key.
fn push_segment(key: &mut String, uri: &str, local: &str) {
    key.push('{');
    key.push_str(uri);
    key.push('}');
    key.push_str(local);
}

/// Turn `epp > response > domain:name` into its lookup key.
fn path_key(path: &str) -> Result<String, PathError> {
    let mut key = String::new();
    for segment in path.split('>').map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(rest) = segment.strip_prefix('{')
            && let Some((uri, local)) = rest.split_once('}')
        {
            push_segment(&mut key, uri, local);
            continue;
        }
        let (uri, local) = match segment.split_once(':') {
            Some((prefix, local)) => {
                let uri = namespace::resolve_prefix(prefix).ok_or_else(|| PathError {
                    path: path.to_string(),
                    prefix: prefix.to_string(),
                })?;
                (uri, local)
            }
            None => (namespace::EPP, segment),
        };
        push_segment(&mut key, uri, local);
    }
    Ok(key)
}

/// Builder for a [`Scanner`] handler table
pub struct ScannerBuilder<T> {
    scanner: Scanner<T>,
    errors: Vec<PathError>,
}

impl<T> ScannerBuilder<T> {
    /// Register a handler for the start tag at `path`.
    pub fn on_start(&mut self, path: &str, handler: StartHandler<T>) -> &mut Self {
        match path_key(path) {
            Ok(key) => self.scanner.start.entry(key).or_default().push(handler),
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Register a handler for the character data of the element at `path`.
    pub fn on_text(&mut self, path: &str, handler: TextHandler<T>) -> &mut Self {
        match path_key(path) {
            Ok(key) => self.scanner.text.entry(key).or_default().push(handler),
            Err(e) => self.errors.push(e),
        }
        self
    }

    /// Finish the table.
    ///
    /// # Errors
    ///
    /// Returns the first `PathError` recorded during registration.
    pub fn build(self) -> Result<Scanner<T>, PathError> {
        match self.errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(self.scanner),
        }
    }
}

/// Read-only dispatch table from element paths to handlers
pub struct Scanner<T> {
    start: HashMap<String, Vec<StartHandler<T>>>,
    text: HashMap<String, Vec<TextHandler<T>>>,
}

impl<T> fmt::Debug for Scanner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("start_paths", &self.start.len())
            .field("text_paths", &self.text.len())
            .finish()
    }
}

/// One open element during a scan
struct Open {
    /// Length of the path key before this element was pushed
    mark: usize,
    local: String,
    text: String,
}

impl<T> Scanner<T> {
    #[must_use]
    pub fn builder() -> ScannerBuilder<T> {
        ScannerBuilder {
            scanner: Scanner {
                start: HashMap::new(),
                text: HashMap::new(),
            },
            errors: Vec::new(),
        }
    }

    /// Stream `input` and run the registered handlers against `target`.
    ///
    /// On error `target` keeps whatever the handlers populated so far.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Xml`/`Utf8`/`UnknownPrefix`/`UnexpectedEof` for a
    /// malformed document (scan aborted), or the first `DecodeError::Field`
    /// raised by a handler (scan completed).
    pub fn scan(&self, input: &[u8], target: &mut T) -> Result<(), DecodeError> {
        let text = std::str::from_utf8(input)?;
        let mut reader = NsReader::from_str(text);

        let mut key = String::new();
        let mut open: Vec<Open> = Vec::new();
        let mut first_field_error: Option<DecodeError> = None;

        loop {
            let position = reader.buffer_position() as u64;
            let (resolved, event) = reader.read_resolved_event().map_err(|e| DecodeError::Xml {
                position,
                message: e.to_string(),
            })?;

            match event {
                Event::Start(e) => {
                    let uri = namespace_of(resolved)?;
                    let attrs = self.enter(&mut key, &mut open, &uri, &e)?;
                    self.dispatch_start(&key, &open, &attrs, target, &mut first_field_error);
                }
                Event::Empty(e) => {
                    let uri = namespace_of(resolved)?;
                    let attrs = self.enter(&mut key, &mut open, &uri, &e)?;
                    self.dispatch_start(&key, &open, &attrs, target, &mut first_field_error);
                    leave(&mut key, &mut open);
                }
                Event::Text(t) => {
                    if let Some(current) = open.last_mut() {
                        let unescaped = t.unescape().map_err(|e| DecodeError::Xml {
                            position,
                            message: e.to_string(),
                        })?;
                        current.text.push_str(&unescaped);
                    }
                }
                Event::CData(c) => {
                    if let Some(current) = open.last_mut() {
                        current.text.push_str(std::str::from_utf8(&c)?);
                    }
                }
                Event::End(_) => {
                    self.dispatch_text(&key, &open, target, &mut first_field_error);
                    leave(&mut key, &mut open);
                }
                Event::Eof => {
                    if let Some(unclosed) = open.last() {
                        return Err(DecodeError::UnexpectedEof(unclosed.local.clone()));
                    }
                    break;
                }
                _ => {}
            }
        }

        match first_field_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Push an element onto the path and collect its attributes.
    #[allow(clippy::unused_self)] // Kept as a method so the scan loop reads uniformly
    fn enter(
        &self,
        key: &mut String,
        open: &mut Vec<Open>,
        uri: &str,
        element: &BytesStart<'_>,
    ) -> Result<Attributes, DecodeError> {
        let local = std::str::from_utf8(element.local_name().into_inner())?.to_string();
        let mark = key.len();
        push_segment(key, uri, &local);
        open.push(Open {
            mark,
            local,
            text: String::new(),
        });

        let mut attrs = Attributes::default();
        for attr in element.attributes() {
            let attr = attr.map_err(|e| DecodeError::Xml {
                position: 0,
                message: e.to_string(),
            })?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let name = std::str::from_utf8(attr.key.local_name().into_inner())?.to_string();
            let value = attr.unescape_value().map_err(|e| DecodeError::Xml {
                position: 0,
                message: e.to_string(),
            })?;
            attrs.push(name, value.into_owned());
        }
        Ok(attrs)
    }

    fn dispatch_start(
        &self,
        key: &str,
        open: &[Open],
        attrs: &Attributes,
        target: &mut T,
        first_error: &mut Option<DecodeError>,
    ) {
        let Some(handlers) = self.start.get(key) else {
            return;
        };
        for handler in handlers {
            if let Err(e) = handler(target, attrs) {
                record(first_error, open, e);
            }
        }
    }

    fn dispatch_text(
        &self,
        key: &str,
        open: &[Open],
        target: &mut T,
        first_error: &mut Option<DecodeError>,
    ) {
        let Some(handlers) = self.text.get(key) else {
            return;
        };
        let Some(current) = open.last() else {
            return;
        };
        let text = current.text.trim();
        if text.is_empty() {
            return;
        }
        for handler in handlers {
            if let Err(e) = handler(target, text) {
                record(first_error, open, e);
            }
        }
    }
}

fn namespace_of(resolved: ResolveResult<'_>) -> Result<String, DecodeError> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(std::str::from_utf8(uri)?.to_string()),
        ResolveResult::Unbound => Ok(String::new()),
        ResolveResult::Unknown(prefix) => Err(DecodeError::UnknownPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
        )),
    }
}

fn leave(key: &mut String, open: &mut Vec<Open>) {
    if let Some(closed) = open.pop() {
        key.truncate(closed.mark);
    }
}

fn record(first_error: &mut Option<DecodeError>, open: &[Open], e: FieldError) {
    tracing::debug!("Rejected value {:?}: {}", e.value, e.reason);
    if first_error.is_none() {
        let path = open
            .iter()
            .map(|o| o.local.as_str())
            .collect::<Vec<_>>()
            .join(" > ");
        *first_error = Some(DecodeError::Field {
            path,
            value: e.value,
            reason: e.reason,
        });
    }
}
