//! HTTP headers abstraction shared by parsed requests and by callers that
//! build header sets by hand.
//!
//! Headers are stored in an ordered map to preserve insertion order. A name may
//! carry several values (`Accept: a` and `Accept: b` on separate lines), kept in
//! the order they were added. Lookup is ASCII case-insensitive; the spelling
//! used the first time a name was inserted is the one reported back.
//!
//! Two capability traits describe what a holder of a header set may do with it:
//!
//! - [`ReadableHeaders`] covers lookups, iteration and the two structured
//!   values derived from headers (`Content-Type` and `Accept`).
//! - [`HeaderStore`] adds writes on top of it.
//!
//! [`HttpHeaders`] implements both. The read-only view in
//! [`read_only`](crate::http::read_only) implements [`ReadableHeaders`]
//! natively and [`HeaderStore`] only as an adapter that refuses writes.
//!
//! No HTTP semantics are enforced here: names and values are raw strings.

use indexmap::IndexMap;

use crate::http::error::HeaderError;
use crate::http::media_type::MediaType;
use crate::http::read_only::ReadOnlyHttpHeaders;

pub const ACCEPT: &str = "Accept";
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONTENT_LANGUAGE: &str = "Content-Language";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_LOCATION: &str = "Content-Location";
pub const CONTENT_RANGE: &str = "Content-Range";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const HOST: &str = "Host";

/// Headers describing a message body, dropped by
/// [`HeaderStore::clear_content_headers`].
pub const CONTENT_HEADERS: [&str; 7] = [
    CONTENT_DISPOSITION,
    CONTENT_ENCODING,
    CONTENT_LANGUAGE,
    CONTENT_LENGTH,
    CONTENT_LOCATION,
    CONTENT_RANGE,
    CONTENT_TYPE,
];

/// Read access to a header set.
///
/// Implementors provide [`get`](Self::get), [`len`](Self::len) and
/// [`iter`](Self::iter); everything else has a default built on those.
pub trait ReadableHeaders {
    /// All values of `name`, in the order they were added.
    fn get(&self, name: &str) -> Option<&[String]>;

    /// Number of distinct header names.
    fn len(&self) -> usize;

    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &[String])> + '_>;

    fn get_first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn names(&self) -> Vec<&str> {
        self.iter().map(|(name, _)| name).collect()
    }

    /// Copies the headers into a plain map.
    fn to_map(&self) -> IndexMap<String, Vec<String>> {
        self.iter()
            .map(|(name, values)| (name.to_string(), values.to_vec()))
            .collect()
    }

    /// The parsed first `Content-Type` value.
    ///
    /// Absent, empty and unparsable values all yield `None`.
    fn content_type(&self) -> Option<MediaType> {
        let value = self.get_first(CONTENT_TYPE)?;
        if value.trim().is_empty() {
            return None;
        }

        match MediaType::parse(value) {
            Ok(media_type) => Some(media_type),
            Err(err) => {
                tracing::debug!(value, error = %err, "ignoring unparsable Content-Type");
                None
            }
        }
    }

    /// Every media type listed by the `Accept` header(s), in header order.
    ///
    /// Absent or unparsable values yield an empty list.
    fn accept(&self) -> Vec<MediaType> {
        let Some(values) = self.get(ACCEPT) else {
            return Vec::new();
        };

        MediaType::parse_list(values).unwrap_or_else(|err| {
            tracing::debug!(?values, error = %err, "ignoring unparsable Accept");
            Vec::new()
        })
    }
}

/// Write access to a header set.
pub trait HeaderStore: ReadableHeaders {
    /// Appends a value to `name`, keeping existing ones.
    fn add(&mut self, name: &str, value: &str) -> Result<(), HeaderError>;

    /// Replaces every value of `name` with `value`.
    fn set(&mut self, name: &str, value: &str) -> Result<(), HeaderError>;

    fn remove(&mut self, name: &str) -> Result<Option<Vec<String>>, HeaderError>;

    /// Drops every header listed in [`CONTENT_HEADERS`].
    ///
    /// **Read-only implementations ignore this call.** It returns nothing and
    /// cannot fail, so a caller has no way to tell that the content headers
    /// are still there afterwards. Callers that need them gone must own a
    /// writable store.
    fn clear_content_headers(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    // keyed by the ASCII-lowercased name
    headers: IndexMap<String, HeaderEntry>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self {
            headers: IndexMap::new(),
        }
    }

    pub fn add(&mut self, name: &str, value: &str) {
        self.headers
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| HeaderEntry {
                name: name.to_string(),
                values: Vec::new(),
            })
            .values
            .push(value.to_string());
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.headers.get_mut(&name.to_ascii_lowercase()) {
            Some(entry) => entry.values = vec![value.to_string()],
            None => self.add(name, value),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.headers
            .shift_remove(&name.to_ascii_lowercase())
            .map(|entry| entry.values)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.values.as_slice())
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers
            .values()
            .map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    pub fn set_content_type(&mut self, media_type: &MediaType) {
        self.set(CONTENT_TYPE, &media_type.to_string());
    }

    pub fn set_accept(&mut self, media_types: &[MediaType]) {
        let value = media_types
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.set(ACCEPT, &value);
    }

    pub fn clear_content_headers(&mut self) {
        for name in CONTENT_HEADERS {
            self.remove(name);
        }
    }

    /// A read-only view borrowing these headers.
    pub fn read_only(&self) -> ReadOnlyHttpHeaders<&Self> {
        ReadOnlyHttpHeaders::new(self)
    }

    /// Serializes as `Name: value\r\n` lines, one per value.
    pub fn stringify(&self) -> String {
        let mut result = String::new();
        for (name, values) in self.iter() {
            for value in values {
                result.push_str(&format!("{}: {}\r\n", name, value));
            }
        }
        result
    }
}

impl ReadableHeaders for HttpHeaders {
    fn get(&self, name: &str) -> Option<&[String]> {
        HttpHeaders::get(self, name)
    }

    fn len(&self) -> usize {
        HttpHeaders::len(self)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &[String])> + '_> {
        Box::new(HttpHeaders::iter(self))
    }
}

impl HeaderStore for HttpHeaders {
    fn add(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        HttpHeaders::add(self, name, value);
        Ok(())
    }

    fn set(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        HttpHeaders::set(self, name, value);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<Option<Vec<String>>, HeaderError> {
        Ok(HttpHeaders::remove(self, name))
    }

    fn clear_content_headers(&mut self) {
        HttpHeaders::clear_content_headers(self);
    }
}

impl<K, V> FromIterator<(K, V)> for HttpHeaders
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = HttpHeaders::new();
        headers.extend(iter);
        headers
    }
}

impl<K, V> Extend<(K, V)> for HttpHeaders
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.add(name.as_ref(), value.as_ref());
        }
    }
}
