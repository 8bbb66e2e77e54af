//! Read-only view over a header set.
//!
//! [`ReadOnlyHttpHeaders`] wraps a handle to an existing header collection
//! (`&HttpHeaders`, `Arc<HttpHeaders>`, `&dyn ReadableHeaders`, ...) without
//! copying it. Plain lookups are forwarded as they are. The parsed
//! `Content-Type` and the parsed `Accept` list are computed on first use and
//! then kept for the lifetime of the view, so the backing collection must not
//! change once it has been wrapped.
//!
//! Through [`HeaderStore`] the view refuses `add`, `set` and `remove` with
//! [`HeaderError::ReadOnly`], and silently ignores
//! [`clear_content_headers`](HeaderStore::clear_content_headers).

use std::ops::Deref;

use once_cell::sync::OnceCell;

use crate::http::error::HeaderError;
use crate::http::headers::{HeaderStore, HttpHeaders, ReadableHeaders};
use crate::http::media_type::MediaType;

#[derive(Debug)]
pub struct ReadOnlyHttpHeaders<S> {
    source: S,
    content_type: OnceCell<Option<MediaType>>,
    accept: OnceCell<Vec<MediaType>>,
}

impl<S> ReadOnlyHttpHeaders<S>
where
    S: Deref,
    S::Target: ReadableHeaders,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            content_type: OnceCell::new(),
            accept: OnceCell::new(),
        }
    }

    /// The parsed `Content-Type`, computed by the backing collection once.
    pub fn content_type(&self) -> Option<&MediaType> {
        self.content_type
            .get_or_init(|| {
                let content_type = self.source.content_type();
                tracing::debug!(content_type = ?content_type, "caching Content-Type");
                content_type
            })
            .as_ref()
    }

    /// The parsed `Accept` list, computed by the backing collection once.
    pub fn accept(&self) -> &[MediaType] {
        self.accept.get_or_init(|| {
            let accept = self.source.accept();
            tracing::debug!(entries = accept.len(), "caching Accept");
            accept
        })
    }

    /// The wrapped collection.
    pub fn source(&self) -> &S::Target {
        &self.source
    }

    /// Copies the headers into a new collection that can be modified.
    ///
    /// The view and its backing collection are left untouched.
    pub fn to_writable(&self) -> HttpHeaders {
        let mut headers = HttpHeaders::new();
        for (name, values) in self.source.iter() {
            for value in values {
                headers.add(name, value);
            }
        }
        headers
    }
}

impl<S> ReadableHeaders for ReadOnlyHttpHeaders<S>
where
    S: Deref,
    S::Target: ReadableHeaders,
{
    fn get(&self, name: &str) -> Option<&[String]> {
        self.source.get(name)
    }

    fn len(&self) -> usize {
        self.source.len()
    }

    fn iter(&self) -> Box<dyn Iterator<Item = (&str, &[String])> + '_> {
        self.source.iter()
    }

    fn content_type(&self) -> Option<MediaType> {
        ReadOnlyHttpHeaders::content_type(self).cloned()
    }

    fn accept(&self) -> Vec<MediaType> {
        ReadOnlyHttpHeaders::accept(self).to_vec()
    }
}

impl<S> HeaderStore for ReadOnlyHttpHeaders<S>
where
    S: Deref,
    S::Target: ReadableHeaders,
{
    fn add(&mut self, name: &str, _value: &str) -> Result<(), HeaderError> {
        Err(HeaderError::ReadOnly {
            operation: "add",
            name: name.to_string(),
        })
    }

    fn set(&mut self, name: &str, _value: &str) -> Result<(), HeaderError> {
        Err(HeaderError::ReadOnly {
            operation: "set",
            name: name.to_string(),
        })
    }

    fn remove(&mut self, name: &str) -> Result<Option<Vec<String>>, HeaderError> {
        Err(HeaderError::ReadOnly {
            operation: "remove",
            name: name.to_string(),
        })
    }

    /// Does nothing. Callers that clear content headers as part of
    /// rewriting a message may do so unconditionally, the view stays as it is.
    fn clear_content_headers(&mut self) {}
}
