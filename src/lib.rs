//! Read-only HTTP header views.
//!
//! A [`ReadOnlyHttpHeaders`] wraps an existing header collection and hands out
//! lookups without allowing changes. The two values that need real parsing,
//! `Content-Type` and `Accept`, are parsed on first use and kept for the
//! lifetime of the view.
//!
//! ```
//! use headerview::{HttpHeaders, MediaType, ReadableHeaders};
//!
//! let headers: HttpHeaders = [("Content-Type", "application/json")].into_iter().collect();
//! let view = headers.read_only();
//!
//! assert_eq!(view.content_type(), Some(&MediaType::new("application", "json")));
//! assert_eq!(view.get_first("content-type"), Some("application/json"));
//! ```

pub mod config;
pub mod http;

pub use http::error::{HeaderError, MediaTypeError, ParseError};
pub use http::headers::{HeaderStore, HttpHeaders, ReadableHeaders};
pub use http::media_type::MediaType;
pub use http::read_only::ReadOnlyHttpHeaders;
