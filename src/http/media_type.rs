//! Media types as they appear in `Content-Type` and `Accept` headers.
//!
//! [`MediaType::parse`] accepts `type "/" subtype *( ";" name "=" value )`.
//! Type, subtype and parameter names are lowercased; parameter values are kept
//! verbatim (quoted strings keep their quotes), so `q` and any extension
//! parameters stay opaque to callers that do not care about them.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::http::error::MediaTypeError;

const WILDCARD: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    main_type: String,
    subtype: String,
    parameters: IndexMap<String, String>,
}

impl MediaType {
    pub fn new(main_type: &str, subtype: &str) -> Self {
        Self {
            main_type: main_type.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters: IndexMap::new(),
        }
    }

    pub fn parse(value: &str) -> Result<MediaType, MediaTypeError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(MediaTypeError::Empty);
        }

        let mut segments = split_unquoted(value, ';').into_iter();
        let full_type = segments.next().unwrap_or_default().trim();
        // A lone "*" is what some clients send for "*/*"
        let full_type = if full_type == WILDCARD { "*/*" } else { full_type };

        let (main_type, subtype) = full_type
            .split_once('/')
            .ok_or_else(|| MediaTypeError::MissingSlash(value.to_string()))?;
        let (main_type, subtype) = (main_type.trim(), subtype.trim());
        if !is_token(main_type) || !is_token(subtype) {
            return Err(MediaTypeError::InvalidToken(value.to_string()));
        }
        if main_type == WILDCARD && subtype != WILDCARD {
            return Err(MediaTypeError::WildcardType(value.to_string()));
        }

        let mut parameters = IndexMap::new();
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let invalid = || MediaTypeError::InvalidParameter {
                media_type: value.to_string(),
                parameter: segment.to_string(),
            };
            let (name, raw) = segment.split_once('=').ok_or_else(invalid)?;
            let (name, raw) = (name.trim(), raw.trim());
            if !is_token(name) || !(is_token(raw) || is_quoted(raw)) {
                return Err(invalid());
            }

            let name = name.to_ascii_lowercase();
            if name == "q" {
                check_quality(raw)?;
            }
            parameters.insert(name, raw.to_string());
        }

        Ok(MediaType {
            main_type: main_type.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters,
        })
    }

    /// Parses every comma-separated element of every value, in order.
    ///
    /// Empty elements (`"text/html,,text/plain"`) are skipped. The first
    /// element that fails to parse aborts the whole list.
    pub fn parse_list<I, S>(values: I) -> Result<Vec<MediaType>, MediaTypeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = Vec::new();
        for value in values {
            for element in split_unquoted(value.as_ref(), ',') {
                if element.trim().is_empty() {
                    continue;
                }
                result.push(MediaType::parse(element)?);
            }
        }
        Ok(result)
    }

    pub fn main_type(&self) -> &str {
        &self.main_type
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// `type/subtype` without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.main_type, self.subtype)
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.parameters
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        self.parameters
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// The `q` parameter, or 1.0 when absent.
    pub fn quality(&self) -> f64 {
        self.parameter("q")
            .and_then(|q| q.parse::<f64>().ok())
            .unwrap_or(1.0)
    }

    pub fn is_wildcard_type(&self) -> bool {
        self.main_type == WILDCARD
    }

    /// True for `*` and for structured-syntax wildcards such as `*+json`.
    pub fn is_wildcard_subtype(&self) -> bool {
        self.subtype == WILDCARD || self.subtype.starts_with("*+")
    }

    /// Whether `other` falls within the range described by `self`.
    ///
    /// `text/*` includes `text/plain`, `application/*+xml` includes
    /// `application/atom+xml` as well as `application/xml`. Parameters are
    /// ignored.
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.is_wildcard_type() {
            return true;
        }
        if self.main_type != other.main_type {
            return false;
        }
        if self.subtype == other.subtype || self.subtype == WILDCARD {
            return true;
        }

        match self.subtype.strip_prefix("*+") {
            Some(suffix) => {
                other.subtype == suffix
                    || other
                        .subtype
                        .rsplit_once('+')
                        .is_some_and(|(_, other_suffix)| other_suffix == suffix)
            }
            None => false,
        }
    }
}

impl FromStr for MediaType {
    type Err = MediaTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main_type, self.subtype)?;
        for (name, value) in &self.parameters {
            write!(f, ";{name}={value}")?;
        }
        Ok(())
    }
}

fn check_quality(raw: &str) -> Result<(), MediaTypeError> {
    match raw.parse::<f64>() {
        Ok(q) if (0.0..=1.0).contains(&q) => Ok(()),
        _ => Err(MediaTypeError::InvalidQuality(raw.to_string())),
    }
}

// RFC 9110 tchar
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
                        | b'_' | b'`' | b'|' | b'~'
                )
        })
}

/// A quoted-string whose only unescaped quotes are the opening and closing ones.
fn is_quoted(s: &str) -> bool {
    let Some(inner) = s.strip_prefix('"') else {
        return false;
    };

    let mut escaped = false;
    for (i, c) in inner.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => return i + 1 == inner.len(),
            _ => {}
        }
    }
    false
}

/// Splits on `separator`, ignoring separators inside quoted strings.
fn split_unquoted(value: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            c if c == separator && !in_quotes => {
                parts.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    parts.push(&value[start..]);
    parts
}
