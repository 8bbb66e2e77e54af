use thiserror::Error;

/// Rejected write on a header collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The collection is a read-only view; entries cannot be changed through it.
    #[error("cannot {operation} header {name:?}: headers are read-only")]
    ReadOnly {
        operation: &'static str,
        name: String,
    },
}

/// Failure to parse a media type such as `text/html;charset=utf-8`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaTypeError {
    #[error("media type must not be empty")]
    Empty,

    #[error("media type {0:?} does not contain '/'")]
    MissingSlash(String),

    #[error("media type {0:?} has an invalid type or subtype token")]
    InvalidToken(String),

    #[error("wildcard type is only legal in '*/*', got {0:?}")]
    WildcardType(String),

    #[error("invalid parameter {parameter:?} in media type {media_type:?}")]
    InvalidParameter {
        media_type: String,
        parameter: String,
    },

    #[error("invalid quality value {0:?}")]
    InvalidQuality(String),
}

/// Failure to read a request head from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("request head is incomplete")]
    Incomplete,

    #[error("request head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    #[error("request target exceeds {limit} bytes")]
    TargetTooLong { limit: usize },

    #[error("more than {limit} header lines")]
    TooManyHeaders { limit: usize },

    #[error("malformed request line {0:?}")]
    MalformedRequestLine(String),

    #[error("unknown method {0:?}")]
    UnknownMethod(String),

    #[error("unsupported HTTP version {0}.{1}")]
    UnsupportedVersion(u8, u8),

    #[error("HTTP/1.1 request without a Host header")]
    MissingHost,

    #[error("malformed header line {0:?}")]
    MalformedHeader(String),

    #[error("request head is not valid UTF-8")]
    InvalidUtf8,
}
