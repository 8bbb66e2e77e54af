use serde::Deserialize;

pub mod error;
pub mod headers;
pub mod media_type;
pub mod parser;
pub mod read_only;
pub mod request;

/// Longest method name accepted on a request line
pub const HTTP_METHOD_MAX_LEN: usize = 7;

/// HTTP versions a request line may carry.
/// The highest version the parser accepts is given in its config
/// (see [`max_http_version`](crate::config::ParserConfig::max_http_version))
#[derive(PartialEq, PartialOrd, Debug, Clone, Copy, Deserialize)]
pub enum HttpVersion {
    V1_0,
    V1_1,
}

impl HttpVersion {
    pub fn from_pair(v: (u8, u8)) -> Option<HttpVersion> {
        match v {
            (1, 0) => Some(HttpVersion::V1_0),
            (1, 1) => Some(HttpVersion::V1_1),
            _ => None,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

pub fn http_method_from_str(method: &str) -> Option<HttpMethod> {
    match method {
        "GET" => Some(HttpMethod::Get),
        "HEAD" => Some(HttpMethod::Head),
        "POST" => Some(HttpMethod::Post),
        "PUT" => Some(HttpMethod::Put),
        "DELETE" => Some(HttpMethod::Delete),
        "TRACE" => Some(HttpMethod::Trace),
        "OPTIONS" => Some(HttpMethod::Options),
        "CONNECT" => Some(HttpMethod::Connect),
        "PATCH" => Some(HttpMethod::Patch),
        _ => None,
    }
}
