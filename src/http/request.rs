use std::sync::Arc;

use crate::http::headers::HttpHeaders;
use crate::http::read_only::ReadOnlyHttpHeaders;
use crate::http::{HttpMethod, HttpVersion};

/// Request line and headers of a parsed request.
///
/// The headers are frozen once the head is built: the head owns a read-only
/// view sharing the parsed [`HttpHeaders`], so handlers can read them (and
/// reuse the cached `Content-Type` and `Accept`) but never change them.
#[derive(Debug)]
pub struct RequestHead {
    pub method: HttpMethod,
    pub target: String,
    pub version: HttpVersion,

    headers: ReadOnlyHttpHeaders<Arc<HttpHeaders>>,
}

impl RequestHead {
    pub fn new(method: HttpMethod, target: String, version: HttpVersion, headers: HttpHeaders) -> Self {
        Self {
            method,
            target,
            version,
            headers: ReadOnlyHttpHeaders::new(Arc::new(headers)),
        }
    }

    pub fn headers(&self) -> &ReadOnlyHttpHeaders<Arc<HttpHeaders>> {
        &self.headers
    }
}
