use std::sync::Arc;

use crate::config::ParserConfig;
use crate::http::error::ParseError;
use crate::http::headers::{HttpHeaders, HOST};
use crate::http::read_only::ReadOnlyHttpHeaders;
use crate::http::request::RequestHead;
use crate::http::*;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Incremental reader for an HTTP/1.x request head.
///
/// Bytes are fed as they arrive; once the blank line ending the head has been
/// seen, the head is parsed and returned. Bytes after it (the start of a body)
/// stay available through [`remaining`](Self::remaining).
pub struct RequestParser {
    config: ParserConfig,
    buf: Vec<u8>,
}

impl RequestParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            buf: Vec::new(),
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) -> Result<Option<RequestHead>, ParseError> {
        self.buf.extend_from_slice(bytes);

        let Some(head_end) = self
            .buf
            .windows(HEAD_TERMINATOR.len())
            .position(|window| window == HEAD_TERMINATOR)
        else {
            // Up to three bytes of a terminator may already have arrived
            if self.buf.len() > self.config.max_header_size + HEAD_TERMINATOR.len() - 1 {
                return Err(ParseError::HeadTooLarge {
                    limit: self.config.max_header_size,
                });
            }
            return Ok(None);
        };

        if head_end > self.config.max_header_size {
            return Err(ParseError::HeadTooLarge {
                limit: self.config.max_header_size,
            });
        }

        let head = std::str::from_utf8(&self.buf[..head_end]).map_err(|_| ParseError::InvalidUtf8)?;
        let parsed = parse_head(head, &self.config)?;

        // Drop the head and its terminator, keep whatever follows
        self.buf.drain(..head_end + HEAD_TERMINATOR.len());
        Ok(Some(parsed))
    }

    pub fn remaining(&self) -> &[u8] {
        &self.buf
    }
}

/// Parses a complete request head in one go.
pub fn parse_request_head(bytes: &[u8], config: &ParserConfig) -> Result<RequestHead, ParseError> {
    let mut parser = RequestParser::new(config.clone());
    parser.feed(bytes)?.ok_or(ParseError::Incomplete)
}

/// Parses bare header lines (no request line) up to the first blank line or
/// the end of input.
///
/// The size limit covers the header lines only; text after the blank line is
/// ignored and not counted.
pub fn parse_header_block(
    text: &str,
    config: &ParserConfig,
) -> Result<ReadOnlyHttpHeaders<Arc<HttpHeaders>>, ParseError> {
    let block_len = text
        .split_inclusive('\n')
        .take_while(|line| !line.trim_end_matches(['\r', '\n']).is_empty())
        .map(str::len)
        .sum::<usize>();
    if block_len > config.max_header_size {
        return Err(ParseError::HeadTooLarge {
            limit: config.max_header_size,
        });
    }

    let headers = parse_header_lines(text, config)?;
    Ok(ReadOnlyHttpHeaders::new(Arc::new(headers)))
}

fn parse_head(head: &str, config: &ParserConfig) -> Result<RequestHead, ParseError> {
    let (request_line, header_lines) = head.split_once("\r\n").unwrap_or((head, ""));

    let (method, target, version) = parse_request_line(request_line, config)?;
    let headers = parse_header_lines(header_lines, config)?;

    if version == HttpVersion::V1_1 && headers.get(HOST).is_none() {
        return Err(ParseError::MissingHost);
    }

    tracing::debug!(?method, target, ?version, headers = headers.len(), "parsed request head");
    Ok(RequestHead::new(method, target.to_string(), version, headers))
}

fn parse_request_line<'a>(
    line: &'a str,
    config: &ParserConfig,
) -> Result<(HttpMethod, &'a str, HttpVersion), ParseError> {
    // Request line: METHOD TARGET HTTP/VERSION
    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    };

    if method.len() > HTTP_METHOD_MAX_LEN {
        return Err(ParseError::UnknownMethod(method.to_string()));
    }
    let method = http_method_from_str(&method.to_uppercase())
        .ok_or_else(|| ParseError::UnknownMethod(method.to_string()))?;

    if target.is_empty() {
        return Err(ParseError::MalformedRequestLine(line.to_string()));
    }
    if target.len() > config.max_target_size {
        return Err(ParseError::TargetTooLong {
            limit: config.max_target_size,
        });
    }

    let (major, minor) = version
        .strip_prefix("HTTP/")
        .and_then(|v| v.split_once('.'))
        .and_then(|(maj, min)| Some((maj.parse::<u8>().ok()?, min.parse::<u8>().ok()?)))
        .ok_or_else(|| ParseError::MalformedRequestLine(line.to_string()))?;

    let version = match HttpVersion::from_pair((major, minor)) {
        Some(v) if v <= config.max_http_version => v,
        _ => return Err(ParseError::UnsupportedVersion(major, minor)),
    };

    Ok((method, target, version))
}

fn parse_header_lines(text: &str, config: &ParserConfig) -> Result<HttpHeaders, ParseError> {
    let mut headers = HttpHeaders::new();
    let mut count = 0;

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            break;
        }

        // Obsolete line folding is rejected rather than unfolded
        if line.starts_with([' ', '\t']) {
            return Err(ParseError::MalformedHeader(line.to_string()));
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedHeader(line.to_string()))?;
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ParseError::MalformedHeader(line.to_string()));
        }

        count += 1;
        if count > config.max_header_count {
            return Err(ParseError::TooManyHeaders {
                limit: config.max_header_count,
            });
        }

        headers.add(name, value.trim());
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::ReadableHeaders;
    use crate::http::media_type::MediaType;
    use rstest::rstest;

    const REQUEST: &[u8] = b"GET /index.html HTTP/1.1\r\n\
        Host: example.com\r\n\
        Accept: text/html, application/xml;q=0.9\r\n\
        Content-Type: application/json\r\n\
        \r\n";

    #[test]
    fn parses_a_complete_head() {
        let head = parse_request_head(REQUEST, &ParserConfig::default()).unwrap();

        assert_eq!(head.method, HttpMethod::Get);
        assert_eq!(head.target, "/index.html");
        assert_eq!(head.version, HttpVersion::V1_1);
        assert_eq!(head.headers().names(), vec!["Host", "Accept", "Content-Type"]);
        assert_eq!(head.headers().content_type(), Some(&MediaType::new("application", "json")));
        assert_eq!(head.headers().accept().len(), 2);
    }

    #[test]
    fn feed_waits_for_the_blank_line() {
        let mut parser = RequestParser::new(ParserConfig::default());
        let (first, second) = REQUEST.split_at(20);

        assert!(parser.feed(first).unwrap().is_none());
        let head = parser.feed(second).unwrap().unwrap();
        assert_eq!(head.target, "/index.html");
        assert!(parser.remaining().is_empty());
    }

    #[test]
    fn body_bytes_are_left_in_the_buffer() {
        let mut parser = RequestParser::new(ParserConfig::default());
        let head = parser
            .feed(b"POST /form HTTP/1.0\r\nContent-Length: 3\r\n\r\nabc")
            .unwrap()
            .unwrap();

        assert_eq!(head.method, HttpMethod::Post);
        assert_eq!(head.version, HttpVersion::V1_0);
        assert_eq!(parser.remaining(), b"abc");
    }

    #[test]
    fn repeated_header_lines_accumulate() {
        let head = parse_request_head(
            b"GET / HTTP/1.1\r\nHost: a\r\nAccept: text/html\r\naccept: application/xml;q=0.9\r\n\r\n",
            &ParserConfig::default(),
        )
        .unwrap();

        let accept: Vec<String> = head.headers().accept().iter().map(ToString::to_string).collect();
        assert_eq!(accept, vec!["text/html", "application/xml;q=0.9"]);
    }

    #[rstest]
    #[case(b"GET /\r\n\r\n".as_slice(), ParseError::MalformedRequestLine("GET /".into()))]
    #[case(b"GET  HTTP/1.1\r\nHost: a\r\n\r\n".as_slice(), ParseError::MalformedRequestLine("GET  HTTP/1.1".into()))]
    #[case(b"FETCH / HTTP/1.1\r\n\r\n".as_slice(), ParseError::UnknownMethod("FETCH".into()))]
    #[case(b"GET / HTTP/2.0\r\n\r\n".as_slice(), ParseError::UnsupportedVersion(2, 0))]
    #[case(b"GET / HTTP/x\r\n\r\n".as_slice(), ParseError::MalformedRequestLine("GET / HTTP/x".into()))]
    #[case(b"GET / HTTP/1.1\r\n\r\n".as_slice(), ParseError::MissingHost)]
    #[case(b"GET / HTTP/1.1\r\nHost a\r\n\r\n".as_slice(), ParseError::MalformedHeader("Host a".into()))]
    #[case(b"GET / HTTP/1.1\r\nHost: a\r\n folded\r\n\r\n".as_slice(), ParseError::MalformedHeader(" folded".into()))]
    #[case(b"GET / HTTP/1.1\r\nHost: a\r\n".as_slice(), ParseError::Incomplete)]
    fn rejects_bad_heads(#[case] input: &[u8], #[case] expected: ParseError) {
        assert_eq!(parse_request_head(input, &ParserConfig::default()).unwrap_err(), expected);
    }

    #[test]
    fn http_1_0_is_refused_above_the_configured_version() {
        let config = ParserConfig {
            max_http_version: HttpVersion::V1_0,
            ..Default::default()
        };
        let err = parse_request_head(b"GET / HTTP/1.1\r\nHost: a\r\n\r\n", &config).unwrap_err();
        assert_eq!(err, ParseError::UnsupportedVersion(1, 1));
    }

    #[test]
    fn limits_are_enforced() {
        let config = ParserConfig {
            max_target_size: 4,
            max_header_count: 1,
            max_header_size: 64,
            ..Default::default()
        };

        assert_eq!(
            parse_request_head(b"GET /long HTTP/1.0\r\n\r\n", &config).unwrap_err(),
            ParseError::TargetTooLong { limit: 4 }
        );
        assert_eq!(
            parse_request_head(b"GET / HTTP/1.1\r\nHost: a\r\nAccept: */*\r\n\r\n", &config).unwrap_err(),
            ParseError::TooManyHeaders { limit: 1 }
        );

        let mut parser = RequestParser::new(config);
        assert!(parser.feed(&[b'a'; 67]).unwrap().is_none());
        assert_eq!(
            parser.feed(b"a").unwrap_err(),
            ParseError::HeadTooLarge { limit: 64 }
        );
    }

    #[test]
    fn terminator_split_across_feeds_counts_like_one_chunk() {
        let config = ParserConfig {
            max_header_size: 32,
            ..Default::default()
        };
        // 31 bytes of head, then the terminator
        let request = b"GET / HTTP/1.0\r\nX-Pad: 12345678\r\n\r\n";
        assert_eq!(request.len() - HEAD_TERMINATOR.len(), 31);

        assert!(parse_request_head(request, &config).is_ok());

        let (first, last) = request.split_at(request.len() - 1);
        let mut parser = RequestParser::new(config);
        assert!(parser.feed(first).unwrap().is_none());
        let head = parser.feed(last).unwrap().unwrap();
        assert_eq!(head.headers().get_first("x-pad"), Some("12345678"));
    }

    #[test]
    fn header_block_limit_ignores_text_after_blank_line() {
        let config = ParserConfig {
            max_header_size: 32,
            ..Default::default()
        };
        let trailing = "x".repeat(100);
        let text = format!("Accept: */*\r\n\r\n{trailing}");

        let headers = parse_header_block(&text, &config).unwrap();
        assert_eq!(headers.len(), 1);

        let oversized = format!("X-Long: {trailing}\n");
        assert_eq!(
            parse_header_block(&oversized, &config).unwrap_err(),
            ParseError::HeadTooLarge { limit: 32 }
        );
    }

    #[test]
    fn header_block_without_request_line() {
        let headers = parse_header_block(
            "Content-Type: text/html; charset=utf-8\nAccept: */*\n\nignored: after blank line",
            &ParserConfig::default(),
        )
        .unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.content_type().map(MediaType::essence).as_deref(), Some("text/html"));
        assert!(!headers.contains("ignored"));
    }

    #[test]
    fn empty_header_block_is_empty() {
        let headers = parse_header_block("", &ParserConfig::default()).unwrap();
        assert!(headers.is_empty());
        assert_eq!(headers.content_type(), None);
        assert!(headers.accept().is_empty());
    }
}
