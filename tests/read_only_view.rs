use std::sync::Arc;

use headerview::config::ParserConfig;
use headerview::http::parser::parse_request_head;
use headerview::{HeaderError, HeaderStore, HttpHeaders, MediaType, ReadOnlyHttpHeaders, ReadableHeaders};

fn headers(pairs: &[(&str, &str)]) -> HttpHeaders {
    pairs.iter().copied().collect()
}

#[test]
fn json_content_type_is_parsed_and_cached() {
    let backing = headers(&[("Content-Type", "application/json")]);
    let view = ReadOnlyHttpHeaders::new(&backing);

    let first = view.content_type().unwrap();
    assert_eq!(first.essence(), "application/json");
    assert!(std::ptr::eq(first, view.content_type().unwrap()));
}

#[test]
fn empty_headers_have_no_content_type() {
    let backing = HttpHeaders::new();
    let view = backing.read_only();

    assert_eq!(view.content_type(), None);
    assert!(view.accept().is_empty());
    assert!(view.is_empty());
}

#[test]
fn accept_list_keeps_order_and_quality() {
    let backing = headers(&[("Accept", "text/html"), ("Accept", "application/xml;q=0.9")]);
    let view = backing.read_only();

    let accept = view.accept();
    assert_eq!(accept.len(), 2);
    assert_eq!(accept[0], MediaType::new("text", "html"));
    assert_eq!(accept[1].essence(), "application/xml");
    assert_eq!(accept[1].parameter("q"), Some("0.9"));
}

#[test]
fn clearing_content_headers_changes_nothing() {
    let backing = headers(&[
        ("Content-Type", "text/plain"),
        ("Content-Length", "5"),
        ("Accept", "text/plain, application/json;q=0.5"),
    ]);
    let mut view = ReadOnlyHttpHeaders::new(Arc::new(backing));
    let content_type = view.content_type().cloned();
    let accept = view.accept().to_vec();
    let map = view.to_map();

    view.clear_content_headers();

    assert_eq!(view.content_type().cloned(), content_type);
    assert_eq!(view.accept().to_vec(), accept);
    assert_eq!(view.to_map(), map);
}

#[test]
fn writes_through_the_store_interface_are_refused() {
    let backing = headers(&[("Host", "example.com")]);
    let mut view = backing.read_only();

    // Callers generic over the writable interface see errors, not silent success
    fn tag<H: HeaderStore>(store: &mut H) -> Result<(), HeaderError> {
        store.set("X-Tag", "1")
    }

    assert!(matches!(tag(&mut view), Err(HeaderError::ReadOnly { operation: "set", .. })));
    assert!(!view.contains("X-Tag"));
    assert_eq!(backing.len(), 1);

    let mut writable = view.to_writable();
    tag(&mut writable).unwrap();
    assert_eq!(writable.get_first("x-tag"), Some("1"));
}

#[test]
fn parsed_request_owns_a_read_only_view() {
    let head = parse_request_head(
        b"POST /api HTTP/1.1\r\nHost: example.com\r\nContent-Type: application/json; charset=utf-8\r\nAccept: application/json, */*;q=0.5\r\n\r\n",
        &ParserConfig::default(),
    )
    .unwrap();

    let headers = head.headers();
    assert_eq!(headers.get("HOST"), Some(&["example.com".to_string()][..]));
    assert_eq!(headers.content_type().and_then(|ct| ct.parameter("charset")), Some("utf-8"));
    assert_eq!(
        headers.accept().iter().map(MediaType::quality).collect::<Vec<_>>(),
        vec![1.0, 0.5]
    );
}
