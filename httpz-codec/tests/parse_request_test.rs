use assert_matches::assert_matches;
use httpz_codec::*;

fn parse_req(raw: &str) -> Request {
    match parse(raw, ParseOptions::default()).unwrap() {
        Message::Request(request) => request,
        other => panic!("expected request, got {other:?}"),
    }
}

#[test]
fn parses_simple_get() {
    let raw = "GET /features?p1=v1 HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let request = parse_req(raw);

    assert_eq!(
        request,
        Request {
            method: "GET".to_string(),
            protocol: "HTTP".to_string(),
            protocol_version: "HTTP/1.1".to_string(),
            host: "example.com".to_string(),
            path: "/features".to_string(),
            query_params: vec![Param::new("p1", "v1")],
            headers: vec![Header::new("Host", "example.com")],
            cookies: Vec::new(),
            body: None,
            headers_size: 51,
            body_size: 0,
        }
    );
    assert_eq!(request.headers_size + request.body_size, raw.len());
}

#[test]
fn host_header_is_case_insensitive() {
    let lower = parse_req("GET / HTTP/1.1\r\nhost: a.com\r\n\r\n");
    let upper = parse_req("GET / HTTP/1.1\r\nHOST: a.com\r\n\r\n");
    assert_eq!(lower.host, "a.com");
    assert_eq!(lower.host, upper.host);
    assert_eq!(lower.headers, upper.headers);
}

#[test]
fn host_keeps_non_default_port() {
    let request = parse_req("GET / HTTP/1.1\r\nHost: Example.com:8443\r\n\r\n");
    assert_eq!(request.host, "example.com:8443");
}

#[test]
fn host_keeps_written_default_port() {
    let request = parse_req("GET / HTTP/1.1\r\nHost: example.com:80\r\n\r\n");
    assert_eq!(request.host, "example.com:80");

    let request = parse_req("GET https://h.org:443/p HTTP/1.1\r\nHost: h.org\r\n\r\n");
    assert_eq!(request.host, "h.org:443");
}

#[test]
fn host_with_path_is_format_error() {
    let err = parse("GET / HTTP/1.1\r\nHost: example.com/x\r\n\r\n", ParseOptions::default())
        .unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);
    assert_eq!(err.details.as_deref(), Some("example.com/x"));
}

#[test]
fn missing_host_is_validation_error() {
    let err = parse("GET / HTTP/1.1\r\nAccept: */*\r\n\r\n", ParseOptions::default()).unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Validation);
}

#[test]
fn missing_host_allowed_when_optional() {
    let options = ParseOptions {
        mandatory_host: false,
    };
    let message = parse("GET /a?b HTTP/1.1\r\nAccept: */*\r\n\r\n", options).unwrap();
    assert_matches!(message, Message::Request(request) => {
        assert_eq!(request.host, "");
        assert_eq!(request.path, "/a");
        assert_eq!(request.query_params, vec![Param::without_value("b")]);
    });
}

#[test]
fn decodes_path_and_query() {
    let request = parse_req(
        "GET /search%20all?q=rust+lang&tag=a&tag=b&empty=&flag HTTP/1.1\r\nHost: x.org\r\n\r\n",
    );
    assert_eq!(request.path, "/search all");
    assert_eq!(
        request.query_params,
        vec![
            Param::new("q", "rust lang"),
            Param::new("tag", "a"),
            Param::new("tag", "b"),
            Param::new("empty", ""),
            Param::without_value("flag"),
        ]
    );
}

#[test]
fn malformed_query_encoding_is_rejected() {
    let err = parse("GET /?a=%C3%28 HTTP/1.1\r\nHost: x.org\r\n\r\n", ParseOptions::default())
        .unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);
}

#[test]
fn lowercase_method_is_uppercased() {
    let request = parse_req("delete /items/1 http/1.1\r\nHost: x.org\r\n\r\n");
    assert_eq!(request.method, "DELETE");
    assert_eq!(request.protocol_version, "HTTP/1.1");
}

#[test]
fn bad_request_line_is_format_error() {
    let err = parse("GET /only-two-parts\r\nHost: x\r\n\r\n", ParseOptions::default()).unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);

    let err = parse("BREW /pot HTTP/1.1\r\nHost: x\r\n\r\n", ParseOptions::default()).unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);
    assert!(err.message.contains("Method SP request-target SP HTTP-Version"));
}

#[test]
fn unknown_start_line_names_grammar() {
    let err = parse("NOTHTTP garbage", ParseOptions::default()).unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);
    assert!(err.message.contains("HTTP-Version SP status-code SP status-message"));
    assert_eq!(err.details.as_deref(), Some("NOTHTTP garbage"));
}

#[test]
fn missing_blank_line_is_format_error() {
    let err = parse("GET / HTTP/1.1\r\nHost: x.org\r\n", ParseOptions::default()).unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);
    assert!(err.message.contains("CRLF *(header CRLF) CRLF [body]"));
}

#[test]
fn header_without_colon_is_format_error() {
    let err = parse("GET / HTTP/1.1\r\nHost: x.org\r\nBroken\r\n\r\n", ParseOptions::default())
        .unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);
    assert_eq!(err.details.as_deref(), Some("Broken"));
}

#[test]
fn headers_are_canonicalized_and_duplicates_kept() {
    let request = parse_req(
        "GET / HTTP/1.1\r\nhost: x.org\r\naccept-ENCODING: gzip\r\nx-dup: 1\r\nX-DUP: 2\r\n\r\n",
    );
    assert_eq!(
        request.headers,
        vec![
            Header::new("Host", "x.org"),
            Header::new("Accept-Encoding", "gzip"),
            Header::new("X-Dup", "1"),
            Header::new("X-Dup", "2"),
        ]
    );
}

#[test]
fn parses_cookies() {
    let request = parse_req("GET / HTTP/1.1\r\nHost: x.org\r\ncookie: a=1; b=two; c=\r\n\r\n");
    assert_eq!(
        request.cookies,
        vec![Cookie::new("a", "1"), Cookie::new("b", "two"), Cookie::new("c", "")]
    );
    assert_eq!(request.headers, vec![Header::new("Host", "x.org")]);
}

#[test]
fn every_cookie_row_is_parsed() {
    let request = parse_req(
        "GET / HTTP/1.1\r\nCookie: a=1\r\nHost: x.org\r\nCOOKIE: b=2\r\nAccept: */*\r\n\r\n",
    );
    assert_eq!(request.cookies, vec![Cookie::new("a", "1"), Cookie::new("b", "2")]);
    assert_eq!(
        request.headers,
        vec![Header::new("Host", "x.org"), Header::new("Accept", "*/*")]
    );
}

#[test]
fn cookie_without_name_is_format_error() {
    let err = parse("GET / HTTP/1.1\r\nHost: x.org\r\nCookie: =1\r\n\r\n", ParseOptions::default())
        .unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);
}

#[test]
fn parses_url_encoded_body() {
    let raw = "POST /login HTTP/1.1\r\nHost: x.org\r\nContent-Type: application/x-www-form-urlencoded; charset=UTF-8\r\n\r\nuser=jo+doe&pass=%26x&remember=";
    let request = parse_req(raw);
    let body = request.body.unwrap();
    assert_eq!(body.content_type.as_deref(), Some("application/x-www-form-urlencoded"));
    assert_eq!(
        body.payload,
        BodyPayload::UrlEncoded {
            params: vec![
                Param::new("user", "jo doe"),
                Param::new("pass", "&x"),
                Param::new("remember", ""),
            ]
        }
    );
    assert_eq!(request.body_size, "user=jo+doe&pass=%26x&remember=".len());
}

#[test]
fn parses_multipart_body() {
    let raw = "POST /upload HTTP/1.1\r\nHost: x.org\r\nContent-Type: multipart/form-data; boundary=\"----abc\"\r\n\r\n\
               preamble\r\n\
               ------abc\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\nHello\r\n\
               ------abc\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\nContent-Type: text/plain\r\n\r\nline\r\n\
               ------abc--\r\n";
    let request = parse_req(raw);
    let body = request.body.unwrap();
    assert_eq!(body.content_type.as_deref(), Some("multipart/form-data"));
    assert_matches!(body.payload, BodyPayload::Multipart { boundary, parts } => {
        assert_eq!(boundary, "----abc");
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], MultipartPart::form_data("title", "Hello"));
        assert_eq!(parts[1].name.as_deref(), Some("file"));
        assert_eq!(parts[1].file_name.as_deref(), Some("a.txt"));
        assert_eq!(parts[1].content_type.as_deref(), Some("text/plain"));
        assert_eq!(parts[1].value, "line");
    });
}

#[test]
fn multipart_without_closing_delimiter_is_format_error() {
    let raw = "POST / HTTP/1.1\r\nHost: x.org\r\nContent-Type: multipart/form-data; boundary=B\r\n\r\n\
               --B\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nx\r\n";
    let err = parse(raw, ParseOptions::default()).unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);
    assert!(err.message.contains("--B--"));

    let truncated = raw.replace("\r\nx\r\n", "\r\nx\r\n--B-");
    assert!(parse(&truncated, ParseOptions::default()).is_err());
}

#[test]
fn multipart_closing_delimiter_may_end_the_input() {
    let raw = "POST / HTTP/1.1\r\nHost: x.org\r\nContent-Type: multipart/form-data; boundary=B\r\n\r\n\
               --B\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\nx\r\n--B--";
    let body = parse_req(raw).body.unwrap();
    assert_matches!(body.payload, BodyPayload::Multipart { parts, .. } => {
        assert_eq!(parts, vec![MultipartPart::form_data("a", "x")]);
    });
}

#[test]
fn multipart_without_boundary_param_is_format_error() {
    let raw = "POST / HTTP/1.1\r\nHost: x.org\r\nContent-Type: multipart/mixed\r\n\r\n--a\r\n";
    let err = parse(raw, ParseOptions::default()).unwrap_err();
    assert_matches!(err.kind, HttpZErrorKind::Format);
}

#[test]
fn text_body_is_kept_verbatim() {
    let raw = "POST / HTTP/1.1\r\nHost: x.org\r\nContent-Type: application/json\r\n\r\n{\"a\":1}\r\n";
    let request = parse_req(raw);
    assert_eq!(request.body, Some(Body::text(Some("application/json"), "{\"a\":1}\r\n")));
    assert_eq!(request.headers_size + request.body_size, raw.len());
}

#[test]
fn absolute_form_target_sets_protocol_and_host() {
    let request = parse_req("GET https://api.x.org/v1 HTTP/1.1\r\nHost: api.x.org\r\n\r\n");
    assert_eq!(request.protocol, "HTTPS");
    assert_eq!(request.host, "api.x.org");
    assert_eq!(request.path, "/v1");
}
