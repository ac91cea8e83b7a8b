use httpmock::prelude::*;
use marrow::fetch::{HttpFetcher, MediaProbe};
use marrow::Error;

#[test]
fn fetches_html_documents() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/article");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body("<html><body><p>REMOTE_CONTENT</p></body></html>");
    });

    let html = HttpFetcher::new().fetch_html(&server.url("/article")).unwrap();
    assert!(html.contains("REMOTE_CONTENT"));
}

#[test]
fn follows_redirects_manually() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/old");
        then.status(302).header("location", "/new");
    });
    server.mock(|when, then| {
        when.method(GET).path("/new");
        then.status(200)
            .header("content-type", "text/html")
            .body("<html><body>MOVED_HERE</body></html>");
    });

    let html = HttpFetcher::new().fetch_html(&server.url("/old")).unwrap();
    assert!(html.contains("MOVED_HERE"));
}

#[test]
fn non_200_status_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404).header("content-type", "text/html").body("gone");
    });

    let result = HttpFetcher::new().fetch_html(&server.url("/missing"));
    assert!(matches!(result, Err(Error::HttpStatus(404, _))));
}

#[test]
fn non_document_mime_type_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data");
        then.status(200)
            .header("content-type", "application/json")
            .body("{\"not\": \"html\"}");
    });

    let result = HttpFetcher::new().fetch_html(&server.url("/data"));
    assert!(matches!(result, Err(Error::NotContent)));
}

#[test]
fn xml_documents_are_accepted() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/feed");
        then.status(200)
            .header("content-type", "application/xml")
            .body("<root>XML_BODY</root>");
    });

    let html = HttpFetcher::new().fetch_html(&server.url("/feed")).unwrap();
    assert!(html.contains("XML_BODY"));
}

#[test]
fn empty_body_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/empty");
        then.status(200).header("content-type", "text/html").body("");
    });

    let result = HttpFetcher::new().fetch_html(&server.url("/empty"));
    assert!(matches!(result, Err(Error::NotContent)));
}

#[test]
fn invalid_url_is_rejected() {
    let result = HttpFetcher::new().fetch_html("definitely not a url");
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[test]
fn content_info_reads_headers() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/img.png");
        then.status(200)
            .header("content-type", "image/png")
            .body(vec![0u8; 128]);
    });

    let info = HttpFetcher::new().content_info(&server.url("/img.png"));
    assert_eq!(info.size, 128);
    assert!(info.mime_type.contains("image/png"));
}

#[test]
fn content_info_is_total_on_failure() {
    let info = HttpFetcher::new().content_info("http://127.0.0.1:1/unreachable");
    assert_eq!(info.size, 0);
    assert!(info.mime_type.is_empty());
}

#[test]
fn image_bytes_round_trip() {
    let server = MockServer::start();
    let payload = vec![7u8; 64];
    server.mock(|when, then| {
        when.method(GET).path("/bytes");
        then.status(200).header("content-type", "image/jpeg").body(payload.clone());
    });

    let bytes = HttpFetcher::new().image_bytes(&server.url("/bytes"));
    assert_eq!(bytes, Some(payload));
}

#[test]
fn image_bytes_absent_on_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/gone");
        then.status(404);
    });

    assert!(HttpFetcher::new().image_bytes(&server.url("/gone")).is_none());
}
