use std::sync::Arc;

use ajaxnav_dom::Document;
use ajaxnav_navigation::{
    AddressUpdate, AjaxNavigator, FetchRequest, Fetcher, HttpFetcher, HttpFetcherOptions,
    NavigatorConfig, PartialHeader,
};
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(HttpFetcherOptions::default()).unwrap()
}

#[tokio::test]
async fn partial_request_carries_marker_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>About us</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/about", server.uri())).unwrap();
    let body = fetcher()
        .fetch(&FetchRequest::partial(url, &PartialHeader::default()))
        .await
        .unwrap();

    assert_eq!(body, "<h1>About us</h1>");
}

#[tokio::test]
async fn error_status_body_is_returned_as_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<p>Something broke</p>"))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/broken", server.uri())).unwrap();
    let body = fetcher()
        .fetch(&FetchRequest::document(url))
        .await
        .unwrap();

    assert_eq!(body, "<p>Something broke</p>");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Nothing listens on port 1
    let url = Url::parse("http://127.0.0.1:1/about").unwrap();
    let err = fetcher()
        .fetch(&FetchRequest::document(url))
        .await
        .unwrap_err();

    assert!(matches!(err, ajaxnav_navigation::FetchError::Network(_)));
}

#[tokio::test]
async fn navigator_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>About us</h1>"))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).unwrap();
    let doc = Document::parse(
        base.clone(),
        r#"<html><body>
            <nav id="nav_main"><a id="l1" href="/about">About</a></nav>
            <main><p>Home</p></main>
        </body></html>"#,
    );
    let navigator = AjaxNavigator::install(
        doc.clone(),
        Arc::new(fetcher()),
        NavigatorConfig::nav_container(),
    )
    .unwrap();

    let link = doc.element_by_id("l1").unwrap();
    assert!(doc.click(link).unwrap().is_prevented());

    let report = navigator.settle().await.remove(0).unwrap();
    let expected = base.join("/about").unwrap();
    assert_eq!(
        report.address,
        Some(AddressUpdate::Pushed {
            location: expected.clone()
        })
    );

    let main = doc.query_selector("body > main").unwrap().unwrap();
    assert_eq!(doc.inner_html(main).unwrap(), "<h1>About us</h1>");
    assert_eq!(doc.url(), expected);
}
