use records_api::config::AppConfig;
use records_core::serializers::xmlrpc;
use reqwest::{header, StatusCode};
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, bound to an ephemeral port.
        let config = AppConfig::from_lookup(|key| match key {
            "BIND_ADDR" => Some("127.0.0.1:0".to_string()),
            _ => None,
        })
        .expect("valid test config");
        let app = records_api::app::build_app().expect("valid registry");

        let listener = tokio::net::TcpListener::bind(config.bind_addr)
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

fn content_type(res: &reqwest::Response) -> String {
    res.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string()
}

async fn get_with_accept(srv: &TestServer, path: &str, accept: Option<&str>) -> reqwest::Response {
    let mut req = client().get(srv.url(path));
    if let Some(accept) = accept {
        req = req.header(header::ACCEPT, accept);
    }
    req.send().await.unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;
    let res = client().get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn json_is_returned_when_requested_or_unspecified() {
    let srv = TestServer::spawn().await;

    for accept in [Some("application/json"), None] {
        let res = get_with_accept(&srv, "/records/", accept).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(content_type(&res), "application/json");
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body, json!({"title": "Test"}));
    }
}

#[tokio::test]
async fn xml_envelope_decodes_to_the_same_payload() {
    let srv = TestServer::spawn().await;

    let res = get_with_accept(&srv, "/records/", Some("application/xml")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(content_type(&res), "application/xml");

    let body = res.text().await.unwrap();
    assert!(body.starts_with("<params>\n<param>\n"));
    let params = xmlrpc::decode_params(&body).unwrap();
    assert_eq!(params, vec![json!({"title": "Test"})]);
}

#[tokio::test]
async fn search_query_with_xml_accept() {
    let srv = TestServer::spawn().await;

    let res = get_with_accept(&srv, "/records/?q=title:Test", Some("application/xml")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(content_type(&res), "application/xml");

    let payload = xmlrpc::deserialize(&res.text().await.unwrap()).unwrap();
    assert_eq!(serde_json::Value::Object(payload), json!({"title": "Test"}));
}

#[tokio::test]
async fn unsupported_accept_falls_back_to_json() {
    let srv = TestServer::spawn().await;

    for accept in ["text/plain", "image/*", "application/xml;q=0", "nonsense"] {
        let res = get_with_accept(&srv, "/records/", Some(accept)).await;
        assert_eq!(res.status(), StatusCode::OK, "accept = {accept}");
        assert_eq!(content_type(&res), "application/json", "accept = {accept}");
    }
}

#[tokio::test]
async fn quality_values_decide_between_representations() {
    let srv = TestServer::spawn().await;

    let res = get_with_accept(&srv, "/records/", Some("application/json;q=0.4, application/xml;q=0.9")).await;
    assert_eq!(content_type(&res), "application/xml");

    let res = get_with_accept(
        &srv,
        "/records/",
        Some("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    )
    .await;
    assert_eq!(content_type(&res), "application/xml");

    let res = get_with_accept(&srv, "/records/", Some("*/*")).await;
    assert_eq!(content_type(&res), "application/json");
}

#[tokio::test]
async fn format_query_overrides_accept() {
    let srv = TestServer::spawn().await;

    let res = get_with_accept(&srv, "/records/?format=xml", Some("application/json")).await;
    assert_eq!(content_type(&res), "application/xml");

    let res = get_with_accept(&srv, "/records/?format=json", Some("application/xml")).await;
    assert_eq!(content_type(&res), "application/json");

    let res = get_with_accept(&srv, "/records/?format=yaml", Some("application/xml")).await;
    assert_eq!(content_type(&res), "application/xml");
}

#[tokio::test]
async fn repeated_requests_are_byte_identical() {
    let srv = TestServer::spawn().await;

    for accept in ["application/json", "application/xml"] {
        let first = get_with_accept(&srv, "/records/", Some(accept)).await.bytes().await.unwrap();
        for _ in 0..5 {
            let again = get_with_accept(&srv, "/records/", Some(accept)).await.bytes().await.unwrap();
            assert_eq!(first, again);
        }
    }
}

#[tokio::test]
async fn negotiated_responses_vary_on_accept_and_carry_request_id() {
    let srv = TestServer::spawn().await;

    let a = get_with_accept(&srv, "/records/", None).await;
    let b = get_with_accept(&srv, "/records/", None).await;
    assert_eq!(a.headers()[header::VARY], "Accept");

    let id_a = a.headers()["x-request-id"].to_str().unwrap().to_string();
    let id_b = b.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&id_a).is_ok());
    assert_ne!(id_a, id_b);
}

#[tokio::test]
async fn collection_without_slash_redirects() {
    let srv = TestServer::spawn().await;

    let res = client().get(srv.url("/records?q=title:Test")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(res.headers()[header::LOCATION], "/records/?q=title:Test");

    let res = client().get(srv.url("/records")).send().await.unwrap();
    assert_eq!(res.headers()[header::LOCATION], "/records/");
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let srv = TestServer::spawn().await;

    let res = client().post(srv.url("/records/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn head_negotiates_without_a_body() {
    let srv = TestServer::spawn().await;

    let res = client()
        .head(srv.url("/records/"))
        .header(header::ACCEPT, "application/xml")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(content_type(&res), "application/xml");
    assert!(res.bytes().await.unwrap().is_empty());
}
