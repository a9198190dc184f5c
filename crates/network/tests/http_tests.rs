//! Full pipeline against a local mock server

use badgestream_network::{
    build_pipeline, OutboundRequest, PipelineConfig, ServiceIdentity, TextFetcher,
    UpstreamRegistry,
};
use badgestream_resilience::CircuitState;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config() -> PipelineConfig {
    PipelineConfig {
        identity: ServiceIdentity::new("badgestream", "1.2.3"),
        backoff_unit: Duration::from_millis(5),
        ..PipelineConfig::default()
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[tokio::test]
async fn test_pipeline_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/query"))
        .and(query_param("q", "packageid:Newtonsoft.Json"))
        .and(header("user-agent", "badgestream/1.2.3"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"totalHits":1}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_pipeline(&fast_config()).expect("pipeline");
    let url = format!("{}/v3/query?q=packageid:Newtonsoft.Json", server.uri());

    assert_eq!(client.send(&OutboundRequest::get(url)).await, r#"{"totalHits":1}"#);
}

#[tokio::test]
async fn test_pipeline_retries_then_gives_up() {
    init_logger();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(504))
        .expect(4)
        .mount(&server)
        .await;

    // A 504 opens the circuit, so keep the cool-down shorter than the first
    // backoff step to let every retry through
    let config = PipelineConfig {
        min_break_duration: Duration::from_millis(1),
        backoff_unit: Duration::from_millis(10),
        ..fast_config()
    };
    let client = build_pipeline(&config).expect("pipeline");

    assert_eq!(client.send(&OutboundRequest::get(server.uri())).await, "");
}

#[tokio::test]
async fn test_pipeline_client_error_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(2)
        .mount(&server)
        .await;

    let client = build_pipeline(&fast_config()).expect("pipeline");
    let request = OutboundRequest::get(format!("{}/missing", server.uri()));

    assert_eq!(client.send(&request).await, "");
    assert_eq!(client.send(&request).await, "");
    assert_eq!(client.inner().inner().state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_pipeline_server_error_opens_circuit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_pipeline(&fast_config()).expect("pipeline");
    let request = OutboundRequest::get(server.uri());

    assert_eq!(client.send(&request).await, "");
    assert_eq!(client.send(&request).await, "");
    assert_eq!(client.inner().inner().state(), CircuitState::Open);
}

#[tokio::test]
async fn test_pipeline_connection_refused() {
    init_logger();
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let address = listener.local_addr().expect("address");
    drop(listener);

    let client = build_pipeline(&fast_config()).expect("pipeline");
    let body = client
        .send(&OutboundRequest::get(format!("http://{}/feed", address)))
        .await;

    assert_eq!(body, "");
    assert_eq!(client.inner().inner().state(), CircuitState::Closed);
}

#[tokio::test]
async fn test_pipeline_request_timeout_is_silent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let mut config = fast_config();
    config.transport.timeout = Duration::from_millis(100);
    let client = build_pipeline(&config).expect("pipeline");

    assert_eq!(client.send(&OutboundRequest::get(server.uri())).await, "");
}

#[tokio::test]
async fn test_pipeline_call_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = PipelineConfig {
        call_deadline: Some(Duration::from_millis(100)),
        ..fast_config()
    };
    let client = build_pipeline(&config).expect("pipeline");

    let started = std::time::Instant::now();
    assert_eq!(client.send(&OutboundRequest::get(server.uri())).await, "");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_registry_pipelines_share_breaker_per_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/up"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let config = PipelineConfig {
        max_retries: 0,
        ..fast_config()
    };
    let registry = UpstreamRegistry::new(config).expect("registry");

    let down = registry.get("myget").expect("pipeline");
    let down_request = OutboundRequest::get(format!("{}/down", server.uri()));
    assert_eq!(down.fetch_text(&down_request).await, "");

    // Same upstream name, same circuit
    let again = registry.get("myget").expect("pipeline");
    assert_eq!(again.inner().inner().state(), CircuitState::Open);

    let up = registry.get("nuget").expect("pipeline");
    let up_request = OutboundRequest::get(format!("{}/up", server.uri()));
    assert_eq!(up.fetch_text(&up_request).await, "ok");
}

#[tokio::test]
async fn test_pipeline_concurrent_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1.0.0"))
        .expect(10)
        .mount(&server)
        .await;

    let client = std::sync::Arc::new(build_pipeline(&fast_config()).expect("pipeline"));
    let calls = (0..10).map(|_| {
        let client = std::sync::Arc::clone(&client);
        let url = server.uri();
        async move { client.send(&OutboundRequest::get(url)).await }
    });

    let bodies = futures::future::join_all(calls).await;
    assert!(bodies.iter().all(|body| body == "1.0.0"));
}
