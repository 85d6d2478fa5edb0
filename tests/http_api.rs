//! End-to-end tests: real HTTP server in front of mocked vendor APIs

use std::{net::SocketAddr, sync::Arc, time::Duration};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use unified_agents::{
    config::{Config, PlatformSettings},
    server::{self, Dispatcher, ErrorEnvelope},
    services::AdapterRegistry,
};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

struct Harness {
    base: String,
    client: reqwest::Client,
    vapi: MockServer,
    retell: MockServer,
}

impl Harness {
    async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start with config tweaks applied after the vendor mocks are wired in
    async fn start_with(tweak: impl FnOnce(&mut Config)) -> Self {
        let vapi = MockServer::start().await;
        let retell = MockServer::start().await;

        let mut config = Config::default();
        config.request_timeout = Duration::from_secs(5);
        config.platforms.vapi = PlatformSettings {
            api_key: Some("test_vapi_key".into()),
            base_url: Some(vapi.uri()),
        };
        config.platforms.retell = PlatformSettings {
            api_key: Some("test_retell_key".into()),
            base_url: Some(retell.uri()),
        };
        tweak(&mut config);

        let registry = AdapterRegistry::from_config(&config).unwrap();
        let router = server::router(Arc::new(Dispatcher::new(registry)));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            vapi,
            retell,
        }
    }

    async fn post(&self, path: &str, body: &Value) -> (u16, Value) {
        let response = self
            .client
            .post(format!("{}{}", self.base, path))
            .json(body)
            .send()
            .await
            .unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }
}

fn readme_example() -> Value {
    json!({
        "platform": "vapi",
        "name": "Customer Service Agent",
        "description": "Handles customer inquiries",
        "voice": { "provider": "eleven_labs", "voice_id": "rachel" },
        "instructions": "You are a helpful customer service agent.",
        "language": "en"
    })
}

#[tokio::test]
async fn test_readme_example_creates_vapi_agent() {
    let harness = Harness::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/assistants"))
        .and(matchers::header("authorization", "Bearer test_vapi_key"))
        .and(matchers::body_partial_json(json!({
            "name": "Customer Service Agent",
            "system_prompt": "You are a helpful customer service agent.",
            "voice_id": "rachel",
            "voice": { "provider": "eleven_labs" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "asst_7f3c",
            "name": "Customer Service Agent",
            "createdAt": "2024-05-01T10:00:00Z"
        })))
        .expect(1)
        .mount(&harness.vapi)
        .await;

    let (status, body) = harness.post("/agents", &readme_example()).await;

    assert_eq!(status, 201);
    assert_eq!(body["id"], json!("asst_7f3c"));
    assert_eq!(body["platform"], json!("vapi"));
    assert_eq!(body["name"], json!("Customer Service Agent"));
    assert_eq!(body["vendor"]["createdAt"], json!("2024-05-01T10:00:00Z"));
}

#[tokio::test]
async fn test_retell_through_legacy_path() {
    let harness = Harness::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/agents"))
        .and(matchers::header("authorization", "Bearer test_retell_key"))
        .and(matchers::body_partial_json(json!({
            "system_prompt": "Answer product questions.",
            "llm": { "provider": "openai", "model": "gpt-4" },
            "voice": { "provider": "elevenlabs", "voice_id": "pNInz6obpgDQGcFmaJgB" },
            "end_call_after_silence": 5
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "agent_id": "retell-test-id",
            "agent_name": "Sales Representative"
        })))
        .expect(1)
        .mount(&harness.retell)
        .await;

    let (status, body) = harness
        .post(
            "/api/agents",
            &json!({
                "provider": "retell",
                "name": "Sales Representative",
                "llm_model": "gpt-4",
                "system_prompt": "Answer product questions.",
                "voice": { "provider": "eleven_labs", "voice_id": "pNInz6obpgDQGcFmaJgB" },
                "provider_specific": { "end_call_after_silence": 5 }
            }),
        )
        .await;

    assert_eq!(status, 201);
    assert_eq!(body["id"], json!("retell-test-id"));
    assert_eq!(body["platform"], json!("retell"));
}

#[tokio::test]
async fn test_unsupported_platform_makes_no_vendor_call() {
    let harness = Harness::start().await;

    for vendor in [&harness.vapi, &harness.retell] {
        Mock::given(matchers::any())
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(vendor)
            .await;
    }

    let mut request = readme_example();
    request["platform"] = json!("bland");
    let (status, body) = harness.post("/agents", &request).await;

    assert_eq!(status, 400);
    let envelope: ErrorEnvelope = serde_json::from_value(body).unwrap();
    assert_eq!(envelope.error, "unsupported_platform");
}

#[tokio::test]
async fn test_missing_name_is_unprocessable() {
    let harness = Harness::start().await;

    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&harness.vapi)
        .await;

    let mut request = readme_example();
    request.as_object_mut().unwrap().remove("name");
    let (status, body) = harness.post("/agents", &request).await;

    assert_eq!(status, 422);
    let envelope: ErrorEnvelope = serde_json::from_value(body).unwrap();
    assert_eq!(envelope.error, "validation_error");
    assert_eq!(envelope.fields.unwrap()[0].field, "name");
}

#[tokio::test]
async fn test_vendor_500_becomes_502_with_body() {
    let harness = Harness::start().await;
    let vendor_body = r#"{"message":"Internal server error","statusCode":500}"#;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/assistants"))
        .respond_with(ResponseTemplate::new(500).set_body_string(vendor_body))
        .expect(1)
        .mount(&harness.vapi)
        .await;

    let (status, body) = harness.post("/agents", &readme_example()).await;

    assert_eq!(status, 502);
    assert_eq!(body["error"], json!("upstream_error"));
    assert_eq!(body["upstream"]["status"], json!(500));
    assert_eq!(body["upstream"]["platform"], json!("vapi"));
    assert_eq!(body["upstream"]["body"], json!(vendor_body));
}

#[tokio::test]
async fn test_malformed_json_body_gets_envelope() {
    let harness = Harness::start().await;

    let response = harness
        .client
        .post(format!("{}/agents", harness.base))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], json!("validation_error"));
    assert_eq!(body["fields"][0]["field"], json!("body"));
}

#[tokio::test]
async fn test_unknown_route_gets_envelope() {
    let harness = Harness::start().await;

    let response = harness
        .client
        .get(format!("{}/docs", harness.base))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], json!("not_found"));
}

#[tokio::test]
async fn test_vendor_timeout_is_gateway_timeout() {
    let harness = Harness::start_with(|config| {
        config.request_timeout = Duration::from_millis(200);
    })
    .await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/assistants"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "id": "too_late" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&harness.vapi)
        .await;

    let (status, body) = harness.post("/agents", &readme_example()).await;

    assert_eq!(status, 504);
    let envelope: ErrorEnvelope = serde_json::from_value(body).unwrap();
    assert_eq!(envelope.error, "upstream_timeout");
    assert!(envelope.upstream.is_none());
}

#[tokio::test]
async fn test_unreachable_vendor_is_bad_gateway() {
    // Port 9 (discard) is closed on test machines
    let harness = Harness::start_with(|config| {
        config.platforms.retell.base_url = Some("http://127.0.0.1:9".into());
    })
    .await;

    let mut request = readme_example();
    request["platform"] = json!("retell");
    let (status, body) = harness.post("/agents", &request).await;

    assert_eq!(status, 502);
    let envelope: ErrorEnvelope = serde_json::from_value(body).unwrap();
    assert_eq!(envelope.error, "upstream_unreachable");
    assert!(envelope.upstream.is_none());
}

#[tokio::test]
async fn test_wrong_method_gets_envelope() {
    let harness = Harness::start().await;

    for path in ["/agents", "/api/agents"] {
        let response = harness
            .client
            .get(format!("{}{}", harness.base, path))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 405);
        let envelope: ErrorEnvelope = response.json().await.unwrap();
        assert_eq!(envelope.error, "method_not_allowed");
        assert!(envelope.detail.contains(path));
    }
}

#[tokio::test]
async fn test_oversized_body_gets_envelope() {
    let harness = Harness::start().await;

    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&harness.vapi)
        .await;

    let mut request = readme_example();
    request["instructions"] = json!("a".repeat(server::MAX_BODY_BYTES + 1));
    let (status, body) = harness.post("/agents", &request).await;

    assert_eq!(status, 413);
    let envelope: ErrorEnvelope = serde_json::from_value(body).unwrap();
    assert_eq!(envelope.error, "payload_too_large");
}

#[tokio::test]
async fn test_info_and_health_endpoints() {
    let harness = Harness::start().await;

    let info: Value = harness
        .client
        .get(format!("{}/", harness.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(info["name"], json!(server::SERVICE_NAME));
    assert_eq!(info["endpoints"]["create_agent"], json!("/agents"));

    let health: Value = harness
        .client
        .get(format!("{}/health", harness.base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({ "status": "ok", "platforms": ["vapi", "retell"] }));
}
