use mailtone::config::{Config, HistoryBackend};
use mailtone::gateway::run_gateway_with_listener;
use mailtone::history::SqliteHistoryStore;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
    _data_dir: TempDir,
}

impl GatewayTestServer {
    async fn start(model_server: &MockServer, history: HistoryBackend) -> Self {
        Self::start_with(model_server, history, |_| {}).await
    }

    async fn start_with(
        model_server: &MockServer,
        history: HistoryBackend,
        customize: impl FnOnce(&mut Config),
    ) -> Self {
        let data_dir = TempDir::new().expect("temp data dir should be created");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config {
            data_dir: data_dir.path().to_path_buf(),
            config_path: data_dir.path().join("config.toml"),
            api_key: Some("gsk_test-key".to_string()),
            base_url: Some(format!("{}/openai/v1", model_server.uri())),
            ..Config::default()
        };
        config.history.backend = history;
        customize(&mut config);

        if history == HistoryBackend::Sqlite {
            let store = SqliteHistoryStore::open(&config.history_db_path())
                .await
                .expect("history store should open");
            store
                .append("Hello,\nThe report is attached.\nBest", "formal", "short")
                .await
                .expect("seed entry should be written");
        }

        let config = Arc::new(config);
        let host = "127.0.0.1".to_string();
        let handle =
            tokio::spawn(async move { run_gateway_with_listener(&host, listener, config).await });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            handle,
            _data_dir: data_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

async fn mount_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("authorization", "Bearer gsk_test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
        .mount(server)
        .await;
}

fn grammar_body() -> Value {
    json!({
        "emailText": "pls send asap the report, thx",
        "purpose": "follow-up",
        "tone": "formal",
        "length": "short",
        "audience": "manager",
        "mode": "grammar"
    })
}

#[tokio::test]
async fn grammar_rewrite_round_trip_sends_one_model_call() {
    let model = MockServer::start().await;
    let reply = json!({
        "rewrites": [
            {"email": "Please send the report as soon as possible. Thanks.", "explanation": "Expanded abbreviations."},
            {"email": "Please send the report at your earliest convenience. Thanks.", "explanation": "Expanded abbreviations with different wording."}
        ]
    })
    .to_string();
    mount_completion(&model, &reply).await;

    let server = GatewayTestServer::start(&model, HistoryBackend::None).await;
    let response = reqwest::Client::new()
        .post(server.url("/rewrite-email"))
        .json(&grammar_body())
        .send()
        .await
        .expect("rewrite request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("body should be json");
    let rewrites = body["rewrites"].as_array().expect("rewrites array");
    assert_eq!(rewrites.len(), 2);
    assert_eq!(
        rewrites[1]["email"],
        "Please send the report at your earliest convenience. Thanks."
    );

    let received = model
        .received_requests()
        .await
        .expect("mock server should record received requests");
    assert_eq!(received.len(), 1);
    let sent: Value = serde_json::from_slice(&received[0].body).expect("request body is json");
    assert_eq!(sent["model"], "llama-3.1-8b-instant");
    assert_eq!(sent["temperature"], 0.2);
    assert_eq!(sent["messages"].as_array().map(Vec::len), Some(1));
    assert_eq!(sent["messages"][0]["role"], "user");
    let prompt = sent["messages"][0]["content"].as_str().unwrap_or_default();
    assert!(prompt.contains("pls send asap the report, thx"));
    assert!(prompt.contains("Do NOT rephrase sentences."));
}

#[tokio::test]
async fn grammar_rewrite_with_one_variant_is_generic_500() {
    let model = MockServer::start().await;
    let reply = r#"Sure! Here you go: {"rewrites":[{"email":"Please send it.","explanation":"Fixed."}]}"#;
    mount_completion(&model, reply).await;

    let server = GatewayTestServer::start(&model, HistoryBackend::None).await;
    let response = reqwest::Client::new()
        .post(server.url("/rewrite-email"))
        .json(&grammar_body())
        .send()
        .await
        .expect("rewrite request should complete");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("body should be json");
    assert_eq!(body, json!({"error": "Failed to rewrite email"}));
}

#[tokio::test]
async fn model_outage_is_generic_500_without_key_leak() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string("upstream down for key gsk_test-key"),
        )
        .mount(&model)
        .await;

    let server = GatewayTestServer::start(&model, HistoryBackend::None).await;
    let response = reqwest::Client::new()
        .post(server.url("/rewrite-subject"))
        .json(&json!({"subject": "quick q", "tone": "formal", "audience": "manager"}))
        .send()
        .await
        .expect("subject request should complete");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = response.text().await.expect("body should be text");
    assert!(text.contains("Failed to rewrite subject"));
    assert!(!text.contains("gsk_"));
}

#[tokio::test]
async fn subject_rewrite_returns_alternatives() {
    let model = MockServer::start().await;
    mount_completion(
        &model,
        r#"{"subjects":["Quick question about the report","Request: report timeline"]}"#,
    )
    .await;

    let server = GatewayTestServer::start(&model, HistoryBackend::None).await;
    let response = reqwest::Client::new()
        .post(server.url("/rewrite-subject"))
        .json(&json!({"subject": "quick q", "tone": "formal", "audience": "manager"}))
        .send()
        .await
        .expect("subject request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("body should be json");
    assert_eq!(
        body["subjects"],
        json!(["Quick question about the report", "Request: report timeline"])
    );
}

#[tokio::test]
async fn short_email_is_rejected_before_model_call() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&model)
        .await;

    let server = GatewayTestServer::start(&model, HistoryBackend::None).await;
    let mut body = grammar_body();
    body["emailText"] = json!("hi");
    let response = reqwest::Client::new()
        .post(server.url("/rewrite-email"))
        .json(&body)
        .send()
        .await
        .expect("rewrite request should complete");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("body should be json");
    assert_eq!(body["error"], "Failed to rewrite email");
    model.verify().await;
}

#[tokio::test]
async fn version_history_serves_stored_entries() {
    let model = MockServer::start().await;
    let server = GatewayTestServer::start(&model, HistoryBackend::Sqlite).await;

    let response = reqwest::get(server.url("/version-history"))
        .await
        .expect("history request should complete");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("body should be json");
    let entries = body.as_array().expect("history is an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["tone"], "formal");
    assert_eq!(entries[0]["length"], "short");
    assert_eq!(
        entries[0]["rewritten_email"],
        "Hello,\nThe report is attached.\nBest"
    );
    assert!(entries[0]["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn slow_model_fails_as_generic_500_before_gateway_timeout() {
    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(r#"{"rewrites":[]}"#))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&model)
        .await;

    let server = GatewayTestServer::start_with(&model, HistoryBackend::None, |config| {
        config.provider_timeout_secs = 1;
        config.gateway.request_timeout_secs = 2;
    })
    .await;
    let response = reqwest::Client::new()
        .post(server.url("/rewrite-email"))
        .json(&grammar_body())
        .send()
        .await
        .expect("rewrite request should complete");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("body should be json");
    assert_eq!(body, json!({"error": "Failed to rewrite email"}));
}
