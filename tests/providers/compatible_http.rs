use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mailtone::providers::{OpenAiCompatibleProvider, Provider};

#[tokio::test]
async fn chat_posts_single_user_message_with_bearer_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer gsk_live"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-8b-instant",
            "temperature": 0.2,
            "messages": [{"role": "user", "content": "rewrite this"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"subjects\":[\"a\",\"b\"]}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(
        "Groq",
        &format!("{}/v1", server.uri()),
        Some("gsk_live"),
    );
    let text = provider
        .chat("rewrite this", "llama-3.1-8b-instant", 0.2)
        .await
        .unwrap();

    assert_eq!(text, r#"{"subjects":["a","b"]}"#);
    server.verify().await;
}

#[tokio::test]
async fn missing_content_is_an_empty_string() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"role": "assistant", "content": null}}]})),
        )
        .mount(&server)
        .await;

    let provider =
        OpenAiCompatibleProvider::new("Groq", &format!("{}/v1", server.uri()), Some("gsk_live"));
    let text = provider.chat("hello", "m", 0.2).await.unwrap();
    assert!(text.is_empty());
}

#[tokio::test]
async fn error_status_is_reported_with_scrubbed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"error":{"message":"Invalid API Key gsk_live_abcdef123456"}}"#,
        ))
        .mount(&server)
        .await;

    let provider = OpenAiCompatibleProvider::new(
        "Groq",
        &format!("{}/v1", server.uri()),
        Some("gsk_live_abcdef123456"),
    );
    let err = provider.chat("hello", "m", 0.2).await.unwrap_err();
    let message = format!("{err:#}");

    assert!(message.contains("Groq"));
    assert!(message.contains("401"));
    assert!(!message.contains("abcdef123456"));
}

#[tokio::test]
async fn undecodable_body_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let provider =
        OpenAiCompatibleProvider::new("Groq", &format!("{}/v1", server.uri()), Some("gsk_live"));
    let err = provider.chat("hello", "m", 0.2).await.unwrap_err();
    assert!(format!("{err:#}").contains("decode"));
}

#[tokio::test]
async fn request_timeout_bounds_a_slow_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let provider =
        OpenAiCompatibleProvider::new("Groq", &format!("{}/v1", server.uri()), Some("gsk_live"))
            .with_request_timeout(std::time::Duration::from_millis(300));
    let started = std::time::Instant::now();
    let result = provider.chat("hello", "llama-3.1-8b-instant", 0.2).await;

    assert!(result.is_err());
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
}
