//! Unit tests for chat-completions request shaping and response parsing.

use crate::provider::{
    adapters::groq::{
        CompletionRequest, GroqClient, parse_completion_body, parse_stream_payload,
    },
    config::ProviderConfig,
    domain::{ChatMessage, ExecutionMode, ProviderOptions, ReasoningEffort, Temperature},
    ports::{CompletionProvider, ProviderError},
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn config() -> ProviderConfig {
    ProviderConfig::new("gsk-test")
}

#[fixture]
fn messages() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are an expert summarizer."),
        ChatMessage::user("Revenue grew 12%."),
    ]
}

fn to_json(request: &CompletionRequest<'_>) -> Value {
    serde_json::to_value(request).expect("request should serialize")
}

#[rstest]
fn request_scales_temperature_to_unit_interval(
    config: ProviderConfig,
    messages: Vec<ChatMessage>,
) {
    let options = ProviderOptions::new()
        .with_temperature(Temperature::new(70).expect("temperature should be valid"));

    let body = to_json(&CompletionRequest::new(&config, &messages, &options, false));

    assert_eq!(body["temperature"], json!(0.7));
}

#[rstest]
fn request_omits_absent_temperature(config: ProviderConfig, messages: Vec<ChatMessage>) {
    let options = ProviderOptions::new();

    let body = to_json(&CompletionRequest::new(&config, &messages, &options, false));

    assert!(body.get("temperature").is_none());
}

#[rstest]
fn request_applies_provider_defaults(config: ProviderConfig, messages: Vec<ChatMessage>) {
    let options = ProviderOptions::new().with_mode(ExecutionMode::Streamed);

    let body = to_json(&CompletionRequest::new(&config, &messages, &options, true));

    assert_eq!(body["model"], json!("openai/gpt-oss-120b"));
    assert_eq!(body["max_completion_tokens"], json!(8192));
    assert_eq!(body["top_p"], json!(1));
    assert_eq!(body["reasoning_effort"], json!("medium"));
    assert_eq!(body["stream"], json!(true));
    assert_eq!(
        body["messages"],
        json!([
            { "role": "system", "content": "You are an expert summarizer." },
            { "role": "user", "content": "Revenue grew 12%." },
        ])
    );
}

#[rstest]
fn request_prefers_per_attempt_overrides(config: ProviderConfig, messages: Vec<ChatMessage>) {
    let options = ProviderOptions::new()
        .with_model("llama-3.3-70b")
        .expect("model should be accepted")
        .with_max_tokens(256)
        .expect("token limit should be accepted")
        .with_reasoning_effort(ReasoningEffort::Low);

    let body = to_json(&CompletionRequest::new(&config, &messages, &options, false));

    assert_eq!(body["model"], json!("llama-3.3-70b"));
    assert_eq!(body["max_completion_tokens"], json!(256));
    assert_eq!(body["reasoning_effort"], json!("low"));
}

#[rstest]
fn completion_body_yields_first_choice_text() {
    let body = r#"{"choices":[{"message":{"role":"assistant","content":"Summary text"}}]}"#;
    assert_eq!(
        parse_completion_body(body).expect("body should parse"),
        "Summary text"
    );
}

#[rstest]
#[case::no_choices(r#"{"choices":[]}"#)]
#[case::null_content(r#"{"choices":[{"message":{"content":null}}]}"#)]
fn completion_body_without_content_is_empty(#[case] body: &str) {
    assert_eq!(parse_completion_body(body).expect("body should parse"), "");
}

#[rstest]
fn completion_body_rejects_invalid_json() {
    assert!(matches!(
        parse_completion_body("not json"),
        Err(ProviderError::MalformedResponse(_))
    ));
}

#[rstest]
#[case::text(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#, Some("Hel"))]
#[case::role_only(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#, None)]
#[case::empty_content(r#"{"choices":[{"delta":{"content":""}}]}"#, None)]
#[case::usage_trailer(r#"{"choices":[],"x_groq":{"usage":{}}}"#, None)]
fn stream_payload_yields_text_deltas(#[case] payload: &str, #[case] expected: Option<&str>) {
    let fragment = parse_stream_payload(payload).expect("payload should parse");
    assert_eq!(fragment.as_deref(), expected);
}

#[rstest]
fn stream_payload_surfaces_in_band_errors() {
    let payload = r#"{"error":{"message":"rate limited"}}"#;

    let err = parse_stream_payload(payload).expect_err("payload carries an error");

    assert_eq!(err.to_string(), "rate limited");
}

#[rstest]
fn client_rejects_blank_api_key() {
    let result = GroqClient::new(ProviderConfig::new("  "));
    assert!(matches!(result, Err(ProviderError::Configuration(_))));
}

#[rstest]
fn client_keeps_its_configuration(config: ProviderConfig) {
    let client = GroqClient::new(config).expect("client should build");
    assert_eq!(
        client.config().completions_url(),
        "https://api.groq.com/openai/v1/chat/completions"
    );
}

#[rstest]
#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error(messages: Vec<ChatMessage>) {
    let config = ProviderConfig::new("gsk-test").with_base_url("http://127.0.0.1:9/v1");
    let client = GroqClient::new(config).expect("client should build");

    let result = client.complete(&messages, &ProviderOptions::new()).await;

    assert!(matches!(result, Err(ProviderError::Transport(_))));
}
