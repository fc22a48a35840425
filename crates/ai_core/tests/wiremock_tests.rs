//! Integration tests for the provider clients using WireMock
//!
//! These tests mock the OpenAI and Gemini HTTP APIs to verify client
//! behavior without network access.

use ai_core::{
    GeminiEngine, InferenceConfig, InferenceEngine, InferenceError, InferenceRequest, LlmProvider,
    OpenAiChatEngine,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn config_for_mock(provider: LlmProvider, base_url: &str) -> InferenceConfig {
    InferenceConfig {
        provider,
        base_url: Some(base_url.to_string()),
        api_key: Some("test-key".to_string()),
        default_model: Some("test-model".to_string()),
        timeout_ms: 5000,
        max_tokens: 150,
        temperature: 1.0,
        top_p: 1.0,
    }
}

fn openai_success_response() -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "  I'm here for you.  "},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 20, "completion_tokens": 6, "total_tokens": 26}
    })
}

fn gemini_success_response() -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "That sounds "}, {"text": "really hard."}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4, "totalTokenCount": 16},
        "modelVersion": "test-model-001"
    })
}

// =============================================================================
// OpenAI
// =============================================================================

mod openai_tests {
    use super::*;

    #[tokio::test]
    async fn generate_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "max_tokens": 150,
                "temperature": 1.0,
                "top_p": 1.0,
                "messages": [
                    {"role": "system", "content": "persona"},
                    {"role": "user", "content": "I feel hopeless today"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(openai_success_response()))
            .expect(1)
            .mount(&server)
            .await;

        let engine =
            OpenAiChatEngine::new(config_for_mock(LlmProvider::OpenAi, &server.uri())).unwrap();
        let response = engine
            .generate(InferenceRequest::with_system(
                "persona",
                "I feel hopeless today",
            ))
            .await
            .unwrap();

        assert_eq!(response.content, "  I'm here for you.  ");
        assert_eq!(response.model, "test-model");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(26));
    }

    #[tokio::test]
    async fn rate_limit_is_mapped() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let engine =
            OpenAiChatEngine::new(config_for_mock(LlmProvider::OpenAi, &server.uri())).unwrap();
        let err = engine
            .generate(InferenceRequest::simple("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, InferenceError::RateLimited));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn empty_choices_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"model": "test-model", "choices": []})),
            )
            .mount(&server)
            .await;

        let engine =
            OpenAiChatEngine::new(config_for_mock(LlmProvider::OpenAi, &server.uri())).unwrap();
        let err = engine
            .generate(InferenceRequest::simple("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, InferenceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn server_error_is_mapped() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let engine =
            OpenAiChatEngine::new(config_for_mock(LlmProvider::OpenAi, &server.uri())).unwrap();
        let err = engine
            .generate(InferenceRequest::simple("hi"))
            .await
            .unwrap_err();

        match err {
            InferenceError::ServerError(msg) => assert!(msg.contains("overloaded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn health_check_reports_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .mount(&server)
            .await;

        let engine =
            OpenAiChatEngine::new(config_for_mock(LlmProvider::OpenAi, &server.uri())).unwrap();
        assert!(engine.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn health_check_unreachable_is_false() {
        let engine = OpenAiChatEngine::new(config_for_mock(
            LlmProvider::OpenAi,
            "http://127.0.0.1:1",
        ))
        .unwrap();
        assert!(!engine.health_check().await.unwrap());
    }
}

// =============================================================================
// Gemini
// =============================================================================

mod gemini_tests {
    use super::*;

    #[tokio::test]
    async fn generate_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "systemInstruction": {"parts": [{"text": "persona"}]},
                "contents": [{"role": "user", "parts": [{"text": "I feel alone"}]}],
                "generationConfig": {"temperature": 1.0, "topP": 1.0, "maxOutputTokens": 150}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_success_response()))
            .expect(1)
            .mount(&server)
            .await;

        let engine =
            GeminiEngine::new(config_for_mock(LlmProvider::Gemini, &server.uri())).unwrap();
        let response = engine
            .generate(InferenceRequest::with_system("persona", "I feel alone"))
            .await
            .unwrap();

        assert_eq!(response.content, "That sounds really hard.");
        assert_eq!(response.model, "test-model-001");
        assert_eq!(response.usage.map(|u| u.prompt_tokens), Some(12));
    }

    #[tokio::test]
    async fn blocked_candidate_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let engine =
            GeminiEngine::new(config_for_mock(LlmProvider::Gemini, &server.uri())).unwrap();
        let err = engine
            .generate(InferenceRequest::simple("hi"))
            .await
            .unwrap_err();

        match err {
            InferenceError::InvalidResponse(msg) => assert!(msg.contains("SAFETY")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unauthorized_is_not_retryable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let engine =
            GeminiEngine::new(config_for_mock(LlmProvider::Gemini, &server.uri())).unwrap();
        let err = engine
            .generate(InferenceRequest::simple("hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, InferenceError::Unauthorized(_)));
        assert!(!err.is_retryable());
    }
}
