use crate::config::Config;
use crate::core::post::Credential;
use crate::error::PostGenError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

/// Anything that can turn a system + user prompt into one completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        credential: &Credential,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PostGenError>;
}

pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Result<Self, PostGenError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(
        &self,
        credential: &Credential,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PostGenError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt }
            ]
        });

        let res = self
            .client
            .post(&self.endpoint)
            .bearer_auth(credential.expose())
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let err_text = res.text().await.unwrap_or_default();
            let detail = error_message(&err_text);
            log::error!("API Error {status}: {detail}");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PostGenError::Auth(detail),
                _ => PostGenError::Upstream(format!("API Error {status}: {detail}")),
            });
        }

        let body = res.text().await?;
        let completion: ChatCompletion = serde_json::from_str(&body)?;
        first_choice_text(completion)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Takes `choices[0].message.content`, untouched.
fn first_choice_text(completion: ChatCompletion) -> Result<String, PostGenError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| PostGenError::Upstream("No text content returned".into()))
}

/// Prefers the API's `error.message` field, falls back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> Config {
        Config {
            api_base: server.uri(),
            timeout: Duration::from_secs(5),
            ..Config::default()
        }
    }

    fn completion(text: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": text }, "finish_reason": "stop" },
                { "index": 1, "message": { "role": "assistant", "content": "second" }, "finish_reason": "stop" }
            ]
        })
    }

    #[tokio::test]
    async fn sends_chat_payload_and_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4",
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "usr" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Hook...\n#leadership\n")))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&config_for(&server)).unwrap();
        let text = client
            .complete(&Credential::new("sk-test"), "sys", "usr")
            .await
            .unwrap();

        assert_eq!(text, "  Hook...\n#leadership\n");
    }

    #[tokio::test]
    async fn unauthorized_and_forbidden_map_to_auth_error() {
        for status in [401, 403] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                    "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
                })))
                .mount(&server)
                .await;

            let client = OpenAiClient::new(&config_for(&server)).unwrap();
            let err = client
                .complete(&Credential::new("sk-bad"), "sys", "usr")
                .await
                .unwrap_err();

            match err {
                PostGenError::Auth(msg) => assert_eq!(msg, "Incorrect API key provided"),
                other => panic!("{status}: expected auth error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn quota_and_server_errors_are_upstream() {
        for status in [429, 500] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status).set_body_string("busy"))
                .mount(&server)
                .await;

            let client = OpenAiClient::new(&config_for(&server)).unwrap();
            let err = client
                .complete(&Credential::new("sk-test"), "sys", "usr")
                .await
                .unwrap_err();

            match err {
                PostGenError::Upstream(msg) => {
                    assert!(msg.contains(&status.to_string()), "{msg}");
                    assert!(msg.contains("busy"), "{msg}");
                }
                other => panic!("expected upstream error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn malformed_bodies_are_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(&config_for(&server)).unwrap();
        let err = client
            .complete(&Credential::new("sk-test"), "sys", "usr")
            .await
            .unwrap_err();
        assert!(matches!(err, PostGenError::Upstream(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = Config {
            timeout: Duration::from_millis(200),
            ..config_for(&server)
        };
        let client = OpenAiClient::new(&config).unwrap();
        let err = client
            .complete(&Credential::new("sk-test"), "sys", "usr")
            .await
            .unwrap_err();
        assert!(matches!(err, PostGenError::Upstream(_)));
    }

    #[test]
    fn missing_content_is_rejected() {
        let parse = |body: Value| serde_json::from_value::<ChatCompletion>(body).unwrap();

        let empty = parse(json!({ "choices": [] }));
        assert!(matches!(first_choice_text(empty), Err(PostGenError::Upstream(_))));

        let null_content = parse(json!({ "choices": [{ "message": { "content": null } }] }));
        assert!(matches!(first_choice_text(null_content), Err(PostGenError::Upstream(_))));

        let no_choices: Result<ChatCompletion, _> = serde_json::from_value(json!({ "id": "x" }));
        assert!(matches!(no_choices.map_err(PostGenError::from), Err(PostGenError::Upstream(_))));
    }

    #[test]
    fn error_message_falls_back_to_body() {
        assert_eq!(error_message("gateway down\n"), "gateway down");
        assert_eq!(error_message(r#"{"error":{"message":"quota"}}"#), "quota");
    }
}
