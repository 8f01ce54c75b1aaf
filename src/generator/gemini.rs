use super::CompletionProvider;
use crate::error::GenerationError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    // A blocked prompt comes back without candidates at all
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: String,
}

/// Extract the generated text from a `generateContent` response body
pub fn parse_response(body: &str) -> Result<String, GenerationError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content.parts.into_iter().next())
        .map(|part| part.text)
        .ok_or(GenerationError::EmptyCandidates)
}

fn request_body(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
    }
}

/// Text completion through the Gemini `generateContent` endpoint.
///
/// One attempt per call; the client timeout is the only abort.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    pub fn with_defaults(api_key: impl Into<String>) -> Result<Self, GenerationError> {
        Self::new(api_key, DEFAULT_MODEL, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let endpoint = self.endpoint();
        debug!(
            model = %self.model,
            %endpoint,
            prompt_len = prompt.len(),
            "calling completion provider"
        );

        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                let e = GenerationError::from(e);
                error!("failed to reach completion provider: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!("completion provider returned {}: {}", status, body);
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = parse_response(&body).map_err(|e| {
            error!("unusable completion response: {}", e);
            e
        })?;
        info!("generated {} characters with {}", text.len(), self.model);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_request_body_shape() {
        let json = serde_json::to_value(request_body("hello")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }

    #[test]
    fn test_parse_response_first_candidate() {
        let body = r#"{"candidates": [
            {
                "content": {"parts": [{"text": "first"}, {"text": "ignored"}], "role": "model"},
                "finishReason": "STOP"
            },
            {"content": {"parts": [{"text": "second"}]}}
        ]}"#;
        assert_eq!(parse_response(body).unwrap(), "first");
    }

    #[test]
    fn test_parse_response_empty_candidates() {
        assert_matches!(
            parse_response(r#"{"candidates": []}"#),
            Err(GenerationError::EmptyCandidates)
        );
        assert_matches!(
            parse_response(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#),
            Err(GenerationError::EmptyCandidates)
        );
        assert_matches!(
            parse_response(r#"{"candidates": [{"content": {"role": "model"}}]}"#),
            Err(GenerationError::EmptyCandidates)
        );
    }

    #[test]
    fn test_parse_response_malformed_body() {
        assert_matches!(
            parse_response("<html>oops</html>"),
            Err(GenerationError::MalformedBody(_))
        );
        assert_matches!(
            parse_response(r#"{"candidates": [{"content": {"parts": [{"txt": "x"}]}}]}"#),
            Err(GenerationError::MalformedBody(_))
        );
    }

    #[test]
    fn test_endpoint_format() {
        let provider = GeminiProvider::new(
            "secret",
            "gemini-test",
            "http://localhost:9999/v1beta/",
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
        assert!(!provider.endpoint().contains("secret"));
    }
}
