//! Jina AI embeddings client.
//!
//! Minimal client around `POST {endpoint}/v1/embeddings` (OpenAI-compatible
//! request/response shape). The bearer credential is attached per request so
//! that a service without a key can still be constructed; such calls fail
//! with `MissingApiKey` before touching the network.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, HttpError, Provider, ProviderError, ProviderErrorKind,
        make_snippet,
    },
};

/// Thin client for the Jina embeddings API.
#[derive(Debug)]
pub struct JinaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_embeddings: String,
}

impl JinaService {
    /// Creates a new [`JinaService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not Jina
    /// - `EmptyModel` if `cfg.model` is blank
    /// - `InvalidEndpoint` if `cfg.endpoint` is not http(s)
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Jina {
            return Err(
                ProviderError::new(Provider::Jina, ProviderErrorKind::InvalidProvider).into(),
            );
        }

        if cfg.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel.into());
        }

        let endpoint = cfg.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ProviderError::new(
                Provider::Jina,
                ProviderErrorKind::InvalidEndpoint(cfg.endpoint.clone()),
            )
            .into());
        }

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(60));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let url_embeddings = format!("{}/v1/embeddings", endpoint.trim_end_matches('/'));

        info!(
            provider = ?cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            has_key = cfg.api_key.is_some(),
            "JinaService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_embeddings,
        })
    }

    /// Embeds a single text.
    ///
    /// # Errors
    /// - `MissingApiKey` when no credential is configured
    /// - `HttpStatus` for non-2xx responses
    /// - `Decode` if the JSON cannot be parsed or `data` is empty
    /// - [`AiLlmError::HttpTransport`] for network failures
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        let out = self.request(EmbeddingsInput::One(input)).await?;
        out.into_iter().next().ok_or_else(|| {
            ProviderError::new(
                Provider::Jina,
                ProviderErrorKind::Decode("empty `data` in embeddings response".into()),
            )
            .into()
        })
    }

    /// Embeds several texts in one request; output order matches input order.
    pub async fn embeddings_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let out = self.request(EmbeddingsInput::Many(inputs)).await?;
        if out.len() != inputs.len() {
            return Err(ProviderError::new(
                Provider::Jina,
                ProviderErrorKind::Decode(format!(
                    "expected {} embeddings, got {}",
                    inputs.len(),
                    out.len()
                )),
            )
            .into());
        }
        Ok(out)
    }

    async fn request(&self, input: EmbeddingsInput<'_>) -> Result<Vec<Vec<f32>>, AiLlmError> {
        let api_key = self
            .cfg
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::new(Provider::Jina, ProviderErrorKind::MissingApiKey))?;

        let started = Instant::now();
        let body = EmbeddingsRequest {
            model: &self.cfg.model,
            input,
        };

        debug!(model = %self.cfg.model, "POST {}", self.url_embeddings);

        let resp = self
            .client
            .post(&self.url_embeddings)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embeddings.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                model = %self.cfg.model,
                latency_ms = started.elapsed().as_millis(),
                "Jina /v1/embeddings returned non-success status"
            );

            return Err(ProviderError::new(
                Provider::Jina,
                ProviderErrorKind::HttpStatus(HttpError {
                    status,
                    url,
                    snippet,
                }),
            )
            .into());
        }

        let out: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                Provider::Jina,
                ProviderErrorKind::Decode(format!("serde error: {e}; expected `data[].embedding`")),
            )
        })?;

        let mut items = out.data;
        items.sort_by_key(|item| item.index);

        debug!(
            model = %self.cfg.model,
            vectors = items.len(),
            latency_ms = started.elapsed().as_millis(),
            "embeddings completed"
        );

        Ok(items.into_iter().map(|item| item.embedding).collect())
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EmbeddingsInput<'a> {
    One(&'a str),
    Many(&'a [String]),
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: EmbeddingsInput<'a>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn cfg(endpoint: &str, key: Option<&str>) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Jina,
            model: "jina-embeddings-v3".into(),
            endpoint: endpoint.into(),
            api_key: key.map(String::from),
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn embeds_single_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("authorization", "Bearer jina-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "jina-embeddings-v3",
                "input": "hello"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"index": 0, "embedding": [0.1, 0.2, 0.3]}]
            })))
            .mount(&server)
            .await;

        let svc = JinaService::new(cfg(&server.uri(), Some("jina-test"))).unwrap();
        let v = svc.embeddings("hello").await.unwrap();
        assert_eq!(v, vec![0.1, 0.2, 0.3]);
    }

    #[tokio::test]
    async fn batch_is_returned_in_input_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"index": 1, "embedding": [2.0]},
                    {"index": 0, "embedding": [1.0]}
                ]
            })))
            .mount(&server)
            .await;

        let svc = JinaService::new(cfg(&server.uri(), Some("k"))).unwrap();
        let out = svc
            .embeddings_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(out, vec![vec![1.0], vec![2.0]]);
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let svc = JinaService::new(cfg(&server.uri(), None)).unwrap();
        let err = svc.embeddings("hello").await.unwrap_err();
        assert!(err.is_missing_api_key());
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let svc = JinaService::new(cfg(&server.uri(), Some("bad"))).unwrap();
        let err = svc.embeddings("hello").await.unwrap_err();
        assert_eq!(err.http_status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn empty_data_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&server)
            .await;

        let svc = JinaService::new(cfg(&server.uri(), Some("k"))).unwrap();
        let err = svc.embeddings("hello").await.unwrap_err();
        assert!(matches!(
            err,
            AiLlmError::Provider(ProviderError {
                kind: ProviderErrorKind::Decode(_),
                ..
            })
        ));
    }

    #[test]
    fn rejects_wrong_provider() {
        let mut c = cfg("http://localhost", Some("k"));
        c.provider = LlmProvider::Gemini;
        assert!(JinaService::new(c).is_err());
    }

    #[test]
    fn blank_model_is_rejected() {
        let mut c = cfg("http://localhost:9", Some("k"));
        c.model = "  ".into();
        let err = JinaService::new(c).unwrap_err();
        assert!(matches!(err, AiLlmError::Config(ConfigError::EmptyModel)));
    }
}
