use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{scores_from_raw, SentimentClassifier};
use crate::models::SentimentScore;

const DEFAULT_ENDPOINT: &str = "http://localhost:8000/predict";

/// Configuration for the sentiment model service
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Prediction endpoint, e.g. "http://localhost:8000/predict"
    pub endpoint: String,
    /// Bearer token, if the service requires one
    pub api_key: Option<String>,
    /// Model name forwarded to the service
    pub model: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: None,
        }
    }
}

impl ClassifierConfig {
    /// Create config from environment variables
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("SENTIMENT_API_URL")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            api_key: std::env::var("SENTIMENT_API_KEY").ok(),
            model: std::env::var("SENTIMENT_MODEL").ok(),
        }
    }
}

/// Classifier backed by an HTTP model service.
///
/// The service receives all texts of one speech in a single request and
/// answers with one label and one set of class probabilities per text.
pub struct HttpSentimentClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl HttpSentimentClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl SentimentClassifier for HttpSentimentClassifier {
    async fn classify(&self, texts: &[String]) -> Result<Vec<SentimentScore>> {
        let request = PredictRequest {
            texts,
            output_probabilities: true,
            model: self.config.model.as_deref(),
        };
        debug!("Classifying {} sentences", texts.len());

        let mut builder = self.client.post(&self.config.endpoint).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to send request to sentiment service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Sentiment service error: {} - {}", status, body);
        }

        let response: PredictResponse = response
            .json()
            .await
            .context("Failed to parse sentiment service response")?;

        Ok(scores_from_raw(&response.labels, &response.probabilities)?)
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    texts: &'a [String],
    output_probabilities: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    labels: Vec<String>,
    /// Per text: `[["positive", p], ["negative", p], ["neutral", p]]`
    probabilities: Vec<Vec<(String, f64)>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let texts = vec!["Gut.".to_string(), "Schlecht.".to_string()];
        let request = PredictRequest {
            texts: &texts,
            output_probabilities: true,
            model: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"texts": ["Gut.", "Schlecht."], "output_probabilities": true})
        );
    }

    #[test]
    fn test_response_shape() {
        let body = r#"{
            "labels": ["positive"],
            "probabilities": [[["positive", 0.91], ["negative", 0.04], ["neutral", 0.05]]]
        }"#;

        let response: PredictResponse = serde_json::from_str(body).unwrap();
        let scores = scores_from_raw(&response.labels, &response.probabilities).unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].weights.positive, 0.91);
        assert_eq!(scores[0].weights.neutral, 0.05);
    }

    #[test]
    fn test_config_default_endpoint() {
        let config = ClassifierConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8000/predict");
        assert!(config.api_key.is_none());
    }
}
