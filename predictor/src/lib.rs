use reco_core::indexer::{Prediction, PredictionFailed, TopicPredictor};
use reco_core::TopicAssignment;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "X-Api-Key";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("prediction service host is required")]
    MissingHost,

    #[error("prediction service api key is required")]
    MissingApiKey,

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection settings for the prediction service, supplied by the caller
/// at startup and passed into [`HttpPredictor::new`].
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    pub host: String,
    pub port: Option<u16>,
    pub api_key: String,
    pub use_tls: bool,
    pub timeout_secs: u64,
}

impl PredictorConfig {
    pub fn endpoint(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        match self.port {
            Some(port) => format!("{scheme}://{}:{port}/predict", self.host),
            None => format!("{scheme}://{}/predict", self.host),
        }
    }
}

/// [`TopicPredictor`] backed by the prediction service's HTTP endpoint.
pub struct HttpPredictor {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
}

impl HttpPredictor {
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        if config.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
            api_key: config.api_key.clone(),
        })
    }
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    parameters: PredictParameters,
    document: PredictDocument<'a>,
}

#[derive(Serialize)]
struct PredictParameters {
    labels: bool,
    words: bool,
    topics_limit: usize,
    qualifiers: bool,
    filters_in: Vec<&'static str>,
    filters_out: Vec<&'static str>,
}

#[derive(Serialize)]
struct PredictDocument<'a> {
    uri: &'a str,
}

#[derive(Deserialize)]
struct PredictResponse {
    status: ResponseStatus,
    body: Option<ResponseBody>,
}

#[derive(Deserialize)]
struct ResponseStatus {
    code: u32,
}

#[derive(Deserialize)]
struct ResponseBody {
    #[serde(default)]
    topics: Vec<WireTopic>,
    #[serde(default)]
    extracted_title: String,
}

#[derive(Deserialize)]
struct WireTopic {
    uuid: String,
    score: f32,
    #[serde(default)]
    labels: Vec<WireLabel>,
}

#[derive(Deserialize)]
struct WireLabel {
    label: String,
}

impl TopicPredictor for HttpPredictor {
    fn predict(&self, reference: &str, topic_limit: usize) -> Result<Prediction, PredictionFailed> {
        let request = PredictRequest {
            parameters: PredictParameters {
                labels: true,
                words: true,
                topics_limit: topic_limit,
                qualifiers: true,
                filters_in: vec!["content_extraction"],
                filters_out: vec!["content", "title"],
            },
            document: PredictDocument { uri: reference },
        };

        tracing::debug!(%reference, endpoint = %self.endpoint, "requesting prediction");
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| PredictionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PredictionFailed(format!("http status {}", response.status())));
        }
        let parsed: PredictResponse = response
            .json()
            .map_err(|e| PredictionFailed(format!("malformed response: {e}")))?;
        into_prediction(parsed)
    }
}

/// Unwrap the service envelope into a [`Prediction`]; every failure shape
/// collapses into [`PredictionFailed`].
fn into_prediction(parsed: PredictResponse) -> Result<Prediction, PredictionFailed> {
    if parsed.status.code != 200 {
        return Err(PredictionFailed(format!("predictor status {}", parsed.status.code)));
    }
    let body = parsed
        .body
        .ok_or_else(|| PredictionFailed("response body missing".into()))?;
    let topics = body
        .topics
        .into_iter()
        .map(|t| TopicAssignment {
            id: t.uuid,
            label: t.labels.into_iter().next().map(|l| l.label).unwrap_or_default(),
            score: t.score,
        })
        .collect();
    Ok(Prediction { title: body.extracted_title, topics })
}
