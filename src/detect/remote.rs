//! HTTP detection backend.
//!
//! Talks to a detection service that wraps a pretrained model:
//!
//! * `GET  {endpoint}/health`: `2xx` once the model is loaded.
//! * `POST {endpoint}/detect?width=W&height=H`: body is the raw RGBA frame;
//!   the response is a JSON array of COCO-SSD style predictions:
//!   `[{"class": "person", "score": 0.91, "bbox": [x, y, w, h]}]`.
//!
//! All connection details come from [`ModelConfig`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::model::{ModelLoader, ObjectDetector};
use super::result::{BoundingBox, DetectError, Detection};
use crate::camera::Frame;
use crate::config::ModelConfig;

/// Wire format of one prediction.
#[derive(Debug, Deserialize)]
struct WirePrediction {
    class: String,
    score: f32,
    bbox: [f32; 4],
}

impl From<WirePrediction> for Detection {
    fn from(p: WirePrediction) -> Self {
        let [x, y, w, h] = p.bbox;
        Detection::new(p.class, p.score, BoundingBox::new(x, y, w, h))
    }
}

/// Parse a `/detect` response body.
fn parse_predictions(body: &str) -> Result<Vec<Detection>, DetectError> {
    let predictions: Vec<WirePrediction> =
        serde_json::from_str(body).map_err(|e| DetectError::Parse(e.to_string()))?;
    Ok(predictions.into_iter().map(Detection::from).collect())
}

// ---------------------------------------------------------------------------
// HttpDetector
// ---------------------------------------------------------------------------

/// Sends frames to a remote detection service.
pub struct HttpDetector {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDetector {
    fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl ObjectDetector for HttpDetector {
    async fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, DetectError> {
        let url = format!("{}/detect", self.endpoint);

        let response = self
            .client
            .post(&url)
            .query(&[("width", frame.width()), ("height", frame.height())])
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(frame.pixels().to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DetectError::Inference(format!("HTTP {status}")));
        }

        let body = response.text().await?;
        parse_predictions(&body)
    }
}

// ---------------------------------------------------------------------------
// HttpModelLoader
// ---------------------------------------------------------------------------

/// Waits for the remote service to report ready and hands out an
/// [`HttpDetector`].
pub struct HttpModelLoader {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpModelLoader {
    /// Build a loader from config.  Returns `None` when no endpoint is set.
    pub fn from_config(config: &ModelConfig) -> Option<Self> {
        let endpoint = config.endpoint.as_deref()?.trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Some(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ModelLoader for HttpModelLoader {
    async fn load(&self) -> Result<Arc<dyn ObjectDetector>, DetectError> {
        let url = format!("{}/health", self.endpoint);
        log::info!("detect: checking model service at {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DetectError::Load(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DetectError::Load(format!(
                "model service answered HTTP {}",
                response.status()
            )));
        }

        Ok(Arc::new(HttpDetector::new(
            self.client.clone(),
            self.endpoint.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coco_ssd_predictions() {
        let body = r#"[
            {"class": "person", "score": 0.91, "bbox": [10.0, 20.0, 100.0, 200.0]},
            {"class": "cup", "score": 0.55, "bbox": [300, 40, 25, 30]}
        ]"#;

        let detections = parse_predictions(body).unwrap();

        assert_eq!(detections.len(), 2);
        assert_eq!(detections[0].class, "person");
        assert_eq!(detections[0].bbox, BoundingBox::new(10.0, 20.0, 100.0, 200.0));
        assert_eq!(detections[1].class, "cup");
        assert_eq!(detections[1].bbox.width, 25.0);
    }

    #[test]
    fn empty_array_is_no_detections() {
        assert!(parse_predictions("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = parse_predictions(r#"{"error": "boom"}"#).unwrap_err();
        assert!(matches!(err, DetectError::Parse(_)));
    }

    #[test]
    fn loader_requires_endpoint() {
        assert!(HttpModelLoader::from_config(&ModelConfig::default()).is_none());

        let config = ModelConfig {
            endpoint: Some("http://localhost:8500/".into()),
            ..ModelConfig::default()
        };
        let loader = HttpModelLoader::from_config(&config).unwrap();
        assert_eq!(loader.endpoint, "http://localhost:8500");
    }
}
