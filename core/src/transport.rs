use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::classification::{ClassificationResult, ClassifyTextRequest, HealthStatus};
use crate::error::TransportError;
use crate::submission::FileSubmission;

/// Network collaborator that runs the actual classification.
///
/// Implementations own their timeout and abort semantics; any failure is
/// reported as a [`TransportError`] and treated uniformly by the session.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn classify_text(&self, text: &str) -> Result<ClassificationResult, TransportError>;

    async fn classify_file(
        &self,
        file: &FileSubmission,
    ) -> Result<ClassificationResult, TransportError>;
}

/// reqwest-backed transport against the SparkMail HTTP API.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let mut base_url = Url::parse(api_url)
            .map_err(|e| TransportError::Network(format!("Invalid API URL '{api_url}': {e}")))?;
        // Relative joins drop the last path segment unless it ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::Network(format!("Invalid endpoint '{path}': {e}")))
    }

    /// Probe `GET /health`.
    pub async fn health(&self) -> Result<HealthStatus, TransportError> {
        let resp = self
            .client
            .get(self.endpoint("health")?)
            .send()
            .await
            .map_err(network)?;
        let body = read_success_body(resp).await?;
        serde_json::from_slice(&body).map_err(|e| TransportError::MalformedBody(e.to_string()))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn classify_text(&self, text: &str) -> Result<ClassificationResult, TransportError> {
        let resp = self
            .client
            .post(self.endpoint("classify-text")?)
            .json(&ClassifyTextRequest { text })
            .send()
            .await
            .map_err(network)?;
        ClassificationResult::from_body(&read_success_body(resp).await?)
    }

    async fn classify_file(
        &self,
        file: &FileSubmission,
    ) -> Result<ClassificationResult, TransportError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(network)?;
        let form = Form::new().part("file", part);

        let resp = self
            .client
            .post(self.endpoint("classify-file")?)
            .multipart(form)
            .send()
            .await
            .map_err(network)?;
        ClassificationResult::from_body(&read_success_body(resp).await?)
    }
}

fn network(e: reqwest::Error) -> TransportError {
    TransportError::Network(e.to_string())
}

async fn read_success_body(resp: reqwest::Response) -> Result<Vec<u8>, TransportError> {
    let status = resp.status();
    let body = resp.bytes().await.map_err(network)?;
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }
    Ok(body.to_vec())
}
