use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::types::{
    ErrorBody, ExportRequest, ExportResponse, GenerateRequest, GenerateResponse, MapResponse,
    ReportKind, TraceabilityResponse, UploadDocumentResponse, UploadTestCasesResponse,
    ValidateResponse,
};
use super::RemoteService;
use crate::config::{RequestConfig, ServiceConfig};
use crate::error::{ServiceError, ServiceResult};

/// HTTP client for the remote generation/validation/mapping service.
///
/// Thin transport layer: one method per endpoint, no retries, no caching.
/// Failures are reported to the workflow controller, which leaves the store
/// at its last-known-good state.
#[derive(Clone)]
pub struct HttpServiceClient {
    client: Client,
    base_url: String,
    request_config: RequestConfig,
}

impl HttpServiceClient {
    /// Create a new client against the configured service.
    pub fn new(config: &ServiceConfig, request_config: RequestConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(ServiceError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_config,
        })
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> ServiceError {
        if e.is_timeout() {
            ServiceError::Timeout {
                timeout_ms: self.request_config.timeout_ms,
            }
        } else {
            ServiceError::Http(e)
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ServiceResult<T> {
        let start = Instant::now();
        debug!(path, "Calling traceability service");

        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let parsed = parse_response(response).await;
        info!(
            path,
            latency_ms = start.elapsed().as_millis(),
            ok = parsed.is_ok(),
            "Service call finished"
        );
        parsed
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ServiceResult<T> {
        self.post_json(path, &serde_json::json!({})).await
    }

    async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ServiceResult<T> {
        let start = Instant::now();
        debug!(path, file = file_name, size = bytes.len(), "Uploading file");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let parsed = parse_response(response).await;
        info!(
            path,
            latency_ms = start.elapsed().as_millis(),
            ok = parsed.is_ok(),
            "Upload finished"
        );
        parsed
    }
}

/// Check the status and decode the body.
///
/// Non-success responses carry `{"error": message}`; the message is surfaced
/// verbatim, falling back to the raw body when the shape differs.
async fn parse_response<T: DeserializeOwned>(response: Response) -> ServiceResult<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        return Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ServiceError::InvalidResponse {
            message: format!("Failed to parse response: {}", e),
        })
}

#[async_trait::async_trait]
impl RemoteService for HttpServiceClient {
    async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ServiceResult<UploadDocumentResponse> {
        self.post_file("/upload", file_name, bytes).await
    }

    async fn upload_test_cases(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ServiceResult<UploadTestCasesResponse> {
        self.post_file("/upload_testcases", file_name, bytes).await
    }

    async fn generate_test_cases(&self, query: &str) -> ServiceResult<GenerateResponse> {
        self.post_json(
            "/query",
            &GenerateRequest {
                query: query.to_string(),
            },
        )
        .await
    }

    async fn validate_all(&self) -> ServiceResult<ValidateResponse> {
        self.post_empty("/validate").await
    }

    async fn map_all(&self) -> ServiceResult<MapResponse> {
        self.post_empty("/map").await
    }

    async fn build_traceability(&self) -> ServiceResult<TraceabilityResponse> {
        self.post_empty("/traceability").await
    }

    async fn export_pdf(&self, kind: ReportKind) -> ServiceResult<ExportResponse> {
        self.post_json("/export/pdf", &ExportRequest { kind }).await
    }

    async fn export_excel(&self) -> ServiceResult<ExportResponse> {
        self.post_empty("/export/excel").await
    }
}
