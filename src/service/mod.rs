//! Remote service client for the five traceability endpoints.
//!
//! This module provides:
//! - The [`RemoteService`] trait, the seam the workflow controller talks
//!   through (and the hook for scripted fakes in tests)
//! - [`HttpServiceClient`], the `reqwest`-backed implementation
//! - Request/response wire types matching the service contract

mod client;
mod types;

pub use client::HttpServiceClient;
pub use types::*;

use async_trait::async_trait;

use crate::error::ServiceResult;

/// The remote generation/validation/mapping service.
///
/// All calls are single-shot: no retries, no cancellation. Any non-success
/// status or transport failure surfaces as a [`crate::error::ServiceError`]
/// carrying the server's error message verbatim where one exists.
#[async_trait]
pub trait RemoteService: Send + Sync {
    /// POST /upload — submit a requirements document for extraction.
    async fn upload_document(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ServiceResult<UploadDocumentResponse>;

    /// POST /upload_testcases — submit an existing test case file for merging.
    async fn upload_test_cases(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ServiceResult<UploadTestCasesResponse>;

    /// POST /query — generate test cases for a query.
    async fn generate_test_cases(&self, query: &str) -> ServiceResult<GenerateResponse>;

    /// POST /validate — run the bulk validation pass over all server-side cases.
    async fn validate_all(&self) -> ServiceResult<ValidateResponse>;

    /// POST /map — run the bulk requirement-mapping pass.
    async fn map_all(&self) -> ServiceResult<MapResponse>;

    /// POST /traceability — build a fresh coverage matrix snapshot.
    async fn build_traceability(&self) -> ServiceResult<TraceabilityResponse>;

    /// POST /export/pdf — render a PDF report of the given kind.
    async fn export_pdf(&self, kind: ReportKind) -> ServiceResult<ExportResponse>;

    /// POST /export/excel — render the matrix as a spreadsheet.
    async fn export_excel(&self) -> ServiceResult<ExportResponse>;
}
