use serde::{Deserialize, Serialize};

use crate::model::{
    MappingResult, OverallCoverage, Requirement, TestCase, TraceabilityMatrix, ValidationResult,
};

/// Request body for test case generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub query: String,
}

/// Report flavor for PDF export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    TestCases,
    Traceability,
    Validation,
}

/// Request body for PDF export
#[derive(Debug, Clone, Serialize)]
pub struct ExportRequest {
    #[serde(rename = "type")]
    pub kind: ReportKind,
}

/// Response from document upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadDocumentResponse {
    /// Number of text chunks the server extracted.
    pub chunks: u64,
    /// Number of requirements found; absent when extraction found none.
    #[serde(default)]
    pub requirements: u64,
}

/// Response from external test case upload
#[derive(Debug, Clone, Deserialize)]
pub struct UploadTestCasesResponse {
    /// Total test cases the server now holds after merging the file.
    pub total_test_cases: u64,
}

/// Response from test case generation
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(rename = "testCases")]
    pub test_cases: Vec<TestCase>,
}

/// Server-side validation run totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: u64,
    pub valid: u64,
    pub invalid: u64,
}

/// Response from a bulk validation run
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateResponse {
    pub validation_results: Vec<ValidationResult>,
    pub summary: ValidationSummary,
}

/// Server-side mapping run totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingSummary {
    pub total_test_cases: u64,
    pub mapped_test_cases: u64,
    pub total_requirements: u64,
    pub covered_requirements: u64,
}

/// Response from a bulk mapping run
#[derive(Debug, Clone, Deserialize)]
pub struct MapResponse {
    pub mapping_results: Vec<MappingResult>,
    pub summary: MappingSummary,
}

/// The matrix portion of a traceability response
#[derive(Debug, Clone, Deserialize)]
pub struct MatrixPayload {
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

/// The coverage portion of a traceability response
#[derive(Debug, Clone, Deserialize)]
pub struct CoverageStats {
    pub overall_coverage: OverallCoverage,
}

/// Response from a traceability build
#[derive(Debug, Clone, Deserialize)]
pub struct TraceabilityResponse {
    pub matrix: MatrixPayload,
    pub coverage_stats: CoverageStats,
}

/// Response from either export endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ExportResponse {
    pub download_url: String,
}

/// Error body carried by non-success responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl TraceabilityResponse {
    /// Assemble the stored matrix entity from the two response sections.
    pub fn into_matrix(self) -> TraceabilityMatrix {
        TraceabilityMatrix {
            requirements: self.matrix.requirements,
            coverage: self.coverage_stats.overall_coverage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_response_uses_camel_case_key() {
        let resp: GenerateResponse =
            serde_json::from_str(r#"{"query": "login", "testCases": [{"id": "T1"}]}"#).unwrap();
        assert_eq!(resp.test_cases.len(), 1);
        assert_eq!(resp.test_cases[0].id, "T1");
    }

    #[test]
    fn test_upload_response_requirements_defaults_to_zero() {
        let resp: UploadDocumentResponse = serde_json::from_str(r#"{"chunks": 12}"#).unwrap();
        assert_eq!(resp.chunks, 12);
        assert_eq!(resp.requirements, 0);
    }

    #[test]
    fn test_traceability_response_assembles_matrix() {
        let resp: TraceabilityResponse = serde_json::from_str(
            r#"{
                "matrix": {
                    "requirements": [
                        {"id": "R1", "type": "functional", "priority": "high",
                         "content": "...", "covered": true, "test_case_count": 1}
                    ]
                },
                "coverage_stats": {
                    "overall_coverage": {
                        "total_requirements": 2,
                        "covered_requirements": 1,
                        "uncovered_requirements": 1,
                        "coverage_percentage": 50.0
                    }
                }
            }"#,
        )
        .unwrap();

        let matrix = resp.into_matrix();
        assert_eq!(matrix.requirements.len(), 1);
        assert_eq!(matrix.coverage.coverage_percentage, 50.0);
    }

    #[test]
    fn test_report_kind_serializes_snake_case() {
        let body = serde_json::to_string(&ExportRequest {
            kind: ReportKind::TestCases,
        })
        .unwrap();
        assert_eq!(body, r#"{"type":"test_cases"}"#);
    }
}
