//! Entity types for the four reconciled collections.
//!
//! All identifiers are opaque server-assigned strings; stability is assumed
//! but not enforced. Wire field names follow the remote service exactly, so
//! these types deserialize straight out of its responses.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A generated or externally supplied test scenario.
///
/// The `status` field is the server's own label (e.g. "Generated") and is
/// unrelated to the derived validation status, which is computed from the
/// presence of a matching [`ValidationResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Server-assigned identifier. Not guaranteed unique across repeated
    /// generation runs; the store appends without deduplicating.
    pub id: String,
    /// Short human-readable title.
    #[serde(default)]
    pub title: String,
    /// Longer description of the scenario.
    #[serde(default)]
    pub description: String,
    /// Newline-separated execution steps.
    #[serde(default)]
    pub steps: String,
    /// Expected outcome.
    #[serde(default)]
    pub expected: String,
    /// Test classification (e.g. "Functional").
    #[serde(rename = "type", default)]
    pub case_type: String,
    /// Priority label (e.g. "Medium").
    #[serde(default)]
    pub priority: String,
    /// Server-side lifecycle label, not the derived validation status.
    #[serde(default)]
    pub status: String,
    /// Requirement the server linked this case to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_id: Option<String>,
}

/// Outcome of the rule-based quality check for a single test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Id of the test case this result refers to.
    pub test_case_id: String,
    /// Whether the case passed all validation rules.
    pub is_valid: bool,
    /// Quality score in [0, 100].
    pub score: f64,
    /// Rule violations, in rule order.
    #[serde(default)]
    pub errors: Vec<String>,
    /// Non-fatal findings, in rule order.
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// A single requirement matched to a test case by semantic similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedRequirement {
    /// Identifier of the matched requirement.
    pub requirement_id: String,
    /// Similarity score in [0, 1].
    pub similarity_score: f64,
}

/// Outcome of mapping one test case against the requirement set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    /// Id of the test case this result refers to.
    pub test_case_id: String,
    /// Title echoed by the server for display.
    #[serde(default)]
    pub test_case_title: String,
    /// Matched requirements, best first. Empty means unmapped.
    #[serde(default)]
    pub mapped_requirements: Vec<MappedRequirement>,
    /// Overall mapping confidence in [0, 1].
    pub mapping_confidence: f64,
    /// Algorithm label (e.g. "semantic_similarity").
    #[serde(default)]
    pub mapping_method: String,
    /// When the server computed this mapping (bare ISO timestamp, no offset).
    pub mapping_date: NaiveDateTime,
}

/// A requirement row within a traceability matrix snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirement {
    /// Requirement identifier (e.g. "REQ_001").
    pub id: String,
    /// Requirement classification (e.g. "functional").
    #[serde(rename = "type", default)]
    pub req_type: String,
    /// Priority label.
    #[serde(default)]
    pub priority: String,
    /// Requirement text, possibly truncated by the server.
    #[serde(default)]
    pub content: String,
    /// Whether any test case maps to this requirement.
    pub covered: bool,
    /// Number of test cases the server counted against it.
    #[serde(default)]
    pub test_case_count: u32,
}

/// Server-computed coverage totals, rendered verbatim and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallCoverage {
    pub total_requirements: u32,
    pub covered_requirements: u32,
    pub uncovered_requirements: u32,
    pub coverage_percentage: f64,
}

/// A requirement-centric coverage snapshot.
///
/// The whole matrix is replaced wholesale on every build; the server
/// recomputes it from its own authoritative mapping data, independent of the
/// client's mapping collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceabilityMatrix {
    /// Requirement rows in server order.
    pub requirements: Vec<Requirement>,
    /// Coverage summary taken verbatim from the snapshot.
    pub coverage: OverallCoverage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_case_deserializes_wire_fields() {
        let tc: TestCase = serde_json::from_str(
            r#"{
                "id": "TC_20260807_1",
                "title": "Login test",
                "description": "Generated test case",
                "steps": "1. Navigate to login page",
                "expected": "System behaves as specified",
                "type": "Functional",
                "priority": "Medium",
                "status": "Generated",
                "requirement_id": "REQ_001"
            }"#,
        )
        .unwrap();
        assert_eq!(tc.id, "TC_20260807_1");
        assert_eq!(tc.case_type, "Functional");
        assert_eq!(tc.requirement_id.as_deref(), Some("REQ_001"));
    }

    #[test]
    fn test_test_case_missing_optional_fields_default() {
        // The server builds cases as loose maps; only the id is load-bearing.
        let tc: TestCase = serde_json::from_str(r#"{"id": "TC_1"}"#).unwrap();
        assert_eq!(tc.id, "TC_1");
        assert_eq!(tc.title, "");
        assert_eq!(tc.requirement_id, None);
    }

    #[test]
    fn test_mapping_result_parses_bare_iso_date() {
        let m: MappingResult = serde_json::from_str(
            r#"{
                "test_case_id": "TC_1",
                "test_case_title": "Login test",
                "mapped_requirements": [{"requirement_id": "REQ_001", "similarity_score": 0.85}],
                "mapping_confidence": 0.85,
                "mapping_method": "semantic_similarity",
                "mapping_date": "2026-08-07T10:15:30.123456"
            }"#,
        )
        .unwrap();
        assert_eq!(m.mapped_requirements.len(), 1);
        assert_eq!(m.mapping_date.format("%Y-%m-%d").to_string(), "2026-08-07");
    }

    #[test]
    fn test_requirement_unknown_fields_ignored() {
        // Matrix rows carry extra server-side fields (category, mappings).
        let r: Requirement = serde_json::from_str(
            r#"{"id": "R1", "type": "functional", "priority": "high",
                "content": "The system shall...", "covered": true,
                "test_case_count": 2, "category": "auth"}"#,
        )
        .unwrap();
        assert!(r.covered);
        assert_eq!(r.test_case_count, 2);
    }
}
