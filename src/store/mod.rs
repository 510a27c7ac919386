//! In-memory store for the four reconciled collections.
//!
//! Pure data with no behavior beyond invariant-preserving mutations: test
//! cases only ever append, the other three collections are replaced wholesale
//! per run. Nothing here touches the network; the workflow controller decides
//! when a mutation is legal.

use crate::model::{MappingResult, TestCase, TraceabilityMatrix, ValidationResult};

/// Holds the four collections and their cross-references.
///
/// Joins between collections are by first matching `test_case_id`: when the
/// append-only test case collection contains duplicate ids, only the first
/// result is used for derived views. This is a documented limitation carried
/// over from the service contract, not a correctness guarantee.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    test_cases: Vec<TestCase>,
    validation_results: Vec<ValidationResult>,
    mapping_results: Vec<MappingResult>,
    matrix: Option<TraceabilityMatrix>,
}

impl EntityStore {
    /// Create an empty store. All four collections start empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Test cases in arrival order.
    pub fn test_cases(&self) -> &[TestCase] {
        &self.test_cases
    }

    /// Validation results from the most recent validation run.
    pub fn validation_results(&self) -> &[ValidationResult] {
        &self.validation_results
    }

    /// Mapping results from the most recent mapping run.
    pub fn mapping_results(&self) -> &[MappingResult] {
        &self.mapping_results
    }

    /// The most recent traceability matrix snapshot, if one has been built.
    pub fn matrix(&self) -> Option<&TraceabilityMatrix> {
        self.matrix.as_ref()
    }

    /// First validation result with a matching id, if any.
    pub fn validation_for(&self, test_case_id: &str) -> Option<&ValidationResult> {
        self.validation_results
            .iter()
            .find(|v| v.test_case_id == test_case_id)
    }

    /// First mapping result with a matching id, if any.
    pub fn mapping_for(&self, test_case_id: &str) -> Option<&MappingResult> {
        self.mapping_results
            .iter()
            .find(|m| m.test_case_id == test_case_id)
    }

    /// Append newly arrived test cases, preserving order.
    ///
    /// No deduplication: re-issuing the same query yields duplicate entries
    /// with the same id.
    pub fn append_test_cases(&mut self, new_cases: Vec<TestCase>) {
        self.test_cases.extend(new_cases);
    }

    /// Replace the validation collection wholesale. No merge with prior runs.
    pub fn replace_validation_results(&mut self, all: Vec<ValidationResult>) {
        self.validation_results = all;
    }

    /// Replace the mapping collection wholesale. No merge with prior runs.
    pub fn replace_mapping_results(&mut self, all: Vec<MappingResult>) {
        self.mapping_results = all;
    }

    /// Replace the matrix snapshot wholesale.
    pub fn replace_matrix(&mut self, matrix: TraceabilityMatrix) {
        self.matrix = Some(matrix);
    }

    /// Empty all four collections at once.
    ///
    /// Destructive and irreversible; only the workflow controller's confirmed
    /// clear operation may call this.
    pub fn clear(&mut self) {
        self.test_cases.clear();
        self.validation_results.clear();
        self.mapping_results.clear();
        self.matrix = None;
    }
}
