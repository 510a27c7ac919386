//! Derived, filterable views over the entity store.
//!
//! Every projector is a stateless function of the store and a filter enum,
//! recomputed on demand and never cached across mutations. Bucket assignment
//! goes through [`crate::classify`] so the same score can never render as
//! different tiers on different surfaces. An empty backing collection yields
//! an empty view, not an error.

use std::str::FromStr;

use serde::Serialize;

use crate::classify::{self, CaseStatus, ConfidenceTier, ValidityTier};
use crate::model::{MappingResult, OverallCoverage, Requirement, TestCase, ValidationResult};
use crate::store::EntityStore;

/// Filter over the test case collection by derived status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestCaseFilter {
    #[default]
    All,
    Passed,
    Failed,
    Pending,
}

/// Filter over the validation collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationFilter {
    #[default]
    All,
    Valid,
    Invalid,
    /// score > 80
    HighScore,
    /// score < 60
    LowScore,
}

/// Filter over the mapping collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingFilter {
    #[default]
    All,
    /// At least one mapped requirement.
    Mapped,
    /// No mapped requirements.
    Unmapped,
    /// mapping_confidence > 0.7
    HighConfidence,
    /// mapping_confidence <= 0.4
    LowConfidence,
}

/// Filter over the matrix requirement rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceabilityFilter {
    #[default]
    All,
    Covered,
    Uncovered,
}

/// Status counts over the entire unfiltered test case collection.
///
/// `pending` is `total_test_cases - len(validation_results)`, an approximation
/// that holds only while test case ids are unique; see the store docs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub passed: usize,
    pub failed: usize,
    pub pending: usize,
}

/// A test case together with its derived status.
#[derive(Debug, Clone, Serialize)]
pub struct TestCaseItem {
    #[serde(flatten)]
    pub case: TestCase,
    /// Derived from the current validation collection, not stored.
    pub derived_status: CaseStatus,
}

/// Filtered test case list plus the running tally over the whole collection.
#[derive(Debug, Clone, Serialize)]
pub struct TestCaseView {
    pub items: Vec<TestCaseItem>,
    pub tally: StatusTally,
}

/// A validation result together with its score tier.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationItem {
    #[serde(flatten)]
    pub result: ValidationResult,
    pub tier: ValidityTier,
}

/// Filtered validation result list.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationView {
    pub items: Vec<ValidationItem>,
}

/// A mapping result together with its confidence tier.
#[derive(Debug, Clone, Serialize)]
pub struct MappingItem {
    #[serde(flatten)]
    pub result: MappingResult,
    pub confidence: ConfidenceTier,
}

/// Filtered mapping result list.
#[derive(Debug, Clone, Serialize)]
pub struct MappingView {
    pub items: Vec<MappingItem>,
}

/// Filtered requirement rows plus the verbatim server coverage summary.
#[derive(Debug, Clone, Serialize)]
pub struct TraceabilityView {
    pub requirements: Vec<Requirement>,
    /// None until a matrix has been built.
    pub coverage: Option<OverallCoverage>,
}

/// Project the test case collection through a status filter.
pub fn test_case_view(store: &EntityStore, filter: TestCaseFilter) -> TestCaseView {
    let items = store
        .test_cases()
        .iter()
        .map(|case| TestCaseItem {
            derived_status: classify::case_status(store.validation_for(&case.id)),
            case: case.clone(),
        })
        .filter(|item| match filter {
            TestCaseFilter::All => true,
            TestCaseFilter::Passed => item.derived_status == CaseStatus::Valid,
            TestCaseFilter::Failed => item.derived_status == CaseStatus::Invalid,
            TestCaseFilter::Pending => item.derived_status == CaseStatus::Pending,
        })
        .collect();

    TestCaseView {
        items,
        tally: status_tally(store),
    }
}

/// Status counts over the entire unfiltered collection.
pub fn status_tally(store: &EntityStore) -> StatusTally {
    let passed = store
        .validation_results()
        .iter()
        .filter(|v| v.is_valid)
        .count();
    let failed = store.validation_results().len() - passed;
    StatusTally {
        passed,
        failed,
        pending: store
            .test_cases()
            .len()
            .saturating_sub(store.validation_results().len()),
    }
}

/// Project the validation collection through a filter.
///
/// The (60, 80] score band is reachable only via `All`, `Valid`, or `Invalid`:
/// a result can be valid yet excluded from both score filters.
pub fn validation_view(store: &EntityStore, filter: ValidationFilter) -> ValidationView {
    let items = store
        .validation_results()
        .iter()
        .map(|result| ValidationItem {
            tier: classify::validity_tier(result.score),
            result: result.clone(),
        })
        .filter(|item| match filter {
            ValidationFilter::All => true,
            ValidationFilter::Valid => item.result.is_valid,
            ValidationFilter::Invalid => !item.result.is_valid,
            ValidationFilter::HighScore => item.tier == ValidityTier::High,
            ValidationFilter::LowScore => item.tier == ValidityTier::Low,
        })
        .collect();

    ValidationView { items }
}

/// Project the mapping collection through a filter.
///
/// The (0.4, 0.7] confidence band is likewise unreachable by the confidence
/// filters.
pub fn mapping_view(store: &EntityStore, filter: MappingFilter) -> MappingView {
    let items = store
        .mapping_results()
        .iter()
        .map(|result| MappingItem {
            confidence: classify::confidence_tier(result.mapping_confidence),
            result: result.clone(),
        })
        .filter(|item| match filter {
            MappingFilter::All => true,
            MappingFilter::Mapped => !item.result.mapped_requirements.is_empty(),
            MappingFilter::Unmapped => item.result.mapped_requirements.is_empty(),
            MappingFilter::HighConfidence => item.confidence == ConfidenceTier::High,
            MappingFilter::LowConfidence => item.confidence == ConfidenceTier::Low,
        })
        .collect();

    MappingView { items }
}

/// Project the matrix snapshot through a coverage filter.
///
/// The coverage summary is passed through verbatim from the snapshot, never
/// recomputed from the filtered rows.
pub fn traceability_view(store: &EntityStore, filter: TraceabilityFilter) -> TraceabilityView {
    let Some(matrix) = store.matrix() else {
        return TraceabilityView {
            requirements: Vec::new(),
            coverage: None,
        };
    };

    let requirements = matrix
        .requirements
        .iter()
        .filter(|req| match filter {
            TraceabilityFilter::All => true,
            TraceabilityFilter::Covered => req.covered,
            TraceabilityFilter::Uncovered => !req.covered,
        })
        .cloned()
        .collect();

    TraceabilityView {
        requirements,
        coverage: Some(matrix.coverage.clone()),
    }
}

impl FromStr for TestCaseFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            "pending" => Ok(Self::Pending),
            other => Err(format!("unknown test case filter: {other}")),
        }
    }
}

impl FromStr for ValidationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "valid" => Ok(Self::Valid),
            "invalid" => Ok(Self::Invalid),
            "high" => Ok(Self::HighScore),
            "low" => Ok(Self::LowScore),
            other => Err(format!("unknown validation filter: {other}")),
        }
    }
}

impl FromStr for MappingFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "mapped" => Ok(Self::Mapped),
            "unmapped" => Ok(Self::Unmapped),
            "high" => Ok(Self::HighConfidence),
            "low" => Ok(Self::LowConfidence),
            other => Err(format!("unknown mapping filter: {other}")),
        }
    }
}

impl FromStr for TraceabilityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "covered" => Ok(Self::Covered),
            "uncovered" => Ok(Self::Uncovered),
            other => Err(format!("unknown traceability filter: {other}")),
        }
    }
}
