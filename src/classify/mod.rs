//! Score-to-bucket classification rules.
//!
//! Three pure decision tables shared by every derived view, so a given score
//! can never show different buckets on different surfaces. These functions are
//! the only place the thresholds appear.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::ValidationResult;

/// Bucket for a validation quality score (0-100 scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidityTier {
    /// score > 80
    High,
    /// 60 <= score <= 80
    Mid,
    /// score < 60
    Low,
}

/// Bucket for a similarity or mapping confidence score (0-1 scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    /// score > 0.7
    High,
    /// 0.4 < score <= 0.7
    Medium,
    /// score <= 0.4
    Low,
}

/// Derived validation status of a test case.
///
/// Never stored on the case itself: `Pending` is defined as the absence of a
/// matching result in the current validation collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Pending,
    Valid,
    Invalid,
}

/// Classify a validation score. Boundary values 60 and 80 both land in `Mid`.
pub fn validity_tier(score: f64) -> ValidityTier {
    if score > 80.0 {
        ValidityTier::High
    } else if score < 60.0 {
        ValidityTier::Low
    } else {
        ValidityTier::Mid
    }
}

/// Classify a similarity or confidence score. 0.7 is `Medium`, 0.4 is `Low`.
pub fn confidence_tier(score: f64) -> ConfidenceTier {
    if score > 0.7 {
        ConfidenceTier::High
    } else if score > 0.4 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Derive a test case's status from its (first-match) validation result.
pub fn case_status(validation: Option<&ValidationResult>) -> CaseStatus {
    match validation {
        None => CaseStatus::Pending,
        Some(v) if v.is_valid => CaseStatus::Valid,
        Some(_) => CaseStatus::Invalid,
    }
}

impl fmt::Display for ValidityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidityTier::High => write!(f, "high"),
            ValidityTier::Mid => write!(f, "mid"),
            ValidityTier::Low => write!(f, "low"),
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceTier::High => write!(f, "high"),
            ConfidenceTier::Medium => write!(f, "medium"),
            ConfidenceTier::Low => write!(f, "low"),
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseStatus::Pending => write!(f, "pending"),
            CaseStatus::Valid => write!(f, "valid"),
            CaseStatus::Invalid => write!(f, "invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(is_valid: bool) -> ValidationResult {
        ValidationResult {
            test_case_id: "TC_1".to_string(),
            is_valid,
            score: 50.0,
            errors: vec![],
            warnings: vec![],
        }
    }

    #[test]
    fn test_validity_tier_boundaries() {
        assert_eq!(validity_tier(100.0), ValidityTier::High);
        assert_eq!(validity_tier(80.1), ValidityTier::High);
        // 80 belongs to the mid band, not high
        assert_eq!(validity_tier(80.0), ValidityTier::Mid);
        assert_eq!(validity_tier(70.0), ValidityTier::Mid);
        // 60 belongs to the mid band, not low
        assert_eq!(validity_tier(60.0), ValidityTier::Mid);
        assert_eq!(validity_tier(59.9), ValidityTier::Low);
        assert_eq!(validity_tier(0.0), ValidityTier::Low);
    }

    #[test]
    fn test_confidence_tier_boundaries() {
        assert_eq!(confidence_tier(1.0), ConfidenceTier::High);
        assert_eq!(confidence_tier(0.71), ConfidenceTier::High);
        // 0.7 belongs to medium, not high
        assert_eq!(confidence_tier(0.7), ConfidenceTier::Medium);
        assert_eq!(confidence_tier(0.5), ConfidenceTier::Medium);
        // 0.4 is inclusive on the low side
        assert_eq!(confidence_tier(0.4), ConfidenceTier::Low);
        assert_eq!(confidence_tier(0.0), ConfidenceTier::Low);
    }

    #[test]
    fn test_buckets_partition_domain() {
        // Every score maps to exactly one bucket per rule.
        for i in 0..=1000 {
            let score = i as f64 / 10.0;
            let _ = validity_tier(score);
        }
        for i in 0..=100 {
            let score = i as f64 / 100.0;
            let _ = confidence_tier(score);
        }
    }

    #[test]
    fn test_case_status_from_presence() {
        assert_eq!(case_status(None), CaseStatus::Pending);
        assert_eq!(case_status(Some(&result(true))), CaseStatus::Valid);
        assert_eq!(case_status(Some(&result(false))), CaseStatus::Invalid);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(ValidityTier::Mid.to_string(), "mid");
        assert_eq!(ConfidenceTier::Medium.to_string(), "medium");
        assert_eq!(CaseStatus::Pending.to_string(), "pending");
    }
}
