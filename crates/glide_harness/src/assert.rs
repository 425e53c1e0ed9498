//! Assertion helpers for headless controller runs.

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, AssertionResult::Passed)
    }

    /// First failure of `self` and `other`
    pub fn and(self, other: AssertionResult) -> AssertionResult {
        match self {
            AssertionResult::Passed => other,
            failed => failed,
        }
    }
}

/// Smallest tolerance applied to float comparisons
const EPSILON: f64 = 1e-9;

pub fn evaluate_close(label: &str, expected: f64, actual: f64, tolerance: f64) -> AssertionResult {
    if (expected - actual).abs() <= tolerance.max(EPSILON) {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "value_mismatch".to_string(),
            message: format!("{label}: expected {expected} (±{tolerance}), got {actual}"),
        }
    }
}

pub fn evaluate_count(label: &str, expected: usize, actual: usize) -> AssertionResult {
    if expected == actual {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "count_mismatch".to_string(),
            message: format!("{label}: expected {expected}, got {actual}"),
        }
    }
}

pub fn evaluate_flag(label: &str, expected: bool, actual: bool) -> AssertionResult {
    if expected == actual {
        AssertionResult::Passed
    } else {
        AssertionResult::Failed {
            code: "flag_mismatch".to_string(),
            message: format!("{label}: expected {expected}, got {actual}"),
        }
    }
}
