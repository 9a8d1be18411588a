//! Candidate scoring for the constant matcher
//!
//! A candidate is scored by its absolute distance to the target value.
//! Lower error is better; NaN never counts as better or as a discovery.

/// Score of one evaluated candidate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore {
    /// Numeric value of the candidate
    pub value: f64,

    /// Absolute distance to the target
    pub error: f64,

    /// Whether the error is strictly below the tolerance
    pub discovery: bool,
}

pub fn absolute_error(value: f64, target: f64) -> f64 {
    (value - target).abs()
}

/// Strictly below tolerance; NaN is never a discovery
pub fn is_discovery(error: f64, tolerance: f64) -> bool {
    error < tolerance
}

/// Whether `candidate_error` beats `best_error`
///
/// Strict comparison, so on a tie the earlier candidate stays best. With
/// `best_error` starting at infinity an infinite or NaN error never wins.
pub fn improves(candidate_error: f64, best_error: f64) -> bool {
    candidate_error < best_error
}

pub fn score_candidate(value: f64, target: f64, tolerance: f64) -> CandidateScore {
    let error = absolute_error(value, target);
    CandidateScore {
        value,
        error,
        discovery: is_discovery(error, tolerance),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_error() {
        assert_eq!(absolute_error(3.0, 5.0), 2.0);
        assert_eq!(absolute_error(5.0, 3.0), 2.0);
        assert!(absolute_error(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn test_discovery_is_strict() {
        assert!(is_discovery(0.0009, 1e-3));
        assert!(!is_discovery(1e-3, 1e-3));
        assert!(!is_discovery(f64::NAN, 1e-3));
    }

    #[test]
    fn test_improves_keeps_earlier_on_tie() {
        assert!(improves(0.5, f64::INFINITY));
        assert!(improves(0.1, 0.5));
        assert!(!improves(0.5, 0.5));
        assert!(!improves(f64::NAN, f64::INFINITY));
        assert!(!improves(f64::INFINITY, f64::INFINITY));
    }

    #[test]
    fn test_score_candidate() {
        let score = score_candidate(9.8696, 9.87, 1e-3);
        assert!((score.error - 0.0004).abs() < 1e-9);
        assert!(score.discovery);

        let miss = score_candidate(1.0, 9.87, 1e-3);
        assert!(!miss.discovery);
    }
}
