//! Mapping numeric values onto bracket indices.

use crate::core::domain::BracketScheme;

/// Index of the first bracket whose `max` is at or above `value`.
///
/// Returns `None` when the scheme is empty, when `value` exceeds every
/// threshold (only possible if the last threshold is finite), or when `value`
/// is NaN. A value sitting exactly on `scheme[i].max` belongs to bracket `i`.
///
/// # Examples
///
/// ```
/// use bracketcast::algorithms::brackets::find_bracket;
/// use bracketcast::core::domain::BracketScheme;
///
/// let scheme = BracketScheme::from_pairs(&[("<=91", 91.0), ("92-93", 93.0), ("94-95", 95.0)]);
/// assert_eq!(find_bracket(&scheme, 91.0), Some(0));
/// assert_eq!(find_bracket(&scheme, 92.5), Some(1));
/// assert_eq!(find_bracket(&scheme, 96.0), None);
/// ```
pub fn find_bracket(scheme: &BracketScheme, value: f64) -> Option<usize> {
    if value.is_nan() {
        return None;
    }
    scheme.iter().position(|bracket| value <= bracket.max)
}

/// Constrain `idx` into `[0, n - 1]`. With `n == 0` the result is 0.
pub fn clamp_index(idx: usize, n: usize) -> usize {
    idx.min(n.saturating_sub(1))
}

/// Lower (exclusive) bound of bracket `idx`: the previous threshold, or `-∞`
/// for the first bracket.
pub fn lower_bound(scheme: &BracketScheme, idx: usize) -> f64 {
    if idx == 0 {
        return f64::NEG_INFINITY;
    }
    scheme
        .get(idx - 1)
        .map(|b| b.max)
        .unwrap_or(f64::NEG_INFINITY)
}

/// True iff `idx` is a valid bracket and `value` lies in its half-open
/// interval `(lower_bound, max]`. Non-finite values are never contained.
pub fn bracket_contains_actual(scheme: &BracketScheme, idx: usize, value: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    match scheme.get(idx) {
        Some(bracket) => value > lower_bound(scheme, idx) && value <= bracket.max,
        None => false,
    }
}
