//! Point computation for answered questions.

use crate::model::Leverage;

/// Points at stake for a single question before leverage.
pub const BASE_POINTS: i64 = 10;

/// Signed point delta for an answered question.
///
/// Correct answers earn [`BASE_POINTS`], incorrect answers lose the
/// same, and a pending leverage scales the result via
/// [`scaled_points`].
#[must_use]
pub fn points_for(correct: bool, leverage: Option<Leverage>) -> i64 {
    let base = if correct { BASE_POINTS } else { -BASE_POINTS };
    scaled_points(base, leverage)
}

/// Applies a leverage multiplier to a base point value.
///
/// Half-integer results are rounded half-away-from-zero
/// (`f64::round`). With the stock ±10 base every multiplier lands on
/// an exact integer, but the mode matters for other bases:
/// `scaled_points(5, Some(Leverage::Half))` is 3, not 2, and
/// `scaled_points(-5, ..)` is -3.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn scaled_points(base: i64, leverage: Option<Leverage>) -> i64 {
    match leverage {
        Some(leverage) => (base as f64 * leverage.multiplier()).round() as i64,
        None => base,
    }
}
