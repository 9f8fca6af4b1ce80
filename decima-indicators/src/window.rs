//! Trailing-window extraction shared by every `calc` implementation.

use rust_decimal::Decimal;

use crate::core::{IndicatorError, IndicatorResult};

/// Returns the trailing `length` points of `points`, discarding older history.
///
/// Fails with [`IndicatorError::InvalidLength`] when `length` is zero and with
/// [`IndicatorError::InvalidDataSize`] when fewer than `length` points are supplied.
pub fn resize(points: &[Decimal], length: usize) -> IndicatorResult<&[Decimal]> {
    if length == 0 {
        return Err(IndicatorError::invalid_length("window", 0));
    }
    if points.len() < length {
        return Err(IndicatorError::invalid_data_size(length, points.len()));
    }
    Ok(&points[points.len() - length..])
}
