//! Core traits, error type and numeric helpers shared by every indicator.

use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// Errors surfaced while constructing, decoding or evaluating indicators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// Raised when a length is smaller than one.
    #[error("{indicator}: length must be at least 1 (got {length})")]
    InvalidLength {
        /// Indicator that rejected the value.
        indicator: &'static str,
        /// Offending length.
        length: i64,
    },
    /// Raised when an offset is negative or not supported by the indicator.
    #[error("{indicator}: invalid offset {offset}")]
    InvalidOffset {
        /// Indicator that rejected the value.
        indicator: &'static str,
        /// Offending offset.
        offset: i64,
    },
    /// Raised when an enumerated field holds an unknown value.
    #[error("unrecognized {field} value '{value}'")]
    InvalidEnum {
        /// Field holding the value (`trend`, `band`).
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// Raised when a numeric parameter falls outside its domain.
    #[error("{indicator}: invalid value {value} for parameter '{name}'")]
    InvalidParameter {
        /// Indicator that rejected the value.
        indicator: &'static str,
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
    /// Raised when a composite indicator is missing a required child.
    #[error("{indicator}: required source '{field}' is missing")]
    SubIndicatorMissing {
        /// Composite indicator.
        indicator: &'static str,
        /// Wire field of the absent child.
        field: &'static str,
    },
    /// Raised when a typed child slot holds an indicator of another kind.
    #[error("{indicator}: source '{field}' must be '{expected}', found '{found}'")]
    UnexpectedSource {
        /// Composite indicator.
        indicator: &'static str,
        /// Wire field of the child.
        field: &'static str,
        /// Tag the slot accepts.
        expected: &'static str,
        /// Tag that was supplied.
        found: &'static str,
    },
    /// Raised when the supplied window does not match the indicator's count.
    #[error("invalid data size: expected {expected} points, got {actual}")]
    InvalidDataSize {
        /// Number of points the indicator requires.
        expected: usize,
        /// Number of points supplied.
        actual: usize,
    },
    /// Raised when a serialized indicator names an unregistered tag.
    #[error("unknown indicator '{0}'")]
    UnknownTag(String),
    /// Raised when an indicator document is not well-formed JSON.
    #[error("malformed indicator document: {0}")]
    Decode(String),
    /// Raised when decimal arithmetic leaves the representable range.
    #[error("{0}: decimal arithmetic overflowed")]
    Overflow(&'static str),
}

impl IndicatorError {
    /// Convenience constructor for [`IndicatorError::InvalidLength`].
    pub fn invalid_length(indicator: &'static str, length: i64) -> Self {
        Self::InvalidLength { indicator, length }
    }

    /// Convenience constructor for [`IndicatorError::InvalidParameter`].
    pub fn invalid_parameter(
        indicator: &'static str,
        name: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::InvalidParameter {
            indicator,
            name,
            value: value.to_string(),
        }
    }

    /// Rejects a length whose derived window size does not fit in `usize`.
    pub(crate) fn oversized_length(indicator: &'static str, length: usize) -> Self {
        Self::invalid_parameter(indicator, "length", length)
    }

    /// Convenience constructor for [`IndicatorError::InvalidDataSize`].
    pub fn invalid_data_size(expected: usize, actual: usize) -> Self {
        Self::InvalidDataSize { expected, actual }
    }
}

impl From<serde_json::Error> for IndicatorError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Contract satisfied by every calculator.
///
/// `count` is a pure function of configuration. `calc` accepts exactly
/// `count` points while `calc_tail` evaluates the trailing `count` points of a
/// longer history; composites evaluate their sources through `calc_tail`.
pub trait Indicator {
    /// Human readable identifier used in errors and logs.
    fn name(&self) -> &'static str;

    /// Number of trailing points required by a single evaluation.
    fn count(&self) -> usize;

    /// Evaluates the trailing `count()` points of `points`.
    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal>;

    /// Evaluates a window holding exactly `count()` points.
    fn calc(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let expected = self.count();
        if points.len() != expected {
            return Err(IndicatorError::invalid_data_size(expected, points.len()));
        }
        self.calc_tail(points)
    }

    /// Evaluates every position of `points` that has a full window behind it, oldest first.
    fn calc_series(&self, points: &[Decimal]) -> IndicatorResult<Vec<Decimal>> {
        let count = self.count();
        if points.len() < count {
            return Err(IndicatorError::invalid_data_size(count, points.len()));
        }
        (count..=points.len())
            .map(|end| self.calc_tail(&points[..end]))
            .collect()
    }
}

/// Converts a `usize` into a `Decimal`, saturating on the (unreachable) overflow path.
pub(crate) fn decimal_from_usize(value: usize) -> Decimal {
    Decimal::from_usize(value).unwrap_or(Decimal::MAX)
}

/// Constant used by percentage-scaled oscillators.
pub(crate) const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Integer square root rounded down.
pub(crate) fn floor_sqrt(value: usize) -> usize {
    let (mut lo, mut hi) = (0usize, value.min(1 << (usize::BITS / 2)));
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        match mid.checked_mul(mid) {
            Some(square) if square <= value => lo = mid,
            _ => hi = mid - 1,
        }
    }
    lo
}

/// Lifts a `checked_*` result into the crate error.
pub(crate) fn checked(context: &'static str, value: Option<Decimal>) -> IndicatorResult<Decimal> {
    value.ok_or(IndicatorError::Overflow(context))
}

/// Sum that reports overflow instead of panicking.
pub(crate) fn checked_sum(
    context: &'static str,
    values: impl IntoIterator<Item = Decimal>,
) -> IndicatorResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| checked(context, acc.checked_add(value)))
}

/// `numerator / denominator`, zero when the denominator is zero.
pub(crate) fn ratio_or_zero(
    context: &'static str,
    numerator: Decimal,
    denominator: Decimal,
) -> IndicatorResult<Decimal> {
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    checked(context, numerator.checked_div(denominator))
}

/// Smallest and largest values of a non-empty slice.
pub(crate) fn min_max(values: &[Decimal]) -> Option<(Decimal, Decimal)> {
    let first = *values.first()?;
    Some(values.iter().fold((first, first), |(lo, hi), value| {
        (lo.min(*value), hi.max(*value))
    }))
}

/// Stochastic normalisation `(last - min) / (max - min) * 100`, zero on a flat range.
pub(crate) fn normalize_range(
    context: &'static str,
    values: &[Decimal],
) -> IndicatorResult<Decimal> {
    let (Some((lo, hi)), Some(last)) = (min_max(values), values.last()) else {
        return Ok(Decimal::ZERO);
    };
    let range = checked(context, hi.checked_sub(lo))?;
    let position = checked(context, last.checked_sub(lo))?;
    let ratio = ratio_or_zero(context, position, range)?;
    checked(context, ratio.checked_mul(HUNDRED))
}
