//! Dispersion statistics over decimal windows.
//!
//! All functions treat an empty slice as having zero dispersion and report
//! [`IndicatorError::Overflow`](crate::IndicatorError::Overflow) when an
//! intermediate sum leaves the decimal range.

use rust_decimal::{Decimal, MathematicalOps};

use crate::core::{checked, checked_sum, decimal_from_usize, IndicatorResult};

/// Arithmetic mean.
pub fn mean(values: &[Decimal]) -> IndicatorResult<Decimal> {
    average("mean", values.iter().copied(), values.len())
}

/// Mean absolute deviation around the arithmetic mean.
pub fn mean_deviation(values: &[Decimal]) -> IndicatorResult<Decimal> {
    let center = mean(values)?;
    let deviations = values
        .iter()
        .map(|value| checked("mean deviation", value.checked_sub(center)).map(|diff| diff.abs()))
        .collect::<IndicatorResult<Vec<_>>>()?;
    average("mean deviation", deviations, values.len())
}

/// Population variance.
pub fn variance(values: &[Decimal]) -> IndicatorResult<Decimal> {
    let center = mean(values)?;
    let squares = values
        .iter()
        .map(|value| {
            let diff = checked("variance", value.checked_sub(center))?;
            checked("variance", diff.checked_mul(diff))
        })
        .collect::<IndicatorResult<Vec<_>>>()?;
    average("variance", squares, values.len())
}

/// Population standard deviation.
pub fn standard_deviation(values: &[Decimal]) -> IndicatorResult<Decimal> {
    let variance = variance(values)?;
    if variance.is_sign_negative() || variance.is_zero() {
        return Ok(Decimal::ZERO);
    }
    Ok(variance.sqrt().unwrap_or(Decimal::ZERO))
}

fn average(
    context: &'static str,
    values: impl IntoIterator<Item = Decimal>,
    len: usize,
) -> IndicatorResult<Decimal> {
    if len == 0 {
        return Ok(Decimal::ZERO);
    }
    let sum = checked_sum(context, values)?;
    checked(context, sum.checked_div(decimal_from_usize(len)))
}
