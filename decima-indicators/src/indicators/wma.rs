//! Weighted Moving Average (WMA).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{checked, decimal_from_usize, Indicator, IndicatorError, IndicatorResult};
use crate::window::resize;

/// Linearly recency-weighted average: the oldest point weighs 1, the newest `length`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Wma {
    length: usize,
    #[serde(skip_serializing_if = "codec::is_zero")]
    offset: usize,
    #[serde(skip)]
    count: usize,
    #[serde(skip)]
    divisor: Decimal,
}

impl Wma {
    /// Creates a new WMA over the most recent `length` points.
    pub fn new(length: usize) -> IndicatorResult<Self> {
        Self::with_offset(length, 0)
    }

    /// Creates a new WMA whose window ends `offset` points before the newest point.
    pub fn with_offset(length: usize, offset: usize) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("WMA", 0));
        }
        let weights = length
            .checked_add(1)
            .and_then(|next| next.checked_mul(length))
            .ok_or_else(|| IndicatorError::oversized_length("WMA", length))?;
        let count = length
            .checked_add(offset)
            .ok_or_else(|| IndicatorError::invalid_parameter("WMA", "offset", offset))?;

        Ok(Self {
            length,
            offset,
            count,
            divisor: decimal_from_usize(weights / 2),
        })
    }

    /// Returns the configured lookback length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the configured offset.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Indicator for Wma {
    fn name(&self) -> &'static str {
        "WMA"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        let weighted = window[..self.length]
            .iter()
            .enumerate()
            .try_fold(Decimal::ZERO, |acc, (index, value)| {
                let product = checked("WMA", value.checked_mul(decimal_from_usize(index + 1)))?;
                checked("WMA", acc.checked_add(product))
            })?;
        checked("WMA", weighted.checked_div(self.divisor))
    }
}

#[derive(Deserialize)]
struct WmaFields {
    #[serde(default)]
    length: i64,
    #[serde(default)]
    offset: i64,
}

impl Codec for Wma {
    const TAG: &'static str = "wma";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: WmaFields = codec::fields(value)?;
        Self::with_offset(
            codec::length("WMA", fields.length)?,
            codec::offset("WMA", fields.offset)?,
        )
    }
}
