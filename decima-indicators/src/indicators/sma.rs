//! Simple Moving Average (SMA).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{
    checked, checked_sum, decimal_from_usize, Indicator, IndicatorError, IndicatorResult,
};
use crate::window::resize;

/// Computes the arithmetic mean over a fixed window.
///
/// An optional `offset` shifts the window back in time: the average covers the
/// `length` points that end `offset` points before the newest one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sma {
    length: usize,
    #[serde(skip_serializing_if = "codec::is_zero")]
    offset: usize,
    #[serde(skip)]
    count: usize,
    #[serde(skip)]
    divisor: Decimal,
}

impl Sma {
    /// Creates a new SMA over the most recent `length` points.
    pub fn new(length: usize) -> IndicatorResult<Self> {
        Self::with_offset(length, 0)
    }

    /// Creates a new SMA whose window ends `offset` points before the newest point.
    pub fn with_offset(length: usize, offset: usize) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("SMA", 0));
        }
        let count = length
            .checked_add(offset)
            .ok_or_else(|| IndicatorError::invalid_parameter("SMA", "offset", offset))?;

        Ok(Self {
            length,
            offset,
            count,
            divisor: decimal_from_usize(length),
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

impl Indicator for Sma {
    fn name(&self) -> &'static str {
        "SMA"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        let sum = checked_sum("SMA", window[..self.length].iter().copied())?;
        checked("SMA", sum.checked_div(self.divisor))
    }
}

#[derive(Deserialize)]
struct SmaFields {
    #[serde(default)]
    length: i64,
    #[serde(default)]
    offset: i64,
}

impl Codec for Sma {
    const TAG: &'static str = "sma";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: SmaFields = codec::fields(value)?;
        Self::with_offset(
            codec::length("SMA", fields.length)?,
            codec::offset("SMA", fields.offset)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::json;

    use super::Sma;
    use crate::codec::Codec;
    use crate::{Indicator, IndicatorError};

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn series(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|value| dec(value)).collect()
    }

    #[test]
    fn averages_the_window() {
        let sma = Sma::new(3).unwrap();
        assert_eq!(sma.count(), 3);
        assert_eq!(sma.calc(&series(&["30", "31", "32"])).unwrap(), dec("31"));
    }

    #[test]
    fn offset_skips_the_newest_points() {
        let sma = Sma::with_offset(2, 1).unwrap();
        assert_eq!(sma.count(), 3);
        assert_eq!(sma.calc(&series(&["1", "3", "100"])).unwrap(), dec("2"));
    }

    #[test]
    fn strict_calc_rejects_wrong_sizes() {
        let sma = Sma::new(3).unwrap();
        let err = sma.calc(&series(&["1", "2"])).unwrap_err();
        assert_eq!(err, IndicatorError::invalid_data_size(3, 2));
        let err = sma.calc(&series(&["1", "2", "3", "4"])).unwrap_err();
        assert_eq!(err, IndicatorError::invalid_data_size(3, 4));
    }

    #[test]
    fn tail_calc_ignores_older_history() {
        let sma = Sma::new(2).unwrap();
        assert_eq!(
            sma.calc_tail(&series(&["100", "100", "1", "3"])).unwrap(),
            dec("2")
        );
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let sma = Sma::new(2).unwrap();
        assert_eq!(
            sma.calc(&[Decimal::MAX, Decimal::MAX]).unwrap_err(),
            IndicatorError::Overflow("SMA")
        );
    }

    #[test]
    fn rejects_offsets_past_the_addressable_window() {
        assert!(matches!(
            Sma::with_offset(2, usize::MAX).unwrap_err(),
            IndicatorError::InvalidParameter { name: "offset", .. }
        ));
    }

    #[test]
    fn rejects_zero_length() {
        assert_eq!(
            Sma::new(0).unwrap_err(),
            IndicatorError::invalid_length("SMA", 0)
        );
    }

    #[test]
    fn decodes_and_validates_fields() {
        let sma = Sma::decode(json!({"name": "sma", "length": 4, "offset": 2})).unwrap();
        assert_eq!(sma, Sma::with_offset(4, 2).unwrap());

        let err = Sma::decode(json!({"name": "sma"})).unwrap_err();
        assert_eq!(err, IndicatorError::invalid_length("SMA", 0));

        let err = Sma::decode(json!({"name": "sma", "length": 3, "offset": -1})).unwrap_err();
        assert!(matches!(err, IndicatorError::InvalidOffset { offset: -1, .. }));
    }
}
