//! Stochastic RSI.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{normalize_range, Indicator, IndicatorError, IndicatorResult};
use crate::indicators::rsi::Rsi;
use crate::window::resize;

/// Stochastic normalisation of `length` overlapping RSI values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StochRsi {
    #[serde(serialize_with = "codec::tagged")]
    rsi: Rsi,
    #[serde(skip)]
    count: usize,
}

impl StochRsi {
    /// Creates a new StochRSI over an RSI of the provided length.
    pub fn new(length: usize) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("StochRSI", 0));
        }
        Self::from_rsi(Rsi::new(length)?)
    }

    /// Wraps an already constructed RSI.
    pub fn from_rsi(rsi: Rsi) -> IndicatorResult<Self> {
        let length = rsi.length();
        let count = length
            .checked_mul(2)
            .map(|double| double - 1)
            .ok_or_else(|| IndicatorError::oversized_length("StochRSI", length))?;
        Ok(Self { rsi, count })
    }

    /// Returns the wrapped RSI.
    pub fn rsi(&self) -> &Rsi {
        &self.rsi
    }
}

impl Indicator for StochRsi {
    fn name(&self) -> &'static str {
        "StochRSI"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        let length = self.rsi.length();
        let values = (0..length)
            .map(|start| self.rsi.calc_tail(&window[start..start + length]))
            .collect::<IndicatorResult<Vec<_>>>()?;
        normalize_range("StochRSI", &values)
    }
}

#[derive(Deserialize)]
struct StochRsiFields {
    rsi: Option<Value>,
}

impl Codec for StochRsi {
    const TAG: &'static str = "stoch_rsi";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: StochRsiFields = codec::fields(value)?;
        let rsi = codec::typed_source::<Rsi>("StochRSI", "rsi", fields.rsi)?;
        Self::from_rsi(rsi)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::StochRsi;
    use crate::{Indicator, IndicatorError};

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn series(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|value| dec(value)).collect()
    }

    #[test]
    fn rejects_lengths_without_a_representable_window() {
        assert_eq!(
            StochRsi::new(usize::MAX).unwrap_err(),
            IndicatorError::invalid_parameter("StochRSI", "length", usize::MAX)
        );
    }

    #[test]
    fn window_covers_overlapping_rsi_values() {
        assert_eq!(StochRsi::new(1).unwrap().count(), 1);
        assert_eq!(StochRsi::new(3).unwrap().count(), 5);
        assert_eq!(StochRsi::new(14).unwrap().count(), 27);
    }

    #[test]
    fn normalizes_the_rsi_series() {
        let stoch_rsi = StochRsi::new(3).unwrap();
        // RSI values over [8,12,8], [12,8,12], [8,12,16] => 50, 50, 100
        let value = stoch_rsi
            .calc(&series(&["8", "12", "8", "12", "16"]))
            .unwrap();
        assert_eq!(value, dec("100"));

        // RSI values over [8,12,16], [12,16,12], [16,12,8] => 100, 50, 0
        let value = stoch_rsi
            .calc(&series(&["8", "12", "16", "12", "8"]))
            .unwrap();
        assert_eq!(value, Decimal::ZERO);
    }

    #[test]
    fn constant_input_yields_zero() {
        let stoch_rsi = StochRsi::new(4).unwrap();
        let points = vec![dec("3"); stoch_rsi.count()];
        assert_eq!(stoch_rsi.calc(&points).unwrap(), Decimal::ZERO);
    }
}
