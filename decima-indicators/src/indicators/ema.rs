//! Exponential Moving Average (EMA).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{checked, decimal_from_usize, Indicator, IndicatorError, IndicatorResult};
use crate::indicators::sma::Sma;
use crate::window::resize;

/// Exponentially-weighted moving average seeded with an SMA.
///
/// The first `length` points of the window produce the seed; the remaining
/// `length - 1` points advance the recurrence with `alpha = 2 / (length + 1)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ema {
    length: usize,
    #[serde(skip)]
    count: usize,
    #[serde(skip)]
    sma: Sma,
    #[serde(skip)]
    alpha: Decimal,
}

impl Ema {
    /// Creates a new EMA with the provided length.
    pub fn new(length: usize) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("EMA", 0));
        }
        let (Some(next), Some(count)) = (
            length.checked_add(1),
            length.checked_mul(2).map(|double| double - 1),
        ) else {
            return Err(IndicatorError::oversized_length("EMA", length));
        };
        let sma = Sma::new(length)?;
        let alpha = Decimal::TWO / decimal_from_usize(next);

        Ok(Self {
            length,
            count,
            sma,
            alpha,
        })
    }

    /// Returns the configured length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Smoothing factor applied to each new point.
    pub fn alpha(&self) -> Decimal {
        self.alpha
    }

    /// One step of the recurrence `x * alpha + prev * (1 - alpha)`.
    pub(crate) fn advance(&self, prev: Decimal, value: Decimal) -> IndicatorResult<Decimal> {
        let step = checked("EMA", value.checked_sub(prev))?;
        let scaled = checked("EMA", step.checked_mul(self.alpha))?;
        checked("EMA", scaled.checked_add(prev))
    }

    /// Seed followed by every intermediate value of the recurrence over the
    /// trailing `count()` points; always `length` values long.
    pub(crate) fn running(&self, points: &[Decimal]) -> IndicatorResult<Vec<Decimal>> {
        let window = resize(points, self.count())?;
        let (seed_window, rest) = window.split_at(self.length);
        let mut values = Vec::with_capacity(self.length);
        let mut current = self.sma.calc_tail(seed_window)?;
        values.push(current);
        for value in rest {
            current = self.advance(current, *value)?;
            values.push(current);
        }
        Ok(values)
    }
}

impl Indicator for Ema {
    fn name(&self) -> &'static str {
        "EMA"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        let (seed_window, rest) = window.split_at(self.length);
        let seed = self.sma.calc_tail(seed_window)?;
        rest.iter()
            .try_fold(seed, |prev, value| self.advance(prev, *value))
    }
}

#[derive(Deserialize)]
struct EmaFields {
    #[serde(default)]
    length: i64,
}

impl Codec for Ema {
    const TAG: &'static str = "ema";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: EmaFields = codec::fields(value)?;
        Self::new(codec::length("EMA", fields.length)?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::Ema;
    use crate::{Indicator, IndicatorError};

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn series(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|value| dec(value)).collect()
    }

    #[test]
    fn window_is_twice_the_length_minus_one() {
        assert_eq!(Ema::new(1).unwrap().count(), 1);
        assert_eq!(Ema::new(3).unwrap().count(), 5);
        assert_eq!(Ema::new(10).unwrap().count(), 19);
    }

    #[test]
    fn seeds_with_sma_then_recurs() {
        let ema = Ema::new(3).unwrap();
        // seed = (1 + 2 + 3) / 3 = 2, alpha = 0.5
        // 0.5*(4-2)+2 = 3, 0.5*(5-3)+3 = 4
        let value = ema.calc(&series(&["1", "2", "3", "4", "5"])).unwrap();
        assert_eq!(value.round_dp(4), dec("4"));
    }

    #[test]
    fn running_values_cover_seed_and_recurrence() {
        let ema = Ema::new(3).unwrap();
        let values = ema.running(&series(&["1", "2", "3", "4", "5"])).unwrap();
        let rounded: Vec<_> = values.into_iter().map(|v| v.round_dp(4)).collect();
        assert_eq!(rounded, series(&["2", "3", "4"]));
    }

    #[test]
    fn length_one_is_identity() {
        let ema = Ema::new(1).unwrap();
        assert_eq!(ema.calc(&series(&["42.5"])).unwrap(), dec("42.5"));
    }

    #[test]
    fn constant_input_is_preserved() {
        let ema = Ema::new(4).unwrap();
        let points = vec![dec("17.25"); ema.count()];
        assert_eq!(ema.calc(&points).unwrap(), dec("17.25"));
    }

    #[test]
    fn rejects_lengths_without_a_representable_window() {
        assert_eq!(
            Ema::new(usize::MAX).unwrap_err(),
            IndicatorError::invalid_parameter("EMA", "length", usize::MAX)
        );
    }

    #[test]
    fn overflowing_recurrence_is_an_error() {
        let ema = Ema::new(2).unwrap();
        // the seed fits; stepping from it to the newest point does not
        let low = dec("-30000000000000000000000000000");
        let points = [low, low, Decimal::MAX];
        assert_eq!(
            ema.calc(&points).unwrap_err(),
            IndicatorError::Overflow("EMA")
        );
    }

    #[test]
    fn rejects_zero_length() {
        assert_eq!(
            Ema::new(0).unwrap_err(),
            IndicatorError::invalid_length("EMA", 0)
        );
    }
}
