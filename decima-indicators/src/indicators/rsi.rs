//! Relative Strength Index (RSI).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{checked, Indicator, IndicatorError, IndicatorResult, HUNDRED};
use crate::window::resize;

/// Momentum oscillator scaled between 0 and 100.
///
/// The `length - 1` changes inside the window are split into gains and
/// losses; equal totals yield 50.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rsi {
    length: usize,
}

impl Rsi {
    /// Creates a new RSI with the provided length.
    pub fn new(length: usize) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("RSI", 0));
        }

        Ok(Self { length })
    }

    /// Returns the configured length.
    pub fn length(&self) -> usize {
        self.length
    }

    fn compute_rsi(gain: Decimal, loss: Decimal) -> IndicatorResult<Decimal> {
        if loss.is_zero() {
            return Ok(HUNDRED);
        }
        if gain.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let rs = checked("RSI", gain.checked_div(loss))?;
        let scale = checked("RSI", rs.checked_add(Decimal::ONE))?;
        Ok(HUNDRED - HUNDRED / scale)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &'static str {
        "RSI"
    }

    fn count(&self) -> usize {
        self.length
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        let (gain, loss) = window.windows(2).try_fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(gain, loss), pair| -> IndicatorResult<(Decimal, Decimal)> {
                let change = checked("RSI", pair[1].checked_sub(pair[0]))?;
                if change.is_sign_positive() {
                    Ok((checked("RSI", gain.checked_add(change))?, loss))
                } else {
                    Ok((gain, checked("RSI", loss.checked_sub(change))?))
                }
            },
        )?;
        Self::compute_rsi(gain, loss)
    }
}

#[derive(Deserialize)]
struct RsiFields {
    #[serde(default)]
    length: i64,
}

impl Codec for Rsi {
    const TAG: &'static str = "rsi";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: RsiFields = codec::fields(value)?;
        Self::new(codec::length("RSI", fields.length)?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::Rsi;
    use crate::{Indicator, IndicatorError};

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn series(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|value| dec(value)).collect()
    }

    #[test]
    fn overflowing_changes_are_errors() {
        let rsi = Rsi::new(2).unwrap();
        assert_eq!(
            rsi.calc(&[Decimal::MIN, Decimal::MAX]).unwrap_err(),
            IndicatorError::Overflow("RSI")
        );
        // a gain too large relative to the loss for their ratio
        let rsi = Rsi::new(3).unwrap();
        let points = series(&["0.1", "0", "70000000000000000000000000000"]);
        assert_eq!(rsi.calc(&points).unwrap_err(), IndicatorError::Overflow("RSI"));
    }

    #[test]
    fn balanced_moves_sit_at_fifty() {
        let rsi = Rsi::new(3).unwrap();
        assert_eq!(rsi.calc(&series(&["8", "12", "8"])).unwrap(), dec("50"));
    }

    #[test]
    fn computes_expected_values() {
        let rsi = Rsi::new(4).unwrap();
        // gains 2 + 2, loss 1 => rs = 4 => 100 - 100 / 5
        let value = rsi.calc(&series(&["10", "12", "11", "13"])).unwrap();
        assert_eq!(value, dec("80"));
    }

    #[test]
    fn one_sided_moves_hit_the_bounds() {
        let rsi = Rsi::new(3).unwrap();
        assert_eq!(rsi.calc(&series(&["1", "2", "3"])).unwrap(), dec("100"));
        assert_eq!(rsi.calc(&series(&["3", "2", "1"])).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn constant_input_registers_as_overbought() {
        let rsi = Rsi::new(3).unwrap();
        assert_eq!(rsi.calc(&series(&["1", "1", "1"])).unwrap(), dec("100"));
    }
}
