//! Rate of Change (ROC).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{checked, ratio_or_zero, Indicator, IndicatorError, IndicatorResult, HUNDRED};
use crate::window::resize;

/// Percentage change between the oldest and the newest point of the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roc {
    length: usize,
}

impl Roc {
    /// Creates a new ROC with the provided length.
    pub fn new(length: usize) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("ROC", 0));
        }

        Ok(Self { length })
    }

    /// Returns the configured length.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Indicator for Roc {
    fn name(&self) -> &'static str {
        "ROC"
    }

    fn count(&self) -> usize {
        self.length
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        let (first, last) = (window[0], window[window.len() - 1]);
        let change = checked("ROC", last.checked_sub(first))?;
        // a zero base has no defined rate
        let ratio = ratio_or_zero("ROC", change, first)?;
        checked("ROC", ratio.checked_mul(HUNDRED))
    }
}

#[derive(Deserialize)]
struct RocFields {
    #[serde(default)]
    length: i64,
}

impl Codec for Roc {
    const TAG: &'static str = "roc";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: RocFields = codec::fields(value)?;
        Self::new(codec::length("ROC", fields.length)?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::Roc;
    use crate::{Indicator, IndicatorError};

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn series(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|value| dec(value)).collect()
    }

    #[test]
    fn overflowing_rate_is_an_error_not_zero() {
        let roc = Roc::new(2).unwrap();
        let points = series(&["0.000001", "100000000000000000000000"]);
        assert_eq!(roc.calc(&points).unwrap_err(), IndicatorError::Overflow("ROC"));
    }

    #[test]
    fn measures_percentage_change() {
        let roc = Roc::new(3).unwrap();
        assert_eq!(roc.calc(&series(&["50", "70", "55"])).unwrap(), dec("10"));
        assert_eq!(roc.calc(&series(&["80", "70", "60"])).unwrap(), dec("-25"));
    }

    #[test]
    fn zero_base_yields_zero() {
        let roc = Roc::new(2).unwrap();
        assert_eq!(roc.calc(&series(&["0", "5"])).unwrap(), Decimal::ZERO);
    }
}
