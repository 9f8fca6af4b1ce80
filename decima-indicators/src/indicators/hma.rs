//! Hull Moving Average (HMA).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{checked, floor_sqrt, Indicator, IndicatorError, IndicatorResult};
use crate::indicators::wma::Wma;
use crate::window::resize;

/// `WMA(sqrt(n))` over the series `2 * WMA(n / 2) - WMA(n)`.
///
/// With `k = floor(sqrt(length))` the doubled short/long difference is taken
/// over each of the `k` trailing sub-windows of `length` points, and the
/// resulting `k` values are re-smoothed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hma {
    #[serde(serialize_with = "codec::tagged")]
    wma: Wma,
    #[serde(skip)]
    half: Wma,
    #[serde(skip)]
    smoothing: Wma,
    #[serde(skip)]
    count: usize,
}

impl Hma {
    /// Creates a new HMA with the provided length.
    pub fn new(length: usize) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("HMA", 0));
        }
        Self::from_wma(Wma::new(length)?)
    }

    /// Wraps an already constructed WMA; shifted averages are rejected.
    pub fn from_wma(wma: Wma) -> IndicatorResult<Self> {
        if wma.offset() != 0 {
            return Err(IndicatorError::InvalidOffset {
                indicator: "HMA",
                offset: i64::try_from(wma.offset()).unwrap_or(i64::MAX),
            });
        }
        let length = wma.length();
        let half = Wma::new((length / 2).max(1))?;
        let smoothing = Wma::new(floor_sqrt(length))?;
        let count = smoothing
            .length()
            .checked_add(length - 1)
            .ok_or_else(|| IndicatorError::oversized_length("HMA", length))?;
        Ok(Self {
            wma,
            half,
            smoothing,
            count,
        })
    }

    /// Returns the wrapped WMA.
    pub fn wma(&self) -> &Wma {
        &self.wma
    }

    fn sub_windows(&self) -> usize {
        self.smoothing.length()
    }
}

impl Indicator for Hma {
    fn name(&self) -> &'static str {
        "HMA"
    }

    fn count(&self) -> usize {
        self.count
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        let length = self.wma.length();
        let raw = (0..self.sub_windows())
            .map(|start| {
                let sub = &window[start..start + length];
                let doubled = checked("HMA", self.half.calc_tail(sub)?.checked_mul(Decimal::TWO))?;
                checked("HMA", doubled.checked_sub(self.wma.calc_tail(sub)?))
            })
            .collect::<IndicatorResult<Vec<_>>>()?;
        self.smoothing.calc_tail(&raw)
    }
}

#[derive(Deserialize)]
struct HmaFields {
    wma: Option<Value>,
}

impl Codec for Hma {
    const TAG: &'static str = "hma";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: HmaFields = codec::fields(value)?;
        Self::from_wma(codec::typed_source::<Wma>("HMA", "wma", fields.wma)?)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::Hma;
    use crate::indicators::Wma;
    use crate::{Indicator, IndicatorError};

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn series(values: &[&str]) -> Vec<Decimal> {
        values.iter().map(|value| dec(value)).collect()
    }

    #[test]
    fn long_lengths_decode_without_scanning_every_root() {
        let hma = crate::decode(r#"{"name":"hma","wma":{"name":"wma","length":4000000000}}"#)
            .unwrap();
        // floor(sqrt(4e9)) = 63245
        assert_eq!(hma.count(), 63_245 + 4_000_000_000 - 1);
    }

    #[test]
    fn window_grows_with_the_square_root() {
        assert_eq!(Hma::new(1).unwrap().count(), 1);
        assert_eq!(Hma::new(4).unwrap().count(), 5);
        assert_eq!(Hma::new(9).unwrap().count(), 11);
        assert_eq!(Hma::new(16).unwrap().count(), 19);
        assert_eq!(Hma::new(20).unwrap().count(), 23);
    }

    #[test]
    fn tracks_a_linear_trend_without_lag() {
        let hma = Hma::new(4).unwrap();
        let value = hma.calc(&series(&["1", "2", "3", "4", "5"])).unwrap();
        assert_eq!(value.round_dp(8), dec("5"));
    }

    #[test]
    fn constant_input_is_preserved() {
        for length in [1, 2, 5, 9, 14] {
            let hma = Hma::new(length).unwrap();
            let points = vec![dec("250.5"); hma.count()];
            assert_eq!(hma.calc(&points).unwrap(), dec("250.5"), "length {length}");
        }
    }

    #[test]
    fn rejects_shifted_wma() {
        let err = Hma::from_wma(Wma::with_offset(4, 1).unwrap()).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InvalidOffset {
                indicator: "HMA",
                offset: 1
            }
        );
    }

    #[test]
    fn rejects_zero_length() {
        assert_eq!(
            Hma::new(0).unwrap_err(),
            IndicatorError::invalid_length("HMA", 0)
        );
    }
}
