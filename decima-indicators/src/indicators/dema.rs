//! Double Exponential Moving Average (DEMA).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{checked, Indicator, IndicatorError, IndicatorResult};
use crate::indicators::ema::Ema;

/// EMA-of-EMA construction `2 * EMA - EMA(EMA)` that reduces the lag of a single EMA.
///
/// The wrapped EMA's seed and every step of its recurrence form an
/// intermediate series of `length` values; the recurrence is then re-applied
/// across that series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dema {
    #[serde(serialize_with = "codec::tagged")]
    ema: Ema,
}

impl Dema {
    /// Creates a new DEMA with the provided length.
    pub fn new(length: usize) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("DEMA", 0));
        }
        Ok(Self::from_ema(Ema::new(length)?))
    }

    /// Wraps an already constructed EMA.
    pub fn from_ema(ema: Ema) -> Self {
        Self { ema }
    }

    /// Returns the wrapped EMA.
    pub fn ema(&self) -> &Ema {
        &self.ema
    }
}

impl Indicator for Dema {
    fn name(&self) -> &'static str {
        "DEMA"
    }

    fn count(&self) -> usize {
        self.ema.count()
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let running = self.ema.running(points)?;
        let (first, rest) = running
            .split_first()
            .ok_or_else(|| IndicatorError::invalid_data_size(self.count(), points.len()))?;
        let smoothed = rest
            .iter()
            .try_fold(*first, |prev, value| self.ema.advance(prev, *value))?;
        let last = running.last().copied().unwrap_or(*first);
        let doubled = checked("DEMA", last.checked_mul(Decimal::TWO))?;
        checked("DEMA", doubled.checked_sub(smoothed))
    }
}

#[derive(Deserialize)]
struct DemaFields {
    ema: Option<Value>,
}

impl Codec for Dema {
    const TAG: &'static str = "dema";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: DemaFields = codec::fields(value)?;
        let ema = codec::typed_source::<Ema>("DEMA", "ema", fields.ema)?;
        Ok(Self::from_ema(ema))
    }
}
