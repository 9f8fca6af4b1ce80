//! Commodity Channel Index (CCI).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::any::AnyIndicator;
use crate::codec::{self, Codec};
use crate::core::{checked, ratio_or_zero, Indicator, IndicatorResult};
use crate::stats::mean_deviation;
use crate::window::resize;

/// Distance of the newest point from a moving average, in units of mean deviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cci {
    source: Box<AnyIndicator>,
}

impl Cci {
    /// Lambert's scaling constant.
    pub const FACTOR: Decimal = Decimal::from_parts(15, 0, 0, false, 3);

    /// Creates a CCI around the provided moving average.
    pub fn new(source: impl Into<AnyIndicator>) -> Self {
        Self {
            source: Box::new(source.into()),
        }
    }

    /// Returns the wrapped moving average.
    pub fn source(&self) -> &AnyIndicator {
        &self.source
    }
}

impl Indicator for Cci {
    fn name(&self) -> &'static str {
        "CCI"
    }

    fn count(&self) -> usize {
        self.source.count()
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        let average = self.source.calc_tail(window)?;
        let last = window[window.len() - 1];
        let denominator = checked("CCI", Self::FACTOR.checked_mul(mean_deviation(window)?))?;
        let distance = checked("CCI", last.checked_sub(average))?;
        // constant input has no deviation
        ratio_or_zero("CCI", distance, denominator)
    }
}

#[derive(Deserialize)]
struct CciFields {
    source: Option<Value>,
}

impl Codec for Cci {
    const TAG: &'static str = "cci";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: CciFields = codec::fields(value)?;
        Ok(Self::new(codec::source("CCI", "source", fields.source)?))
    }
}
