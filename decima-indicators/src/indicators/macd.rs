//! Moving Average Convergence Divergence indicator implementation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::any::AnyIndicator;
use crate::codec::{self, Codec};
use crate::core::{checked, Indicator, IndicatorResult};
use crate::window::resize;

/// Difference between two arbitrary indicators, `source1 - source2`.
///
/// The window is the larger of the two source windows; the source with the
/// smaller window only sees the most recent part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Macd {
    source1: Box<AnyIndicator>,
    source2: Box<AnyIndicator>,
}

impl Macd {
    /// Create a MACD from two already constructed sources.
    pub fn new(source1: impl Into<AnyIndicator>, source2: impl Into<AnyIndicator>) -> Self {
        Self {
            source1: Box::new(source1.into()),
            source2: Box::new(source2.into()),
        }
    }

    /// Returns the minuend.
    pub fn source1(&self) -> &AnyIndicator {
        &self.source1
    }

    /// Returns the subtrahend.
    pub fn source2(&self) -> &AnyIndicator {
        &self.source2
    }
}

impl Indicator for Macd {
    fn name(&self) -> &'static str {
        "MACD"
    }

    fn count(&self) -> usize {
        self.source1.count().max(self.source2.count())
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        let minuend = self.source1.calc_tail(window)?;
        let subtrahend = self.source2.calc_tail(window)?;
        checked("MACD", minuend.checked_sub(subtrahend))
    }
}

#[derive(Deserialize)]
struct MacdFields {
    source1: Option<Value>,
    source2: Option<Value>,
}

impl Codec for Macd {
    const TAG: &'static str = "macd";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: MacdFields = codec::fields(value)?;
        let source1 = codec::source("MACD", "source1", fields.source1)?;
        let source2 = codec::source("MACD", "source2", fields.source2)?;
        Ok(Self::new(source1, source2))
    }
}
