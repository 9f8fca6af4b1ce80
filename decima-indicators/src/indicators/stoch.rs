//! Raw stochastic oscillator over a closing-price window.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{normalize_range, Indicator, IndicatorError, IndicatorResult};
use crate::window::resize;

/// Position of the newest point within the window's range, scaled to 0..100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stoch {
    length: usize,
}

impl Stoch {
    /// Creates a new stochastic oscillator with the provided length.
    pub fn new(length: usize) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("Stoch", 0));
        }

        Ok(Self { length })
    }

    /// Returns the configured length.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Indicator for Stoch {
    fn name(&self) -> &'static str {
        "Stoch"
    }

    fn count(&self) -> usize {
        self.length
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        normalize_range("Stoch", window)
    }
}

#[derive(Deserialize)]
struct StochFields {
    #[serde(default)]
    length: i64,
}

impl Codec for Stoch {
    const TAG: &'static str = "stoch";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: StochFields = codec::fields(value)?;
        Self::new(codec::length("Stoch", fields.length)?)
    }
}
