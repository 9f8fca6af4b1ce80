//! Aroon trend indicator.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codec::{self, Codec};
use crate::core::{decimal_from_usize, Indicator, IndicatorError, IndicatorResult, HUNDRED};
use crate::window::resize;

/// Direction measured by [`Aroon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Distance since the highest point.
    Up,
    /// Distance since the lowest point.
    Down,
}

impl FromStr for Trend {
    type Err = IndicatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(IndicatorError::InvalidEnum {
                field: "trend",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Both Aroon lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AroonOutput {
    /// Aroon-up.
    pub up: Decimal,
    /// Aroon-down.
    pub down: Decimal,
}

/// Scores how recently the window printed its extreme: 100 when the newest
/// point is the extreme, decreasing linearly with its age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aroon {
    trend: Trend,
    length: usize,
}

impl Aroon {
    /// Creates a new Aroon indicator reporting `trend` from its scalar `calc`.
    pub fn new(length: usize, trend: Trend) -> IndicatorResult<Self> {
        if length == 0 {
            return Err(IndicatorError::invalid_length("Aroon", 0));
        }

        Ok(Self { trend, length })
    }

    /// Returns the configured length.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the trend reported by `calc`.
    pub fn trend(&self) -> Trend {
        self.trend
    }

    /// Computes both lines over exactly `count()` points.
    pub fn calc_all(&self, points: &[Decimal]) -> IndicatorResult<AroonOutput> {
        if points.len() != self.count() {
            return Err(IndicatorError::invalid_data_size(self.count(), points.len()));
        }
        self.calc_all_tail(points)
    }

    /// Computes both lines over the trailing `count()` points.
    pub fn calc_all_tail(&self, points: &[Decimal]) -> IndicatorResult<AroonOutput> {
        let window = resize(points, self.count())?;
        Ok(AroonOutput {
            up: self.score(window, Trend::Up),
            down: self.score(window, Trend::Down),
        })
    }

    /// Computes a single line over the trailing `count()` points.
    pub fn calc_trend(&self, points: &[Decimal], trend: Trend) -> IndicatorResult<Decimal> {
        let window = resize(points, self.count())?;
        Ok(self.score(window, trend))
    }

    fn score(&self, window: &[Decimal], trend: Trend) -> Decimal {
        let mut extreme_at = 0;
        for (index, value) in window.iter().enumerate() {
            let extreme = window[extreme_at];
            // ties resolve to the most recent occurrence
            let replaces = match trend {
                Trend::Up => *value >= extreme,
                Trend::Down => *value <= extreme,
            };
            if replaces {
                extreme_at = index;
            }
        }
        let distance = window.len() - 1 - extreme_at;
        let length = decimal_from_usize(self.length);
        (length - decimal_from_usize(distance)) / length * HUNDRED
    }
}

impl Indicator for Aroon {
    fn name(&self) -> &'static str {
        "Aroon"
    }

    fn count(&self) -> usize {
        self.length
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        self.calc_trend(points, self.trend)
    }
}

#[derive(Deserialize)]
struct AroonFields {
    #[serde(default)]
    length: i64,
    trend: Option<String>,
}

impl Codec for Aroon {
    const TAG: &'static str = "aroon";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: AroonFields = codec::fields(value)?;
        let trend = codec::enumeration("trend", fields.trend)?;
        Self::new(codec::length("Aroon", fields.length)?, trend)
    }
}
