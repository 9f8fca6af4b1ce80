//! Bollinger Bands built on top of an arbitrary moving average and standard deviation.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::any::AnyIndicator;
use crate::codec::{self, Codec};
use crate::core::{checked, ratio_or_zero, Indicator, IndicatorError, IndicatorResult, HUNDRED};
use crate::stats::standard_deviation;
use crate::window::resize;

/// Band reported by the scalar `calc` of [`BollingerBands`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// Center plus spread.
    Upper,
    /// Center minus spread.
    Lower,
    /// Distance between the bands as a percentage of the center.
    Width,
}

impl FromStr for Band {
    type Err = IndicatorError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "width" => Ok(Self::Width),
            other => Err(IndicatorError::InvalidEnum {
                field: "band",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upper => f.write_str("upper"),
            Self::Lower => f.write_str("lower"),
            Self::Width => f.write_str("width"),
        }
    }
}

/// Output value of the Bollinger Bands indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BollingerBandsOutput {
    /// Upper band (center + k * std dev).
    pub upper: Decimal,
    /// Middle band (moving average).
    pub middle: Decimal,
    /// Lower band (center - k * std dev).
    pub lower: Decimal,
    /// `(upper - lower) / middle * 100`, zero when the center is zero.
    pub width: Decimal,
}

impl BollingerBandsOutput {
    /// Selects a single band.
    pub fn band(&self, band: Band) -> Decimal {
        match band {
            Band::Upper => self.upper,
            Band::Lower => self.lower,
            Band::Width => self.width,
        }
    }
}

/// Produces Bollinger Bands around a moving average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BollingerBands {
    band: Band,
    std_dev: Decimal,
    ma: Box<AnyIndicator>,
}

impl BollingerBands {
    /// Creates a new Bollinger Bands indicator.
    pub fn new(
        ma: impl Into<AnyIndicator>,
        std_dev: Decimal,
        band: Band,
    ) -> IndicatorResult<Self> {
        if std_dev.is_sign_negative() && !std_dev.is_zero() {
            return Err(IndicatorError::invalid_parameter("BB", "std_dev", std_dev));
        }

        Ok(Self {
            band,
            std_dev,
            ma: Box::new(ma.into()),
        })
    }

    /// Returns the band reported by `calc`.
    pub fn band(&self) -> Band {
        self.band
    }

    /// Returns the standard deviation multiplier.
    pub fn std_dev(&self) -> Decimal {
        self.std_dev
    }

    /// Returns the wrapped moving average.
    pub fn ma(&self) -> &AnyIndicator {
        &self.ma
    }

    /// Computes every band over exactly `count()` points.
    pub fn calc_all(&self, points: &[Decimal]) -> IndicatorResult<BollingerBandsOutput> {
        if points.len() != self.count() {
            return Err(IndicatorError::invalid_data_size(self.count(), points.len()));
        }
        self.calc_all_tail(points)
    }

    /// Computes every band over the trailing `count()` points.
    pub fn calc_all_tail(&self, points: &[Decimal]) -> IndicatorResult<BollingerBandsOutput> {
        let window = resize(points, self.count())?;
        let middle = self.ma.calc_tail(window)?;
        let spread = checked("BB", standard_deviation(window)?.checked_mul(self.std_dev))?;
        let upper = checked("BB", middle.checked_add(spread))?;
        let lower = checked("BB", middle.checked_sub(spread))?;
        let range = checked("BB", upper.checked_sub(lower))?;
        let width = checked("BB", ratio_or_zero("BB", range, middle)?.checked_mul(HUNDRED))?;

        Ok(BollingerBandsOutput {
            upper,
            middle,
            lower,
            width,
        })
    }
}

impl Indicator for BollingerBands {
    fn name(&self) -> &'static str {
        "BB"
    }

    fn count(&self) -> usize {
        self.ma.count()
    }

    fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
        Ok(self.calc_all_tail(points)?.band(self.band))
    }
}

#[derive(Deserialize)]
struct BollingerFields {
    band: Option<String>,
    #[serde(default)]
    std_dev: Decimal,
    ma: Option<Value>,
}

impl Codec for BollingerBands {
    const TAG: &'static str = "bb";

    fn decode(value: Value) -> IndicatorResult<Self> {
        let fields: BollingerFields = codec::fields(value)?;
        let band = codec::enumeration("band", fields.band)?;
        let ma = codec::source("BB", "ma", fields.ma)?;
        Self::new(ma, fields.std_dev, band)
    }
}
