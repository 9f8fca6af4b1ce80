//! The closed set of indicator kinds.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::codec::{self, Codec, CodecRegistry};
use crate::core::{Indicator, IndicatorResult};
use crate::indicators::{
    Aroon, BollingerBands, Cci, Dema, Ema, Hma, Macd, Roc, Rsi, Sma, Stoch, StochRsi, Wma,
};

/// Declares [`AnyIndicator`] together with its dispatch, conversions and codec
/// registration, so that adding a kind is a one-line change.
macro_rules! indicator_set {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Any built-in indicator. Composite indicators own their sources as `AnyIndicator`.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum AnyIndicator {
            $(
                #[doc = concat!("Wraps [`", stringify!($ty), "`].")]
                $variant($ty),
            )+
        }

        impl AnyIndicator {
            /// Wire tag of the wrapped indicator.
            pub fn tag(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$ty as Codec>::TAG,)+
                }
            }

            pub(crate) fn register_all(registry: &mut CodecRegistry) {
                $(registry.register::<$ty>();)+
            }
        }

        impl Indicator for AnyIndicator {
            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant(inner) => inner.name(),)+
                }
            }

            fn count(&self) -> usize {
                match self {
                    $(Self::$variant(inner) => inner.count(),)+
                }
            }

            fn calc_tail(&self, points: &[Decimal]) -> IndicatorResult<Decimal> {
                match self {
                    $(Self::$variant(inner) => inner.calc_tail(points),)+
                }
            }
        }

        impl Serialize for AnyIndicator {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $(Self::$variant(inner) => codec::tagged(inner, serializer),)+
                }
            }
        }

        $(
            impl From<$ty> for AnyIndicator {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl TryFrom<AnyIndicator> for $ty {
                type Error = AnyIndicator;

                fn try_from(value: AnyIndicator) -> Result<Self, Self::Error> {
                    match value {
                        AnyIndicator::$variant(inner) => Ok(inner),
                        other => Err(other),
                    }
                }
            }
        )+
    };
}

indicator_set! {
    Sma(Sma),
    Wma(Wma),
    Ema(Ema),
    Dema(Dema),
    Hma(Hma),
    Cci(Cci),
    Macd(Macd),
    Bb(BollingerBands),
    StochRsi(StochRsi),
    Aroon(Aroon),
    Roc(Roc),
    Rsi(Rsi),
    Stoch(Stoch),
}

impl<'de> Deserialize<'de> for AnyIndicator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        codec::decode_value(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::AnyIndicator;
    use crate::indicators::{Ema, Sma, Wma};
    use crate::Indicator;

    #[test]
    fn dispatches_to_the_wrapped_indicator() {
        let any = AnyIndicator::from(Ema::new(4).unwrap());
        assert_eq!(any.tag(), "ema");
        assert_eq!(any.name(), "EMA");
        assert_eq!(any.count(), 7);
    }

    #[test]
    fn try_from_returns_the_original_on_mismatch() {
        let any = AnyIndicator::from(Sma::new(3).unwrap());
        let back = Wma::try_from(any.clone()).unwrap_err();
        assert_eq!(back, any);
        assert_eq!(Sma::try_from(any).unwrap(), Sma::new(3).unwrap());
    }

    #[test]
    fn serde_deserialize_goes_through_the_registry() {
        let any: AnyIndicator = serde_json::from_value(json!({"name": "wma", "length": 5})).unwrap();
        assert_eq!(any, AnyIndicator::from(Wma::new(5).unwrap()));

        let err = serde_json::from_value::<AnyIndicator>(json!({"name": "wma", "length": 0}))
            .unwrap_err();
        assert!(err.to_string().contains("length must be at least 1"));
    }
}
