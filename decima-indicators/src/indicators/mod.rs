//! Built-in indicator implementations provided by the crate.

pub mod aroon;
pub mod bollinger;
pub mod cci;
pub mod dema;
pub mod ema;
pub mod hma;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stoch;
pub mod stoch_rsi;
pub mod wma;

pub use aroon::{Aroon, AroonOutput, Trend};
pub use bollinger::{Band, BollingerBands, BollingerBandsOutput};
pub use cci::Cci;
pub use dema::Dema;
pub use ema::Ema;
pub use hma::Hma;
pub use macd::Macd;
pub use roc::Roc;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stoch::Stoch;
pub use stoch_rsi::StochRsi;
pub use wma::Wma;
