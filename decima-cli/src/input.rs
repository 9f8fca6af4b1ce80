//! Resolution of indicator arguments and price series.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use decima_config::AppConfig;
use decima_indicators::{decode, decode_value, AnyIndicator};
use rust_decimal::Decimal;
use tracing::debug;

/// Prefix selecting a configured preset.
pub const PRESET_PREFIX: &str = "preset:";

/// Resolves inline JSON, `@path` or `preset:<name>` into a validated indicator.
pub fn resolve_indicator(arg: &str, config: &AppConfig) -> Result<AnyIndicator> {
    let arg = arg.trim();
    if let Some(name) = arg.strip_prefix(PRESET_PREFIX) {
        let document = config.preset(name)?;
        debug!(preset = name, "resolving indicator preset");
        return decode_value(document.clone())
            .with_context(|| format!("preset '{name}' is not a valid indicator"));
    }

    let document = match arg.strip_prefix('@') {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read indicator document {path}"))?,
        None => arg.to_string(),
    };
    decode(&document).context("invalid indicator document")
}

/// Parses decimals separated by commas, whitespace or newlines.
///
/// Blank lines and anything following `#` are ignored.
pub fn parse_prices(text: &str) -> Result<Vec<Decimal>> {
    let mut prices = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default();
        for token in content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
        {
            let value = Decimal::from_str(token)
                .or_else(|_| Decimal::from_scientific(token))
                .with_context(|| format!("line {}: '{token}' is not a decimal", index + 1))?;
            prices.push(value);
        }
    }
    Ok(prices)
}

/// Reads and parses a price file.
pub fn read_prices(path: &Path) -> Result<Vec<Decimal>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read prices from {}", path.display()))?;
    let prices = parse_prices(&text)?;
    if prices.is_empty() {
        bail!("{} contains no prices", path.display());
    }
    debug!(path = %path.display(), points = prices.len(), "loaded price series");
    Ok(prices)
}
