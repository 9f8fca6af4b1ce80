use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use decima_config::{load_config, AppConfig, LogFormat};
use decima_indicators::{encode_value, registered_tags, AnyIndicator, Indicator};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::input::{read_prices, resolve_indicator};
use crate::telemetry::init_tracing;

#[derive(Parser)]
#[command(
    name = "decima",
    version,
    about = "Inspect and evaluate decimal technical indicators"
)]
pub struct Cli {
    /// Directory holding default.toml and per-environment overrides
    #[arg(long, global = true, default_value = "config")]
    config_dir: PathBuf,
    /// Configuration environment; loads <config-dir>/<env>.toml on top of the defaults
    #[arg(long, global = true)]
    env: Option<String>,
    /// Overrides the configured log format (pretty or json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List every registered indicator tag
    Tags,
    /// Decode an indicator and print its canonical document and window size
    Inspect {
        /// Inline JSON, @path/to/file.json or preset:<name>
        indicator: String,
    },
    /// Evaluate an indicator over a price series
    Calc(CalcArgs),
}

#[derive(Args)]
pub struct CalcArgs {
    /// Inline JSON, @path/to/file.json or preset:<name>
    indicator: String,
    /// Comma separated prices, oldest first
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        conflicts_with = "input"
    )]
    prices: Vec<Decimal>,
    /// File with one or more prices per line, oldest first
    #[arg(long)]
    input: Option<PathBuf>,
    /// Evaluate the trailing window instead of requiring an exact one
    #[arg(long)]
    tail: bool,
    /// Print one value for every position with a full window behind it
    #[arg(long, conflicts_with = "all")]
    series: bool,
    /// Print every output line of multi-value indicators (bb, aroon)
    #[arg(long)]
    all: bool,
    /// Decimal places to keep; overrides the configured output scale
    #[arg(long)]
    scale: Option<u32>,
}

/// Parses arguments, loads configuration and dispatches the command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config_dir, cli.env.as_deref())?;
    let format = cli.log_format.unwrap_or(config.logging.format);
    init_tracing(&config.logging.level, format)?;
    debug!(
        config_dir = %cli.config_dir.display(),
        env = cli.env.as_deref().unwrap_or("default"),
        presets = config.presets.len(),
        "configuration loaded"
    );

    match cli.command {
        Command::Tags => {
            for tag in registered_tags() {
                println!("{tag}");
            }
        }
        Command::Inspect { indicator } => {
            let indicator = resolve_indicator(&indicator, &config)?;
            let report = json!({
                "indicator": encode_value(&indicator)?,
                "count": indicator.count(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Calc(args) => calc(args, &config)?,
    }
    Ok(())
}

fn calc(args: CalcArgs, config: &AppConfig) -> Result<()> {
    let indicator = resolve_indicator(&args.indicator, config)?;
    let prices = match &args.input {
        Some(path) => read_prices(path)?,
        None if !args.prices.is_empty() => args.prices.clone(),
        None => bail!("no prices supplied; use --prices or --input"),
    };
    let scale = args.scale.or(config.output.scale);
    info!(
        indicator = indicator.tag(),
        count = indicator.count(),
        points = prices.len(),
        tail = args.tail,
        series = args.series,
        "evaluating indicator"
    );

    if args.series {
        let values = indicator
            .calc_series(&prices)
            .with_context(|| format!("failed to evaluate {}", indicator.name()))?;
        for value in values {
            println!("{}", render(value, scale));
        }
        return Ok(());
    }

    if args.all {
        let output = all_outputs(&indicator, &prices, args.tail, scale)?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let value = if args.tail {
        indicator.calc_tail(&prices)
    } else {
        indicator.calc(&prices)
    }
    .with_context(|| format!("failed to evaluate {}", indicator.name()))?;
    println!("{}", render(value, scale));
    Ok(())
}

fn all_outputs(
    indicator: &AnyIndicator,
    window: &[Decimal],
    tail: bool,
    scale: Option<u32>,
) -> Result<Value> {
    match indicator {
        AnyIndicator::Bb(bands) => {
            let output = if tail {
                bands.calc_all_tail(window)
            } else {
                bands.calc_all(window)
            }
            .context("failed to evaluate BB")?;
            Ok(json!({
                "upper": render(output.upper, scale),
                "middle": render(output.middle, scale),
                "lower": render(output.lower, scale),
                "width": render(output.width, scale),
            }))
        }
        AnyIndicator::Aroon(aroon) => {
            let output = if tail {
                aroon.calc_all_tail(window)
            } else {
                aroon.calc_all(window)
            }
            .context("failed to evaluate Aroon")?;
            Ok(json!({
                "up": render(output.up, scale),
                "down": render(output.down, scale),
            }))
        }
        other => bail!(
            "--all is only supported for bb and aroon, not {}",
            other.tag()
        ),
    }
}

fn render(value: Decimal, scale: Option<u32>) -> String {
    let value = match scale {
        Some(scale) => value.round_dp(scale),
        None => value,
    };
    value.normalize().to_string()
}
