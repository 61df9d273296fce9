//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvHoldingsAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report::JsonReportAdapter;
use crate::adapters::static_price_adapter::StaticPriceAdapter;
use crate::adapters::text_report::{format_allocation, TextReportAdapter};
use crate::domain::asset_class::AssetClass;
use crate::domain::config_validation::{
    parse_double, target_sections, validate_policy_config, validate_run_config,
    ASSET_CLASSES_SECTION, POLICY_SECTION, REPLACEMENTS_SECTION, RUN_SECTION,
    TARGET_SECTION_PREFIX,
};
use crate::domain::error::AtlasError;
use crate::domain::policy::{Policy, TargetAllocation};
use crate::domain::portfolio::Portfolio;
use crate::domain::rebalancing::{calculate_current_allocation, compute_drift};
use crate::domain::recommendations::{advise, RunConfig};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_CASH: f64 = 10_000.0;

#[derive(Parser, Debug)]
#[command(name = "atlas", about = "Tax-loss harvesting and rebalancing advisor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Run inputs shared by `recommend` and `allocation`. Flags override `[run]`.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Holdings CSV (symbol,quantity,cost_basis_per_share)
    #[arg(long)]
    pub holdings: Option<PathBuf>,
    #[arg(long)]
    pub cash: Option<f64>,
    #[arg(long)]
    pub risk_profile: Option<String>,
    #[arg(long)]
    pub tax_rate: Option<f64>,
    #[arg(long)]
    pub drift_threshold: Option<f64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate tax-loss harvesting and rebalancing recommendations
    Recommend {
        #[command(flatten)]
        run: RunArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the current allocation and its drift from the target
    Allocation {
        #[command(flatten)]
        run: RunArgs,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Resolved inputs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub holdings: Option<PathBuf>,
    pub cash: f64,
    pub run: RunConfig,
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging();
    let result = match cli.command {
        Command::Recommend {
            run,
            format,
            output,
        } => run_recommend(&run, format, output.as_deref()),
        Command::Allocation { run } => run_allocation(&run),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, AtlasError> {
    FileConfigAdapter::from_file(path).map_err(|e| AtlasError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn load_optional_config(path: Option<&Path>) -> Result<FileConfigAdapter, AtlasError> {
    match path {
        Some(path) => {
            info!("Loading config from {}", path.display());
            load_config(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

/// Built-in policy with every table the config supplies swapped in. A
/// present section replaces the whole built-in table, it is not merged.
pub fn build_policy(config: &dyn ConfigPort) -> Result<Policy, AtlasError> {
    let mut policy = Policy::default();

    if config.has_section(ASSET_CLASSES_SECTION) {
        policy.clear_asset_classes();
        for (symbol, class) in config.entries(ASSET_CLASSES_SECTION) {
            let class = class.parse::<AssetClass>().map_err(|reason| {
                AtlasError::config_invalid(ASSET_CLASSES_SECTION, &symbol, reason)
            })?;
            policy.set_asset_class(&symbol, class);
        }
    }

    let sections = target_sections(config);
    if !sections.is_empty() {
        policy.clear_targets();
        for section in sections {
            let profile = &section[TARGET_SECTION_PREFIX.len()..];
            let mut target = TargetAllocation::new(Vec::new());
            for (class_name, _) in config.entries(&section) {
                let class = class_name.parse::<AssetClass>().map_err(|reason| {
                    AtlasError::config_invalid(&section, &class_name, reason)
                })?;
                let fraction = parse_double(config, &section, &class_name)?.unwrap_or(0.0);
                target.set(class, fraction);
            }
            policy.set_target(profile, target);
        }
    }

    if config.has_section(REPLACEMENTS_SECTION) {
        policy.clear_replacements();
        for (symbol, replacement) in config.entries(REPLACEMENTS_SECTION) {
            policy.set_replacement(&symbol, replacement.trim());
        }
    }

    if let Some(markup) = parse_double(config, POLICY_SECTION, "replacement_markup")? {
        policy.replacement_markup = markup;
    }

    Ok(policy)
}

/// Run settings from `[run]` with flag overrides applied on top. Relative
/// holdings paths from the config resolve against the config's directory.
pub fn build_settings(
    config: &dyn ConfigPort,
    args: &RunArgs,
) -> Result<RunSettings, AtlasError> {
    let defaults = RunConfig::default();

    let cash = match args.cash {
        Some(cash) => cash,
        None => parse_double(config, RUN_SECTION, "cash")?.unwrap_or(DEFAULT_CASH),
    };
    let risk_profile = args
        .risk_profile
        .clone()
        .or_else(|| config.get_string(RUN_SECTION, "risk_profile"))
        .map(|p| p.trim().to_string())
        .unwrap_or(defaults.risk_profile);
    let tax_rate = match args.tax_rate {
        Some(rate) => rate,
        None => parse_double(config, RUN_SECTION, "tax_rate")?.unwrap_or(defaults.tax_rate),
    };
    let drift_threshold = match args.drift_threshold {
        Some(threshold) => threshold,
        None => parse_double(config, RUN_SECTION, "drift_threshold")?
            .unwrap_or(defaults.drift_threshold),
    };

    if !cash.is_finite() || cash < 0.0 {
        return Err(AtlasError::config_invalid(
            RUN_SECTION,
            "cash",
            "cash must be non-negative",
        ));
    }
    if !(0.0..1.0).contains(&drift_threshold) {
        return Err(AtlasError::config_invalid(
            RUN_SECTION,
            "drift_threshold",
            "drift_threshold must be in [0, 1)",
        ));
    }
    if !(0.0..=1.0).contains(&tax_rate) {
        warn!(tax_rate, "tax_rate outside [0, 1]");
    }

    let holdings = match &args.holdings {
        Some(path) => Some(path.clone()),
        None => config
            .get_string(RUN_SECTION, "holdings")
            .filter(|p| !p.trim().is_empty())
            .map(|p| resolve_holdings_path(args.config.as_deref(), Path::new(p.trim()))),
    };

    Ok(RunSettings {
        holdings,
        cash,
        run: RunConfig {
            risk_profile,
            tax_rate,
            drift_threshold,
        },
    })
}

pub fn resolve_holdings_path(config_path: Option<&Path>, holdings: &Path) -> PathBuf {
    if holdings.is_absolute() {
        return holdings.to_path_buf();
    }
    match config_path.and_then(Path::parent) {
        Some(dir) => dir.join(holdings),
        None => holdings.to_path_buf(),
    }
}

fn load_portfolio(settings: &RunSettings) -> Result<Portfolio, AtlasError> {
    match &settings.holdings {
        Some(path) => {
            info!("Loading holdings from {}", path.display());
            let portfolio = Portfolio::load(&CsvHoldingsAdapter::new(path.clone()), settings.cash)?;
            info!(
                lots = portfolio.holdings.len(),
                cash = portfolio.cash,
                "portfolio loaded"
            );
            Ok(portfolio)
        }
        None => {
            info!(cash = settings.cash, "no holdings file configured, using a cash-only portfolio");
            Portfolio::cash_only(settings.cash)
        }
    }
}

struct RunContext {
    settings: RunSettings,
    policy: Policy,
    prices: StaticPriceAdapter,
    portfolio: Portfolio,
}

fn prepare(args: &RunArgs) -> Result<RunContext, AtlasError> {
    let config = load_optional_config(args.config.as_deref())?;
    validate_run_config(&config)?;
    validate_policy_config(&config)?;

    let settings = build_settings(&config, args)?;
    let policy = build_policy(&config)?;
    let prices = StaticPriceAdapter::from_config(&config)?;
    let portfolio = load_portfolio(&settings)?;

    if policy.target_allocation(&settings.run.risk_profile).is_none() {
        let known: Vec<&str> = policy.risk_profiles().collect();
        warn!(
            risk_profile = %settings.run.risk_profile,
            known = ?known,
            "unknown risk profile, no rebalancing will be recommended"
        );
    }

    Ok(RunContext {
        settings,
        policy,
        prices,
        portfolio,
    })
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, AtlasError> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

fn run_recommend(
    args: &RunArgs,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<(), AtlasError> {
    let ctx = prepare(args)?;
    let advice = advise(&ctx.portfolio, &ctx.prices, &ctx.policy, &ctx.settings.run);
    for (symbol, price) in &advice.synthesized_prices {
        info!(symbol = %symbol, price, "replacement priced from the harvested symbol");
    }

    let report: Box<dyn ReportPort> = match format {
        OutputFormat::Text => Box::new(TextReportAdapter::new()),
        OutputFormat::Json => Box::new(JsonReportAdapter::new(true)),
    };
    let mut out = open_output(output)?;
    report.write(&advice.recommendations, &advice.impact, &mut out)?;
    out.flush()?;

    if let Some(path) = output {
        info!("Report written to {}", path.display());
    }
    Ok(())
}

fn run_allocation(args: &RunArgs) -> Result<(), AtlasError> {
    let ctx = prepare(args)?;
    let allocation = calculate_current_allocation(&ctx.portfolio, &ctx.prices, &ctx.policy);
    let drifts = ctx
        .policy
        .target_allocation(&ctx.settings.run.risk_profile)
        .map(|target| compute_drift(&ctx.portfolio, &ctx.prices, &ctx.policy, target))
        .unwrap_or_default();

    let text = format_allocation(
        &allocation,
        &drifts,
        &ctx.settings.run.risk_profile,
        ctx.settings.run.drift_threshold,
    );
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), AtlasError> {
    info!("Validating config: {}", config_path.display());
    let config = load_config(config_path)?;
    validate_run_config(&config)?;
    validate_policy_config(&config)?;

    let policy = build_policy(&config)?;
    let settings = build_settings(
        &config,
        &RunArgs {
            config: Some(config_path.to_path_buf()),
            ..RunArgs::default()
        },
    )?;

    println!("Configuration is valid.");
    println!("  Risk profile:     {}", settings.run.risk_profile);
    println!("  Tax rate:         {}", settings.run.tax_rate);
    println!("  Drift threshold:  {}", settings.run.drift_threshold);
    println!("  Cash:             {}", settings.cash);
    if let Some(path) = &settings.holdings {
        println!("  Holdings:         {}", path.display());
    }
    for (profile, target) in policy.targets() {
        if target.is_empty() {
            warn!(risk_profile = profile, "target allocation names no asset class");
        }
        println!(
            "  Target {profile}: {:.2}% invested, {:.2}% cash",
            target.total() * 100.0,
            (1.0 - target.total()) * 100.0
        );
    }
    println!("  Replacements:     {}", policy.replacements().len());
    println!("  Replacement markup: {}", policy.replacement_markup);

    if policy.target_allocation(&settings.run.risk_profile).is_none() {
        warn!(
            risk_profile = %settings.run.risk_profile,
            "risk profile has no target allocation"
        );
    }
    Ok(())
}
