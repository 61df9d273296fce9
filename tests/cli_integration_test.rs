//! CLI integration tests for the recommend, allocation and validate commands.
//!
//! Tests cover:
//! - Config parsing (build_policy, build_settings) from INI files on disk
//! - Holdings CSV ingestion through the CSV adapter
//! - Full recommend pipeline writing text and JSON reports to a file
//! - Config errors mapped to exit statuses

mod common;

use atlas::adapters::csv_adapter::CsvHoldingsAdapter;
use atlas::adapters::file_config_adapter::FileConfigAdapter;
use atlas::adapters::static_price_adapter::StaticPriceAdapter;
use atlas::adapters::text_report::{TextReportAdapter, NO_ACTION_MESSAGE};
use atlas::cli::{self, Cli, RunArgs};
use atlas::domain::asset_class::AssetClass;
use atlas::domain::config_validation::{validate_policy_config, validate_run_config};
use atlas::domain::policy::Policy;
use atlas::domain::error::AtlasError;
use atlas::domain::portfolio::Portfolio;
use atlas::domain::recommendations::advise;
use atlas::ports::holdings_port::HoldingsPort;
use atlas::ports::report_port::ReportPort;
use clap::Parser;
use common::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const VALID_INI: &str = r#"
[run]
holdings = holdings.csv
cash = 10000
risk_profile = Aggressive
tax_rate = 0.15
drift_threshold = 0.05

[prices]
VTI = 230.50
VXUS = 60.00
BND = 75.00
IVV = 461.00

[policy]
replacement_markup = 1.01
"#;

/// Writes `atlas.ini` and `holdings.csv` into a fresh directory.
fn write_fixture(ini: &str, csv: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("atlas.ini");
    fs::write(&config_path, ini).unwrap();
    fs::write(dir.path().join("holdings.csv"), csv).unwrap();
    (dir, config_path)
}

fn args_for(config_path: &Path) -> RunArgs {
    RunArgs {
        config: Some(config_path.to_path_buf()),
        ..RunArgs::default()
    }
}

mod config_loading {
    use super::*;

    #[test]
    fn settings_from_file() {
        let (dir, config_path) = write_fixture(VALID_INI, SAMPLE_CSV);
        let config = cli::load_config(&config_path).unwrap();
        let settings = cli::build_settings(&config, &args_for(&config_path)).unwrap();

        assert_eq!(settings.cash, 10000.0);
        assert_eq!(settings.run.risk_profile, "Aggressive");
        assert_eq!(settings.run.tax_rate, 0.15);
        assert_eq!(settings.run.drift_threshold, 0.05);
        assert_eq!(settings.holdings, Some(dir.path().join("holdings.csv")));
    }

    #[test]
    fn missing_config_file_is_a_parse_error() {
        let err = cli::load_config(Path::new("/nonexistent/atlas.ini")).unwrap_err();
        assert!(matches!(err, AtlasError::ConfigParse { .. }));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn policy_from_file_keeps_built_in_tables() {
        let (_dir, config_path) = write_fixture(VALID_INI, SAMPLE_CSV);
        let config = cli::load_config(&config_path).unwrap();
        let policy = cli::build_policy(&config).unwrap();
        assert_eq!(policy.representative_symbol(AssetClass::Bonds), Some("BND"));
        assert_eq!(policy.replacement_for("VTI"), Some("IVV"));
    }

    #[test]
    fn demo_config_spells_out_the_built_in_policy() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/atlas.ini");
        let config = cli::load_config(&path).unwrap();
        validate_run_config(&config).unwrap();
        validate_policy_config(&config).unwrap();
        assert_eq!(cli::build_policy(&config).unwrap(), Policy::default());

        let settings = cli::build_settings(&config, &args_for(&path)).unwrap();
        assert!(settings.holdings.unwrap().ends_with("demos/holdings.csv"));
    }

    #[test]
    fn unpriced_representative_fails_validation() {
        let ini = "[prices]\nVTI = 230.50\n\n[asset_classes]\nVTI = US_STOCKS\nBND = BONDS\n\n[target.Balanced]\nUS_STOCKS = 0.5\nBONDS = 0.5\n";
        let config = FileConfigAdapter::from_string(ini).unwrap();
        let err = validate_policy_config(&config).unwrap_err();
        assert!(matches!(err, AtlasError::ConfigInvalid { ref key, .. } if key == "BND"));
    }
}

mod ingestion {
    use super::*;

    #[test]
    fn csv_holdings_become_a_portfolio() {
        let (dir, _) = write_fixture(VALID_INI, SAMPLE_CSV);
        let source = CsvHoldingsAdapter::new(dir.path().join("holdings.csv"));
        let portfolio = Portfolio::load(&source, 10000.0).unwrap();
        assert_eq!(portfolio, sample_portfolio());
    }

    #[test]
    fn malformed_row_names_the_line() {
        let (dir, _) = write_fixture(VALID_INI, "symbol,quantity,cost_basis_per_share\nVTI,100,245.20\nBND,lots,80\n");
        let err = CsvHoldingsAdapter::new(dir.path().join("holdings.csv"))
            .load_holdings()
            .unwrap_err();
        match err {
            AtlasError::Ingest { reason, .. } => assert!(reason.contains("line 3"), "{reason}"),
            other => panic!("expected Ingest, got {other:?}"),
        }
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn configured_prices_drive_the_run() {
        let (_dir, config_path) = write_fixture(VALID_INI, SAMPLE_CSV);
        let config = cli::load_config(&config_path).unwrap();
        let settings = cli::build_settings(&config, &args_for(&config_path)).unwrap();
        let policy = cli::build_policy(&config).unwrap();
        let prices = StaticPriceAdapter::from_config(&config).unwrap();
        let source = CsvHoldingsAdapter::new(settings.holdings.clone().unwrap());
        let portfolio = Portfolio::load(&source, settings.cash).unwrap();

        let advice = advise(&portfolio, &prices, &policy, &settings.run);
        // IVV is priced, so 23050 / 461
        assert_eq!(advice.recommendations[1].symbol, "IVV");
        assert_eq!(advice.recommendations[1].quantity, 50.0);
        assert_eq!(advice.synthesized_prices.keys().collect::<Vec<_>>(), vec!["AGG"]);

        let text = TextReportAdapter::new()
            .render(&advice.recommendations, &advice.impact)
            .unwrap();
        assert!(text.contains("Total Loss Harvested:  $1,720.00"));
        assert!(text.contains("Estimated Tax Savings: $258.00"));
    }

    #[test]
    fn recommend_writes_text_report() {
        let (dir, config_path) = write_fixture(VALID_INI, SAMPLE_CSV);
        let output = dir.path().join("report.txt");
        let parsed = Cli::try_parse_from([
            "atlas",
            "recommend",
            "--config",
            config_path.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli::run(parsed), ExitCode::SUCCESS);

        let text = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("ACTION"));
        assert!(lines[1].starts_with("SELL   VTI"));
        assert!(lines[2].starts_with("BUY    IVV"));
        assert!(text.contains("Impact Analysis"));
    }

    #[test]
    fn recommend_writes_json_with_overrides() {
        let (dir, config_path) = write_fixture(VALID_INI, SAMPLE_CSV);
        let output = dir.path().join("report.json");
        let parsed = Cli::try_parse_from([
            "atlas",
            "recommend",
            "--config",
            config_path.to_str().unwrap(),
            "--risk-profile",
            "Speculative",
            "--tax-rate",
            "0.3",
            "--format",
            "json",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli::run(parsed), ExitCode::SUCCESS);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let recs = json["recommendations"].as_array().unwrap();
        assert_eq!(recs.len(), 4);
        assert!(recs.iter().all(|r| r["strategy"] == "tax_loss_harvest"));
        let savings = json["impact"]["estimated_tax_savings"].as_f64().unwrap();
        assert!((savings - 516.0).abs() < 1e-6);
    }

    #[test]
    fn nothing_to_do_prints_no_action_message() {
        let ini = "[run]\ncash = 0\n";
        let (dir, config_path) = write_fixture(ini, SAMPLE_CSV);
        let output = dir.path().join("report.txt");
        let parsed = Cli::try_parse_from([
            "atlas",
            "recommend",
            "--config",
            config_path.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli::run(parsed), ExitCode::SUCCESS);

        let text = fs::read_to_string(&output).unwrap();
        assert_eq!(text.trim_end(), NO_ACTION_MESSAGE);
    }

    #[test]
    fn validate_accepts_demo_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/atlas.ini");
        let parsed = Cli::try_parse_from(["atlas", "validate", "--config", path.to_str().unwrap()]).unwrap();
        assert_eq!(cli::run(parsed), ExitCode::SUCCESS);
    }

    #[test]
    fn invalid_config_writes_no_report() {
        let ini = "[run]\ncash = -10\n";
        let (dir, config_path) = write_fixture(ini, SAMPLE_CSV);
        let output = dir.path().join("report.txt");
        let parsed = Cli::try_parse_from([
            "atlas",
            "recommend",
            "--config",
            config_path.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli::run(parsed), ExitCode::from(2));
        assert!(!output.exists());
    }
}
