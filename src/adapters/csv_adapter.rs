//! CSV holdings adapter.
//!
//! Expects a header row `symbol,quantity,cost_basis_per_share`; extra
//! columns are ignored. Rows come back in file order.

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::domain::error::AtlasError;
use crate::domain::holding::Holding;
use crate::ports::holdings_port::HoldingsPort;

#[derive(Debug, Deserialize)]
struct HoldingRow {
    symbol: String,
    quantity: f64,
    cost_basis_per_share: f64,
}

pub struct CsvHoldingsAdapter {
    path: PathBuf,
}

impl CsvHoldingsAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl HoldingsPort for CsvHoldingsAdapter {
    fn load_holdings(&self) -> Result<Vec<Holding>, AtlasError> {
        let source_name = self.path.display().to_string();
        let file = File::open(&self.path).map_err(|e| AtlasError::Ingest {
            source_name: source_name.clone(),
            reason: format!("failed to open: {e}"),
        })?;
        let holdings = parse_holdings(file, &source_name)?;
        debug!(source = %source_name, lots = holdings.len(), "holdings loaded");
        Ok(holdings)
    }
}

/// Parses holdings CSV from any reader. `source_name` labels errors.
pub fn parse_holdings<R: Read>(reader: R, source_name: &str) -> Result<Vec<Holding>, AtlasError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut holdings = Vec::new();

    for (index, result) in rdr.deserialize::<HoldingRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = result.map_err(|e| AtlasError::Ingest {
            source_name: source_name.to_string(),
            reason: format!("line {line}: {e}"),
        })?;
        let holding = Holding::new(row.symbol, row.quantity, row.cost_basis_per_share).map_err(
            |e| AtlasError::Ingest {
                source_name: source_name.to_string(),
                reason: format!("line {line}: {e}"),
            },
        )?;
        holdings.push(holding);
    }

    Ok(holdings)
}
