#![allow(dead_code)]

use atlas::domain::error::AtlasError;
use atlas::domain::holding::Holding;
use atlas::domain::portfolio::Portfolio;
use atlas::ports::holdings_port::HoldingsPort;
use atlas::ports::price_port::PricePort;
use std::cell::Cell;
use std::collections::HashMap;

/// Price oracle that counts lookups, to confirm the engines only read it.
pub struct MockPricePort {
    pub prices: HashMap<String, f64>,
    pub lookups: Cell<usize>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            prices: HashMap::new(),
            lookups: Cell::new(0),
        }
    }

    pub fn mvp() -> Self {
        Self::new()
            .with_price("VTI", 230.50)
            .with_price("VXUS", 60.00)
            .with_price("BND", 75.00)
    }

    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }
}

impl PricePort for MockPricePort {
    fn price(&self, symbol: &str) -> Option<f64> {
        self.lookups.set(self.lookups.get() + 1);
        self.prices.get(symbol).copied()
    }
}

pub struct MockHoldings {
    pub holdings: Vec<Holding>,
    pub error: Option<String>,
}

impl MockHoldings {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self {
            holdings,
            error: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            holdings: Vec::new(),
            error: Some(reason.to_string()),
        }
    }
}

impl HoldingsPort for MockHoldings {
    fn load_holdings(&self) -> Result<Vec<Holding>, AtlasError> {
        match &self.error {
            Some(reason) => Err(AtlasError::Ingest {
                source_name: "mock".into(),
                reason: reason.clone(),
            }),
            None => Ok(self.holdings.clone()),
        }
    }
}

pub fn lot(symbol: &str, quantity: f64, cost_basis_per_share: f64) -> Holding {
    Holding::new(symbol, quantity, cost_basis_per_share).unwrap()
}

/// VTI at a loss, VXUS at a gain, BND at a loss, with 10000 cash.
pub fn sample_holdings() -> Vec<Holding> {
    vec![
        lot("VTI", 100.0, 245.20),
        lot("VXUS", 200.0, 55.00),
        lot("BND", 50.0, 80.00),
    ]
}

pub fn sample_portfolio() -> Portfolio {
    Portfolio::new(10000.0, sample_holdings()).unwrap()
}

pub const SAMPLE_CSV: &str = "symbol,quantity,cost_basis_per_share\n\
VTI,100,245.20\n\
VXUS,200,55.00\n\
BND,50,80.00\n";
