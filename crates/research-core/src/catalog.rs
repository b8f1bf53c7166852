//! Immutable stock catalog
//!
//! Built once at process start (from JSON or the embedded seed data) and then
//! only read. Share it behind an `Arc` rather than cloning.

use std::collections::HashSet;
use std::path::Path;

use crate::{ResearchError, Stock};

const BUILTIN_CATALOG: &str = include_str!("../data/stocks.json");

/// Ordered, validated, read-only sequence of covered stocks
#[derive(Debug, Clone)]
pub struct Catalog {
    stocks: Vec<Stock>,
}

impl Catalog {
    /// Validate every record and ticker uniqueness, preserving input order.
    pub fn new(stocks: Vec<Stock>) -> Result<Self, ResearchError> {
        let mut seen = HashSet::with_capacity(stocks.len());
        for stock in &stocks {
            stock.validate()?;
            if !seen.insert(stock.ticker.as_str()) {
                return Err(ResearchError::DataIntegrity(format!(
                    "duplicate ticker '{}' in catalog",
                    stock.ticker
                )));
            }
        }

        tracing::debug!("Catalog validated: {} stocks", stocks.len());
        Ok(Self { stocks })
    }

    pub fn from_json_str(json: &str) -> Result<Self, ResearchError> {
        let stocks: Vec<Stock> = serde_json::from_str(json)
            .map_err(|e| ResearchError::DataIntegrity(format!("malformed catalog: {}", e)))?;
        Self::new(stocks)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ResearchError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::info!("Loading catalog from {}", path.display());
        Self::from_json_str(&raw)
    }

    /// Seed coverage shipped with the crate.
    pub fn builtin() -> Result<Self, ResearchError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stock> {
        self.stocks.iter()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    /// Exact, case-sensitive ticker lookup
    pub fn get(&self, ticker: &str) -> Option<&Stock> {
        self.stocks.iter().find(|s| s.ticker == ticker)
    }

    /// Look up several tickers, keeping the requested order.
    pub fn select(&self, tickers: &[&str]) -> Result<Vec<&Stock>, ResearchError> {
        tickers
            .iter()
            .map(|t| {
                self.get(t).ok_or_else(|| {
                    ResearchError::InvalidInput(format!("ticker '{}' is not in the catalog", t))
                })
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Stock;
    type IntoIter = std::slice::Iter<'a, Stock>;

    fn into_iter(self) -> Self::IntoIter {
        self.stocks.iter()
    }
}
