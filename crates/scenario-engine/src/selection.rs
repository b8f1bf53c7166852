use research_core::{ResearchError, Stock};
use serde::{Deserialize, Serialize};

use crate::projector::{MAX_SELECTED_STOCKS, MAX_TIME_RANGE_YEARS, MIN_TIME_RANGE_YEARS};
use crate::Interval;

/// Stocks picked for a projection, in the order they were added
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    stocks: Vec<&'a Stock>,
}

impl<'a> Selection<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stock unless the selection is full or already holds its ticker.
    /// Returns whether the stock was added.
    pub fn add(&mut self, stock: &'a Stock) -> bool {
        if self.is_full() || self.contains(&stock.ticker) {
            tracing::debug!("Selection ignored {}", stock.ticker);
            return false;
        }
        self.stocks.push(stock);
        true
    }

    /// Returns whether a stock was removed.
    pub fn remove(&mut self, ticker: &str) -> bool {
        let before = self.stocks.len();
        self.stocks.retain(|s| s.ticker != ticker);
        self.stocks.len() != before
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.stocks.iter().any(|s| s.ticker == ticker)
    }

    pub fn stocks(&self) -> &[&'a Stock] {
        &self.stocks
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.stocks.iter().map(|s| s.ticker.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.stocks.len() >= MAX_SELECTED_STOCKS
    }
}

/// Scalar projection inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParams {
    pub invested_amount: f64,
    pub time_range_years: u32,
    pub interval: Interval,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            invested_amount: 10000.0,
            time_range_years: 1,
            interval: Interval::Monthly,
        }
    }
}

impl ScenarioParams {
    /// Build from form text. A blank or unparsable amount counts as 0 and a
    /// blank, unparsable or zero horizon as 1 year; anything else that is out
    /// of range is rejected rather than coerced.
    pub fn parse(amount: &str, years: &str, interval: &str) -> Result<Self, ResearchError> {
        let invested_amount = amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan())
            .unwrap_or(0.0);

        let years = years
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| !v.is_nan() && *v != 0.0)
            .unwrap_or(1.0);
        if years.fract() != 0.0
            || years < MIN_TIME_RANGE_YEARS as f64
            || years > MAX_TIME_RANGE_YEARS as f64
        {
            return Err(ResearchError::InvalidInput(format!(
                "time range must be a whole number of years between {} and {}, got {}",
                MIN_TIME_RANGE_YEARS, MAX_TIME_RANGE_YEARS, years
            )));
        }

        let params = Self {
            invested_amount,
            time_range_years: years as u32,
            interval: interval.parse()?,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ResearchError> {
        if !self.invested_amount.is_finite() || self.invested_amount < 0.0 {
            return Err(ResearchError::InvalidInput(format!(
                "invested amount must be a non-negative number, got {}",
                self.invested_amount
            )));
        }
        if !(MIN_TIME_RANGE_YEARS..=MAX_TIME_RANGE_YEARS).contains(&self.time_range_years) {
            return Err(ResearchError::InvalidInput(format!(
                "time range must be {}-{} years, got {}",
                MIN_TIME_RANGE_YEARS, MAX_TIME_RANGE_YEARS, self.time_range_years
            )));
        }
        Ok(())
    }
}
