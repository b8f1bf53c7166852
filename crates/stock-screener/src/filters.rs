//! Minimum-threshold filters on metric and prediction columns.

use std::collections::BTreeMap;

use research_core::{FilterKey, ResearchError, Stock};

/// Threshold applied by the table's one-click filter buttons.
pub const QUICK_FILTER_THRESHOLD: f64 = 9.0;

/// Set of active thresholds. A key that is absent is "unset".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricFilters {
    thresholds: BTreeMap<FilterKey, f64>,
}

impl MetricFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MetricFilters::set`]
    pub fn with(mut self, key: impl Into<FilterKey>, threshold: f64) -> Self {
        self.set(key, threshold);
        self
    }

    pub fn set(&mut self, key: impl Into<FilterKey>, threshold: f64) {
        self.thresholds.insert(key.into(), threshold);
    }

    pub fn clear(&mut self, key: impl Into<FilterKey>) {
        self.thresholds.remove(&key.into());
    }

    /// Re-applying the threshold already set on a key clears it; anything
    /// else sets it.
    pub fn toggle(&mut self, key: impl Into<FilterKey>, threshold: f64) {
        let key = key.into();
        if self.get(key) == Some(threshold) {
            self.clear(key);
        } else {
            self.set(key, threshold);
        }
    }

    pub fn get(&self, key: impl Into<FilterKey>) -> Option<f64> {
        self.thresholds.get(&key.into()).copied()
    }

    /// Set thresholds in key order
    pub fn active(&self) -> impl Iterator<Item = (FilterKey, f64)> + '_ {
        self.thresholds.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }

    /// Parse `key=threshold` pairs separated by commas, e.g.
    /// `profitability=9,predictions.base=2`. Empty input yields no filters.
    pub fn parse(raw: &str) -> Result<Self, ResearchError> {
        let mut filters = Self::new();
        for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                ResearchError::InvalidInput(format!("filter '{}' is not key=threshold", pair))
            })?;
            let key: FilterKey = key.trim().parse()?;
            let threshold: f64 = value.trim().parse().map_err(|_| {
                ResearchError::InvalidInput(format!("filter threshold '{}' is not a number", value))
            })?;
            filters.set(key, threshold);
        }
        Ok(filters)
    }

    pub(crate) fn validate(&self) -> Result<(), ResearchError> {
        match self.thresholds.iter().find(|(_, v)| !v.is_finite()) {
            Some((key, value)) => Err(ResearchError::InvalidInput(format!(
                "threshold {} on '{}' is not finite",
                value, key
            ))),
            None => Ok(()),
        }
    }

    /// True when the stock clears every active threshold.
    pub(crate) fn admits(&self, stock: &Stock) -> Result<bool, ResearchError> {
        for (key, threshold) in self.active() {
            if stock.resolve(key)? < threshold {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
