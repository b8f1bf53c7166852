use anyhow::{Context, Result};
use scenario_engine::ScenarioParams;
use std::env;
use std::path::PathBuf;
use stock_screener::ViewRequest;

/// Settings for one research-desk run
#[derive(Debug, Clone)]
pub struct DeskConfig {
    // Catalog source (built-in data when unset)
    pub catalog_path: Option<PathBuf>,

    // Screen
    pub view: ViewRequest,

    // Scenario projection
    pub selected_tickers: Vec<String>,
    pub params: ScenarioParams,
}

impl DeskConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let catalog_path = lookup("CATALOG_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let view = ViewRequest::parse(
            &var("SEARCH_TERM"),
            &var("METRIC_FILTERS"),
            &var("SORT_KEY"),
            lookup("SORT_DIRECTION").as_deref(),
        )
        .context("Invalid screen settings (SEARCH_TERM, METRIC_FILTERS, SORT_KEY, SORT_DIRECTION)")?;

        let selected_tickers = var("SELECTED_TICKERS")
            .split(',')
            .map(|t| t.trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();

        let params = ScenarioParams::parse(
            &lookup("INVESTED_AMOUNT").unwrap_or_else(|| "10000".to_string()),
            &lookup("TIME_RANGE_YEARS").unwrap_or_else(|| "1".to_string()),
            &lookup("PROJECTION_INTERVAL").unwrap_or_else(|| "monthly".to_string()),
        )
        .context(
            "Invalid projection settings (INVESTED_AMOUNT, TIME_RANGE_YEARS, PROJECTION_INTERVAL)",
        )?;

        Ok(Self {
            catalog_path,
            view,
            selected_tickers,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_core::{Branch, MetricKey};
    use scenario_engine::Interval;
    use std::collections::HashMap;
    use stock_screener::{SortKey, SortSpec};

    fn config(pairs: &[(&str, &str)]) -> Result<DeskConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DeskConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert!(cfg.catalog_path.is_none());
        assert!(cfg.view.search_term.is_empty());
        assert!(cfg.view.filters.is_empty());
        assert_eq!(cfg.view.sort, SortSpec::None);
        assert!(cfg.selected_tickers.is_empty());
        assert_eq!(cfg.params, ScenarioParams::default());
    }

    #[test]
    fn test_full_settings() {
        let cfg = config(&[
            ("CATALOG_PATH", "/tmp/stocks.json"),
            ("SEARCH_TERM", "micro"),
            ("METRIC_FILTERS", "outlook=9,predictions.bull=12"),
            ("SORT_KEY", "predictions.base"),
            ("SORT_DIRECTION", "desc"),
            ("SELECTED_TICKERS", " aapl, MSFT ,,"),
            ("INVESTED_AMOUNT", "2500"),
            ("TIME_RANGE_YEARS", "3"),
            ("PROJECTION_INTERVAL", "Quarterly"),
        ])
        .unwrap();

        assert_eq!(cfg.catalog_path, Some(PathBuf::from("/tmp/stocks.json")));
        assert_eq!(cfg.view.search_term, "micro");
        assert_eq!(cfg.view.filters.get(MetricKey::Outlook), Some(9.0));
        assert_eq!(cfg.view.filters.get(Branch::Bull), Some(12.0));
        assert_eq!(cfg.view.sort, SortSpec::descending(SortKey::Prediction(Branch::Base)));
        assert_eq!(cfg.selected_tickers, vec!["AAPL", "MSFT"]);
        assert_eq!(cfg.params.invested_amount, 2500.0);
        assert_eq!(cfg.params.time_range_years, 3);
        assert_eq!(cfg.params.interval, Interval::Quarterly);
    }

    #[test]
    fn test_unknown_sort_key_is_rejected() {
        let err = config(&[("SORT_KEY", "marketCap")]).unwrap_err();
        assert!(err.to_string().contains("SORT_KEY"));
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let err = config(&[("INVESTED_AMOUNT", "-50")]).unwrap_err();
        assert!(err.to_string().contains("INVESTED_AMOUNT"));
    }

    #[test]
    fn test_blank_amount_counts_as_zero() {
        let cfg = config(&[("INVESTED_AMOUNT", "")]).unwrap();
        assert_eq!(cfg.params.invested_amount, 0.0);
    }
}
