//! research-desk: screen the stock catalog and project a small portfolio.
//!
//! All inputs come from the environment (or `.env`); the result is printed to
//! stdout as one JSON document.
//!
//! Usage:
//!   SEARCH_TERM=micro SORT_KEY=outlook SORT_DIRECTION=desc cargo run -p research-desk
//!   SELECTED_TICKERS=AAPL,MSFT TIME_RANGE_YEARS=3 PROJECTION_INTERVAL=quarterly cargo run -p research-desk
//!   cargo run -p research-desk -- --compact

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use research_core::{Branch, Catalog, Stock};
use scenario_engine::{RoundedProjection, ScenarioProjection, ScenarioProjector};
use serde::Serialize;

mod config;

use config::DeskConfig;

/// What one run prints
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeskReport<'a> {
    catalog_size: usize,
    matches: Vec<&'a Stock>,
    projection: Option<ProjectionReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionReport {
    summary: Vec<BranchSummary>,
    display: RoundedProjection,
    detail: ScenarioProjection,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BranchSummary {
    branch: Branch,
    final_value: f64,
    total_return_pct: Option<f64>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    // Logs go to stderr so stdout stays valid JSON.
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let args: Vec<String> = std::env::args().collect();
    let compact = args.iter().any(|a| a == "--compact");

    let config = DeskConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Search: {:?}", config.view.search_term);
    tracing::info!("  Active filters: {}", config.view.filters.len());
    tracing::info!("  Selected: {:?}", config.selected_tickers);
    tracing::info!(
        "  Projection: ${} over {} years ({})",
        config.params.invested_amount,
        config.params.time_range_years,
        config.params.interval
    );

    let catalog = Arc::new(load_catalog(&config)?);
    tracing::info!("Catalog ready with {} stocks", catalog.len());

    let matches = config
        .view
        .apply(&catalog)
        .context("Failed to screen catalog")?;
    tracing::info!("{} stocks match the screen", matches.len());

    let projection = if config.selected_tickers.is_empty() {
        None
    } else {
        Some(run_projection(&catalog, &config, current_month())?)
    };

    let report = DeskReport {
        catalog_size: catalog.len(),
        matches,
        projection,
    };
    let output = if compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{}", output);

    Ok(())
}

fn load_catalog(config: &DeskConfig) -> Result<Catalog> {
    match &config.catalog_path {
        Some(path) => Catalog::from_json_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Catalog::builtin().context("Built-in catalog is invalid"),
    }
}

fn run_projection(
    catalog: &Catalog,
    config: &DeskConfig,
    anchor: NaiveDate,
) -> Result<ProjectionReport> {
    let tickers: Vec<&str> = config.selected_tickers.iter().map(String::as_str).collect();
    let stocks = catalog
        .select(&tickers)
        .context("SELECTED_TICKERS names a stock outside the catalog")?;

    // Oversized or repeated selections are rejected by the projector.
    let detail = ScenarioProjector::with_anchor(anchor)
        .project_params(&stocks, &config.params)
        .context("Failed to project scenarios for SELECTED_TICKERS")?;
    let display = detail.rounded().context("Failed to round projection")?;
    let summary = Branch::ALL
        .iter()
        .map(|&branch| {
            let series = detail.branch(branch);
            BranchSummary {
                branch,
                final_value: series.final_value(),
                total_return_pct: series.total_return_pct(),
            }
        })
        .collect();

    Ok(ProjectionReport {
        summary,
        display,
        detail,
    })
}

/// First day of the current UTC month.
fn current_month() -> NaiveDate {
    let today = Utc::now().date_naive();
    today.with_day(1).unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_core::ResearchError;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> DeskConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DeskConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    #[test]
    fn test_projection_report_is_anchored() {
        let cfg = config(&[("SELECTED_TICKERS", "AAPL,MSFT"), ("PROJECTION_INTERVAL", "yearly")]);
        let catalog = load_catalog(&cfg).unwrap();
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let report = run_projection(&catalog, &cfg, anchor).unwrap();
        assert_eq!(report.summary.len(), 3);
        assert_eq!(report.detail.holdings.len(), 2);
        assert_eq!(report.detail.base.points[0].date, Some(anchor));
        assert_eq!(
            report.detail.base.points[1].date,
            NaiveDate::from_ymd_opt(2026, 1, 1)
        );
        assert_eq!(report.display.base.len(), 2);
    }

    #[test]
    fn test_unknown_ticker_fails() {
        let cfg = config(&[("SELECTED_TICKERS", "ZZZZ")]);
        let catalog = load_catalog(&cfg).unwrap();
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(run_projection(&catalog, &cfg, anchor).is_err());
    }

    fn rejected_as_invalid_input(err: &anyhow::Error) -> bool {
        err.downcast_ref::<ResearchError>()
            .is_some_and(|e| e.is_invalid_input())
    }

    #[test]
    fn test_more_than_three_tickers_are_rejected() {
        let cfg = config(&[("SELECTED_TICKERS", "AAPL,MSFT,AAPL,MSFT")]);
        let catalog = load_catalog(&cfg).unwrap();
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let err = run_projection(&catalog, &cfg, anchor).unwrap_err();
        assert!(rejected_as_invalid_input(&err));
        assert!(format!("{:#}", err).contains("at most 3 stocks"));
    }

    #[test]
    fn test_duplicate_ticker_is_rejected() {
        let cfg = config(&[("SELECTED_TICKERS", "AAPL,aapl")]);
        let catalog = load_catalog(&cfg).unwrap();
        let anchor = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let err = run_projection(&catalog, &cfg, anchor).unwrap_err();
        assert!(rejected_as_invalid_input(&err));
        assert!(format!("{:#}", err).contains("more than once"));
    }

    #[test]
    fn test_current_month_is_first_day() {
        assert_eq!(current_month().day(), 1);
    }
}
