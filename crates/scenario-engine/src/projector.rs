use std::collections::HashSet;

use chrono::{Months, NaiveDate};
use research_core::{Branch, ResearchError, Stock};

use crate::series::{Holding, ScenarioProjection, Series, SeriesPoint};
use crate::{Interval, ScenarioParams};

/// Most stocks a projection may split capital across
pub const MAX_SELECTED_STOCKS: usize = 3;
pub const MIN_TIME_RANGE_YEARS: u32 = 1;
pub const MAX_TIME_RANGE_YEARS: u32 = 3;

/// Projection calculator
///
/// Holds only presentation settings; the arithmetic is a pure function of the
/// arguments to [`ScenarioProjector::project`]. Without an anchor, points
/// carry no calendar date.
#[derive(Debug, Clone, Default)]
pub struct ScenarioProjector {
    anchor: Option<NaiveDate>,
}

/// Project with an unanchored [`ScenarioProjector`].
pub fn project(
    selected: &[&Stock],
    invested_amount: f64,
    time_range_years: u32,
    interval: Interval,
) -> Result<ScenarioProjection, ResearchError> {
    ScenarioProjector::new().project(selected, invested_amount, time_range_years, interval)
}

impl ScenarioProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Date each point as `anchor` plus the elapsed months.
    pub fn with_anchor(anchor: NaiveDate) -> Self {
        Self {
            anchor: Some(anchor),
        }
    }

    pub fn anchor(&self) -> Option<NaiveDate> {
        self.anchor
    }

    pub fn project_params(
        &self,
        selected: &[&Stock],
        params: &ScenarioParams,
    ) -> Result<ScenarioProjection, ResearchError> {
        self.project(
            selected,
            params.invested_amount,
            params.time_range_years,
            params.interval,
        )
    }

    /// Equal-weight, buy-and-hold value of `invested_amount` at every
    /// interval boundary for the bear, base and bull branches.
    pub fn project(
        &self,
        selected: &[&Stock],
        invested_amount: f64,
        time_range_years: u32,
        interval: Interval,
    ) -> Result<ScenarioProjection, ResearchError> {
        if let Err(e) = validate_inputs(selected, invested_amount, time_range_years) {
            tracing::warn!("Rejected projection request: {}", e);
            return Err(e);
        }

        let periods = time_range_years * interval.periods_per_year();
        let allocation = if selected.is_empty() {
            0.0
        } else {
            invested_amount / selected.len() as f64
        };

        tracing::debug!(
            "Projecting ${:.2} across {} stocks for {} years ({}, {} periods)",
            invested_amount,
            selected.len(),
            time_range_years,
            interval,
            periods
        );

        let holdings = selected
            .iter()
            .map(|s| Holding {
                ticker: s.ticker.clone(),
                allocation,
            })
            .collect();

        let branch_series = |branch: Branch| {
            self.project_branch(branch, selected, invested_amount, allocation, periods, interval)
        };

        Ok(ScenarioProjection {
            invested_amount,
            time_range_years,
            interval,
            holdings,
            bear: branch_series(Branch::Bear)?,
            base: branch_series(Branch::Base)?,
            bull: branch_series(Branch::Bull)?,
        })
    }

    fn project_branch(
        &self,
        branch: Branch,
        selected: &[&Stock],
        invested_amount: f64,
        allocation: f64,
        periods: u32,
        interval: Interval,
    ) -> Result<Series, ResearchError> {
        // Nothing to compound: the money sits uninvested.
        if selected.is_empty() {
            return Ok(Series {
                branch,
                points: vec![self.point(0, interval, invested_amount, Vec::new())],
            });
        }

        let growth = selected
            .iter()
            .map(|s| period_growth(s, branch, interval))
            .collect::<Result<Vec<f64>, _>>()?;

        let mut points = Vec::with_capacity(periods as usize + 1);
        let opening = opening_contributions(invested_amount, allocation, selected.len());
        points.push(self.point(0, interval, invested_amount, opening));

        for period_index in 1..=periods {
            let contributions: Vec<f64> = growth
                .iter()
                .map(|g| allocation * g.powi(period_index as i32))
                .collect();
            let value: f64 = contributions.iter().sum();
            points.push(self.point(period_index, interval, value, contributions));
        }

        Ok(Series { branch, points })
    }

    fn point(
        &self,
        period_index: u32,
        interval: Interval,
        value: f64,
        contributions: Vec<f64>,
    ) -> SeriesPoint {
        let date = self.anchor.and_then(|anchor| {
            anchor.checked_add_months(Months::new(period_index * interval.months_per_period()))
        });
        SeriesPoint {
            period_index,
            label: interval.label(period_index),
            date,
            value,
            contributions,
        }
    }
}

/// Equal split of the starting capital. The last holding takes the rounding
/// remainder so the contributions sum back to `invested_amount` exactly.
fn opening_contributions(invested_amount: f64, allocation: f64, count: usize) -> Vec<f64> {
    let mut contributions = vec![allocation; count];
    if let Some(last) = contributions.last_mut() {
        *last = invested_amount - allocation * (count - 1) as f64;
    }
    contributions
}

/// Per-period growth factor `(1 + r_annual)^(1/periods_per_year)`.
///
/// Compounding it `periods_per_year` times reproduces the annual rate
/// exactly, unlike dividing the rate by the period count.
fn period_growth(stock: &Stock, branch: Branch, interval: Interval) -> Result<f64, ResearchError> {
    let rate = stock.prediction(branch);
    let annual = 1.0 + rate / 100.0;
    if !annual.is_finite() || annual < 0.0 {
        return Err(ResearchError::DataIntegrity(format!(
            "{} has an impossible {} rate {}%",
            stock.ticker, branch, rate
        )));
    }
    Ok(annual.powf(1.0 / interval.periods_per_year() as f64))
}

fn validate_inputs(
    selected: &[&Stock],
    invested_amount: f64,
    time_range_years: u32,
) -> Result<(), ResearchError> {
    if !invested_amount.is_finite() || invested_amount < 0.0 {
        return Err(ResearchError::InvalidInput(format!(
            "invested amount must be a non-negative number, got {}",
            invested_amount
        )));
    }
    if !(MIN_TIME_RANGE_YEARS..=MAX_TIME_RANGE_YEARS).contains(&time_range_years) {
        return Err(ResearchError::InvalidInput(format!(
            "time range must be {}-{} years, got {}",
            MIN_TIME_RANGE_YEARS, MAX_TIME_RANGE_YEARS, time_range_years
        )));
    }
    if selected.len() > MAX_SELECTED_STOCKS {
        return Err(ResearchError::InvalidInput(format!(
            "at most {} stocks can be projected, got {}",
            MAX_SELECTED_STOCKS,
            selected.len()
        )));
    }
    let mut seen = HashSet::with_capacity(selected.len());
    for stock in selected {
        if !seen.insert(stock.ticker.as_str()) {
            return Err(ResearchError::InvalidInput(format!(
                "{} is selected more than once",
                stock.ticker
            )));
        }
    }
    Ok(())
}
