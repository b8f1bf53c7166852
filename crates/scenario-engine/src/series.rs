use chrono::NaiveDate;
use research_core::{Branch, ResearchError};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Interval;

/// One interval boundary of a projected trajectory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub period_index: u32,
    pub label: String,
    /// Calendar month of the boundary, when the projection was anchored
    pub date: Option<NaiveDate>,
    /// Portfolio value at full precision
    pub value: f64,
    /// Per-holding share of `value`, in selection order
    pub contributions: Vec<f64>,
}

/// Projected value trajectory for one branch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub branch: Branch,
    pub points: Vec<SeriesPoint>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn at(&self, period_index: u32) -> Option<&SeriesPoint> {
        self.points.get(period_index as usize)
    }

    pub fn start_value(&self) -> f64 {
        self.points.first().map(|p| p.value).unwrap_or(0.0)
    }

    pub fn final_value(&self) -> f64 {
        self.points.last().map(|p| p.value).unwrap_or(0.0)
    }

    /// Percent change from the start to the last point. `None` when nothing
    /// was invested.
    pub fn total_return_pct(&self) -> Option<f64> {
        let start = self.start_value();
        if start == 0.0 {
            return None;
        }
        Some((self.final_value() / start - 1.0) * 100.0)
    }

    /// Copy of the points with values rounded to cents for display.
    pub fn rounded(&self) -> Result<Vec<DisplayPoint>, ResearchError> {
        self.points
            .iter()
            .map(|p| {
                Ok(DisplayPoint {
                    period_index: p.period_index,
                    label: p.label.clone(),
                    date: p.date,
                    value: to_cents(p.value)?,
                })
            })
            .collect()
    }
}

/// Point with its value rounded for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPoint {
    pub period_index: u32,
    pub label: String,
    pub date: Option<NaiveDate>,
    pub value: Decimal,
}

/// Capital assigned to one selected stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub allocation: f64,
}

/// Bear, base and bull trajectories for one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProjection {
    pub invested_amount: f64,
    pub time_range_years: u32,
    pub interval: Interval,
    pub holdings: Vec<Holding>,
    pub bear: Series,
    pub base: Series,
    pub bull: Series,
}

impl ScenarioProjection {
    pub fn branch(&self, branch: Branch) -> &Series {
        match branch {
            Branch::Bear => &self.bear,
            Branch::Base => &self.base,
            Branch::Bull => &self.bull,
        }
    }

    /// Display copy; full-precision values stay untouched.
    pub fn rounded(&self) -> Result<RoundedProjection, ResearchError> {
        Ok(RoundedProjection {
            bear: self.bear.rounded()?,
            base: self.base.rounded()?,
            bull: self.bull.rounded()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundedProjection {
    pub bear: Vec<DisplayPoint>,
    pub base: Vec<DisplayPoint>,
    pub bull: Vec<DisplayPoint>,
}

fn to_cents(value: f64) -> Result<Decimal, ResearchError> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| {
            ResearchError::InvalidInput(format!("value {} cannot be shown as currency", value))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn series(values: &[f64]) -> Series {
        Series {
            branch: Branch::Base,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| SeriesPoint {
                    period_index: i as u32,
                    label: Interval::Yearly.label(i as u32),
                    date: None,
                    value: *v,
                    contributions: vec![*v],
                })
                .collect(),
        }
    }

    #[test]
    fn test_rounding_happens_only_on_copy() {
        let s = series(&[10000.0, 10200.004999, 10404.0061]);
        let rounded = s.rounded().unwrap();

        assert_eq!(rounded[0].value, dec!(10000.00));
        assert_eq!(rounded[1].value, dec!(10200.00));
        assert_eq!(rounded[2].value, dec!(10404.01));
        // Source keeps full precision.
        assert_eq!(s.points[1].value, 10200.004999);
    }

    #[test]
    fn test_summary_helpers() {
        let s = series(&[1000.0, 1100.0, 1210.0]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.final_value(), 1210.0);
        assert!((s.total_return_pct().unwrap() - 21.0).abs() < 1e-9);
        assert_eq!(s.at(1).unwrap().label, "Year 1");
        assert!(s.at(3).is_none());

        assert!(series(&[0.0, 0.0]).total_return_pct().is_none());
    }

    #[test]
    fn test_point_serializes_camel_case() {
        let json = serde_json::to_value(&series(&[1000.0]).points[0]).unwrap();
        assert_eq!(json["periodIndex"], 0);
        assert_eq!(json["label"], "Start");
        assert!(json["date"].is_null());
    }

    #[test]
    fn test_non_finite_value_cannot_round() {
        let s = series(&[f64::INFINITY]);
        assert!(s.rounded().unwrap_err().is_invalid_input());
    }
}
