use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{AdvancedMetricKey, Branch, FilterKey, MetricKey, ResearchError};

/// Scenario return assumptions with their rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Predictions {
    /// Annual return in percent, e.g. -3.0 for -3%/year
    pub bear: f64,
    #[serde(default)]
    pub bear_points: Vec<String>,
    pub base: f64,
    #[serde(default)]
    pub base_points: Vec<String>,
    pub bull: f64,
    #[serde(default)]
    pub bull_points: Vec<String>,
}

impl Predictions {
    /// Annual percentage return for a branch
    pub fn rate(&self, branch: Branch) -> f64 {
        match branch {
            Branch::Bear => self.bear,
            Branch::Base => self.base,
            Branch::Bull => self.bull,
        }
    }

    pub fn points(&self, branch: Branch) -> &[String] {
        match branch {
            Branch::Bear => &self.bear_points,
            Branch::Base => &self.base_points,
            Branch::Bull => &self.bull_points,
        }
    }
}

/// Monthly closing price, chart-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// `YYYY-MM`
    pub date: String,
    pub price: f64,
}

impl PricePoint {
    /// First day of the month this point belongs to
    pub fn month(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-01", self.date), "%Y-%m-%d").ok()
    }
}

/// One covered company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub name: String,
    pub ticker: String,
    pub ceo: String,
    pub hq: String,
    pub industry: String,
    pub metrics: BTreeMap<MetricKey, u8>,
    #[serde(deserialize_with = "deserialize_advanced_metrics")]
    pub advanced_metrics: BTreeMap<AdvancedMetricKey, f64>,
    pub predictions: Predictions,
    #[serde(default)]
    pub historical_data: Vec<PricePoint>,
}

impl Stock {
    /// Rubric score, or a data-integrity error if the record lacks the key.
    pub fn metric(&self, key: MetricKey) -> Result<u8, ResearchError> {
        self.metrics.get(&key).copied().ok_or_else(|| {
            ResearchError::DataIntegrity(format!("{} is missing metric '{}'", self.ticker, key))
        })
    }

    pub fn advanced_metric(&self, key: AdvancedMetricKey) -> Result<f64, ResearchError> {
        self.advanced_metrics.get(&key).copied().ok_or_else(|| {
            ResearchError::DataIntegrity(format!(
                "{} is missing advanced metric '{}'",
                self.ticker, key
            ))
        })
    }

    /// Annual percentage return for a branch
    pub fn prediction(&self, branch: Branch) -> f64 {
        self.predictions.rate(branch)
    }

    /// Resolve a filter/sort column: prediction keys read the branch rate,
    /// metric keys read the rubric score.
    pub fn resolve(&self, key: FilterKey) -> Result<f64, ResearchError> {
        match key {
            FilterKey::Metric(metric) => self.metric(metric).map(f64::from),
            FilterKey::Prediction(branch) => self.finite_prediction(branch),
        }
    }

    /// Branch rate for filtering and ordering. A NaN or infinite rate has no
    /// place in either and is a data-integrity error.
    pub fn finite_prediction(&self, branch: Branch) -> Result<f64, ResearchError> {
        let rate = self.prediction(branch);
        if rate.is_finite() {
            Ok(rate)
        } else {
            Err(ResearchError::DataIntegrity(format!(
                "{} has a non-finite {} rate",
                self.ticker, branch
            )))
        }
    }

    /// Check that the record is complete and internally consistent.
    pub fn validate(&self) -> Result<(), ResearchError> {
        if self.ticker.trim().is_empty() {
            return Err(ResearchError::DataIntegrity(format!(
                "stock '{}' has an empty ticker",
                self.name
            )));
        }

        for key in MetricKey::ALL {
            let score = self.metric(key)?;
            if score > MetricKey::MAX_SCORE {
                return Err(ResearchError::DataIntegrity(format!(
                    "{} scores {} on '{}' (max {})",
                    self.ticker,
                    score,
                    key,
                    MetricKey::MAX_SCORE
                )));
            }
        }

        for key in AdvancedMetricKey::ALL {
            let value = self.advanced_metric(key)?;
            if !value.is_finite() {
                return Err(ResearchError::DataIntegrity(format!(
                    "{} has a non-finite '{}'",
                    self.ticker, key
                )));
            }
        }

        for branch in Branch::ALL {
            let rate = self.prediction(branch);
            // Below -100%/year the per-period root is undefined.
            if !rate.is_finite() || rate < -100.0 {
                return Err(ResearchError::DataIntegrity(format!(
                    "{} has an impossible {} rate {}",
                    self.ticker, branch, rate
                )));
            }
        }

        let mut previous: Option<NaiveDate> = None;
        for point in &self.historical_data {
            let month = point.month().ok_or_else(|| {
                ResearchError::DataIntegrity(format!(
                    "{} has a malformed price date '{}'",
                    self.ticker, point.date
                ))
            })?;
            if previous.is_some_and(|p| month <= p) {
                return Err(ResearchError::DataIntegrity(format!(
                    "{} price history is not chronological at {}",
                    self.ticker, point.date
                )));
            }
            if !point.price.is_finite() {
                return Err(ResearchError::DataIntegrity(format!(
                    "{} has a non-finite price at {}",
                    self.ticker, point.date
                )));
            }
            previous = Some(month);
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Valuation ratios arrive either as JSON numbers or as numeric strings.
fn deserialize_advanced_metrics<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<AdvancedMetricKey, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<AdvancedMetricKey, NumberOrText>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            let parsed = match value {
                NumberOrText::Number(n) => n,
                NumberOrText::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                    serde::de::Error::custom(format!("'{}' is not numeric: {:?}", key, text))
                })?,
            };
            Ok((key, parsed))
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Complete record with every metric set to `score`.
    pub fn stock(ticker: &str, score: u8) -> Stock {
        Stock {
            name: format!("{} Corp", ticker),
            ticker: ticker.to_string(),
            ceo: "Jane Doe".to_string(),
            hq: "Austin, TX".to_string(),
            industry: "Software".to_string(),
            metrics: MetricKey::ALL.iter().map(|k| (*k, score)).collect(),
            advanced_metrics: AdvancedMetricKey::ALL.iter().map(|k| (*k, 1.5)).collect(),
            predictions: Predictions {
                bear: -3.0,
                bear_points: vec!["Margin pressure".to_string()],
                base: 2.0,
                base_points: vec![],
                bull: 8.0,
                bull_points: vec![],
            },
            historical_data: vec![
                PricePoint { date: "2023-01".to_string(), price: 100.0 },
                PricePoint { date: "2023-02".to_string(), price: 104.5 },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::stock;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolve_dispatches_on_key_kind() {
        let s = stock("AAPL", 7);
        assert_relative_eq!(s.resolve(FilterKey::Metric(MetricKey::Outlook)).unwrap(), 7.0);
        assert_relative_eq!(s.resolve(FilterKey::Prediction(Branch::Bear)).unwrap(), -3.0);
        assert_relative_eq!(s.resolve(FilterKey::Prediction(Branch::Bull)).unwrap(), 8.0);
    }

    #[test]
    fn test_non_finite_rate_does_not_resolve() {
        let mut s = stock("AAPL", 7);
        s.predictions.base = f64::NAN;
        s.predictions.bull = f64::INFINITY;

        let err = s.resolve(FilterKey::Prediction(Branch::Base)).unwrap_err();
        assert!(err.is_data_integrity());
        assert!(err.to_string().contains("base"));
        assert!(s.finite_prediction(Branch::Bull).unwrap_err().is_data_integrity());
        assert_relative_eq!(s.finite_prediction(Branch::Bear).unwrap(), -3.0);
    }

    #[test]
    fn test_missing_metric_is_data_integrity() {
        let mut s = stock("AAPL", 7);
        s.metrics.remove(&MetricKey::Alignment);

        let err = s.resolve(FilterKey::Metric(MetricKey::Alignment)).unwrap_err();
        assert!(err.is_data_integrity());
        assert!(err.to_string().contains("alignment"));
        assert!(s.validate().unwrap_err().is_data_integrity());
    }

    #[test]
    fn test_validate_rejects_out_of_rubric_score() {
        let mut s = stock("AAPL", 7);
        s.metrics.insert(MetricKey::Outlook, 11);
        assert!(s.validate().unwrap_err().is_data_integrity());
    }

    #[test]
    fn test_validate_rejects_unordered_history() {
        let mut s = stock("AAPL", 7);
        s.historical_data.reverse();
        assert!(s.validate().is_err());

        let mut s = stock("AAPL", 7);
        s.historical_data[0].date = "January 2023".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validate_does_not_require_branch_ordering() {
        let mut s = stock("AAPL", 7);
        s.predictions.bear = 12.0;
        s.predictions.bull = -5.0;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_advanced_metrics_accept_strings_and_numbers() {
        let json = r#"{
            "name": "Apple Inc", "ticker": "AAPL", "ceo": "Tim Cook",
            "hq": "Cupertino, CA", "industry": "Consumer Electronics",
            "metrics": {"profitability": 10},
            "advancedMetrics": {"peRatio": "28.5", "epsGrowth": 12.3},
            "predictions": {"bear": -3, "base": 2, "bull": 8}
        }"#;
        let s: Stock = serde_json::from_str(json).unwrap();
        assert_relative_eq!(s.advanced_metric(AdvancedMetricKey::PeRatio).unwrap(), 28.5);
        assert_relative_eq!(s.advanced_metric(AdvancedMetricKey::EpsGrowth).unwrap(), 12.3);
        assert!(s.predictions.base_points.is_empty());
        assert!(s.historical_data.is_empty());
    }

    #[test]
    fn test_non_numeric_advanced_metric_fails_to_parse() {
        let json = r#"{
            "name": "X", "ticker": "X", "ceo": "", "hq": "", "industry": "",
            "metrics": {},
            "advancedMetrics": {"peRatio": "n/a"},
            "predictions": {"bear": 0, "base": 0, "bull": 0}
        }"#;
        assert!(serde_json::from_str::<Stock>(json).is_err());
    }
}
