//! Metric, valuation and prediction key taxonomy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ResearchError;

/// Qualitative 0-10 scores on the research rubric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    Profitability,
    CompanyViability,
    MarketPosition,
    FinancialHealth,
    TrackRecord,
    RevenueQuality,
    AnalystSentiment,
    CapitalAllocation,
    Outlook,
    Alignment,
}

impl MetricKey {
    /// Every rubric key, in table column order.
    pub const ALL: [MetricKey; 10] = [
        MetricKey::Profitability,
        MetricKey::CompanyViability,
        MetricKey::MarketPosition,
        MetricKey::FinancialHealth,
        MetricKey::TrackRecord,
        MetricKey::RevenueQuality,
        MetricKey::AnalystSentiment,
        MetricKey::CapitalAllocation,
        MetricKey::Outlook,
        MetricKey::Alignment,
    ];

    /// Highest score a metric may carry.
    pub const MAX_SCORE: u8 = 10;

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::Profitability => "profitability",
            MetricKey::CompanyViability => "companyViability",
            MetricKey::MarketPosition => "marketPosition",
            MetricKey::FinancialHealth => "financialHealth",
            MetricKey::TrackRecord => "trackRecord",
            MetricKey::RevenueQuality => "revenueQuality",
            MetricKey::AnalystSentiment => "analystSentiment",
            MetricKey::CapitalAllocation => "capitalAllocation",
            MetricKey::Outlook => "outlook",
            MetricKey::Alignment => "alignment",
        }
    }

    /// Column header shown by the comparison table
    pub fn label(&self) -> &'static str {
        match self {
            MetricKey::Profitability => "Profitability",
            MetricKey::CompanyViability => "Company Viability",
            MetricKey::MarketPosition => "Market Position",
            MetricKey::FinancialHealth => "Financial Health",
            MetricKey::TrackRecord => "Track Record",
            MetricKey::RevenueQuality => "Revenue Quality",
            MetricKey::AnalystSentiment => "Analyst Sentiment",
            MetricKey::CapitalAllocation => "Capital Allocation",
            MetricKey::Outlook => "Outlook",
            MetricKey::Alignment => "Alignment",
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ResearchError::InvalidInput(format!("unknown metric key '{}'", s)))
    }
}

/// Display unit attached to a valuation ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    Multiple,
    Percent,
    Billions,
    Unitless,
}

impl MetricUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            MetricUnit::Multiple => "x",
            MetricUnit::Percent => "%",
            MetricUnit::Billions => "B",
            MetricUnit::Unitless => "",
        }
    }
}

/// Quantitative valuation ratios shown for context only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvancedMetricKey {
    PeRatio,
    EpsGrowth,
    DebtToEquity,
    FreeCashFlow,
    OperatingMargin,
}

impl AdvancedMetricKey {
    pub const ALL: [AdvancedMetricKey; 5] = [
        AdvancedMetricKey::PeRatio,
        AdvancedMetricKey::EpsGrowth,
        AdvancedMetricKey::DebtToEquity,
        AdvancedMetricKey::FreeCashFlow,
        AdvancedMetricKey::OperatingMargin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdvancedMetricKey::PeRatio => "peRatio",
            AdvancedMetricKey::EpsGrowth => "epsGrowth",
            AdvancedMetricKey::DebtToEquity => "debtToEquity",
            AdvancedMetricKey::FreeCashFlow => "freeCashFlow",
            AdvancedMetricKey::OperatingMargin => "operatingMargin",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdvancedMetricKey::PeRatio => "P/E Ratio",
            AdvancedMetricKey::EpsGrowth => "EPS Growth",
            AdvancedMetricKey::DebtToEquity => "Debt to Equity",
            AdvancedMetricKey::FreeCashFlow => "Free Cash Flow",
            AdvancedMetricKey::OperatingMargin => "Operating Margin",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AdvancedMetricKey::PeRatio => "Price to Earnings Ratio - A measure of company valuation",
            AdvancedMetricKey::EpsGrowth => "Earnings Per Share Growth Rate",
            AdvancedMetricKey::DebtToEquity => "Measure of financial leverage",
            AdvancedMetricKey::FreeCashFlow => "Available cash after capital expenditures",
            AdvancedMetricKey::OperatingMargin => {
                "Profitability metric showing operational efficiency"
            }
        }
    }

    pub fn unit(&self) -> MetricUnit {
        match self {
            AdvancedMetricKey::PeRatio => MetricUnit::Multiple,
            AdvancedMetricKey::EpsGrowth => MetricUnit::Percent,
            AdvancedMetricKey::DebtToEquity => MetricUnit::Unitless,
            AdvancedMetricKey::FreeCashFlow => MetricUnit::Billions,
            AdvancedMetricKey::OperatingMargin => MetricUnit::Percent,
        }
    }

    /// Value with its unit suffix, e.g. `28.5x` or `30.2%`
    pub fn format_value(&self, value: f64) -> String {
        format!("{}{}", value, self.unit().symbol())
    }
}

impl fmt::Display for AdvancedMetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prediction scenario branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Bear,
    Base,
    Bull,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Bear, Branch::Base, Branch::Bull];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Bear => "bear",
            Branch::Base => "base",
            Branch::Bull => "bull",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = ResearchError;

    /// Accepts the bare branch name or the table's `predictions.<branch>` form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("predictions.").unwrap_or(s);
        Branch::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == name)
            .ok_or_else(|| ResearchError::InvalidInput(format!("unknown prediction branch '{}'", s)))
    }
}

/// A numeric column that filters and sorts resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Metric(MetricKey),
    Prediction(Branch),
}

impl FilterKey {
    pub fn label(&self) -> String {
        match self {
            FilterKey::Metric(key) => key.label().to_string(),
            FilterKey::Prediction(branch) => format!("{} Case", capitalize(branch.as_str())),
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKey::Metric(key) => write!(f, "{}", key),
            FilterKey::Prediction(branch) => write!(f, "predictions.{}", branch),
        }
    }
}

impl FromStr for FilterKey {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(key) = s.parse::<MetricKey>() {
            return Ok(FilterKey::Metric(key));
        }
        if let Ok(branch) = s.parse::<Branch>() {
            return Ok(FilterKey::Prediction(branch));
        }
        Err(ResearchError::InvalidInput(format!("unknown filter key '{}'", s)))
    }
}

impl From<MetricKey> for FilterKey {
    fn from(key: MetricKey) -> Self {
        FilterKey::Metric(key)
    }
}

impl From<Branch> for FilterKey {
    fn from(branch: Branch) -> Self {
        FilterKey::Prediction(branch)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
