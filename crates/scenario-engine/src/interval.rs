use std::fmt;
use std::str::FromStr;

use research_core::ResearchError;
use serde::{Deserialize, Serialize};

/// Spacing between projected points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Interval {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Interval::Monthly => 12,
            Interval::Quarterly => 4,
            Interval::Yearly => 1,
        }
    }

    pub fn months_per_period(&self) -> u32 {
        12 / self.periods_per_year()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Monthly => "monthly",
            Interval::Quarterly => "quarterly",
            Interval::Yearly => "yearly",
        }
    }

    /// Chart label for a period boundary. Period 0 is the starting point.
    pub fn label(&self, period_index: u32) -> String {
        if period_index == 0 {
            return "Start".to_string();
        }
        match self {
            Interval::Monthly => format!("Month {}", period_index),
            Interval::Quarterly => {
                let quarter = (period_index - 1) % 4 + 1;
                let year = (period_index - 1) / 4 + 1;
                format!("Q{} Y{}", quarter, year)
            }
            Interval::Yearly => format!("Year {}", period_index),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Interval::Monthly),
            "quarterly" => Ok(Interval::Quarterly),
            "yearly" => Ok(Interval::Yearly),
            other => Err(ResearchError::InvalidInput(format!(
                "unknown interval '{}' (expected monthly, quarterly or yearly)",
                other
            ))),
        }
    }
}
