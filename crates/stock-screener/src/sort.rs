//! Sort specification for the comparison table.

use std::fmt;
use std::str::FromStr;

use research_core::{Branch, FilterKey, MetricKey, ResearchError};

/// Column a table can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Metric(MetricKey),
    Prediction(Branch),
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => f.write_str("name"),
            SortKey::Metric(key) => write!(f, "{}", key),
            SortKey::Prediction(branch) => write!(f, "predictions.{}", branch),
        }
    }
}

impl FromStr for SortKey {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "name" {
            return Ok(SortKey::Name);
        }
        match s.parse::<FilterKey>() {
            Ok(FilterKey::Metric(key)) => Ok(SortKey::Metric(key)),
            Ok(FilterKey::Prediction(branch)) => Ok(SortKey::Prediction(branch)),
            Err(_) => Err(ResearchError::InvalidInput(format!("unknown sort key '{}'", s))),
        }
    }
}

impl From<MetricKey> for SortKey {
    fn from(key: MetricKey) -> Self {
        SortKey::Metric(key)
    }
}

impl From<Branch> for SortKey {
    fn from(branch: Branch) -> Self {
        SortKey::Prediction(branch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl FromStr for SortDirection {
    type Err = ResearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(ResearchError::InvalidInput(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortSpec {
    /// Keep catalog order
    #[default]
    None,
    By { key: SortKey, direction: SortDirection },
}

impl SortSpec {
    pub fn ascending(key: impl Into<SortKey>) -> Self {
        SortSpec::By {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: impl Into<SortKey>) -> Self {
        SortSpec::By {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Header click: the active ascending column flips to descending, any
    /// other click sorts the clicked column ascending.
    pub fn toggle(self, key: impl Into<SortKey>) -> Self {
        let key = key.into();
        match self {
            SortSpec::By {
                key: current,
                direction: SortDirection::Ascending,
            } if current == key => SortSpec::descending(key),
            _ => SortSpec::ascending(key),
        }
    }

    /// Parse a key plus optional direction (ascending when absent). An empty
    /// key means no sorting.
    pub fn parse(key: &str, direction: Option<&str>) -> Result<Self, ResearchError> {
        if key.trim().is_empty() {
            return Ok(SortSpec::None);
        }
        let key: SortKey = key.parse()?;
        let direction = match direction {
            Some(d) if !d.trim().is_empty() => d.parse()?,
            _ => SortDirection::Ascending,
        };
        Ok(SortSpec::By { key, direction })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycles_direction_on_same_key() {
        let spec = SortSpec::None.toggle(MetricKey::Outlook);
        assert_eq!(spec, SortSpec::ascending(MetricKey::Outlook));

        let spec = spec.toggle(MetricKey::Outlook);
        assert_eq!(spec, SortSpec::descending(MetricKey::Outlook));

        let spec = spec.toggle(MetricKey::Outlook);
        assert_eq!(spec, SortSpec::ascending(MetricKey::Outlook));
    }

    #[test]
    fn test_toggle_new_key_resets_to_ascending() {
        let spec = SortSpec::descending(MetricKey::Outlook).toggle(SortKey::Name);
        assert_eq!(spec, SortSpec::ascending(SortKey::Name));
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("name".parse::<SortKey>().unwrap(), SortKey::Name);
        assert_eq!(
            "predictions.bull".parse::<SortKey>().unwrap(),
            SortKey::Prediction(Branch::Bull)
        );
        assert_eq!(
            "trackRecord".parse::<SortKey>().unwrap(),
            SortKey::Metric(MetricKey::TrackRecord)
        );
        let err = "marketCap".parse::<SortKey>().unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("unknown sort key"));
    }

    #[test]
    fn test_parse_spec() {
        assert_eq!(SortSpec::parse("", Some("desc")).unwrap(), SortSpec::None);
        assert_eq!(
            SortSpec::parse("name", None).unwrap(),
            SortSpec::ascending(SortKey::Name)
        );
        assert_eq!(
            SortSpec::parse("outlook", Some("DESC")).unwrap(),
            SortSpec::descending(MetricKey::Outlook)
        );
        assert!(SortSpec::parse("outlook", Some("sideways")).is_err());
    }
}
