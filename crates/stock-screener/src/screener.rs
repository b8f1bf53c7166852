use std::cmp::Ordering;

use research_core::{Catalog, FilterKey, ResearchError, Stock};

use crate::filters::MetricFilters;
use crate::sort::{SortDirection, SortKey, SortSpec};

/// Filtered and ordered view of the catalog for the comparison table.
///
/// Stages run in a fixed order: case-insensitive search on name/ticker, then
/// every active threshold (AND), then a stable sort. With `SortSpec::None`
/// the surviving stocks keep catalog order.
pub fn view<'a>(
    catalog: &'a Catalog,
    search_term: &str,
    filters: &MetricFilters,
    sort: SortSpec,
) -> Result<Vec<&'a Stock>, ResearchError> {
    view_slice(catalog.iter(), search_term, filters, sort)
}

/// [`view`] over any ordered sequence of stocks, e.g. a previous view.
pub fn view_slice<'a, I>(
    stocks: I,
    search_term: &str,
    filters: &MetricFilters,
    sort: SortSpec,
) -> Result<Vec<&'a Stock>, ResearchError>
where
    I: IntoIterator<Item = &'a Stock>,
{
    filters.validate()?;

    let needle = search_term.to_lowercase();
    let searched: Vec<&Stock> = stocks
        .into_iter()
        .filter(|s| matches_search(s, &needle))
        .collect();
    let total_searched = searched.len();

    let mut result = Vec::with_capacity(searched.len());
    for stock in searched {
        if filters.admits(stock)? {
            result.push(stock);
        }
    }

    tracing::debug!(
        "Screen: {} matched search '{}', {} passed {} filters",
        total_searched,
        search_term,
        result.len(),
        filters.len()
    );

    sort_stable(result, sort)
}

fn matches_search(stock: &Stock, needle: &str) -> bool {
    needle.is_empty()
        || stock.name.to_lowercase().contains(needle)
        || stock.ticker.to_lowercase().contains(needle)
}

fn sort_stable(stocks: Vec<&Stock>, sort: SortSpec) -> Result<Vec<&Stock>, ResearchError> {
    let (key, direction) = match sort {
        SortSpec::None => return Ok(stocks),
        SortSpec::By { key, direction } => (key, direction),
    };

    tracing::debug!("Sorting {} stocks by {} ({:?})", stocks.len(), key, direction);

    match key {
        // Ordinal, no case folding.
        SortKey::Name => sort_by_value(stocks, direction, |s| Ok(s.name.as_str()), Ord::cmp),
        SortKey::Metric(metric) => sort_by_value(stocks, direction, |s| s.metric(metric), Ord::cmp),
        SortKey::Prediction(branch) => sort_by_value(
            stocks,
            direction,
            |s| s.resolve(FilterKey::Prediction(branch)),
            f64::total_cmp,
        ),
    }
}

/// Resolve every value first so a bad record fails before anything moves,
/// then sort. `sort_by` is stable and reversing the comparator keeps ties in
/// place.
fn sort_by_value<'a, T, V, C>(
    stocks: Vec<&'a Stock>,
    direction: SortDirection,
    value: V,
    compare: C,
) -> Result<Vec<&'a Stock>, ResearchError>
where
    V: Fn(&'a Stock) -> Result<T, ResearchError>,
    C: Fn(&T, &T) -> Ordering,
{
    let mut keyed = stocks
        .into_iter()
        .map(|s| value(s).map(|v| (v, s)))
        .collect::<Result<Vec<_>, _>>()?;

    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Ascending => compare(a, b),
        SortDirection::Descending => compare(b, a),
    });

    Ok(keyed.into_iter().map(|(_, s)| s).collect())
}

/// Comparison table state bundled for one `view` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewRequest {
    pub search_term: String,
    pub filters: MetricFilters,
    pub sort: SortSpec,
}

impl ViewRequest {
    /// Build from raw text inputs; unknown keys are rejected here.
    pub fn parse(
        search_term: &str,
        filters: &str,
        sort_key: &str,
        sort_direction: Option<&str>,
    ) -> Result<Self, ResearchError> {
        Ok(Self {
            search_term: search_term.to_string(),
            filters: MetricFilters::parse(filters)?,
            sort: SortSpec::parse(sort_key, sort_direction)?,
        })
    }

    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Result<Vec<&'a Stock>, ResearchError> {
        view(catalog, &self.search_term, &self.filters, self.sort)
    }
}
