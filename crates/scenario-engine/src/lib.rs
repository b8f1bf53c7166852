//! Scenario Engine
//!
//! Projects what an amount split equally across up to three stocks would be
//! worth under each stock's bear, base and bull annual return assumption.
//! Each holding compounds independently at its own rate (buy-and-hold, no
//! rebalancing) and the holdings are summed at every interval boundary.

pub mod interval;
pub mod projector;
pub mod selection;
pub mod series;

pub use interval::Interval;
pub use projector::{
    project, ScenarioProjector, MAX_SELECTED_STOCKS, MAX_TIME_RANGE_YEARS, MIN_TIME_RANGE_YEARS,
};
pub use selection::{ScenarioParams, Selection};
pub use series::{DisplayPoint, Holding, RoundedProjection, ScenarioProjection, Series, SeriesPoint};
