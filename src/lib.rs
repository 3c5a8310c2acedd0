//! eth-charts: headless chart engine for Ethereum market dashboards.
//!
//! Tabular price, gas-fee and NFT collection files are loaded into typed
//! series, mapped through time/value/band scales, and materialized as
//! backend-agnostic `RenderFrame`s. Hover resolves the nearest sample of
//! every plotted series and produces tooltip content and placement.

pub mod api;
pub mod core;
pub mod data;
pub mod error;
pub mod format;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartConfig, RankingChart, SeriesLayer, TimeSeriesView};
pub use data::{LoadOptions, MalformedRowPolicy, TimeSeries, TimeSeriesPoint};
pub use error::{ChartError, ChartResult};
