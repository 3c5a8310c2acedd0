pub mod coerce;
pub mod loader;
pub mod schema;
pub mod series;

pub use loader::{
    LoadOptions, LoadedTable, MalformedRowPolicy, RowDiagnostic, TabularRecord, load_path,
    load_reader, load_str,
};
pub use schema::{NftCollection, gas_fee_series, nft_collections, price_series, rank_by_volume};
pub use series::{TimeSeries, TimeSeriesPoint};
