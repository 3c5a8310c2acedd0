//! Column layouts of the datasets shown on the article page.

use rust_decimal::Decimal;

use crate::core::primitives::decimal_to_f64;
use crate::data::coerce::{parse_count, parse_currency};
use crate::data::{LoadedTable, TabularRecord, TimeSeries};
use crate::error::{ChartError, ChartResult};

/// Candidate names of the time column in price exports, tried in order.
pub const PRICE_TIME_FIELDS: [&str; 2] = ["Date", "time"];
pub const PRICE_METRICS: [&str; 5] = ["Open", "High", "Low", "Close", "Volume"];
pub const PRICE_ADJ_CLOSE: &str = "Adj Close";

pub const GAS_FEE_TIME_FIELD: &str = "Date";
pub const GAS_FEE_METRICS: [&str; 4] = ["Mean", "Median", "Percentile_75", "Percentile_25"];

/// Daily OHLCV series; `Adj Close` is carried when the export has it.
pub fn price_series(name: impl Into<String>, table: &LoadedTable) -> ChartResult<TimeSeries> {
    let time_field = PRICE_TIME_FIELDS
        .into_iter()
        .find(|field| table.has_column(field))
        .ok_or_else(|| {
            ChartError::invalid_value(
                PRICE_TIME_FIELDS.join("/"),
                "price dataset has no time column",
            )
        })?;

    let mut metrics: Vec<&str> = PRICE_METRICS.to_vec();
    if table.has_column(PRICE_ADJ_CLOSE) {
        metrics.push(PRICE_ADJ_CLOSE);
    }
    TimeSeries::from_table(name, table, time_field, &metrics)
}

/// Gas fee percentiles per day.
pub fn gas_fee_series(name: impl Into<String>, table: &LoadedTable) -> ChartResult<TimeSeries> {
    TimeSeries::from_table(name, table, GAS_FEE_TIME_FIELD, &GAS_FEE_METRICS)
}

/// One row of the NFT collection ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftCollection {
    pub name: String,
    pub volume_usd: Option<Decimal>,
    pub market_cap_usd: Option<Decimal>,
    pub sales: Option<u64>,
    pub floor_price_usd: Option<Decimal>,
    pub average_price_usd: Option<Decimal>,
    pub owners: Option<u64>,
    pub category: String,
    pub logo: String,
}

impl NftCollection {
    /// `Name` and `Volume_USD` columns are required. A blank volume cell is
    /// kept as missing; other non-blank volumes must parse.
    pub fn from_record(record: &TabularRecord) -> ChartResult<Self> {
        let optional_currency = |field: &str| record.get(field).and_then(parse_currency);
        let optional_count = |field: &str| record.get(field).and_then(parse_count);

        Ok(Self {
            name: record.text("Name")?.to_owned(),
            volume_usd: if record.text("Volume_USD")?.trim().is_empty() {
                None
            } else {
                Some(record.currency("Volume_USD")?)
            },
            market_cap_usd: optional_currency("Market_Cap_USD"),
            sales: optional_count("Sales"),
            floor_price_usd: optional_currency("Floor_Price_USD"),
            average_price_usd: optional_currency("Average_Price_USD"),
            owners: optional_count("Owners"),
            category: record.get("Category").unwrap_or_default().to_owned(),
            logo: record.get("Logo").unwrap_or_default().to_owned(),
        })
    }

    pub fn volume_f64(&self) -> ChartResult<Option<f64>> {
        self.volume_usd
            .map(|volume| decimal_to_f64(volume, "Volume_USD"))
            .transpose()
    }
}

pub fn nft_collections(table: &LoadedTable) -> ChartResult<Vec<NftCollection>> {
    table.records().iter().map(NftCollection::from_record).collect()
}

/// Top `limit` collections by volume, largest first.
///
/// Collections without a volume sort last; ties keep file order.
#[must_use]
pub fn rank_by_volume(collections: &[NftCollection], limit: usize) -> Vec<&NftCollection> {
    let mut ranked: Vec<&NftCollection> = collections.iter().collect();
    // `None < Some(_)`, so a descending sort puts missing volumes last.
    ranked.sort_by(|a, b| b.volume_usd.cmp(&a.volume_usd));
    ranked.truncate(limit);
    ranked
}
