mod config;
mod json_contract;
mod layer;
mod load;
mod ranking;
mod scene;
mod view;
mod zoom;

pub use config::{ChartConfig, MAX_VALUE_TICKS, PointStyle};
pub use json_contract::{FRAME_SNAPSHOT_JSON_SCHEMA_V1, FrameSnapshotJsonContractV1};
pub use layer::{DetailField, MarkKind, SeriesLayer, ValueFormat};
pub use load::{LoadSequencer, LoadTicket};
pub use ranking::{
    LogoSlot, RankingChart, RankingHover, ShowcaseSlot, showcase_layout, showcase_positions,
};
pub use scene::DerivedScales;
pub use view::TimeSeriesView;
pub use zoom::ZOOM_EXTENT;
