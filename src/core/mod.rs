pub mod band_scale;
pub mod line_series;
pub mod nice;
pub mod primitives;
pub mod scale;
pub mod scatter_series;
pub mod time_scale;
pub mod types;
pub mod value_scale;

pub use band_scale::BandScale;
pub use line_series::{LineSegment, project_line_segments};
pub use scale::LinearScale;
pub use scatter_series::{ScatterMark, project_scatter};
pub use time_scale::TimeScale;
pub use types::{Margins, PlotArea, Viewport};
pub use value_scale::ValueScale;
