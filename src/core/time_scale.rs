use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::core::LinearScale;
use crate::core::primitives::{datetime_to_millis, millis_to_datetime};
use crate::data::TimeSeries;
use crate::error::{ChartError, ChartResult};

/// Horizontal time axis: `[earliest, latest]` mapped linearly onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    linear: LinearScale,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeScale {
    /// Builds a scale from explicit bounds; `start` must be earlier than `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, range: (f64, f64)) -> ChartResult<Self> {
        if start >= end {
            return Err(ChartError::DegenerateDomain(format!(
                "time domain [{start}, {end}] must be strictly increasing"
            )));
        }
        let linear = LinearScale::new((datetime_to_millis(start), datetime_to_millis(end)), range)?;
        Ok(Self { linear, start, end })
    }

    /// Fits the domain to the extent of `timestamps`.
    ///
    /// Needs at least two samples spanning a non-zero interval.
    pub fn from_timestamps<I>(timestamps: I, range: (f64, f64)) -> ChartResult<Self>
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        let mut count = 0_usize;
        let mut extent: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
        for time in timestamps {
            count += 1;
            extent = Some(match extent {
                None => (time, time),
                Some((lo, hi)) => (lo.min(time), hi.max(time)),
            });
        }

        let Some((start, end)) = extent else {
            return Err(ChartError::DegenerateDomain(
                "time scale cannot be built from an empty dataset".to_owned(),
            ));
        };
        if count < 2 || start == end {
            return Err(ChartError::DegenerateDomain(format!(
                "time scale needs two distinct timestamps, got {count} sample(s) at {start}"
            )));
        }
        Self::new(start, end, range)
    }

    /// Shared time axis over the union of every series' extent.
    pub fn from_series(series: &[&TimeSeries], range: (f64, f64)) -> ChartResult<Self> {
        Self::from_timestamps(
            series
                .iter()
                .flat_map(|s| s.points().iter().map(|point| point.timestamp)),
            range,
        )
    }

    /// Same pixel range over a sub-window given in Unix milliseconds.
    ///
    /// The window keeps sub-millisecond bounds so a zoom anchor maps back to
    /// the same instant; [`domain`](Self::domain) reports them rounded.
    pub(crate) fn with_millis_domain(self, start_ms: f64, end_ms: f64) -> ChartResult<Self> {
        if start_ms >= end_ms {
            return Err(ChartError::DegenerateDomain(format!(
                "time window [{start_ms}, {end_ms}] ms must be strictly increasing"
            )));
        }
        Ok(Self {
            linear: LinearScale::new((start_ms, end_ms), self.linear.range())?,
            start: millis_to_datetime(start_ms)?,
            end: millis_to_datetime(end_ms)?,
        })
    }

    /// Domain bounds in Unix milliseconds.
    pub(crate) fn millis_domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    /// Unrounded inverse in Unix milliseconds.
    pub(crate) fn millis_at(self, pixel: f64) -> ChartResult<f64> {
        self.linear.pixel_to_domain(pixel)
    }

    #[must_use]
    pub fn domain(self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    /// Maps a timestamp to its horizontal pixel coordinate.
    ///
    /// Timestamps outside the domain extrapolate linearly.
    #[must_use]
    pub fn scale(self, time: DateTime<Utc>) -> f64 {
        self.linear.project(datetime_to_millis(time))
    }

    /// Maps a pixel coordinate back to a timestamp (millisecond precision).
    pub fn invert(self, pixel: f64) -> ChartResult<DateTime<Utc>> {
        millis_to_datetime(self.linear.pixel_to_domain(pixel)?)
    }

    /// January 1st of every year inside the domain, paired with its pixel.
    #[must_use]
    pub fn year_ticks(self) -> Vec<(DateTime<Utc>, f64)> {
        let mut out = Vec::new();
        let mut year = self.start.year();
        if !is_year_start(self.start) {
            year += 1;
        }
        while let Some(tick) = year_start(year) {
            if tick > self.end {
                break;
            }
            out.push((tick, self.scale(tick)));
            year += 1;
        }
        out
    }
}

fn year_start(year: i32) -> Option<DateTime<Utc>> {
    let date = NaiveDate::from_ymd_opt(year, 1, 1)?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

fn is_year_start(time: DateTime<Utc>) -> bool {
    year_start(time.year()) == Some(time)
}
