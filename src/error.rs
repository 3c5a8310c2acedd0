use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    /// Malformed tabular input. `row` is the 0-based data-row index and
    /// `line` the 1-based source line when known.
    #[error("parse error at row {row} (line {line}): {message}")]
    Parse {
        row: usize,
        line: u64,
        message: String,
    },

    #[error("degenerate scale domain: {0}")]
    DegenerateDomain(String),

    #[error("invalid value for `{field}`: {message}")]
    InvalidValue { field: String, message: String },

    #[error("nearest-point query against an empty series")]
    EmptySeries,

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    pub(crate) fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
