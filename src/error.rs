use thiserror::Error;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid viewport: x={x}, y={y}, width={width}, height={height}")]
    InvalidViewport {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    #[error("invalid canvas size: width={width}, height={height}")]
    InvalidCanvas { width: f64, height: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
