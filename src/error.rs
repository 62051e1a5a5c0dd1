use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    InvalidFillMode(String),
    InvalidNumber { var: String, value: String },
    ZeroDuration(String),
    RateOutOfRange { size: usize, rate: u32 },
    EmptyMatrix(&'static str),
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::InvalidFillMode(mode) => {
                write!(f, "invalid fill mode: {} (expected per-run or per-key)", mode)
            }
            BenchError::InvalidNumber { var, value } => {
                write!(f, "invalid number in {}: {}", var, value)
            }
            BenchError::ZeroDuration(var) => write!(f, "{} must be greater than zero", var),
            BenchError::RateOutOfRange { size, rate } => {
                write!(f, "fill rate {} out of range for size {} (expected 0..=100)", rate, size)
            }
            BenchError::EmptyMatrix(table) => write!(f, "parameter table is empty: {}", table),
        }
    }
}

impl std::error::Error for BenchError {}

pub type BenchResult<T> = Result<T, BenchError>;
