//! Operating points each benchmark is run against.
//!
//! The tables are fixed at build time and handed to registration as a value;
//! nothing here is read from the command line.

use std::fmt;

use crate::error::{BenchError, BenchResult};

/// Test-vector sizes for the popcount benchmarks. Zero selects the canonical
/// vector.
pub const POPCOUNT_SIZES: &[usize] = &[0, 128, 256, 512, 1024];

/// `(entry count, fill rate %)` pairs for the map lookup benchmarks.
pub const MAP_ARGS: &[MapArgs] = &[
    MapArgs::new(1_000_000, 80),
    MapArgs::new(1_000_000, 95),
    MapArgs::new(4_000_000, 80),
    MapArgs::new(4_000_000, 95),
    MapArgs::new(10_000_000, 80),
    MapArgs::new(10_000_000, 95),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MapArgs {
    pub size: usize,
    pub rate: u32,
}

impl MapArgs {
    pub const fn new(size: usize, rate: u32) -> Self {
        Self { size, rate }
    }
}

impl fmt::Display for MapArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.size, self.rate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    pub popcount_sizes: Vec<usize>,
    pub map_args: Vec<MapArgs>,
}

impl Default for Matrix {
    fn default() -> Self {
        Self {
            popcount_sizes: POPCOUNT_SIZES.to_vec(),
            map_args: MAP_ARGS.to_vec(),
        }
    }
}

impl Matrix {
    pub fn validate(&self) -> BenchResult<()> {
        if self.popcount_sizes.is_empty() {
            return Err(BenchError::EmptyMatrix("popcount_sizes"));
        }
        if self.map_args.is_empty() {
            return Err(BenchError::EmptyMatrix("map_args"));
        }
        if let Some(bad) = self.map_args.iter().find(|a| a.rate > 100) {
            return Err(BenchError::RateOutOfRange {
                size: bad.size,
                rate: bad.rate,
            });
        }
        Ok(())
    }
}
