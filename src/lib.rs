//! Micro-benchmarks for population count strategies and hash map lookups
//! under varying fill rates.
//!
//! Run with: cargo bench
//!
//! Library code builds inputs, holds the measured algorithms, and registers
//! everything with criterion; `benches/suite.rs` is the entry point.

pub mod config;
pub mod driver;
pub mod error;
pub mod map;
pub mod matrix;
pub mod popcount;
pub mod vector;

pub use config::BenchConfig;
pub use driver::{count_all, lookup_sequential, register};
pub use error::{BenchError, BenchResult};
pub use map::{build_map, insert_sequential_keys, FillMode, Key, KeyMap, Populated, Reserve, Value};
pub use matrix::{MapArgs, Matrix};
pub use popcount::PopCount;
pub use vector::{test_numbers, test_numbers_with, CANONICAL};
