//! Group settings and fill mode, with environment overrides.
//!
//! Command-line flags belong to criterion, so overrides come from `POPBENCH_*`
//! variables instead.

use std::env;
use std::time::Duration;

use log::info;

use crate::error::{BenchError, BenchResult};
use crate::map::FillMode;

pub const ENV_FILL_MODE: &str = "POPBENCH_FILL_MODE";
pub const ENV_SAMPLE_SIZE: &str = "POPBENCH_SAMPLE_SIZE";
pub const ENV_WARM_UP_MS: &str = "POPBENCH_WARM_UP_MS";
pub const ENV_MEASUREMENT_MS: &str = "POPBENCH_MEASUREMENT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub sample_size: usize,
    pub warm_up: Duration,
    pub measurement: Duration,
    pub fill_mode: FillMode,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sample_size: 20,
            warm_up: Duration::from_millis(100),
            measurement: Duration::from_secs(1),
            fill_mode: FillMode::PerRun,
        }
    }
}

impl BenchConfig {
    pub fn from_env() -> BenchResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Applies overrides from `lookup` on top of the defaults.
    pub fn from_lookup<F>(lookup: F) -> BenchResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mode) = lookup(ENV_FILL_MODE) {
            config.fill_mode = mode.parse()?;
        }
        if let Some(n) = parse_number(&lookup, ENV_SAMPLE_SIZE)? {
            // criterion asserts at least 10 samples
            config.sample_size = n.max(10) as usize;
        }
        if let Some(d) = parse_duration_ms(&lookup, ENV_WARM_UP_MS)? {
            config.warm_up = d;
        }
        if let Some(d) = parse_duration_ms(&lookup, ENV_MEASUREMENT_MS)? {
            config.measurement = d;
        }

        info!(
            "bench config: samples={} warm_up={:?} measurement={:?} fill={}",
            config.sample_size,
            config.warm_up,
            config.measurement,
            config.fill_mode.as_str()
        );
        Ok(config)
    }
}

fn parse_number<F>(lookup: &F, var: &str) -> BenchResult<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| BenchError::InvalidNumber {
                var: var.to_string(),
                value: raw,
            }),
    }
}

// criterion asserts both group durations are non-zero
fn parse_duration_ms<F>(lookup: &F, var: &str) -> BenchResult<Option<Duration>>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_number(lookup, var)? {
        Some(0) => Err(BenchError::ZeroDuration(var.to_string())),
        ms => Ok(ms.map(Duration::from_millis)),
    }
}
