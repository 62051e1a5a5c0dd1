//! Map adapters and the fill-rate population step
//!
//! Adapters expose just what the lookup benchmark needs. Containers that can
//! pre-size themselves additionally implement `Reserve` and hand it out through
//! `KeyMap::as_reserve`; the rest keep the default `None`.

use std::collections::BTreeMap;
use std::str::FromStr;

use log::debug;

use crate::error::{BenchError, BenchResult};

pub type Key = u64;
pub type Value = u64;

/// Capacity pre-sizing.
pub trait Reserve {
    /// Makes room for `additional` entries on top of the current length.
    fn reserve(&mut self, additional: usize);
}

pub trait KeyMap {
    /// Label used in benchmark ids.
    const NAME: &'static str;

    fn empty() -> Self
    where
        Self: Sized;

    fn insert(&mut self, key: Key, value: Value);

    fn get(&self, key: Key) -> Option<&Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn as_reserve(&mut self) -> Option<&mut dyn Reserve> {
        None
    }
}

// ============================================================================
// Adapters
// ============================================================================

impl KeyMap for hashbrown::HashMap<Key, Value> {
    const NAME: &'static str = "hashbrown";

    fn empty() -> Self {
        hashbrown::HashMap::new()
    }

    fn insert(&mut self, key: Key, value: Value) {
        hashbrown::HashMap::insert(self, key, value);
    }

    fn get(&self, key: Key) -> Option<&Value> {
        hashbrown::HashMap::get(self, &key)
    }

    fn len(&self) -> usize {
        hashbrown::HashMap::len(self)
    }

    fn as_reserve(&mut self) -> Option<&mut dyn Reserve> {
        Some(self)
    }
}

impl Reserve for hashbrown::HashMap<Key, Value> {
    fn reserve(&mut self, additional: usize) {
        hashbrown::HashMap::reserve(self, additional);
    }
}

impl KeyMap for std::collections::HashMap<Key, Value> {
    const NAME: &'static str = "std";

    fn empty() -> Self {
        std::collections::HashMap::new()
    }

    fn insert(&mut self, key: Key, value: Value) {
        std::collections::HashMap::insert(self, key, value);
    }

    fn get(&self, key: Key) -> Option<&Value> {
        std::collections::HashMap::get(self, &key)
    }

    fn len(&self) -> usize {
        std::collections::HashMap::len(self)
    }

    fn as_reserve(&mut self) -> Option<&mut dyn Reserve> {
        Some(self)
    }
}

impl Reserve for std::collections::HashMap<Key, Value> {
    fn reserve(&mut self, additional: usize) {
        std::collections::HashMap::reserve(self, additional);
    }
}

// No capacity concept, so no Reserve.
impl KeyMap for BTreeMap<Key, Value> {
    const NAME: &'static str = "btree";

    fn empty() -> Self {
        BTreeMap::new()
    }

    fn insert(&mut self, key: Key, value: Value) {
        BTreeMap::insert(self, key, value);
    }

    fn get(&self, key: Key) -> Option<&Value> {
        BTreeMap::get(self, &key)
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }
}

// ============================================================================
// Fill rate
// ============================================================================

/// Which predicate decides whether candidate key `i` is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// `count % 100 < rate`: the same answer for every key, so a run fills
    /// either all keys or none.
    #[default]
    PerRun,
    /// `i % 100 < rate`: roughly `rate` percent of the keys.
    PerKey,
}

impl FillMode {
    pub fn admits(self, index: usize, count: usize, rate: u32) -> bool {
        let bucket = match self {
            FillMode::PerRun => count % 100,
            FillMode::PerKey => index % 100,
        };
        bucket < rate as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FillMode::PerRun => "per-run",
            FillMode::PerKey => "per-key",
        }
    }
}

impl FromStr for FillMode {
    type Err = BenchError;

    fn from_str(s: &str) -> BenchResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-run" | "per_run" | "literal" => Ok(FillMode::PerRun),
            "per-key" | "per_key" | "corrected" => Ok(FillMode::PerKey),
            _ => Err(BenchError::InvalidFillMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Populated {
    pub inserted: usize,
    pub reserved: bool,
}

/// Inserts `i -> default_value` for the keys in `0..count` admitted by `fill`,
/// pre-sizing first when the map supports it.
pub fn insert_sequential_keys<M: KeyMap>(
    map: &mut M,
    count: usize,
    rate: u32,
    fill: FillMode,
    default_value: Value,
) -> Populated {
    let reserved = match map.as_reserve() {
        Some(r) => {
            r.reserve(count);
            true
        }
        None => false,
    };

    let mut inserted = 0;
    for i in 0..count {
        if fill.admits(i, count, rate) {
            map.insert(i as Key, default_value);
            inserted += 1;
        }
    }

    debug!(
        "populated {} map: count={} rate={} fill={} inserted={} len={} reserved={}",
        M::NAME,
        count,
        rate,
        fill.as_str(),
        inserted,
        map.len(),
        reserved
    );
    Populated { inserted, reserved }
}

/// Fresh map populated for one `(count, rate)` operating point.
pub fn build_map<M: KeyMap>(count: usize, rate: u32, fill: FillMode) -> M {
    let mut map = M::empty();
    insert_sequential_keys(&mut map, count, rate, fill, 0);
    map
}
