use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::time::Duration;

use criterion::Criterion;
use popmap_bench::{
    build_map, insert_sequential_keys, lookup_sequential, register, test_numbers, BenchConfig,
    BenchError, FillMode, Key, KeyMap, MapArgs, Matrix, Reserve, Value,
};
use popmap_bench::driver::register_map_find;

/// Map that records every call made against it.
#[derive(Default)]
struct Recording {
    inner: BTreeMap<Key, Value>,
    gets: RefCell<Vec<Key>>,
    events: Vec<String>,
}

impl Reserve for Recording {
    fn reserve(&mut self, additional: usize) {
        self.events.push(format!("reserve {} at len {}", additional, self.inner.len()));
    }
}

impl KeyMap for Recording {
    const NAME: &'static str = "recording";

    fn empty() -> Self {
        Self::default()
    }

    fn insert(&mut self, key: Key, value: Value) {
        if self.events.last().map_or(true, |e| e != "insert") {
            self.events.push("insert".to_string());
        }
        self.inner.insert(key, value);
    }

    fn get(&self, key: Key) -> Option<&Value> {
        self.gets.borrow_mut().push(key);
        self.inner.get(&key)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn as_reserve(&mut self) -> Option<&mut dyn Reserve> {
        Some(self)
    }
}

#[test]
fn lookup_covers_each_key_once() {
    let map: Recording = build_map(1000, 80, FillMode::PerRun);
    lookup_sequential(&map, 1000);

    let gets = map.gets.borrow();
    assert_eq!(gets.len(), 1000);
    assert!(gets.iter().copied().eq(0..1000u64));
}

#[test]
fn lookup_repeats_identically() {
    let map: Recording = build_map(300, 50, FillMode::PerKey);
    lookup_sequential(&map, 300);
    lookup_sequential(&map, 300);

    let gets = map.gets.borrow();
    assert_eq!(gets.len(), 600);
    assert_eq!(gets[..300], gets[300..]);
    assert_eq!(map.len(), 150);
}

#[test]
fn reserve_precedes_insertion() {
    let mut map = Recording::default();
    let populated = insert_sequential_keys(&mut map, 400, 95, FillMode::PerRun, 0);
    assert!(populated.reserved);
    assert_eq!(populated.inserted, 400);
    assert_eq!(map.events, vec!["reserve 400 at len 0".to_string(), "insert".to_string()]);
}

#[test]
fn population_is_deterministic() {
    for args in Matrix::default().map_args.iter().take(2) {
        let size = args.size / 100;
        let a: hashbrown::HashMap<Key, Value> = build_map(size, args.rate, FillMode::PerRun);
        let b: hashbrown::HashMap<Key, Value> = build_map(size, args.rate, FillMode::PerRun);
        assert_eq!(KeyMap::len(&a), KeyMap::len(&b));
        assert!(KeyMap::len(&a) == size || KeyMap::is_empty(&a));
    }
}

#[test]
fn random_vectors_have_requested_len() {
    for &size in &Matrix::default().popcount_sizes {
        let expected = if size == 0 { 13 } else { size };
        assert_eq!(test_numbers(size).len(), expected);
    }
}

#[test]
fn register_rejects_bad_matrix() {
    let mut c = Criterion::default();
    let matrix = Matrix {
        popcount_sizes: vec![0],
        map_args: vec![MapArgs::new(100, 250)],
    };
    let err = register(&mut c, &matrix, &BenchConfig::default()).unwrap_err();
    assert_eq!(err, BenchError::RateOutOfRange { size: 100, rate: 250 });
}

#[test]
fn register_runs_small_matrix() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut c = Criterion::default().without_plots();
    let matrix = Matrix {
        popcount_sizes: vec![0, 16],
        map_args: vec![MapArgs::new(1_000, 80)],
    };
    let config = BenchConfig {
        sample_size: 10,
        warm_up: Duration::from_millis(1),
        measurement: Duration::from_millis(5),
        fill_mode: FillMode::PerKey,
    };
    assert_eq!(register(&mut c, &matrix, &config), Ok(()));
}

thread_local! {
    static BUILT: Cell<usize> = Cell::new(0);
}

/// BTreeMap that counts how often a fresh instance is built on this thread.
struct Counted(BTreeMap<Key, Value>);

impl KeyMap for Counted {
    const NAME: &'static str = "counted";

    fn empty() -> Self {
        BUILT.with(|b| b.set(b.get() + 1));
        Counted(BTreeMap::new())
    }

    fn insert(&mut self, key: Key, value: Value) {
        self.0.insert(key, value);
    }

    fn get(&self, key: Key) -> Option<&Value> {
        self.0.get(&key)
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

fn quick_config() -> BenchConfig {
    BenchConfig {
        sample_size: 10,
        warm_up: Duration::from_millis(1),
        measurement: Duration::from_millis(5),
        fill_mode: FillMode::PerRun,
    }
}

#[test]
fn filtered_out_maps_are_never_built() {
    BUILT.with(|b| b.set(0));
    let mut c = Criterion::default().without_plots().with_filter("^popcount/");
    let args = [MapArgs::new(1_000, 80), MapArgs::new(2_000, 95)];
    register_map_find::<Counted>(&mut c, &args, &quick_config());
    assert_eq!(BUILT.with(|b| b.get()), 0);
}

#[test]
fn selected_map_is_built_once() {
    BUILT.with(|b| b.set(0));
    let mut c = Criterion::default().without_plots();
    register_map_find::<Counted>(&mut c, &[MapArgs::new(1_000, 80)], &quick_config());
    assert_eq!(BUILT.with(|b| b.get()), 1);
}
