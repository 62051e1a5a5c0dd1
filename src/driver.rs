//! Benchmark Driver
//!
//! Inputs are built once per operating point, outside `Bencher::iter`. The timed
//! closure only reads them, so criterion may re-enter it as often as it likes.

use std::hint::black_box;

use criterion::measurement::WallTime;
use criterion::{BenchmarkGroup, BenchmarkId, Criterion, Throughput};
use log::{info, warn};

use crate::config::BenchConfig;
use crate::error::BenchResult;
use crate::map::{build_map, Key, KeyMap, Value};
use crate::matrix::{MapArgs, Matrix};
use crate::popcount::{self, PopCount};
use crate::vector::test_numbers;

pub const POPCOUNT_GROUP: &str = "popcount";
pub const MAP_FIND_GROUP: &str = "map_find";

// ============================================================================
// Timed bodies
// ============================================================================

/// Runs `count_bits` over every number, keeping each result alive.
#[inline]
pub fn count_all<F>(numbers: &[u64], count_bits: F)
where
    F: Fn(u64) -> u32,
{
    for &v in numbers {
        black_box(count_bits(v));
    }
}

/// `count_all` compiled with `popcnt` enabled, so `count_ones` and the inline
/// asm variant both lower to the bare instruction inside the loop.
///
/// # Safety
///
/// The running CPU must support the `popcnt` instruction.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "popcnt")]
pub unsafe fn count_all_popcnt<F>(numbers: &[u64], count_bits: F)
where
    F: Fn(u64) -> u32,
{
    count_all(numbers, count_bits)
}

/// Inline-asm variant in a `popcnt` context, so the asm block is inlined into
/// the loop instead of called per element.
///
/// # Safety
///
/// The running CPU must support the `popcnt` instruction.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "popcnt")]
pub unsafe fn count_all_popcnt_asm(numbers: &[u64]) {
    count_all(numbers, |n| unsafe { popcount::popcnt_asm(n) })
}

/// Which loop body a popcount variant is timed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountLoop {
    /// Baseline target features only.
    Portable,
    /// `count_all_popcnt` / `count_all_popcnt_asm`.
    #[cfg(target_arch = "x86_64")]
    Popcnt,
}

impl CountLoop {
    /// The software variants stay on the portable loop, otherwise LLVM would
    /// rewrite the clear-lowest idiom into `popcnt` as well.
    pub fn for_variant(variant: PopCount) -> CountLoop {
        match variant {
            PopCount::ClearLowest | PopCount::Swar => CountLoop::Portable,
            #[cfg(target_arch = "x86_64")]
            PopCount::Hardware | PopCount::PopcntAsm
                if std::arch::is_x86_feature_detected!("popcnt") =>
            {
                CountLoop::Popcnt
            }
            _ => CountLoop::Portable,
        }
    }
}

/// Looks up keys `0..count` once each.
#[inline]
pub fn lookup_sequential<M: KeyMap>(map: &M, count: usize) {
    for i in 0..count {
        black_box(map.get(i as Key));
    }
}

// ============================================================================
// Registration
// ============================================================================

fn setup_group<'a>(
    c: &'a mut Criterion,
    name: &str,
    config: &BenchConfig,
) -> BenchmarkGroup<'a, WallTime> {
    let mut group = c.benchmark_group(name);
    group
        .sample_size(config.sample_size)
        .warm_up_time(config.warm_up)
        .measurement_time(config.measurement);
    group
}

fn bench_popcount<B>(
    group: &mut BenchmarkGroup<WallTime>,
    variant: PopCount,
    sizes: &[usize],
    body: B,
) where
    B: Fn(&[u64]) + Copy,
{
    for &size in sizes {
        let numbers = test_numbers(size);
        group.throughput(Throughput::Elements(numbers.len() as u64));
        group.bench_with_input(
            BenchmarkId::new(variant.name(), size),
            &numbers,
            |b, numbers| b.iter(|| body(numbers.as_slice())),
        );
    }
}

pub fn register_popcount(c: &mut Criterion, sizes: &[usize], config: &BenchConfig) {
    let mut group = setup_group(c, POPCOUNT_GROUP, config);

    for &variant in PopCount::ALL {
        if !variant.is_supported() {
            warn!("skipping popcount/{}: not supported by this CPU", variant.name());
            continue;
        }
        let count_loop = CountLoop::for_variant(variant);
        if variant == PopCount::Hardware && count_loop == CountLoop::Portable {
            warn!("popcount/hardware: no popcnt on this CPU, count_ones runs in software");
        }
        info!(
            "registering popcount/{} with {} sizes ({:?} loop)",
            variant.name(),
            sizes.len(),
            count_loop
        );

        match (variant, count_loop) {
            (PopCount::ClearLowest, _) => bench_popcount(&mut group, variant, sizes, |v| {
                count_all(v, popcount::clear_lowest)
            }),
            (PopCount::Swar, _) => {
                bench_popcount(&mut group, variant, sizes, |v| count_all(v, popcount::swar))
            }
            // SAFETY (both popcnt arms): for_variant() and is_supported() probed
            // the popcnt feature.
            #[cfg(target_arch = "x86_64")]
            (PopCount::Hardware, CountLoop::Popcnt) => {
                bench_popcount(&mut group, variant, sizes, |v| unsafe {
                    count_all_popcnt(v, popcount::hardware)
                })
            }
            (PopCount::Hardware, _) => bench_popcount(&mut group, variant, sizes, |v| {
                count_all(v, popcount::hardware)
            }),
            #[cfg(target_arch = "x86_64")]
            (PopCount::PopcntAsm, _) => {
                bench_popcount(&mut group, variant, sizes, |v| unsafe {
                    count_all_popcnt_asm(v)
                })
            }
        }
    }
    group.finish();
}

pub fn register_map_find<M: KeyMap>(c: &mut Criterion, args: &[MapArgs], config: &BenchConfig) {
    let mut group = setup_group(c, MAP_FIND_GROUP, config);
    info!(
        "registering {}/{} with {} operating points",
        MAP_FIND_GROUP,
        M::NAME,
        args.len()
    );

    for &point in args {
        // Built on the first call, which criterion only makes when the id
        // passes its filter; later calls for the same point reuse it.
        let mut map: Option<M> = None;
        group.throughput(Throughput::Elements(point.size as u64));
        group.bench_function(BenchmarkId::new(M::NAME, point), |b| {
            let map = &*map.get_or_insert_with(|| {
                build_map(point.size, point.rate, config.fill_mode)
            });
            b.iter(|| lookup_sequential(map, point.size))
        });
    }
    group.finish();
}

/// Registers the whole suite against `matrix`.
pub fn register(c: &mut Criterion, matrix: &Matrix, config: &BenchConfig) -> BenchResult<()> {
    matrix.validate()?;

    register_popcount(c, &matrix.popcount_sizes, config);
    register_map_find::<hashbrown::HashMap<Key, Value>>(c, &matrix.map_args, config);
    register_map_find::<std::collections::HashMap<Key, Value>>(c, &matrix.map_args, config);
    Ok(())
}
