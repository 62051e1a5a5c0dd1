//! Population Count Strategies
//!
//! Every variant maps a u64 to its number of set bits (0..=64) and must agree
//! with the others on every input.

// ============================================================================
// Clear-lowest-bit loop
// ============================================================================

/// Clears the lowest set bit until nothing is left. One iteration per set bit.
#[inline]
pub fn clear_lowest(mut n: u64) -> u32 {
    let mut count = 0;
    while n != 0 {
        n &= n - 1;
        count += 1;
    }
    count
}

// ============================================================================
// SWAR
// ============================================================================

const M1: u64 = 0x5555_5555_5555_5555;
const M2: u64 = 0x3333_3333_3333_3333;
const M4: u64 = 0x0f0f_0f0f_0f0f_0f0f;
const H01: u64 = 0x0101_0101_0101_0101;

/// Branch-free parallel count: 2-bit, 4-bit and 8-bit partial sums, then a
/// multiply gathers the byte counts into the top byte.
#[inline]
pub fn swar(mut n: u64) -> u32 {
    n -= (n >> 1) & M1;
    n = ((n >> 2) & M2) + (n & M2);
    (((n + (n >> 4)) & M4).wrapping_mul(H01) >> 56) as u32
}

// ============================================================================
// Hardware
// ============================================================================

#[inline]
pub fn hardware(n: u64) -> u32 {
    n.count_ones()
}

/// Issues `popcnt` directly.
///
/// # Safety
///
/// The running CPU must support the `popcnt` instruction.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "popcnt")]
pub unsafe fn popcnt_asm(n: u64) -> u32 {
    let count: u64;
    core::arch::asm!(
        "popcnt {0}, {1}",
        out(reg) count,
        in(reg) n,
        options(pure, nomem, nostack),
    );
    count as u32
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn popcnt_asm_checked(n: u64) -> u32 {
    if std::arch::is_x86_feature_detected!("popcnt") {
        // SAFETY: feature probed just above.
        unsafe { popcnt_asm(n) }
    } else {
        n.count_ones()
    }
}

// ============================================================================
// Strategy table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopCount {
    ClearLowest,
    Swar,
    Hardware,
    #[cfg(target_arch = "x86_64")]
    PopcntAsm,
}

impl PopCount {
    pub const ALL: &'static [PopCount] = &[
        PopCount::ClearLowest,
        PopCount::Swar,
        PopCount::Hardware,
        #[cfg(target_arch = "x86_64")]
        PopCount::PopcntAsm,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PopCount::ClearLowest => "clear_lowest",
            PopCount::Swar => "swar",
            PopCount::Hardware => "hardware",
            #[cfg(target_arch = "x86_64")]
            PopCount::PopcntAsm => "popcnt_asm",
        }
    }

    pub fn func(self) -> fn(u64) -> u32 {
        match self {
            PopCount::ClearLowest => clear_lowest,
            PopCount::Swar => swar,
            PopCount::Hardware => hardware,
            #[cfg(target_arch = "x86_64")]
            PopCount::PopcntAsm => popcnt_asm_checked,
        }
    }

    /// Whether the running CPU can execute this variant.
    pub fn is_supported(self) -> bool {
        match self {
            #[cfg(target_arch = "x86_64")]
            PopCount::PopcntAsm => std::arch::is_x86_feature_detected!("popcnt"),
            _ => true,
        }
    }

    pub fn available() -> Vec<PopCount> {
        Self::ALL.iter().copied().filter(|p| p.is_supported()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        for p in PopCount::available() {
            let f = p.func();
            assert_eq!(f(0), 0, "{}", p.name());
            assert_eq!(f(u64::MAX), 64, "{}", p.name());
            assert_eq!(f(1), 1, "{}", p.name());
            assert_eq!(f(1 << 63), 1, "{}", p.name());
        }
    }

    #[test]
    fn iterations_match_set_bits() {
        for n in [0u64, 7, 0x8000_0000_0000_0001, 0xdead_beef, u64::MAX] {
            let mut steps = 0;
            let mut m = n;
            while m != 0 {
                m &= m - 1;
                steps += 1;
            }
            assert_eq!(clear_lowest(n), steps);
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = PopCount::ALL.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PopCount::ALL.len());
    }
}
