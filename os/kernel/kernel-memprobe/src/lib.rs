//! # Boot-Time Memory Size Probing
//!
//! Detects how much RAM is actually installed on platforms whose memory
//! controller exposes **no size register**: the probe writes sentinel values
//! through the uncached window and checks which of them stick.
//!
//! ## Why probing works
//!
//! When the address space decoded by the memory controller is larger than
//! the installed RAM, accesses beyond the real size **alias** back onto
//! lower addresses (or read stale bus data). A sentinel that encodes its own
//! address makes the difference observable: reading the cell back either
//! returns the sentinel (real backing memory) or whatever the aliased lower
//! cell holds (no backing memory at that address).
//!
//! ## The two phases
//!
//! Starting from the last word below the maximum supported size, the
//! **downward phase** writes sentinels while halving the step, stopping
//! before it would touch the running kernel image. The **upward phase** then
//! walks back up, re-reading the sentinels and doubling the step after every
//! match; the first mismatch bounds the installed RAM.
//!
//! Accesses go through an injected [`PhysicalMemory`] implementation, so the
//! algorithm itself is plain arithmetic: production code backs it with
//! uncached loads and stores, tests with a simulated backing store (the
//! `sim` module, behind the feature of the same name) that aliases like
//! real hardware.
//!
//! ## Example
//! ```ignore
//! use kernel_memprobe::{ProbeBounds, probe_memory_size, sim::SimulatedRam};
//! use kernel_mips_addresses::PhysicalAddress;
//!
//! let base = PhysicalAddress::new(0x1400_0000);
//! let mut ram = SimulatedRam::new(base, 16 << 20);
//! let bounds = ProbeBounds::new(base, 64 << 20, base + (1 << 20));
//! assert_eq!(probe_memory_size(&bounds, &mut ram), 16 << 20);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

#[cfg(any(test, feature = "sim"))]
extern crate alloc;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

use kernel_mips_addresses::PhysicalAddress;

/// Width of one probed cell.
const WORD: u32 = size_of::<u32>() as u32;

/// Word-granular access to physical memory.
///
/// The probe is written against this seam so that the same algorithm runs
/// against real uncached memory and against a simulated backing store.
/// Implementations decide how a [`PhysicalAddress`] is actually reached.
pub trait PhysicalMemory {
    /// Read the word at `addr`.
    fn read_word(&self, addr: PhysicalAddress) -> u32;

    /// Write the word at `addr`.
    fn write_word(&mut self, addr: PhysicalAddress, value: u32);
}

/// The fixed inputs of a probe run.
///
/// ### Invariants
/// - `max_bytes` is a power of two.
/// - `kernel_end` lies strictly inside `base..base + max_bytes`; the probe
///   never writes at or below it, so the running kernel image survives.
#[derive(Copy, Clone, Debug)]
pub struct ProbeBounds {
    base: PhysicalAddress,
    max_bytes: u32,
    kernel_end: PhysicalAddress,
}

impl ProbeBounds {
    /// # Panics
    /// In debug builds, when the invariants above are violated.
    #[must_use]
    pub const fn new(base: PhysicalAddress, max_bytes: u32, kernel_end: PhysicalAddress) -> Self {
        debug_assert!(max_bytes.is_power_of_two(), "maximum RAM size must be a power of two");
        debug_assert!(
            kernel_end.as_u32() > base.as_u32(),
            "kernel image must lie above the RAM base"
        );
        debug_assert!(
            kernel_end.as_u32() < base.as_u32() + max_bytes,
            "kernel image must lie below the probe window"
        );
        Self {
            base,
            max_bytes,
            kernel_end,
        }
    }

    /// Physical base of the probed RAM window.
    #[inline]
    #[must_use]
    pub const fn base(&self) -> PhysicalAddress {
        self.base
    }

    /// Largest RAM size the platform supports.
    #[inline]
    #[must_use]
    pub const fn max_bytes(&self) -> u32 {
        self.max_bytes
    }

    /// First byte past the running kernel image.
    #[inline]
    #[must_use]
    pub const fn kernel_end(&self) -> PhysicalAddress {
        self.kernel_end
    }
}

/// Determine the installed RAM size in bytes.
///
/// Runs the two-phase sentinel probe described in the [crate docs](crate).
/// The result is a power of two, at most [`ProbeBounds::max_bytes`], and for
/// power-of-two RAM sizes equals the installed amount exactly. Sizes that
/// are not powers of two cannot be represented by the halving/doubling walk
/// and are reported as the next-smaller power of two.
///
/// The probe is **destructive**: it overwrites words in the probed range.
/// Call it once, during single-threaded boot, before anything else depends
/// on the contents of that memory.
///
/// There is no error path. If the bounds do not describe the hardware the
/// probe runs on, the result is silently wrong — the same trade-off the
/// bare-metal original makes, accepted because nothing could meaningfully
/// recover this early in boot.
#[must_use]
pub fn probe_memory_size<M: PhysicalMemory>(bounds: &ProbeBounds, mem: &mut M) -> u32 {
    let base = bounds.base().as_u32();
    let kernel_end = bounds.kernel_end().as_u32();

    // Last word below the maximum supported size.
    let mut size = bounds.max_bytes();
    let mut addr = base + size - WORD;

    // Downward: leave a trail of sentinels, halving the step until the next
    // candidate would no longer lie strictly above the kernel image.
    while addr > kernel_end {
        mem.write_word(PhysicalAddress::new(addr), sentinel(addr));
        size >>= 1;
        addr -= size;
    }

    // Upward: follow the trail back up. Every surviving sentinel doubles the
    // step; the first mismatch means the previous step was the real size.
    loop {
        addr += size;
        if mem.read_word(PhysicalAddress::new(addr)) != sentinel(addr) {
            break;
        }
        size <<= 1;
        if size >= bounds.max_bytes() {
            break;
        }
    }

    size
}

/// A probed word's sentinel: the numeric value of its own uncached address.
#[inline]
const fn sentinel(addr: u32) -> u32 {
    PhysicalAddress::new(addr).to_uncached().as_u32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedRam;

    const BASE: PhysicalAddress = PhysicalAddress::new(0x1400_0000);
    const MAX: u32 = 64 << 20;
    const MIB: u32 = 1 << 20;

    fn bounds(kernel_end_offset: u32) -> ProbeBounds {
        ProbeBounds::new(BASE, MAX, BASE + kernel_end_offset)
    }

    #[test]
    fn detects_exact_backing_size() {
        for mib in [2, 4, 8, 16, 32, 64] {
            let mut ram = SimulatedRam::new(BASE, mib * MIB);
            assert_eq!(
                probe_memory_size(&bounds(MIB), &mut ram),
                mib * MIB,
                "backing store of {mib} MiB"
            );
        }
    }

    #[test]
    fn result_is_a_power_of_two() {
        for mib in [4, 16, 64] {
            let mut ram = SimulatedRam::new(BASE, mib * MIB);
            assert!(probe_memory_size(&bounds(MIB), &mut ram).is_power_of_two());
        }
    }

    #[test]
    fn caps_at_the_configured_maximum() {
        // Twice the supported maximum installed: the probe must not report
        // more than the platform can address.
        let mut ram = SimulatedRam::new(BASE, 128 * MIB);
        assert_eq!(probe_memory_size(&bounds(MIB), &mut ram), 64 * MIB);
    }

    #[test]
    fn thirty_two_mib_with_low_kernel_bound() {
        let mut ram = SimulatedRam::new(BASE, 32 * MIB);
        assert_eq!(probe_memory_size(&bounds(MIB), &mut ram), 1 << 25);
    }

    #[test]
    fn full_sixty_four_mib_stays_within_the_window() {
        let mut ram = SimulatedRam::new(BASE, 64 * MIB);
        assert_eq!(probe_memory_size(&bounds(MIB), &mut ram), 64 * MIB);

        // The upward phase stops at the maximum step instead of probing on
        // past the supported window.
        let top = ram.highest_probe().expect("probe touched memory");
        assert!(top.as_u32() <= BASE.as_u32() + 64 * MIB - WORD);
    }

    #[test]
    fn four_mib_with_tight_kernel_bound() {
        // Kernel image ends only 2 MiB below the true size; the downward
        // phase must stop above it and the upward phase still find 4 MiB.
        let mut ram = SimulatedRam::new(BASE, 4 * MIB);
        assert_eq!(probe_memory_size(&bounds(2 * MIB), &mut ram), 4 * MIB);
    }

    #[test]
    fn never_writes_at_or_below_the_kernel_bound() {
        for (backing, kernel_end) in [(32 * MIB, MIB), (4 * MIB, 2 * MIB), (64 * MIB, 63 * MIB)] {
            let mut ram = SimulatedRam::new(BASE, backing);
            let _ = probe_memory_size(&bounds(kernel_end), &mut ram);

            let lowest = ram.lowest_write().expect("probe wrote sentinels");
            assert!(
                lowest.as_u32() > BASE.as_u32() + kernel_end,
                "write at {lowest} crosses the kernel bound at +{kernel_end:#x}"
            );
        }
    }

    #[test]
    fn kernel_bound_near_the_top_of_the_window() {
        // Pathological layout: the kernel image ends 1 MiB below the probe
        // window's top. The probe still terminates, respects the bound, and
        // reports a size no larger than the maximum.
        let mut ram = SimulatedRam::new(BASE, 64 * MIB);
        let detected = probe_memory_size(&bounds(63 * MIB), &mut ram);

        assert!(detected.is_power_of_two());
        assert!(detected <= 64 * MIB);
        let lowest = ram.lowest_write().expect("probe wrote sentinels");
        assert!(lowest.as_u32() > BASE.as_u32() + 63 * MIB);
    }
}
