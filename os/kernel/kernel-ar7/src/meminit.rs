//! # Boot-Stage Memory Discovery
//!
//! Ties the [memory probe](kernel_memprobe) to the platform: probe how much
//! SDRAM the board carries, round to whole pages, and record the region in
//! the [boot memory map](kernel_bootmem) for the allocator to pick up.

use kernel_bootmem::{BootMemoryMap, RegionKind};
use kernel_memprobe::{PhysicalMemory, ProbeBounds, probe_memory_size};
use kernel_mips_addresses::{PhysicalAddress, align_down};
use log::{error, info};

use crate::memory::{MAX_RAM_BYTES, PAGE_SIZE, RAM_BASE};

/// Boot-stage memory lifecycle.
///
/// Platforms implement [`init`](Self::init) to discover and register memory
/// during bring-up. [`free_bootstrap_memory`](Self::free_bootstrap_memory)
/// runs after late initialization to release ranges that were only needed
/// while booting; platforms with nothing to release inherit the no-op
/// default.
pub trait MemoryBringup {
    /// Discover installed memory and record it in `map`.
    ///
    /// Runs exactly once, single-threaded, before the allocator exists.
    fn init(&mut self, map: &mut BootMemoryMap);

    /// Release bootstrap-only memory after late initialization.
    fn free_bootstrap_memory(&mut self) {}
}

/// Memory bring-up for the AR7: probe SDRAM, register it as RAM.
pub struct Ar7MemoryBringup<M> {
    ram: M,
    kernel_end: PhysicalAddress,
}

impl<M: PhysicalMemory> Ar7MemoryBringup<M> {
    /// `kernel_end` is the first byte past the loaded kernel image; the
    /// probe stays strictly above it.
    #[must_use]
    pub const fn new(ram: M, kernel_end: PhysicalAddress) -> Self {
        Self { ram, kernel_end }
    }
}

impl<M: PhysicalMemory> MemoryBringup for Ar7MemoryBringup<M> {
    fn init(&mut self, map: &mut BootMemoryMap) {
        memory_init_with(&mut self.ram, self.kernel_end, map);
    }

    // The boot ROM hands nothing over that would have to survive until late
    // init, so `free_bootstrap_memory` stays the inherited no-op.
}

/// Probe installed RAM and record it in the boot memory map.
///
/// Returns the registered size in bytes: the probed size rounded down to
/// whole pages. Registration failures are logged and otherwise ignored —
/// boot cannot stop here, and a best-effort map is still better than none.
pub fn memory_init_with<M: PhysicalMemory>(
    ram: &mut M,
    kernel_end: PhysicalAddress,
    map: &mut BootMemoryMap,
) -> u32 {
    let bounds = ProbeBounds::new(RAM_BASE, MAX_RAM_BYTES, kernel_end);
    let bytes = align_down(probe_memory_size(&bounds, ram), PAGE_SIZE);

    info!("{} MiB of RAM at {}", bytes >> 20, RAM_BASE);
    if let Err(err) = map.add_region(RAM_BASE, bytes, RegionKind::Ram) {
        error!("could not record the RAM region: {err}");
    }
    bytes
}

/// Memory discovery entry point for the real platform.
///
/// Takes the kernel-image bound from the linker script and probes through
/// the live KSEG1 window. Runs once during platform bring-up.
#[cfg(target_arch = "mips")]
pub fn memory_init(map: &mut BootMemoryMap) -> u32 {
    use kernel_mips_addresses::CachedAddress;

    unsafe extern "C" {
        /// First byte past the kernel image, placed by the linker script.
        static _end: u8;
    }

    // SAFETY: `_end` is a linker symbol; only its address is taken. The
    // kernel is linked into KSEG0, so masking yields its physical end.
    let end = unsafe { CachedAddress::new((&raw const _end) as usize as u32) };
    // SAFETY: early boot on the real platform; SDRAM sits behind KSEG1 and
    // nothing else runs yet.
    let mut ram = unsafe { crate::ram::UncachedRam::new() };
    memory_init_with(&mut ram, end.to_physical(), map)
}
