//! # Boot Memory Map
//!
//! Bookkeeping of physical memory regions during early boot, before any
//! allocator exists.
//!
//! ## Overview
//!
//! Platform bring-up code discovers physical memory (by probing, firmware
//! tables, or hard-wired knowledge) and records each contiguous range here,
//! tagged with a [`RegionKind`]. Later boot stages walk the map to seed the
//! page-frame allocator and to fence off ranges that must never be handed
//! out.
//!
//! The map is a fixed-capacity table so that it can live in a `static` and
//! be filled in while the heap does not exist yet. Registration is pure
//! bookkeeping; the map never reads or writes the memory it describes.
//!
//! ## Example
//! ```rust
//! # use kernel_bootmem::{BootMemoryMap, RegionKind};
//! # use kernel_mips_addresses::PhysicalAddress;
//! let mut map = BootMemoryMap::new();
//! map.add_region(PhysicalAddress::new(0x1400_0000), 32 << 20, RegionKind::Ram)?;
//! assert_eq!(map.total_bytes(RegionKind::Ram), 32 << 20);
//! # Ok::<(), kernel_bootmem::BootMemError>(())
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

use core::fmt;
use kernel_mips_addresses::PhysicalAddress;

/// Maximum number of regions the boot map can hold.
pub const MAX_REGIONS: usize = 32;

/// What a registered region is used for.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RegionKind {
    /// General-purpose RAM, free for the allocator once boot completes.
    Ram,
    /// Data handed over by the boot ROM that must survive until late init.
    RomData,
    /// Reserved; never available to the allocator.
    Reserved,
}

/// A contiguous physical address range with a usage tag.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct MemoryRegion {
    pub base: PhysicalAddress,
    pub size: u32,
    pub kind: RegionKind,
}

impl MemoryRegion {
    /// First address past the region.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> PhysicalAddress {
        PhysicalAddress::new(self.base.as_u32() + self.size)
    }
}

impl fmt::Debug for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MemoryRegion({}..{}, {:?})",
            self.base,
            self.end(),
            self.kind
        )
    }
}

/// Error returned by [`BootMemoryMap::add_region`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootMemError {
    #[error("empty memory region")]
    Empty,
    #[error("boot memory map is full")]
    Full,
}

/// Fixed-capacity table of boot-time memory regions.
///
/// ### Invariants
/// - At most [`MAX_REGIONS`] entries; registration order is preserved.
/// - Every stored region has a non-zero size.
///
/// ### Concurrency
/// Filled during single-threaded boot sequencing; no interior locking.
pub struct BootMemoryMap {
    regions: [MemoryRegion; MAX_REGIONS],
    len: usize,
}

impl BootMemoryMap {
    /// An empty map, usable in `static` initializers.
    #[must_use]
    pub const fn new() -> Self {
        const EMPTY: MemoryRegion = MemoryRegion {
            base: PhysicalAddress::zero(),
            size: 0,
            kind: RegionKind::Reserved,
        };
        Self {
            regions: [EMPTY; MAX_REGIONS],
            len: 0,
        }
    }

    /// Record a physical memory region.
    ///
    /// # Errors
    /// [`BootMemError::Empty`] for a zero-sized region,
    /// [`BootMemError::Full`] once [`MAX_REGIONS`] entries are recorded.
    pub fn add_region(
        &mut self,
        base: PhysicalAddress,
        size: u32,
        kind: RegionKind,
    ) -> Result<(), BootMemError> {
        if size == 0 {
            return Err(BootMemError::Empty);
        }
        if self.len == MAX_REGIONS {
            return Err(BootMemError::Full);
        }
        self.regions[self.len] = MemoryRegion { base, size, kind };
        self.len += 1;
        Ok(())
    }

    /// The recorded regions, in registration order.
    #[inline]
    #[must_use]
    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions[..self.len]
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total bytes recorded with the given kind.
    #[must_use]
    pub fn total_bytes(&self, kind: RegionKind) -> u64 {
        self.regions()
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| u64::from(r.size))
            .sum()
    }
}

impl Default for BootMemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: PhysicalAddress = PhysicalAddress::new(0x1400_0000);

    #[test]
    fn records_regions_in_order() {
        let mut map = BootMemoryMap::new();
        map.add_region(BASE, 16 << 20, RegionKind::Ram).unwrap();
        map.add_region(PhysicalAddress::new(0x1000_0000), 4 << 10, RegionKind::Reserved)
            .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.regions()[0].base, BASE);
        assert_eq!(map.regions()[0].size, 16 << 20);
        assert_eq!(map.regions()[0].kind, RegionKind::Ram);
        assert_eq!(map.regions()[1].kind, RegionKind::Reserved);
    }

    #[test]
    fn rejects_empty_region() {
        let mut map = BootMemoryMap::new();
        assert_eq!(
            map.add_region(BASE, 0, RegionKind::Ram),
            Err(BootMemError::Empty)
        );
        assert!(map.is_empty());
    }

    #[test]
    fn rejects_region_when_full() {
        let mut map = BootMemoryMap::new();
        for i in 0..MAX_REGIONS {
            map.add_region(BASE + ((i as u32) << 12), 4096, RegionKind::Ram)
                .unwrap();
        }
        assert_eq!(
            map.add_region(BASE, 4096, RegionKind::Ram),
            Err(BootMemError::Full)
        );
        assert_eq!(map.len(), MAX_REGIONS);
    }

    #[test]
    fn totals_are_per_kind() {
        let mut map = BootMemoryMap::new();
        map.add_region(BASE, 16 << 20, RegionKind::Ram).unwrap();
        map.add_region(BASE + (16 << 20), 16 << 20, RegionKind::Ram).unwrap();
        map.add_region(PhysicalAddress::zero(), 1 << 20, RegionKind::RomData)
            .unwrap();

        assert_eq!(map.total_bytes(RegionKind::Ram), 32 << 20);
        assert_eq!(map.total_bytes(RegionKind::RomData), 1 << 20);
        assert_eq!(map.total_bytes(RegionKind::Reserved), 0);
    }

    #[test]
    fn region_end_is_exclusive() {
        let region = MemoryRegion {
            base: BASE,
            size: 4096,
            kind: RegionKind::Ram,
        };
        assert_eq!(region.end().as_u32(), BASE.as_u32() + 4096);
    }
}
