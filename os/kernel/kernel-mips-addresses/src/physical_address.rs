use crate::{CachedAddress, KSEG0_BASE, KSEG1_BASE, SEGMENT_SIZE, UncachedAddress};
use core::fmt;
use core::ops::{Add, AddAssign};

/// Physical memory address.
///
/// A thin wrapper around a raw `u32` that denotes **physical** addresses
/// (SDRAM / MMIO). It carries intent and prevents accidentally mixing a
/// physical address with its KSEG0/KSEG1 window.
///
/// ### Semantics
/// - Use [`PhysicalAddress::to_cached`] / [`PhysicalAddress::to_uncached`]
///   to obtain a dereferenceable segment address for this physical location.
/// - The reverse conversions live on [`CachedAddress`] and
///   [`UncachedAddress`].
///
/// ### Notes
/// - Only the low 512 MiB of physical space are reachable through the
///   unmapped segments; the window conversions `debug_assert!` this.
///
/// ### Examples
/// ```rust
/// # use kernel_mips_addresses::*;
/// let pa = PhysicalAddress::new(0x1400_0000);
/// assert_eq!(pa.to_uncached().as_u32(), 0xB400_0000);
/// assert_eq!(pa.to_cached().as_u32(), 0x9400_0000);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysicalAddress(u32);

impl PhysicalAddress {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0)
    }

    #[inline]
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Window this address through KSEG0 (cached access).
    #[inline]
    #[must_use]
    pub const fn to_cached(self) -> CachedAddress {
        debug_assert!(self.0 < SEGMENT_SIZE, "physical address beyond KSEG0 window");
        CachedAddress::new(self.0 | KSEG0_BASE)
    }

    /// Window this address through KSEG1 (uncached access).
    #[inline]
    #[must_use]
    pub const fn to_uncached(self) -> UncachedAddress {
        debug_assert!(self.0 < SEGMENT_SIZE, "physical address beyond KSEG1 window");
        UncachedAddress::new(self.0 | KSEG1_BASE)
    }
}

impl fmt::Debug for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PA(0x{:08X})", self.as_u32())
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.as_u32())
    }
}

impl From<u32> for PhysicalAddress {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<PhysicalAddress> for u32 {
    #[inline]
    fn from(value: PhysicalAddress) -> Self {
        value.as_u32()
    }
}

impl Add<u32> for PhysicalAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u32) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<u32> for PhysicalAddress {
    #[inline]
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}
