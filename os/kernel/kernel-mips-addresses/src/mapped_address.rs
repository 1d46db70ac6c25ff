use crate::{KSEG0_BASE, KSEG1_BASE, PHYS_MASK, PhysicalAddress, SEGMENT_SIZE};
use core::fmt;
use core::ops::{Add, AddAssign};

/// KSEG0 (cached) segment address.
///
/// A thin wrapper around a raw `u32` that denotes an address inside the
/// cached unmapped window. Loads and stores through it are served by the
/// cache hierarchy, so it is the wrong tool whenever the actual hardware
/// state matters (MMIO, memory probing).
///
/// ### Examples
/// ```rust
/// # use kernel_mips_addresses::*;
/// let cached = CachedAddress::new(0x9400_0000);
/// assert_eq!(cached.to_physical().as_u32(), 0x1400_0000);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CachedAddress(u32);

impl CachedAddress {
    #[inline]
    #[must_use]
    pub const fn new(value: u32) -> Self {
        debug_assert!(
            value >= KSEG0_BASE && value < KSEG0_BASE + SEGMENT_SIZE,
            "address outside the KSEG0 window"
        );
        Self(value)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Strip the segment bits (the CPHYSADDR operation).
    #[inline]
    #[must_use]
    pub const fn to_physical(self) -> PhysicalAddress {
        PhysicalAddress::new(self.0 & PHYS_MASK)
    }

    #[inline]
    #[must_use]
    pub fn as_ptr<T>(self) -> *const T {
        self.0 as usize as *const T
    }

    #[inline]
    #[must_use]
    pub fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as usize as *mut T
    }
}

/// KSEG1 (uncached) segment address.
///
/// A thin wrapper around a raw `u32` that denotes an address inside the
/// uncached unmapped window. Loads and stores through it go straight to the
/// bus, which makes this the window of choice for MMIO registers and for
/// probing memory that the cache must not paper over.
///
/// ### Examples
/// ```rust
/// # use kernel_mips_addresses::*;
/// let uncached = UncachedAddress::new(0xB400_0000);
/// assert_eq!(uncached.to_physical().as_u32(), 0x1400_0000);
/// ```
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UncachedAddress(u32);

impl UncachedAddress {
    #[inline]
    #[must_use]
    pub const fn new(value: u32) -> Self {
        debug_assert!(
            value >= KSEG1_BASE && value < KSEG1_BASE + SEGMENT_SIZE,
            "address outside the KSEG1 window"
        );
        Self(value)
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Strip the segment bits (the CPHYSADDR operation).
    #[inline]
    #[must_use]
    pub const fn to_physical(self) -> PhysicalAddress {
        PhysicalAddress::new(self.0 & PHYS_MASK)
    }

    #[inline]
    #[must_use]
    pub fn as_ptr<T>(self) -> *const T {
        self.0 as usize as *const T
    }

    #[inline]
    #[must_use]
    pub fn as_mut_ptr<T>(self) -> *mut T {
        self.0 as usize as *mut T
    }
}

impl fmt::Debug for CachedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KSEG0(0x{:08X})", self.as_u32())
    }
}

impl fmt::Display for CachedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.as_u32())
    }
}

impl fmt::Debug for UncachedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KSEG1(0x{:08X})", self.as_u32())
    }
}

impl fmt::Display for UncachedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.as_u32())
    }
}

impl Add<u32> for CachedAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u32) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<u32> for CachedAddress {
    #[inline]
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}

impl Add<u32> for UncachedAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u32) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<u32> for UncachedAddress {
    #[inline]
    fn add_assign(&mut self, rhs: u32) {
        self.0 += rhs;
    }
}
