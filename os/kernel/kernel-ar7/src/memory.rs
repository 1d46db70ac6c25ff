//! # AR7 Memory Layout
//!
//! Compile-time constants describing the platform's physical memory map.

use kernel_mips_addresses::{PhysicalAddress, SEGMENT_SIZE};

/// Physical base of the SDRAM bank.
pub const RAM_BASE: PhysicalAddress = PhysicalAddress::new(0x1400_0000);

/// Largest SDRAM population the platform supports.
pub const MAX_RAM_BYTES: u32 = 64 << 20;

/// log2 of the page size.
pub const PAGE_SHIFT: u32 = 12;

/// Page size used when rounding the probed RAM size.
pub const PAGE_SIZE: u32 = 1 << PAGE_SHIFT;

const _: () = {
    assert!(MAX_RAM_BYTES.is_power_of_two());
    assert!(PAGE_SIZE.is_power_of_two());
    // The whole probe window must stay reachable through KSEG0/KSEG1.
    assert!(RAM_BASE.as_u32() + MAX_RAM_BYTES <= SEGMENT_SIZE);
};
