//! Uncached access to physical RAM.

use kernel_memprobe::PhysicalMemory;
use kernel_mips_addresses::PhysicalAddress;

/// The production [`PhysicalMemory`]: volatile word access through KSEG1.
///
/// Every access bypasses the cache, so reads observe the actual bus state.
/// This is what the memory probe needs and what ordinary code should avoid.
pub struct UncachedRam(());

impl UncachedRam {
    /// # Safety
    /// The caller must be running on the real platform, where the KSEG1
    /// window maps the physical bus, and must have exclusive access to the
    /// addresses later passed in (early boot guarantees both).
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self(())
    }
}

impl PhysicalMemory for UncachedRam {
    fn read_word(&self, addr: PhysicalAddress) -> u32 {
        let ptr = addr.to_uncached().as_ptr::<u32>();
        // SAFETY: `Self::new` vouches that the uncached window is live and
        // that we have exclusive access to it.
        unsafe { ptr.read_volatile() }
    }

    fn write_word(&mut self, addr: PhysicalAddress, value: u32) {
        let ptr = addr.to_uncached().as_mut_ptr::<u32>();
        // SAFETY: see `read_word`.
        unsafe { ptr.write_volatile(value) }
    }
}
