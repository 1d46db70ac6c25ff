//! # AR7 Platform Bring-Up
//!
//! Early-boot support for TI AR7 router boards: the memory layout the boot
//! ROM leaves behind, uncached access to SDRAM, a serial logger on the
//! first UART, and the memory-discovery boot hooks.
//!
//! ## Boot flow
//!
//! The AR7's memory controller has no register describing how much SDRAM a
//! board actually carries, so bring-up [probes for it](kernel_memprobe) and
//! records the result in the [boot memory map](kernel_bootmem):
//!
//! 1. [`uart::UartLogger::init`] — serial logging as the very first thing.
//! 2. `meminit::memory_init` — probe SDRAM, register the RAM region.
//! 3. Allocator setup consumes the map (outside this crate).
//! 4. After late init, [`meminit::MemoryBringup::free_bootstrap_memory`] —
//!    a deliberate no-op here.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

pub mod meminit;
pub mod memory;
pub mod ram;
pub mod uart;

pub use meminit::{Ar7MemoryBringup, MemoryBringup, memory_init_with};
