//! Early serial output on the AR7's first 16550-style UART.
//!
//! The boot ROM leaves UART0 configured (115200 8N1), so bring-up only has
//! to push bytes: wait for the holding register to drain, write, repeat.
//! [`UartLogger`] puts a [`log`] facade on top so the rest of boot can use
//! the ordinary `info!`/`warn!` macros.

use bitfield_struct::bitfield;
use core::fmt;
use kernel_mips_addresses::{PhysicalAddress, UncachedAddress};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Physical base of UART0 on the AR7.
pub const UART0_BASE: PhysicalAddress = PhysicalAddress::new(0x0861_0E00);

/// The AR7 wires the 8250 registers on 32-bit boundaries.
const REG_SHIFT: u32 = 2;

/// Transmit holding register (write side).
const THR: u32 = 0;

/// Line status register.
const LSR: u32 = 5;

/// 8250 line status register.
#[bitfield(u8)]
pub struct LineStatus {
    pub data_ready: bool,
    pub overrun_error: bool,
    pub parity_error: bool,
    pub framing_error: bool,
    pub break_interrupt: bool,
    /// Holding register empty: safe to write the next byte.
    pub transmitter_empty: bool,
    /// Holding and shift register both drained.
    pub transmitter_idle: bool,
    pub fifo_error: bool,
}

/// Handle to a memory-mapped 8250-style UART.
#[derive(Copy, Clone)]
pub struct Uart {
    base: UncachedAddress,
}

impl Uart {
    /// # Safety
    /// `base` must be the uncached window of an 8250-compatible UART with
    /// 32-bit register stride, already configured by the boot ROM.
    #[must_use]
    pub const unsafe fn new(base: UncachedAddress) -> Self {
        Self { base }
    }

    fn register(self, index: u32) -> *mut u32 {
        (self.base + (index << REG_SHIFT)).as_mut_ptr::<u32>()
    }

    fn line_status(self) -> LineStatus {
        // SAFETY: `new` vouches for the register block.
        let raw = unsafe { self.register(LSR).read_volatile() };
        LineStatus::from_bits(raw as u8)
    }

    /// Busy-wait until the holding register drains, then emit one byte.
    pub fn write_byte(self, byte: u8) {
        while !self.line_status().transmitter_empty() {
            core::hint::spin_loop();
        }
        // SAFETY: `new` vouches for the register block.
        unsafe { self.register(THR).write_volatile(u32::from(byte)) };
    }
}

impl fmt::Write for Uart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}

/// Early-boot logger printing over a [`Uart`].
pub struct UartLogger {
    uart: Uart,
    max_level: LevelFilter,
}

impl UartLogger {
    #[must_use]
    pub const fn new(uart: Uart, max_level: LevelFilter) -> Self {
        Self { uart, max_level }
    }

    /// Call this once during early init, before anything logs.
    #[allow(
        static_mut_refs,
        clippy::missing_errors_doc,
        clippy::missing_panics_doc
    )]
    pub fn init(self) -> Result<(), SetLoggerError> {
        // log::set_logger expects &'static Log; no allocator exists yet, so
        // park the logger in a static.
        static mut LOGGER: Option<UartLogger> = None;

        // SAFETY: runs once during single-threaded boot; `set_logger`
        // rejects any second registration.
        unsafe {
            LOGGER = Some(self);
            log::set_logger(LOGGER.as_ref().unwrap() as &'static dyn Log)?;
        }
        log::set_max_level(LevelFilter::Trace);
        Ok(())
    }
}

impl Log for UartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        use fmt::Write;
        let mut uart = self.uart;
        let _ = writeln!(
            uart,
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        while !self.uart.line_status().transmitter_idle() {
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_status_bit_layout() {
        let lsr = LineStatus::from_bits(0x60);
        assert!(lsr.transmitter_empty());
        assert!(lsr.transmitter_idle());
        assert!(!lsr.data_ready());

        assert_eq!(LineStatus::new().with_data_ready(true).into_bits(), 0x01);
        assert_eq!(
            LineStatus::new().with_transmitter_empty(true).into_bits(),
            0x20
        );
    }
}
