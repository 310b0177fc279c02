//! RP2040-specific HAL for Bootlink firmware
//!
//! Implements the shared `bootlink-hal` traits on top of embassy-rp:
//!
//! - Buffered UART halves as zero-wait receiver / blocking transmitter
//! - Mask-ROM `reset_to_usb_boot` as the bootloader handoff

#![no_std]

pub mod bootrom;
pub mod uart;

pub use bootrom::RomBootloader;
pub use uart::{BufferedRx, BufferedTx};

// Re-export shared traits from bootlink-hal for convenience
pub use bootlink_hal::{BootloaderEntry, UartRx, UartTx};
