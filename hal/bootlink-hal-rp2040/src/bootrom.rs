//! Mask-ROM bootloader handoff for RP2040

use embassy_rp::rom_data;

/// Reenters the USB mass-storage bootloader through the boot ROM
#[derive(Debug, Clone, Copy, Default)]
pub struct RomBootloader {
    /// GPIO mask to use as the loader's activity LED (0 = none)
    pub activity_pin_mask: u32,
    /// Loader interfaces to disable: bit 0 mass storage, bit 1 PICOBOOT (0 = keep both)
    pub disable_interface_mask: u32,
}

impl RomBootloader {
    pub const fn new() -> Self {
        Self {
            activity_pin_mask: 0,
            disable_interface_mask: 0,
        }
    }
}

impl bootlink_hal::BootloaderEntry for RomBootloader {
    fn enter_bootloader(&mut self) {
        // Resets through the watchdog; does not return
        rom_data::reset_to_usb_boot(self.activity_pin_mask, self.disable_interface_mask);
    }
}
