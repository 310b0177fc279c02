//! Mask-ROM bootloader handoff

/// Capability to leave normal firmware execution for the ROM loader
///
/// On hardware this is a one-way transition: the chip resets into its
/// USB mass-storage loader and the call never returns. Test doubles may
/// return, in which case the caller stops processing input for that step.
pub trait BootloaderEntry {
    /// Hand control to the ROM bootloader
    fn enter_bootloader(&mut self);
}

impl<T: BootloaderEntry + ?Sized> BootloaderEntry for &mut T {
    fn enter_bootloader(&mut self) {
        T::enter_bootloader(self)
    }
}
