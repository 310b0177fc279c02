//! Command dispatch
//!
//! Completed input lines are matched against the command tokens. A match
//! is acknowledged on the telemetry channel before the loader takes over;
//! anything else is dropped without a trace.

use bootlink_hal::{BootloaderEntry, UartTx};
use bootlink_protocol::{Command, Info, TelemetryLine};
use embedded_hal::delay::DelayNs;

/// Time given to the transmitter to drain the acknowledgement
pub const LOADER_SETTLE_MS: u32 = 50;

/// Routes recognized commands to their actions
pub struct Dispatcher<L> {
    loader: L,
    settle_ms: u32,
}

impl<L: BootloaderEntry> Dispatcher<L> {
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            settle_ms: LOADER_SETTLE_MS,
        }
    }

    /// Override the pause between the acknowledgement and the handoff
    pub fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    /// Act on one completed line
    ///
    /// For `BOOTSEL` / `ENTER_BOOTSEL` this writes `INFO entering BOOTSEL`,
    /// flushes, waits the settle time and enters the bootloader. On hardware
    /// that call does not return. Returns the command acted on, or `None`
    /// for any other line (including an empty one).
    pub fn dispatch<T, D>(&mut self, line: &[u8], tx: &mut T, delay: &mut D) -> Option<Command>
    where
        T: UartTx,
        D: DelayNs,
    {
        let command = Command::parse(line)?;
        match command {
            Command::EnterBootsel => {
                if let Ok(ack) = TelemetryLine::Info(Info::EnteringBootsel).render() {
                    // Best effort; the handoff happens regardless
                    let _ = tx.write_blocking(ack.as_bytes());
                }
                let _ = tx.flush();
                delay.delay_ms(self.settle_ms);
                self.loader.enter_bootloader();
            }
        }
        Some(command)
    }

    /// The injected loader capability
    pub fn loader(&self) -> &L {
        &self.loader
    }
}
