//! Bootlink - Hardware-in-the-loop Demo Firmware
//!
//! Streams framed telemetry records over UART0 and reenters the USB
//! bootloader when the host sends `BOOTSEL` (or `ENTER_BOOTSEL`), so a
//! test rig can reflash the board without touching the button.
//!
//! Which record stream is produced is chosen at build time in
//! `firmware.toml`.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use bootlink_core::Session;
use bootlink_hal_rp2040::{BufferedRx, BufferedTx, RomBootloader};

mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Bootlink firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let profile = config::profile();
    info!(
        "Variant {}: {} body lines per record",
        profile.variant,
        profile.body_len()
    );

    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config::UART_BAUDRATE;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART0 initialized at {} baud", config::UART_BAUDRATE);

    let session: tasks::FirmwareSession = Session::new(
        BufferedRx::new(rx),
        BufferedTx::new(tx),
        RomBootloader::new(),
        Delay,
        profile,
    );

    spawner.spawn(tasks::telemetry_task(session)).unwrap();

    info!("All tasks spawned");
}
