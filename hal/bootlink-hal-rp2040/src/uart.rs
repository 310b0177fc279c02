//! Buffered UART adapters
//!
//! The interrupt-driven ring buffers of `BufferedUart` let the receiver be
//! polled without waiting: `read_ready()` says whether a byte is already
//! buffered, and only then is it read.

use embassy_rp::uart::{BufferedUartRx, BufferedUartTx, Error};
use embedded_io::{Read, ReadReady, Write};

/// Zero-wait receiver over the RX ring buffer
pub struct BufferedRx {
    rx: BufferedUartRx,
}

impl BufferedRx {
    pub fn new(rx: BufferedUartRx) -> Self {
        Self { rx }
    }
}

impl bootlink_hal::UartRx for BufferedRx {
    type Error = Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if !self.rx.read_ready()? {
            return Err(nb::Error::WouldBlock);
        }
        let mut buf = [0u8; 1];
        match self.rx.read(&mut buf)? {
            1 => Ok(buf[0]),
            _ => Err(nb::Error::WouldBlock),
        }
    }
}

/// Blocking transmitter over the TX ring buffer
pub struct BufferedTx {
    tx: BufferedUartTx,
}

impl BufferedTx {
    pub fn new(tx: BufferedUartTx) -> Self {
        Self { tx }
    }
}

impl bootlink_hal::UartTx for BufferedTx {
    type Error = Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Write::flush(&mut self.tx)
    }
}
