//! UART serial communication abstractions
//!
//! Receive is a zero-wait poll: every call returns immediately with either
//! one byte or [`nb::Error::WouldBlock`]. Transmit is blocking and
//! best-effort; callers do not retry.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been queued or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations (framing, overrun, break)
    type Error;

    /// Poll for a single byte without waiting
    ///
    /// `Err(nb::Error::WouldBlock)` means "no data now". It is not an
    /// error and not end-of-stream.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;
}
