//! Outbound telemetry lines
//!
//! Line grammar (each terminated by a single `\n`):
//! - `RUN_START <id>` opens a record
//! - `INFO <text>` is advisory and may appear anywhere
//! - `MAGIC=0x%08X` / `CRC=0x%08X` carry the signature-check values
//! - `RUN_END <id>` closes the record opened with the same id

use core::fmt::{self, Write};

use heapless::String;

/// Capacity of one rendered line, terminator included
pub const MAX_LINE_LEN: usize = 96;

pub const RUN_START: &str = "RUN_START";
pub const RUN_END: &str = "RUN_END";
pub const INFO: &str = "INFO";
pub const MAGIC: &str = "MAGIC";
pub const CRC: &str = "CRC";

/// Errors that can occur while rendering a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Rendered line does not fit [`MAX_LINE_LEN`]
    TooLong,
}

/// Identifier correlating a `RUN_START` with its `RUN_END`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunId {
    /// `<prefix>_<cycle>`
    Cycle { prefix: &'static str, cycle: u32 },
    /// Same literal for every record
    Fixed(&'static str),
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunId::Cycle { prefix, cycle } => write!(f, "{}_{}", prefix, cycle),
            RunId::Fixed(id) => f.write_str(id),
        }
    }
}

/// Payload of an `INFO` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Info<'a> {
    /// `INFO <text>`
    Text(&'a str),
    /// `INFO <text> cycle=<n>`
    Cycle { text: &'a str, cycle: u32 },
    /// `INFO heartbeat <index> cycle=<n>`
    Heartbeat { index: u8, cycle: u32 },
    /// `INFO payload=<payload>`
    Payload(&'a str),
    /// `INFO boot <variant>`
    Boot(&'a str),
    /// `INFO entering BOOTSEL`
    EnteringBootsel,
}

impl fmt::Display for Info<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Info::Text(text) => f.write_str(text),
            Info::Cycle { text, cycle } => write!(f, "{} cycle={}", text, cycle),
            Info::Heartbeat { index, cycle } => write!(f, "heartbeat {} cycle={}", index, cycle),
            Info::Payload(payload) => write!(f, "payload={}", payload),
            Info::Boot(variant) => write!(f, "boot {}", variant),
            Info::EnteringBootsel => f.write_str("entering BOOTSEL"),
        }
    }
}

/// One outbound telemetry line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryLine<'a> {
    RunStart(RunId),
    Info(Info<'a>),
    Magic(u32),
    Crc(u32),
    RunEnd(RunId),
}

impl<'a> TelemetryLine<'a> {
    /// Render the line with its `\n` terminator
    pub fn render(&self) -> Result<String<MAX_LINE_LEN>, LineError> {
        let mut out = String::new();
        writeln!(out, "{}", self).map_err(|_| LineError::TooLong)?;
        Ok(out)
    }

    /// Whether this line opens a record
    pub fn is_run_start(&self) -> bool {
        matches!(self, TelemetryLine::RunStart(_))
    }

    /// Whether this line closes a record
    pub fn is_run_end(&self) -> bool {
        matches!(self, TelemetryLine::RunEnd(_))
    }
}

impl fmt::Display for TelemetryLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryLine::RunStart(id) => write!(f, "{} {}", RUN_START, id),
            TelemetryLine::Info(info) => write!(f, "{} {}", INFO, info),
            TelemetryLine::Magic(value) => write!(f, "{}=0x{:08X}", MAGIC, value),
            TelemetryLine::Crc(value) => write!(f, "{}=0x{:08X}", CRC, value),
            TelemetryLine::RunEnd(id) => write!(f, "{} {}", RUN_END, id),
        }
    }
}
