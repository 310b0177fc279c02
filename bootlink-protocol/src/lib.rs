//! Bootlink serial protocol
//!
//! This crate defines the text protocol spoken between a demo firmware image
//! and the host-side hardware-in-the-loop harness. Both directions are
//! newline-terminated ASCII lines.
//!
//! # Device → Host (telemetry)
//!
//! ```text
//! RUN_START signature_7
//! INFO demo signature_check cycle=7
//! INFO payload=PING_SEQ_001
//! MAGIC=0xC0FFEE42
//! CRC=0xCB2C4B89
//! RUN_END signature_7
//! ```
//!
//! Every line stands on its own, so a reader that attaches mid-stream
//! discards at most one partial record and is synchronized again at the
//! next `RUN_START`.
//!
//! # Host → Device (commands)
//!
//! A bare `BOOTSEL` or `ENTER_BOOTSEL` line, terminated by `\r` or `\n`,
//! asks the firmware to reenter the mask-ROM loader. Anything else is
//! ignored.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod checksum;
pub mod command;
pub mod line;
pub mod record;
pub mod telemetry;

pub use checksum::{canonical_message, checksum, signature_crc, Crc32, MAX_CANONICAL_LEN};
pub use command::Command;
pub use line::{Line, LineAccumulator, LINE_CAPACITY};
pub use record::{BodyLine, RecordEvent, RecordId, RecordSummary, RecordTracker};
pub use telemetry::{Info, LineError, RunId, TelemetryLine, MAX_LINE_LEN};
