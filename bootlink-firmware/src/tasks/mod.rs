//! Embassy async tasks

pub mod telemetry;

pub use telemetry::{telemetry_task, FirmwareSession};
