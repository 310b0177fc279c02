//! Board-agnostic core of the Bootlink serial layer
//!
//! This crate ties the protocol pieces to the platform traits:
//!
//! - Command dispatch with an injected loader-reentry capability
//! - Telemetry emitter state machine and the built-in variant profiles
//! - The cooperative [`Session`] scheduler driven one `step()` at a time
//!
//! Nothing here touches hardware or sleeps on its own; the firmware awaits
//! the hold time each step reports.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod dispatcher;
pub mod emitter;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatcher::{Dispatcher, LOADER_SETTLE_MS};
pub use emitter::{Emission, Emitter, EmitterState, Profile, Signature, Variant};
pub use session::{Session, StepReport};
