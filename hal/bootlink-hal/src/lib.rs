//! Bootlink Hardware Abstraction Layer
//!
//! This crate defines the small set of platform capabilities the serial
//! layer needs. Chip-specific crates implement them; the protocol and core
//! crates only ever see these traits, so they run unchanged on the host
//! under test.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  bootlink-firmware                      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bootlink-core (session, dispatcher)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bootlink-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ bootlink-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartRx`] - Zero-wait byte polling
//! - [`uart::UartTx`] - Fire-and-forget line output
//! - [`bootrom::BootloaderEntry`] - One-way handoff to the mask-ROM loader

#![no_std]
#![deny(unsafe_code)]

pub mod bootrom;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use bootrom::BootloaderEntry;
pub use uart::{UartRx, UartTx};
