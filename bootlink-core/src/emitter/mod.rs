//! Telemetry emitter
//!
//! Produces the outbound record stream one line per step. What a record
//! contains is described by a [`Profile`]; the [`Emitter`] walks it.

pub mod machine;
pub mod profile;

pub use machine::{Emission, Emitter, EmitterState};
pub use profile::{HeaderLine, Profile, RunIdMode, Signature, Variant};
