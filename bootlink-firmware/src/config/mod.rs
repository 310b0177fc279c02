//! Build-time configuration
//!
//! `firmware.toml` is validated by build.rs and baked in as constants, so a
//! running image never parses anything.

use bootlink_core::{Profile, Signature, Variant};

include!(concat!(env!("OUT_DIR"), "/build_config.rs"));

/// Signature pair compiled into this image
pub const SIGNATURE: Signature = Signature {
    payload: SIGNATURE_PAYLOAD,
    magic: TARGET_MAGIC,
};

/// Emission profile for the configured variant
pub const fn profile() -> Profile {
    Profile::for_variant(VARIANT, SIGNATURE)
}
