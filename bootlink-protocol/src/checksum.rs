//! CRC-32 over the signature-check canonical message
//!
//! The host verifier recomputes the same value independently, so the variant
//! is fixed: reflected polynomial 0xEDB88320, register preset to 0xFFFFFFFF,
//! output complemented (the zlib/IEEE 802.3 CRC-32). The bitwise form is
//! kept instead of a 1 KiB lookup table.
//!
//! Canonical message: `"<payload>|0x%08X"` with the magic as eight
//! zero-padded uppercase hex digits.

use core::fmt::{self, Write};

use heapless::String;

/// Reflected CRC-32 polynomial
pub const CRC32_POLY: u32 = 0xEDB8_8320;

/// Initial register value
pub const CRC32_INIT: u32 = 0xFFFF_FFFF;

/// Capacity of a rendered canonical message
pub const MAX_CANONICAL_LEN: usize = 96;

/// Incremental CRC-32 hasher
///
/// Also implements [`core::fmt::Write`], so formatted text can be hashed
/// directly without rendering it into a buffer first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crc32 {
    state: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    /// Create a hasher with the register preset
    pub const fn new() -> Self {
        Self { state: CRC32_INIT }
    }

    /// Feed bytes into the register
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u32;
            for _ in 0..8 {
                let mask = (self.state & 1).wrapping_neg();
                self.state = (self.state >> 1) ^ (CRC32_POLY & mask);
            }
        }
    }

    /// Final complemented checksum
    ///
    /// Does not consume the hasher; more bytes may be fed afterwards.
    pub const fn finish(&self) -> u32 {
        !self.state
    }
}

impl Write for Crc32 {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.update(s.as_bytes());
        Ok(())
    }
}

/// Compute the CRC-32 of a byte sequence
///
/// Total over all inputs; the empty sequence hashes to 0.
pub fn checksum(bytes: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(bytes);
    crc.finish()
}

/// Render the canonical message `"<payload>|0x%08X"`
///
/// Returns `None` if the payload is too long for [`MAX_CANONICAL_LEN`].
pub fn canonical_message(payload: &str, magic: u32) -> Option<String<MAX_CANONICAL_LEN>> {
    let mut msg = String::new();
    write!(msg, "{}|0x{:08X}", payload, magic).ok()?;
    Some(msg)
}

/// Checksum reported on the `CRC=` line of the signature-check variant
pub fn signature_crc(payload: &str, magic: u32) -> u32 {
    let mut crc = Crc32::new();
    // Writing into the hasher cannot fail
    let _ = write!(crc, "{}|0x{:08X}", payload, magic);
    crc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(checksum(b""), 0x0000_0000);
    }

    #[test]
    fn test_standard_check_value() {
        // CRC-32/ISO-HDLC check value
        assert_eq!(checksum(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_conformance_vector() {
        assert_eq!(checksum(b"PING_SEQ_001|0xC0FFEE42"), 0xCB2C_4B89);
    }

    #[test]
    fn test_signature_crc_matches_rendered_message() {
        for magic in [0x0000_0000, 0xC0FF_EE42, 0xDEAD_BEEF] {
            let msg = canonical_message("PING_SEQ_001", magic).unwrap();
            assert_eq!(signature_crc("PING_SEQ_001", magic), checksum(msg.as_bytes()));
        }
        assert_eq!(signature_crc("PING_SEQ_001", 0x0000_0000), 0xC6A3_7874);
        assert_eq!(signature_crc("PING_SEQ_001", 0xDEAD_BEEF), 0xE4E7_1BEF);
    }

    #[test]
    fn test_canonical_message_is_zero_padded_uppercase() {
        let msg = canonical_message("P", 0x00ab_cdef).unwrap();
        assert_eq!(msg.as_str(), "P|0x00ABCDEF");
    }

    #[test]
    fn test_canonical_message_too_long() {
        let payload = core::str::from_utf8(&[b'A'; MAX_CANONICAL_LEN]).unwrap();
        assert!(canonical_message(payload, 0).is_none());
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let data = b"PING_SEQ_001|0xC0FFEE42";
        let mut crc = Crc32::new();
        for chunk in data.chunks(5) {
            crc.update(chunk);
        }
        assert_eq!(crc.finish(), checksum(data));
    }
}
