//! Per-variant record layouts
//!
//! Each demo image reports the same record framing with its own header
//! lines, heartbeat count and pacing.

/// Firmware variants with a built-in profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// Plain marker demo
    UartDemo,
    /// Framing-error hunt pattern
    FramingHunt,
    /// Parity-error hunt pattern
    ParityHunt,
    /// Payload/MAGIC/CRC image signature
    SignatureCheck,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::UartDemo,
        Variant::FramingHunt,
        Variant::ParityHunt,
        Variant::SignatureCheck,
    ];

    /// Name used in configuration and the boot announce line
    pub const fn name(&self) -> &'static str {
        match self {
            Variant::UartDemo => "uart_demo",
            Variant::FramingHunt => "framing_hunt",
            Variant::ParityHunt => "parity_hunt",
            Variant::SignatureCheck => "signature_check",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.name() == name)
    }
}

/// How record ids are formed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunIdMode {
    /// `<prefix>_<cycle>`, cycle counting up from 0
    Cycle(&'static str),
    /// The same literal every record
    Fixed(&'static str),
}

/// A static line emitted right after `RUN_START`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaderLine {
    /// `INFO <text>`
    Text(&'static str),
    /// `INFO <text> cycle=<n>`
    WithCycle(&'static str),
}

/// Values reported by the signature-check variant
///
/// Produces `INFO payload=<payload>`, `MAGIC=` and `CRC=` lines after the
/// header, with `CRC = crc32("<payload>|0x%08X" % magic)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Signature {
    pub payload: &'static str,
    pub magic: u32,
}

/// Default payload of the signature-check variant
pub const DEFAULT_PAYLOAD: &str = "PING_SEQ_001";

/// Default build-time magic
pub const DEFAULT_TARGET_MAGIC: u32 = 0xC0FF_EE42;

const UART_DEMO_HEADER: &[HeaderLine] = &[HeaderLine::WithCycle("boot rp2350_uart_demo")];

const FRAMING_HUNT_HEADER: &[HeaderLine] = &[
    HeaderLine::Text("demo framing_hunt"),
    HeaderLine::Text("frame_hint 8N1"),
    HeaderLine::Text("pattern 0x55 0xAA 0x33 0xCC"),
];

const PARITY_HUNT_HEADER: &[HeaderLine] = &[
    HeaderLine::Text("demo parity_hunt"),
    HeaderLine::Text("parity_hint even"),
    HeaderLine::Text("pattern 0x00 0xFF 0x7E 0x81"),
];

const SIGNATURE_CHECK_HEADER: &[HeaderLine] = &[HeaderLine::WithCycle("demo signature_check")];

/// Layout and pacing of one variant's records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    pub variant: Variant,
    pub run_id: RunIdMode,
    /// Emit `INFO boot <variant>` once before the first record
    pub boot_announce: bool,
    pub header: &'static [HeaderLine],
    pub signature: Option<Signature>,
    /// Number of `INFO heartbeat` lines per record
    pub heartbeats: u8,
    /// Hold after each heartbeat line (ms)
    pub heartbeat_interval_ms: u32,
    /// Hold after `RUN_END` before the next record (ms)
    pub record_gap_ms: u32,
}

impl Profile {
    /// Built-in profile for a variant
    ///
    /// `signature` is only used by [`Variant::SignatureCheck`].
    pub const fn for_variant(variant: Variant, signature: Signature) -> Self {
        match variant {
            Variant::UartDemo => Self::uart_demo(),
            Variant::FramingHunt => Self::framing_hunt(),
            Variant::ParityHunt => Self::parity_hunt(),
            Variant::SignatureCheck => Self::signature_check(signature),
        }
    }

    pub const fn uart_demo() -> Self {
        Self {
            variant: Variant::UartDemo,
            run_id: RunIdMode::Cycle("cycle"),
            boot_announce: false,
            header: UART_DEMO_HEADER,
            signature: None,
            heartbeats: 5,
            heartbeat_interval_ms: 200,
            record_gap_ms: 300,
        }
    }

    pub const fn framing_hunt() -> Self {
        Self {
            variant: Variant::FramingHunt,
            run_id: RunIdMode::Cycle("framing"),
            boot_announce: true,
            header: FRAMING_HUNT_HEADER,
            signature: None,
            heartbeats: 5,
            heartbeat_interval_ms: 200,
            record_gap_ms: 300,
        }
    }

    pub const fn parity_hunt() -> Self {
        Self {
            variant: Variant::ParityHunt,
            run_id: RunIdMode::Cycle("parity"),
            boot_announce: true,
            header: PARITY_HUNT_HEADER,
            signature: None,
            heartbeats: 5,
            heartbeat_interval_ms: 200,
            record_gap_ms: 300,
        }
    }

    pub const fn signature_check(signature: Signature) -> Self {
        Self {
            variant: Variant::SignatureCheck,
            run_id: RunIdMode::Cycle("signature"),
            boot_announce: false,
            header: SIGNATURE_CHECK_HEADER,
            signature: Some(signature),
            heartbeats: 0,
            heartbeat_interval_ms: 0,
            record_gap_ms: 400,
        }
    }

    /// Lines between `RUN_START` and `RUN_END`
    pub const fn body_len(&self) -> usize {
        let signature_lines = if self.signature.is_some() { 3 } else { 0 };
        self.header.len() + signature_lines + self.heartbeats as usize
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self {
            payload: DEFAULT_PAYLOAD,
            magic: DEFAULT_TARGET_MAGIC,
        }
    }
}
