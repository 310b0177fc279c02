//! Emitter state machine
//!
//! ```text
//! BootAnnounce ──▶ Idle ──RUN_START──▶ RunActive ──RUN_END──▶ Idle ──▶ …
//!   (optional,                         header, signature,
//!    once)                             heartbeats
//! ```
//!
//! Every call to [`Emitter::advance`] yields exactly one line and the time
//! to hold before the next one. A record's start and end always carry the
//! same id and records never overlap.

use bootlink_protocol::{signature_crc, Info, RunId, TelemetryLine};

use super::profile::{HeaderLine, Profile, RunIdMode};

/// Emitter states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmitterState {
    /// One-shot announce before the first record
    BootAnnounce,
    /// Between records; the next line is `RUN_START`
    Idle,
    /// Inside a record
    RunActive,
}

/// One line to send and how long to hold afterwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Emission {
    pub line: TelemetryLine<'static>,
    pub hold_ms: u32,
}

impl Emission {
    const fn immediate(line: TelemetryLine<'static>) -> Self {
        Self { line, hold_ms: 0 }
    }
}

/// Walks a [`Profile`] forever, one line per step
#[derive(Debug, Clone)]
pub struct Emitter {
    profile: Profile,
    crc: Option<u32>,
    state: EmitterState,
    /// Index of the next body line while `RunActive`
    cursor: usize,
    cycle: u32,
}

impl Emitter {
    /// Create an emitter; the signature checksum is computed once here
    pub fn new(profile: Profile) -> Self {
        let crc = profile
            .signature
            .map(|sig| signature_crc(sig.payload, sig.magic));
        let state = if profile.boot_announce {
            EmitterState::BootAnnounce
        } else {
            EmitterState::Idle
        };
        Self {
            profile,
            crc,
            state,
            cursor: 0,
            cycle: 0,
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    /// Cycle number of the current (or next) record
    pub fn cycle(&self) -> u32 {
        self.cycle
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Checksum reported on the `CRC=` line, if the profile has a signature
    pub fn signature_crc(&self) -> Option<u32> {
        self.crc
    }

    fn run_id(&self) -> RunId {
        match self.profile.run_id {
            RunIdMode::Cycle(prefix) => RunId::Cycle {
                prefix,
                cycle: self.cycle,
            },
            RunIdMode::Fixed(id) => RunId::Fixed(id),
        }
    }

    /// Produce the next line
    pub fn advance(&mut self) -> Emission {
        match self.state {
            EmitterState::BootAnnounce => {
                self.state = EmitterState::Idle;
                Emission::immediate(TelemetryLine::Info(Info::Boot(self.profile.variant.name())))
            }
            EmitterState::Idle => {
                self.state = EmitterState::RunActive;
                self.cursor = 0;
                Emission::immediate(TelemetryLine::RunStart(self.run_id()))
            }
            EmitterState::RunActive => match self.body_line(self.cursor) {
                Some(emission) => {
                    self.cursor += 1;
                    emission
                }
                None => {
                    let line = TelemetryLine::RunEnd(self.run_id());
                    self.cycle = self.cycle.wrapping_add(1);
                    self.state = EmitterState::Idle;
                    Emission {
                        line,
                        hold_ms: self.profile.record_gap_ms,
                    }
                }
            },
        }
    }

    fn body_line(&self, index: usize) -> Option<Emission> {
        let profile = &self.profile;
        let mut index = index;

        if let Some(header) = profile.header.get(index) {
            let info = match *header {
                HeaderLine::Text(text) => Info::Text(text),
                HeaderLine::WithCycle(text) => Info::Cycle {
                    text,
                    cycle: self.cycle,
                },
            };
            return Some(Emission::immediate(TelemetryLine::Info(info)));
        }
        index -= profile.header.len();

        if let (Some(sig), Some(crc)) = (profile.signature, self.crc) {
            let line = match index {
                0 => Some(TelemetryLine::Info(Info::Payload(sig.payload))),
                1 => Some(TelemetryLine::Magic(sig.magic)),
                2 => Some(TelemetryLine::Crc(crc)),
                _ => None,
            };
            if let Some(line) = line {
                return Some(Emission::immediate(line));
            }
            index -= 3;
        }

        if index < profile.heartbeats as usize {
            return Some(Emission {
                line: TelemetryLine::Info(Info::Heartbeat {
                    index: index as u8,
                    cycle: self.cycle,
                }),
                hold_ms: profile.heartbeat_interval_ms,
            });
        }
        None
    }
}
