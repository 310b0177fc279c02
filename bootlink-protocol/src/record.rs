//! Host-side record tracking
//!
//! Consumes telemetry lines the way the harness does and reports how each
//! one fits into the record structure. The tracker holds no history beyond
//! the record currently open, so it can be attached at any point in the
//! stream: lines seen before the first `RUN_START` are reported as
//! [`RecordEvent::Unsynchronized`] and the next `RUN_START` synchronizes it.

use heapless::String;

use crate::telemetry::{CRC, INFO, MAGIC, RUN_END, RUN_START};

/// Longest record id the tracker can hold
pub const MAX_RECORD_ID_LEN: usize = 32;

/// Owned record identifier as seen on the wire
pub type RecordId = String<MAX_RECORD_ID_LEN>;

/// A line that belongs inside a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BodyLine {
    Info,
    Magic(u32),
    Crc(u32),
}

/// Everything learned about one closed record
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecordSummary {
    pub id: RecordId,
    /// Lines between the markers
    pub body_lines: u16,
    pub magic: Option<u32>,
    pub crc: Option<u32>,
}

/// Classification of one received line
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordEvent {
    /// A record opened; `abandoned` names a record left open without `RUN_END`
    Started {
        id: RecordId,
        abandoned: Option<RecordId>,
    },
    /// A body line inside the open record
    Body(BodyLine),
    /// `RUN_END` matching the open record
    Completed(RecordSummary),
    /// `RUN_END` whose id differs from the open record; the open record is dropped
    Mismatched { open: RecordId, closed: RecordId },
    /// A record line seen while no record is open
    Unsynchronized,
    /// Not a protocol line, or a malformed one
    Ignored,
}

#[derive(Debug, Clone)]
struct OpenRecord {
    id: RecordId,
    body_lines: u16,
    magic: Option<u32>,
    crc: Option<u32>,
}

/// Self-synchronizing record tracker
#[derive(Debug, Clone, Default)]
pub struct RecordTracker {
    open: Option<OpenRecord>,
    completed: u32,
}

impl RecordTracker {
    pub const fn new() -> Self {
        Self {
            open: None,
            completed: 0,
        }
    }

    /// Id of the record currently open, if synchronized
    pub fn open_id(&self) -> Option<&str> {
        self.open.as_ref().map(|r| r.id.as_str())
    }

    /// Number of records completed so far
    pub fn completed(&self) -> u32 {
        self.completed
    }

    /// Classify one line
    ///
    /// Trailing `\r` / `\n` are ignored.
    pub fn feed_line(&mut self, line: &str) -> RecordEvent {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(id) = marker_id(line, RUN_START) {
            let Some(id) = record_id(id) else {
                return RecordEvent::Ignored;
            };
            let abandoned = self.open.take().map(|r| r.id);
            self.open = Some(OpenRecord {
                id: id.clone(),
                body_lines: 0,
                magic: None,
                crc: None,
            });
            return RecordEvent::Started { id, abandoned };
        }

        if let Some(id) = marker_id(line, RUN_END) {
            let Some(closed) = record_id(id) else {
                return RecordEvent::Ignored;
            };
            return match self.open.take() {
                None => RecordEvent::Unsynchronized,
                Some(open) if open.id != closed => RecordEvent::Mismatched {
                    open: open.id,
                    closed,
                },
                Some(open) => {
                    self.completed = self.completed.wrapping_add(1);
                    RecordEvent::Completed(RecordSummary {
                        id: open.id,
                        body_lines: open.body_lines,
                        magic: open.magic,
                        crc: open.crc,
                    })
                }
            };
        }

        let Some(body) = body_line(line) else {
            return RecordEvent::Ignored;
        };
        match self.open.as_mut() {
            None => RecordEvent::Unsynchronized,
            Some(open) => {
                open.body_lines = open.body_lines.saturating_add(1);
                match body {
                    BodyLine::Magic(value) => open.magic = Some(value),
                    BodyLine::Crc(value) => open.crc = Some(value),
                    BodyLine::Info => {}
                }
                RecordEvent::Body(body)
            }
        }
    }
}

/// `"<marker> <id>"` -> `<id>`
fn marker_id<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.strip_prefix(marker)?.strip_prefix(' ')
}

fn record_id(id: &str) -> Option<RecordId> {
    if id.is_empty() || id.contains(char::is_whitespace) {
        return None;
    }
    let mut out = RecordId::new();
    out.push_str(id).ok()?;
    Some(out)
}

fn body_line(line: &str) -> Option<BodyLine> {
    if line == INFO || marker_id(line, INFO).is_some() {
        return Some(BodyLine::Info);
    }
    if let Some(value) = hex_value(line, MAGIC) {
        return Some(BodyLine::Magic(value));
    }
    hex_value(line, CRC).map(BodyLine::Crc)
}

/// `"<key>=0x<hex>"` -> value
fn hex_value(line: &str, key: &str) -> Option<u32> {
    let digits = line.strip_prefix(key)?.strip_prefix("=0x")?;
    if digits.is_empty() || digits.len() > 8 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}
