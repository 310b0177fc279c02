//! Bounded line assembly for inbound command bytes
//!
//! Bytes arrive one at a time from a zero-wait poll. They are collected in a
//! fixed-capacity buffer until `\r` or `\n` completes the line.
//!
//! Overflow policy: when a byte arrives and the buffer already holds
//! `N - 1` bytes, the whole partial line and that byte are dropped and
//! assembly restarts from empty. Nothing is reported. An over-long line can
//! therefore never match a command by its prefix, but a token sent right
//! after more than `N - 1` bytes of noise with no terminator in between is
//! lost along with the noise until the next terminator re-aligns the stream.

use core::mem;

use heapless::Vec;

use crate::command::Command;

/// Default line buffer capacity, including the byte kept free as margin
pub const LINE_CAPACITY: usize = 32;

/// A completed, terminator-stripped input line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Line<const N: usize = LINE_CAPACITY> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> Line<N> {
    /// Raw line content without the terminator
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Line content as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Assembles input bytes into [`Line`]s without allocating or blocking
#[derive(Debug, Clone)]
pub struct LineAccumulator<const N: usize = LINE_CAPACITY> {
    buffer: Vec<u8, N>,
    overflows: u32,
}

impl<const N: usize> Default for LineAccumulator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineAccumulator<N> {
    // The longest token plus one margin byte must fit
    const CAPACITY_CHECK: () = assert!(
        N > Command::LONGEST_TOKEN + 1,
        "line buffer too small for the longest command token"
    );

    /// Create an empty accumulator
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_CHECK;
        Self {
            buffer: Vec::new(),
            overflows: 0,
        }
    }

    /// Maximum number of bytes held before a terminator
    pub const fn max_len() -> usize {
        N - 1
    }

    /// Process the result of one input poll
    ///
    /// `None` means no byte was available; it returns immediately and leaves
    /// the buffer untouched. A terminator yields the buffered line (possibly
    /// empty) and resets the buffer.
    pub fn accept(&mut self, byte: Option<u8>) -> Option<Line<N>> {
        byte.and_then(|b| self.feed(b))
    }

    /// Process one received byte
    pub fn feed(&mut self, byte: u8) -> Option<Line<N>> {
        match byte {
            b'\r' | b'\n' => Some(Line {
                bytes: mem::take(&mut self.buffer),
            }),
            _ if self.buffer.len() < Self::max_len() => {
                // Cannot fail: length is below capacity
                let _ = self.buffer.push(byte);
                None
            }
            _ => {
                self.buffer.clear();
                self.overflows = self.overflows.wrapping_add(1);
                None
            }
        }
    }

    /// Bytes currently buffered
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of partial lines dropped because they overflowed
    pub fn overflow_count(&self) -> u32 {
        self.overflows
    }
}
