//! Test doubles for the platform traits

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use bootlink_hal::{BootloaderEntry, UartRx, UartTx};
use embedded_hal::delay::DelayNs;

/// Shared record of calls across several doubles, to check ordering
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<&'static str>>>);

impl Journal {
    pub fn record(&self, entry: &'static str) {
        self.0.borrow_mut().push(entry);
    }

    pub fn entries(&self) -> Vec<&'static str> {
        self.0.borrow().clone()
    }
}

fn note(journal: &Option<Journal>, entry: &'static str) {
    if let Some(journal) = journal {
        journal.record(entry);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockUartError;

/// Scripted receiver: each poll pops one scripted result, then `WouldBlock`
#[derive(Debug, Default)]
pub struct MockRx {
    script: VecDeque<nb::Result<u8, MockUartError>>,
    pub polls: usize,
}

impl MockRx {
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mut rx = Self::default();
        rx.push_bytes(bytes);
        rx
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.script.extend(bytes.iter().map(|&b| Ok(b)));
    }

    /// Insert a "no data now" gap in the script
    pub fn push_gap(&mut self) {
        self.script.push_back(Err(nb::Error::WouldBlock));
    }

    pub fn push_error(&mut self) {
        self.script.push_back(Err(nb::Error::Other(MockUartError)));
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl UartRx for MockRx {
    type Error = MockUartError;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.polls += 1;
        self.script.pop_front().unwrap_or(Err(nb::Error::WouldBlock))
    }
}

/// Capturing transmitter
#[derive(Debug, Default)]
pub struct MockTx {
    pub bytes: Vec<u8>,
    pub flushes: usize,
    fail: bool,
    journal: Option<Journal>,
}

impl MockTx {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn with_journal(journal: &Journal) -> Self {
        Self {
            journal: Some(journal.clone()),
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.bytes.clone()).unwrap()
    }

    pub fn lines(&self) -> Vec<String> {
        self.text().lines().map(String::from).collect()
    }
}

impl UartTx for MockTx {
    type Error = MockUartError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        note(&self.journal, "write");
        if self.fail {
            return Err(MockUartError);
        }
        self.bytes.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        note(&self.journal, "flush");
        self.flushes += 1;
        if self.fail {
            return Err(MockUartError);
        }
        Ok(())
    }
}

/// Delay that only accumulates the requested time
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
    journal: Option<Journal>,
}

impl MockDelay {
    pub fn with_journal(journal: &Journal) -> Self {
        Self {
            journal: Some(journal.clone()),
            ..Self::default()
        }
    }

    pub fn total_ms(&self) -> u32 {
        (self.total_ns / 1_000_000) as u32
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        note(&self.journal, "delay");
        self.total_ns += ns as u64;
    }

    fn delay_ms(&mut self, ms: u32) {
        note(&self.journal, "delay");
        self.total_ns += ms as u64 * 1_000_000;
    }
}

/// Loader double that counts handoffs and returns
#[derive(Debug, Default)]
pub struct MockLoader {
    pub entries: usize,
    journal: Option<Journal>,
}

impl MockLoader {
    pub fn with_journal(journal: &Journal) -> Self {
        Self {
            entries: 0,
            journal: Some(journal.clone()),
        }
    }
}

impl BootloaderEntry for MockLoader {
    fn enter_bootloader(&mut self) {
        note(&self.journal, "enter");
        self.entries += 1;
    }
}
