//! Cooperative scheduler
//!
//! A [`Session`] owns every piece of the serial layer and runs it one
//! `step()` at a time: drain whatever input is available right now, then
//! emit exactly one telemetry line. The caller sleeps for the reported hold
//! time between steps, so input handling never waits on telemetry pacing
//! and telemetry never waits on input.

use bootlink_hal::{BootloaderEntry, UartRx, UartTx};
use bootlink_protocol::{Command, LineAccumulator, TelemetryLine, LINE_CAPACITY};
use embedded_hal::delay::DelayNs;

use crate::dispatcher::Dispatcher;
use crate::emitter::{Emitter, EmitterState, Profile};

/// Outcome of one [`Session::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepReport {
    /// Line emitted by this step
    pub line: TelemetryLine<'static>,
    /// Time to hold before the next step (ms)
    pub hold_ms: u32,
    /// Command acted on while draining input, if any
    pub command: Option<Command>,
    /// Complete input lines seen (commands or not)
    pub lines_received: u16,
    /// Receive faults reported by the UART
    pub rx_errors: u16,
    /// The telemetry line could not be rendered or written
    pub tx_failed: bool,
}

/// Result of draining the receiver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrainReport {
    pub command: Option<Command>,
    pub lines_received: u16,
    pub rx_errors: u16,
}

/// The serial layer of one firmware image
pub struct Session<Rx, Tx, L, D, const N: usize = LINE_CAPACITY> {
    rx: Rx,
    tx: Tx,
    delay: D,
    accumulator: LineAccumulator<N>,
    dispatcher: Dispatcher<L>,
    emitter: Emitter,
}

impl<Rx, Tx, L, D, const N: usize> Session<Rx, Tx, L, D, N>
where
    Rx: UartRx,
    Tx: UartTx,
    L: BootloaderEntry,
    D: DelayNs,
{
    pub fn new(rx: Rx, tx: Tx, loader: L, delay: D, profile: Profile) -> Self {
        Self {
            rx,
            tx,
            delay,
            accumulator: LineAccumulator::new(),
            dispatcher: Dispatcher::new(loader),
            emitter: Emitter::new(profile),
        }
    }

    /// Drain all input available now, dispatching completed lines
    ///
    /// Stops at the first "no data" poll or receive fault, or after a
    /// command has been acted on. Never waits for input.
    pub fn poll_commands(&mut self) -> DrainReport {
        let mut report = DrainReport::default();
        loop {
            let byte = match self.rx.read_byte() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_)) => {
                    // Retry on the next step rather than spin on a faulted UART
                    report.rx_errors = report.rx_errors.saturating_add(1);
                    break;
                }
            };
            let Some(line) = self.accumulator.accept(Some(byte)) else {
                continue;
            };
            report.lines_received = report.lines_received.saturating_add(1);
            if let Some(command) =
                self.dispatcher
                    .dispatch(line.as_bytes(), &mut self.tx, &mut self.delay)
            {
                report.command = Some(command);
                break;
            }
        }
        report
    }

    /// Run one scheduler iteration
    pub fn step(&mut self) -> StepReport {
        let drained = self.poll_commands();

        let emission = self.emitter.advance();
        let tx_failed = match emission.line.render() {
            Ok(text) => self.tx.write_blocking(text.as_bytes()).is_err(),
            Err(_) => true,
        };

        StepReport {
            line: emission.line,
            hold_ms: emission.hold_ms,
            command: drained.command,
            lines_received: drained.lines_received,
            rx_errors: drained.rx_errors,
            tx_failed,
        }
    }

    pub fn emitter_state(&self) -> EmitterState {
        self.emitter.state()
    }

    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    /// Partial-line overflows dropped so far
    pub fn overflow_count(&self) -> u32 {
        self.accumulator.overflow_count()
    }

    pub fn rx_mut(&mut self) -> &mut Rx {
        &mut self.rx
    }

    pub fn tx(&self) -> &Tx {
        &self.tx
    }

    pub fn loader(&self) -> &L {
        self.dispatcher.loader()
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::LOADER_SETTLE_MS;
    use crate::emitter::Signature;
    use crate::testing::{MockDelay, MockLoader, MockRx, MockTx};
    use bootlink_protocol::{RecordEvent, RecordTracker};
    use proptest::prelude::*;
    use std::vec::Vec;

    type TestSession = Session<MockRx, MockTx, MockLoader, MockDelay>;

    fn session(profile: Profile, input: &[u8]) -> TestSession {
        Session::new(
            MockRx::with_bytes(input),
            MockTx::default(),
            MockLoader::default(),
            MockDelay::default(),
            profile,
        )
    }

    fn signature_session(input: &[u8]) -> TestSession {
        session(Profile::signature_check(Signature::default()), input)
    }

    #[test]
    fn test_step_without_input_still_emits() {
        let mut s = signature_session(b"");
        for _ in 0..20 {
            let report = s.step();
            assert!(!report.tx_failed);
            assert_eq!(report.command, None);
        }
        assert_eq!(s.tx().lines().len(), 20);
        assert_eq!(s.tx().lines()[0], "RUN_START signature_0");
        assert_eq!(s.loader().entries, 0);
    }

    #[test]
    fn test_idle_input_poll_never_waits() {
        let mut s = signature_session(b"");
        for step in 1..=12 {
            s.step();
            // One "no data" poll per step, nothing slept inside the step
            assert_eq!(s.rx_mut().polls, step);
            assert_eq!(s.delay().total_ns, 0);
        }
    }

    #[test]
    fn test_only_dispatch_blocks() {
        let mut s = signature_session(b"HELLO\n");
        s.step();
        assert_eq!(s.delay().total_ms(), 0);
        // Six bytes plus the final "no data" poll
        assert_eq!(s.rx_mut().polls, 7);

        s.rx_mut().push_bytes(b"BOOTSEL\n");
        s.step();
        assert_eq!(s.delay().total_ms(), LOADER_SETTLE_MS);
    }

    #[test]
    fn test_bootsel_newline_triggers_once() {
        let mut s = signature_session(b"BOOTSEL\n");
        let report = s.step();
        assert_eq!(report.command, Some(Command::EnterBootsel));
        assert_eq!(report.lines_received, 1);
        assert_eq!(s.loader().entries, 1);
        // Acknowledgement goes out ahead of the step's telemetry line
        assert_eq!(s.tx().lines()[0], "INFO entering BOOTSEL");

        for _ in 0..10 {
            assert_eq!(s.step().command, None);
        }
        assert_eq!(s.loader().entries, 1);
    }

    #[test]
    fn test_enter_bootsel_crlf_triggers_once() {
        let mut s = signature_session(b"ENTER_BOOTSEL\r\n");
        let first = s.step();
        assert_eq!(first.command, Some(Command::EnterBootsel));
        // The trailing '\n' is still pending after the handoff returned
        let second = s.step();
        assert_eq!(second.command, None);
        assert_eq!(second.lines_received, 1);
        assert_eq!(s.loader().entries, 1);
    }

    #[test]
    fn test_near_miss_tokens_never_trigger() {
        let mut s = signature_session(b"BOOTSELX\nBOOTSE\nbootsel\r\n BOOTSEL\n");
        let report = s.step();
        assert_eq!(report.command, None);
        assert_eq!(report.lines_received, 5);
        assert_eq!(s.loader().entries, 0);
    }

    #[test]
    fn test_input_split_across_steps() {
        let mut s = signature_session(b"BOOT");
        assert_eq!(s.step().command, None);
        s.rx_mut().push_bytes(b"SEL\n");
        assert_eq!(s.step().command, Some(Command::EnterBootsel));
    }

    #[test]
    fn test_drain_stops_at_gap() {
        let mut s = signature_session(b"");
        s.rx_mut().push_bytes(b"X");
        s.rx_mut().push_gap();
        s.rx_mut().push_bytes(b"BOOTSEL\n");

        assert_eq!(s.step().command, None);
        assert_eq!(s.rx_mut().remaining(), 8);
        // "XBOOTSEL" is not a command
        assert_eq!(s.step().command, None);
        assert_eq!(s.loader().entries, 0);
    }

    #[test]
    fn test_rx_error_is_counted_and_deferred() {
        let mut s = signature_session(b"");
        s.rx_mut().push_error();
        s.rx_mut().push_bytes(b"BOOTSEL\n");

        let first = s.step();
        assert_eq!(first.rx_errors, 1);
        assert_eq!(first.command, None);
        assert_eq!(s.step().command, Some(Command::EnterBootsel));
    }

    #[test]
    fn test_overflow_then_token_on_fresh_line() {
        let mut input = Vec::new();
        input.extend_from_slice(&[b'#'; 100]);
        input.extend_from_slice(b"\nBOOTSEL\n");
        let mut s = signature_session(&input);
        assert_eq!(s.step().command, Some(Command::EnterBootsel));
        assert!(s.overflow_count() >= 1);
    }

    #[test]
    fn test_tx_failure_does_not_stall_emitter() {
        let mut s = Session::<_, _, _, _>::new(
            MockRx::default(),
            MockTx::failing(),
            MockLoader::default(),
            MockDelay::default(),
            Profile::uart_demo(),
        );
        let first = s.step();
        assert!(first.tx_failed);
        assert!(first.line.is_run_start());
        assert_eq!(s.emitter_state(), EmitterState::RunActive);
    }

    #[test]
    fn test_heartbeat_pacing() {
        let mut s = session(Profile::uart_demo(), b"");
        let holds: Vec<u32> = (0..8).map(|_| s.step().hold_ms).collect();
        assert_eq!(holds, [0, 0, 200, 200, 200, 200, 200, 300]);
    }

    proptest! {
        #[test]
        fn prop_noise_without_exact_token_never_triggers(
            noise in proptest::collection::vec(any::<u8>(), 0..600),
        ) {
            // Skip the rare stream that really does contain a command line
            let mut replay = LineAccumulator::<LINE_CAPACITY>::new();
            let genuine = noise
                .iter()
                .filter_map(|&b| replay.feed(b))
                .any(|line| Command::parse(line.as_bytes()).is_some());
            prop_assume!(!genuine);

            let mut s = signature_session(&noise);
            for _ in 0..4 {
                s.step();
            }
            prop_assert_eq!(s.loader().entries, 0);
        }

        #[test]
        fn prop_output_stays_well_formed_under_input(
            input in proptest::collection::vec(any::<u8>(), 0..300),
            steps in 1usize..60,
        ) {
            let mut s = session(Profile::framing_hunt(), &input);
            for _ in 0..steps {
                s.step();
            }
            let mut tracker = RecordTracker::new();
            for line in s.tx().lines() {
                let event = tracker.feed_line(&line);
                let bad = matches!(
                    event,
                    RecordEvent::Mismatched { .. } | RecordEvent::Started { abandoned: Some(_), .. }
                );
                prop_assert!(!bad, "bad line {}", line);
            }
        }
    }
}
