//! Serial session task
//!
//! Drives the cooperative scheduler: one `step()`, then sleep for the hold
//! the step asked for. Input is only ever drained between lines.

use defmt::*;
use embassy_time::{Delay, Timer};

use bootlink_core::{Session, StepReport};
use bootlink_hal_rp2040::{BufferedRx, BufferedTx, RomBootloader};

use crate::config::BOOT_DELAY_MS;

pub type FirmwareSession = Session<BufferedRx, BufferedTx, RomBootloader, Delay>;

#[embassy_executor::task]
pub async fn telemetry_task(mut session: FirmwareSession) {
    // Give the host time to enumerate and open the port
    info!("Waiting {} ms before first record", BOOT_DELAY_MS);
    Timer::after_millis(BOOT_DELAY_MS).await;

    info!("Telemetry started: {}", session.emitter().profile().variant);
    if let Some(crc) = session.emitter().signature_crc() {
        info!("Signature CRC: {:#x}", crc);
    }

    let mut overflows = session.overflow_count();

    loop {
        let report = session.step();
        log_report(&report);

        let seen = session.overflow_count();
        if seen != overflows {
            warn!("Dropped {} overlong input line(s)", seen.wrapping_sub(overflows));
            overflows = seen;
        }

        if report.hold_ms > 0 {
            Timer::after_millis(u64::from(report.hold_ms)).await;
        }
    }
}

fn log_report(report: &StepReport) {
    if let Some(command) = report.command {
        // Only reachable if the loader handoff returned
        error!("{} dispatched but still running", command);
    }
    if report.rx_errors > 0 {
        warn!("UART receive errors: {}", report.rx_errors);
    }
    if report.tx_failed {
        warn!("Telemetry line dropped: {}", report.line);
    } else if report.line.is_run_end() {
        debug!("Record complete: {}", report.line);
    } else {
        trace!("TX: {}", report.line);
    }
}
