use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::warn;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::broker::Broker;
use crate::render;
use crate::Error;

/// Delay between refresh cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Consecutive failed refreshes tolerated before the monitor gives up.
pub const MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// Granularity at which the inter-cycle sleep checks the stop flag.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// ANSI clear screen and move cursor home.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Runs the dashboard loop: clear screen, fetch, render, sleep, repeat.
///
/// At most one fetch is in flight at any time. A transient fetch failure is
/// reported inline in the frame and retried on the next scheduled cycle; a
/// connection failure, or [MAX_CONSECUTIVE_FAILURES] transient failures in
/// a row, terminates the loop with the cause. Setting `stop` (the Ctrl-C
/// handler does) ends the loop cleanly.
pub fn run_monitor<B: Broker, W: Write>(broker: &mut B, out: &mut W, interval: Duration, stop: &AtomicBool) -> Result<(), Error> {
    let mut consecutive_failures: u32 = 0;

    while !stop.load(Ordering::Acquire) {
        let frame = match fetch_frame(broker) {
            Ok(frame) => {
                consecutive_failures = 0;
                frame
            }
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                consecutive_failures += 1;
                if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    return Err(Error::Connection(format!(
                        "giving up after {consecutive_failures} consecutive failed refreshes: {err}"
                    )));
                }
                warn!("refresh failed ({consecutive_failures}/{MAX_CONSECUTIVE_FAILURES}): {err}");
                format!("Refresh failed: {err}\nRetrying at next refresh...\n")
            }
        };

        write!(out, "{CLEAR_SCREEN}{frame}")?;
        writeln!(out, "\nUpdated at {}  -  Ctrl-C to exit", timestamp())?;
        out.flush()?;

        sleep_until_next_cycle(interval, stop);
    }

    Ok(())
}

fn fetch_frame<B: Broker>(broker: &mut B) -> Result<String, Error> {
    let snapshot = broker.fetch_account()?;
    let positions = broker.fetch_positions()?;
    let orders = broker.fetch_orders()?;

    let mut frame = render::render_account(&snapshot);
    frame.push('\n');
    frame.push_str(&render::render_positions(&positions));
    frame.push('\n');
    frame.push_str(&render::render_orders(&orders));
    Ok(frame)
}

/// Sleeps for `interval` in short slices so a stop request interrupts the
/// wait instead of delaying shutdown by a full cycle.
fn sleep_until_next_cycle(interval: Duration, stop: &AtomicBool) {
    let deadline = Instant::now() + interval;
    loop {
        if stop.load(Ordering::Acquire) {
            return;
        }
        let Some(remaining) = deadline.checked_duration_since(Instant::now()) else {
            return;
        };
        if remaining.is_zero() {
            return;
        }
        std::thread::sleep(remaining.min(STOP_POLL_INTERVAL));
    }
}

fn timestamp() -> String {
    let format = format_description!("[hour]:[minute]:[second]");
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .format(&format)
        .unwrap_or_default()
}
