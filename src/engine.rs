// src/engine.rs
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::display::DisplaySink;
use crate::monitor::{Monitor, MonitorConfig};
use crate::stream::DeviceProvider;
use crate::types::UserCommand;

/// Pause between loop iterations; short enough that the one-second deadlines
/// land close to schedule, long enough to stay off the CPU.
const LOOP_PAUSE: Duration = Duration::from_millis(10);
/// Commands drained per iteration before data gets a turn.
const MAX_COMMANDS_PER_ITERATION: usize = 10;

/// Runs the monitor on a background thread until the command channel
/// disconnects (every sender dropped).
pub fn spawn_thread<P, S>(
    provider: P,
    sink: S,
    rx_cmd: Receiver<UserCommand>,
) -> thread::JoinHandle<()>
where
    P: DeviceProvider + Send + 'static,
    S: DisplaySink + Send + 'static,
{
    thread::spawn(move || run_loop(provider, sink, rx_cmd))
}

fn run_loop<P: DeviceProvider, S: DisplaySink>(
    provider: P,
    sink: S,
    rx_cmd: Receiver<UserCommand>,
) {
    let mut monitor = Monitor::new(provider, sink, MonitorConfig::default(), Instant::now());
    loop {
        for _ in 0..MAX_COMMANDS_PER_ITERATION {
            match rx_cmd.try_recv() {
                Ok(command) => monitor.handle(command, Instant::now()),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return,
            }
        }
        monitor.step(Instant::now());
        thread::sleep(LOOP_PAUSE);
    }
}
