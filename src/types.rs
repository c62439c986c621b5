// src/types.rs

/// One decoded two-channel sample, the most recent reading from the wire.
///
/// Written by the device session's decode path, read once per sample-clock
/// tick. Last write wins; intermediate samples between ticks are overwritten.
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct Reading {
    pub sensor1: f64,
    pub sensor2: f64,
}

impl Reading {
    pub fn new(sensor1: f64, sensor2: f64) -> Self {
        Self { sensor1, sensor2 }
    }
}

/// A discovered serial device matching enumeration, before vendor filtering.
#[derive(PartialEq, Clone, Debug)]
pub struct DeviceCandidate {
    /// Platform port path, e.g. `/dev/ttyACM0` or `COM3`.
    pub id: String,
    /// USB vendor id as reported by the platform.
    pub vendor_id: u16,
    /// Human-readable label (USB product string when available).
    pub label: String,
}

/// Payload of one sample-clock tick: both current values and both running means.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct DisplayUpdate {
    pub sensor1: f64,
    pub sensor2: f64,
    pub mean1: f64,
    pub mean2: f64,
}

// Inbound events from whatever surface hosts the display.
#[derive(Clone, Debug)]
pub enum UserCommand {
    /// Pick a device by id and open it if it is available.
    Select(String),
    /// Force an immediate device poll, cancelling any pending scheduled one.
    Refresh,
    /// Zero the rendered series buffers; running means are unaffected.
    ResetSeries,
}
