use crate::types::{DeviceCandidate, DisplayUpdate};

/// Presentation surface fed by the monitor.
///
/// Implementations render however they like; the monitor only promises the
/// call pattern: candidate lists or an unavailable placeholder as discovery
/// progresses, and exactly one display update per sample-clock tick.
pub trait DisplaySink {
    fn present_candidates(&mut self, candidates: &[DeviceCandidate]);
    fn present_unavailable(&mut self);
    fn on_display_update(&mut self, update: DisplayUpdate);
}

#[derive(PartialEq)]
enum DeviceLine {
    Unknown,
    Unavailable,
    Candidates(Vec<String>),
}

/// Stdout sink: one reading line per tick, device state lines only when the
/// state changes. Discovery re-polls once a second, so reprinting an
/// unchanged state would drown the readings.
pub struct ConsoleSink {
    last: DeviceLine,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            last: DeviceLine::Unknown,
        }
    }

    fn transition(&mut self, next: DeviceLine) -> bool {
        if self.last == next {
            false
        } else {
            self.last = next;
            true
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for ConsoleSink {
    fn present_candidates(&mut self, candidates: &[DeviceCandidate]) {
        let entries: Vec<String> = candidates
            .iter()
            .map(|c| format!("{} ({})", c.id, c.label))
            .collect();
        if self.transition(DeviceLine::Candidates(entries.clone())) {
            println!("devices: {}", entries.join(", "));
        }
    }

    fn present_unavailable(&mut self) {
        if self.transition(DeviceLine::Unavailable) {
            println!("no device found, waiting...");
        }
    }

    fn on_display_update(&mut self, update: DisplayUpdate) {
        println!("{}", format_update(&update));
    }
}

/// Three decimal places, matching what the device's voltage range warrants.
pub fn format_update(update: &DisplayUpdate) -> String {
    format!(
        "sensor1 {:.3} V (avg {:.3}) | sensor2 {:.3} V (avg {:.3})",
        update.sensor1, update.mean1, update.sensor2, update.mean2
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_lines_use_three_decimals() {
        let line = format_update(&DisplayUpdate {
            sensor1: 1.0,
            sensor2: 2.0,
            mean1: 1.5,
            mean2: 0.25,
        });
        assert_eq!(
            line,
            "sensor1 1.000 V (avg 1.500) | sensor2 2.000 V (avg 0.250)"
        );
    }

    #[test]
    fn device_state_lines_dedupe() {
        let mut sink = ConsoleSink::new();
        assert!(sink.transition(DeviceLine::Unavailable));
        assert!(!sink.transition(DeviceLine::Unavailable));
        assert!(sink.transition(DeviceLine::Candidates(vec!["COM3 (Uno)".into()])));
        assert!(!sink.transition(DeviceLine::Candidates(vec!["COM3 (Uno)".into()])));
        assert!(sink.transition(DeviceLine::Unavailable));
    }
}
