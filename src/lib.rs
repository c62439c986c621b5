//! Continuous monitor for a two-channel USB serial sensor: device discovery
//! and reconnection, line-protocol decoding, rolling-window statistics, and a
//! fixed-period display feed.

pub mod display;
pub mod engine;
pub mod monitor;
pub mod serial;
pub mod session;
pub mod stream;
pub mod types;

pub use display::{ConsoleSink, DisplaySink};
pub use monitor::{Monitor, MonitorConfig};
pub use serial::SerialProvider;
pub use session::DeviceSession;
pub use types::{DeviceCandidate, DisplayUpdate, Reading, UserCommand};
