// src/stream/mod.rs
pub mod codec;
pub mod error;
pub mod series;
pub mod source;
pub mod stats;

pub use codec::{parse_record, LineCodec};
pub use error::DeviceError;
pub use series::DisplaySeries;
pub use source::{DeviceLink, DeviceProvider, LinkStep, ScriptedLink, ScriptedProvider};
pub use stats::RollingMean;
