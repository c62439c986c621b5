use std::io;

use crate::stream::{DeviceError, DeviceLink, DeviceProvider, LineCodec};
use crate::types::Reading;

/// Upper bound on reads per drain call, keeping one engine step bounded even
/// if the device floods. One pass moves up to 2 KiB, over two seconds of
/// traffic at 9600 baud.
const MAX_READS_PER_DRAIN: usize = 8;

/// One open device connection plus its decoder pipeline.
///
/// At most one session exists process-wide; the monitor enforces that by
/// closing any current session before opening another. Dropping the session
/// releases the underlying port.
pub struct DeviceSession {
    device_id: String,
    link: Box<dyn DeviceLink>,
    codec: LineCodec,
}

impl DeviceSession {
    /// Opens a link to `id` through the provider at the fixed line rate.
    pub fn open(provider: &mut dyn DeviceProvider, id: &str) -> Result<Self, DeviceError> {
        let link = provider.open(id)?;
        Ok(Self {
            device_id: id.to_string(),
            link,
            codec: LineCodec::new(),
        })
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Reads whatever bytes are available right now and returns the records
    /// they completed, in arrival order.
    ///
    /// Timeout kinds mean "no data" and end the drain; any other I/O error is
    /// a hardware fault that invalidates the session.
    pub fn drain(&mut self) -> Result<Vec<Reading>, DeviceError> {
        let mut decoded = Vec::new();
        let mut buf = [0u8; 256];
        for _ in 0..MAX_READS_PER_DRAIN {
            match self.link.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => decoded.extend(self.codec.feed(&buf[..n])),
                Err(e) if is_no_data(&e) => break,
                Err(e) => return Err(DeviceError::Hardware(e.to_string())),
            }
        }
        Ok(decoded)
    }
}

fn is_no_data(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{LinkStep, ScriptedLink, ScriptedProvider};

    fn provider_with(link: ScriptedLink) -> ScriptedProvider {
        let mut provider = ScriptedProvider::new();
        provider.push_open(link);
        provider
    }

    #[test]
    fn drains_decoded_records_in_order() {
        let mut provider = provider_with(ScriptedLink::new([
            LinkStep::Bytes(b"1.0,2.0\r\n3.0".to_vec()),
            LinkStep::Bytes(b",4.0\r\n".to_vec()),
        ]));
        let mut session = DeviceSession::open(&mut provider, "/dev/ttyACM0").unwrap();
        let readings = session.drain().unwrap();
        assert_eq!(
            readings,
            vec![Reading::new(1.0, 2.0), Reading::new(3.0, 4.0)]
        );
        assert_eq!(session.device_id(), "/dev/ttyACM0");
    }

    #[test]
    fn silence_is_not_an_error() {
        let mut provider = provider_with(ScriptedLink::new([]));
        let mut session = DeviceSession::open(&mut provider, "COM3").unwrap();
        assert!(session.drain().unwrap().is_empty());
    }

    #[test]
    fn read_failure_surfaces_as_hardware_error() {
        let mut provider = provider_with(ScriptedLink::new([LinkStep::Fail]));
        let mut session = DeviceSession::open(&mut provider, "COM3").unwrap();
        assert!(matches!(session.drain(), Err(DeviceError::Hardware(_))));
    }

    #[test]
    fn open_failure_propagates() {
        let mut provider = ScriptedProvider::new();
        provider.push_open_failure("COM9", "busy");
        assert!(matches!(
            DeviceSession::open(&mut provider, "COM9"),
            Err(DeviceError::Open { .. })
        ));
    }
}
