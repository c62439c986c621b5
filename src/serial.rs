use std::time::Duration;

use serialport::SerialPortType;

use crate::stream::{DeviceError, DeviceLink, DeviceProvider};
use crate::types::DeviceCandidate;

/// Line rate the firmware prints at. Framing is 8N1, the serialport default.
const BAUD_RATE: u32 = 9_600;
/// Short read timeout so a drain pass never stalls the engine loop.
const READ_TIMEOUT: Duration = Duration::from_millis(5);

/// `serialport`-backed provider enumerating real USB serial devices.
#[derive(Default)]
pub struct SerialProvider;

impl SerialProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DeviceProvider for SerialProvider {
    fn list_devices(&mut self) -> Result<Vec<DeviceCandidate>, DeviceError> {
        let ports = serialport::available_ports()
            .map_err(|e| DeviceError::Enumerate(e.to_string()))?;
        let candidates = ports
            .into_iter()
            .filter_map(|info| match info.port_type {
                SerialPortType::UsbPort(usb) => Some(DeviceCandidate {
                    label: usb.product.unwrap_or_else(|| info.port_name.clone()),
                    id: info.port_name,
                    vendor_id: usb.vid,
                }),
                // Anything without a USB vendor id can never match the filter.
                _ => None,
            })
            .collect();
        Ok(candidates)
    }

    fn open(&mut self, id: &str) -> Result<Box<dyn DeviceLink>, DeviceError> {
        let port = serialport::new(id, BAUD_RATE)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| DeviceError::Open {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Box::new(port))
    }
}
