use std::collections::VecDeque;
use std::io::{self, Read};

use crate::stream::DeviceError;
use crate::types::DeviceCandidate;

/// An open byte stream to a device.
///
/// Reads are expected to use short timeouts; `TimedOut`/`WouldBlock` mean
/// "no data right now", not failure.
pub trait DeviceLink: Read + Send {}

impl<T: Read + Send> DeviceLink for T {}

/// Something that can enumerate candidate devices and open a link to one.
pub trait DeviceProvider {
    fn list_devices(&mut self) -> Result<Vec<DeviceCandidate>, DeviceError>;
    fn open(&mut self, id: &str) -> Result<Box<dyn DeviceLink>, DeviceError>;
}

/// One scripted response for a `ScriptedLink` read call.
pub enum LinkStep {
    /// Deliver these bytes.
    Bytes(Vec<u8>),
    /// Report no data available this read.
    Silence,
    /// Fail the read with a hardware-style error.
    Fail,
}

/// In-memory link useful for tests and deterministic playback. Each read call
/// plays the next step; an exhausted script reads as permanent silence.
pub struct ScriptedLink {
    steps: VecDeque<LinkStep>,
}

impl ScriptedLink {
    pub fn new(steps: impl IntoIterator<Item = LinkStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Link that delivers one blob of bytes and then stays silent.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        Self::new([LinkStep::Bytes(bytes.to_vec())])
    }
}

impl Read for ScriptedLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.steps.pop_front() {
            Some(LinkStep::Bytes(bytes)) => {
                let n = bytes.len().min(buf.len());
                buf[..n].copy_from_slice(&bytes[..n]);
                if n < bytes.len() {
                    self.steps.push_front(LinkStep::Bytes(bytes[n..].to_vec()));
                }
                Ok(n)
            }
            Some(LinkStep::Silence) | None => {
                Err(io::Error::new(io::ErrorKind::TimedOut, "no data"))
            }
            Some(LinkStep::Fail) => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device disappeared",
            )),
        }
    }
}

/// Scripted provider: plays back a fixed sequence of enumeration results and
/// open outcomes, counting calls so tests can assert when polling and opening
/// actually happen.
#[derive(Default)]
pub struct ScriptedProvider {
    listings: VecDeque<Result<Vec<DeviceCandidate>, DeviceError>>,
    last_ok_listing: Vec<DeviceCandidate>,
    opens: VecDeque<Result<Box<dyn DeviceLink>, DeviceError>>,
    pub list_calls: usize,
    pub open_calls: usize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one enumeration result; once the queue runs dry the most recent
    /// successful listing repeats (an empty one until anything is queued).
    pub fn push_listing(&mut self, listing: Vec<DeviceCandidate>) {
        self.listings.push_back(Ok(listing));
    }

    pub fn push_listing_failure(&mut self, reason: &str) {
        self.listings
            .push_back(Err(DeviceError::Enumerate(reason.to_string())));
    }

    pub fn push_open(&mut self, link: ScriptedLink) {
        self.opens.push_back(Ok(Box::new(link)));
    }

    pub fn push_open_failure(&mut self, id: &str, reason: &str) {
        self.opens.push_back(Err(DeviceError::Open {
            id: id.to_string(),
            reason: reason.to_string(),
        }));
    }
}

impl DeviceProvider for ScriptedProvider {
    fn list_devices(&mut self) -> Result<Vec<DeviceCandidate>, DeviceError> {
        self.list_calls += 1;
        match self.listings.pop_front() {
            Some(Ok(listing)) => {
                self.last_ok_listing = listing.clone();
                Ok(listing)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last_ok_listing.clone()),
        }
    }

    fn open(&mut self, id: &str) -> Result<Box<dyn DeviceLink>, DeviceError> {
        self.open_calls += 1;
        self.opens.pop_front().unwrap_or_else(|| {
            Err(DeviceError::Open {
                id: id.to_string(),
                reason: "no scripted link".to_string(),
            })
        })
    }
}
