//! Serial transport implementation

use std::io::{BufRead, BufReader, ErrorKind};
use std::time::Duration;

use contracts::{ContractError, LineSource, TransportConfig, UsbDeviceId};
use serialport::{DataBits, FlowControl, Parity, SerialPort, SerialPortType, StopBits};
use tracing::{debug, info, warn};

use super::strip_terminator;

/// Line-oriented reader over a serial port
pub struct SerialLineSource {
    path: String,
    reader: BufReader<Box<dyn SerialPort>>,
    buffer: Vec<u8>,
    connected: bool,
}

impl SerialLineSource {
    /// Open a serial port
    ///
    /// # Arguments
    /// * `path` - Serial port path (e.g., "/dev/ttyACM0")
    /// * `baud_rate` - Baud rate (e.g., 115200)
    /// * `read_timeout` - Poll interval; the line read keeps blocking across timeouts
    pub fn open(path: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self, ContractError> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(read_timeout)
            .open()
            .map_err(|e| {
                ContractError::transport_unavailable(format!("could not open {path}: {e}"))
            })?;

        info!(port = %path, baud_rate, "Opened serial port");

        Ok(Self {
            path: path.to_string(),
            reader: BufReader::new(port),
            buffer: Vec::with_capacity(64),
            connected: true,
        })
    }

    fn take_line(&mut self) -> String {
        let line = strip_terminator(&String::from_utf8_lossy(&self.buffer)).to_string();
        self.buffer.clear();
        line
    }
}

impl LineSource for SerialLineSource {
    fn name(&self) -> &str {
        &self.path
    }

    fn read_line(&mut self) -> Result<Option<String>, ContractError> {
        if !self.connected {
            return Ok(None);
        }

        loop {
            // read_until keeps already-read bytes in the buffer when it fails
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => {
                    self.connected = false;
                    if self.buffer.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(self.take_line()));
                }
                Ok(_) if self.buffer.ends_with(b"\n") => return Ok(Some(self.take_line())),
                Ok(_) => continue,
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {
                    continue
                }
                Err(e) => {
                    warn!(port = %self.path, error = %e, "Serial read failed, link lost");
                    self.connected = false;
                    return Err(e.into());
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// A serial port seen during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub port_name: String,
    pub usb: Option<UsbDeviceId>,
    pub product: Option<String>,
    /// USB id is in the configured `known_devices`
    pub recognized: bool,
}

/// Enumerate serial ports and flag the recognized controller boards.
pub fn list_ports(known: &[UsbDeviceId]) -> Result<Vec<PortCandidate>, ContractError> {
    let ports = serialport::available_ports().map_err(|e| {
        ContractError::transport_unavailable(format!("failed to enumerate serial ports: {e}"))
    })?;

    Ok(ports
        .into_iter()
        .map(|info| {
            let (usb, product) = match info.port_type {
                SerialPortType::UsbPort(usb) => {
                    (Some(UsbDeviceId::new(usb.vid, usb.pid)), usb.product)
                }
                _ => (None, None),
            };
            PortCandidate {
                recognized: usb.is_some_and(|id| known.contains(&id)),
                port_name: info.port_name,
                usb,
                product,
            }
        })
        .collect())
}

/// Open the configured port, or the first recognized board when none is set.
///
/// # Errors
/// `TransportUnavailable` when no port is configured and no recognized board
/// is attached, or every candidate fails to open.
pub fn open_transport(config: &TransportConfig) -> Result<SerialLineSource, ContractError> {
    let timeout = Duration::from_millis(config.read_timeout_ms);

    if let Some(path) = &config.port {
        return SerialLineSource::open(path, config.baud_rate, timeout);
    }

    let candidates = list_ports(&config.known_devices)?;
    debug!(ports = candidates.len(), "Enumerated serial ports");

    let mut last_error = None;
    for candidate in candidates.iter().filter(|c| c.recognized) {
        match SerialLineSource::open(&candidate.port_name, config.baud_rate, timeout) {
            Ok(source) => return Ok(source),
            Err(e) => {
                warn!(port = %candidate.port_name, error = %e, "Could not connect to device");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ContractError::transport_unavailable("no recognized controller board attached")
    }))
}
