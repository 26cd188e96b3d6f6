// src/io/serial/ports.rs
//
// Serial port enumeration and auto-selection of the port a node is likely on.

use serde::Serialize;

use crate::error::{NodeSyncError, Result};

/// USB vendors shipping mesh-radio boards (Adafruit/RAK nRF52, Espressif).
const LIKELY_NODE_VIDS: &[u16] = &[0x239a, 0x303a];

/// Debug adapters and programmers that expose a serial port but are never a
/// node (SEGGER J-Link, ST-Link, Nordic, Lakeview, Cypress).
const NON_NODE_VIDS: &[u16] = &[0x1366, 0x0483, 0x1915, 0x0925, 0x04b4];

/// Information about an available serial port
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PortInfo {
    pub port_name: String,
    pub port_type: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
}

impl PortInfo {
    fn without_usb_ids(port_name: String, port_type: &str) -> Self {
        PortInfo {
            port_name,
            port_type: port_type.to_string(),
            manufacturer: None,
            product: None,
            serial_number: None,
            vid: None,
            pid: None,
        }
    }
}

impl From<serialport::SerialPortInfo> for PortInfo {
    fn from(p: serialport::SerialPortInfo) -> Self {
        use serialport::SerialPortType;

        match p.port_type {
            SerialPortType::UsbPort(usb) => PortInfo {
                vid: Some(usb.vid),
                pid: Some(usb.pid),
                manufacturer: usb.manufacturer,
                product: usb.product,
                serial_number: usb.serial_number,
                ..PortInfo::without_usb_ids(p.port_name, "USB")
            },
            SerialPortType::BluetoothPort => PortInfo::without_usb_ids(p.port_name, "Bluetooth"),
            SerialPortType::PciPort => PortInfo::without_usb_ids(p.port_name, "PCI"),
            SerialPortType::Unknown => PortInfo::without_usb_ids(p.port_name, "Unknown"),
        }
    }
}

/// macOS lists every device twice. `/dev/tty.*` blocks on open waiting for
/// carrier detect, so only the `/dev/cu.*` twin is offered.
fn is_blocking_twin(port_name: &str) -> bool {
    cfg!(target_os = "macos") && port_name.starts_with("/dev/tty.")
}

/// List available serial ports.
pub fn list_ports() -> Result<Vec<PortInfo>> {
    let ports = serialport::available_ports()
        .map_err(|e| NodeSyncError::PortEnumeration(e.to_string()))?;

    Ok(ports
        .into_iter()
        .filter(|p| !is_blocking_twin(&p.port_name))
        .map(PortInfo::from)
        .collect())
}

/// Ports a node is plausibly attached to, sorted.
///
/// Ports from known node vendors win. If there are none, any USB port that
/// is not a known debug adapter qualifies. Ports without a USB vid never do.
pub fn select_candidates(ports: &[PortInfo]) -> Vec<String> {
    let mut names = names_where(ports, |vid| LIKELY_NODE_VIDS.contains(&vid));
    if names.is_empty() {
        names = names_where(ports, |vid| !NON_NODE_VIDS.contains(&vid));
    }

    names.sort();
    names.dedup();
    eliminate_duplicate_port(names)
}

fn names_where(ports: &[PortInfo], pred: impl Fn(u16) -> bool) -> Vec<String> {
    ports
        .iter()
        .filter(|p| p.vid.is_some_and(&pred))
        .map(|p| p.port_name.clone())
        .collect()
}

/// Some USB-UART bridges (WCH CH9102) enumerate twice on macOS, once through
/// the vendor driver (`wchusbserial`) and once through the generic one.
/// Keep the vendor driver's port.
fn eliminate_duplicate_port(names: Vec<String>) -> Vec<String> {
    if names.len() != 2 {
        return names;
    }
    let wch = names.iter().position(|n| n.contains("wchusbserial"));
    let generic = names
        .iter()
        .position(|n| !n.contains("wchusbserial") && (n.contains("usbserial") || n.contains("usbmodem")));
    match (wch, generic) {
        (Some(keep), Some(_)) => vec![names[keep].clone()],
        _ => names,
    }
}

/// The single port to open when none was requested. No candidate, or more
/// than one, means no connection can be made.
pub fn pick_port(candidates: Vec<String>) -> Result<String> {
    let mut candidates = candidates;
    match candidates.len() {
        0 => Err(NodeSyncError::unavailable(
            None,
            "no serial node detected, connect a device or pass a port explicitly",
        )),
        1 => Ok(candidates.remove(0)),
        _ => Err(NodeSyncError::unavailable(
            None,
            format!(
                "multiple serial ports detected ({}), one must be specified",
                candidates.join(", ")
            ),
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
