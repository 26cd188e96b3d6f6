// src/io/serial/utils.rs
//
// Line settings for serial node connections and their mapping onto the
// serialport crate's types.

use serde::{Deserialize, Serialize};
use serialport::{DataBits, Parity as SpParity, StopBits};
use std::time::Duration;

// ============================================================================
// Types
// ============================================================================

/// Parity setting for the serial line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
}

/// Serial line configuration. Defaults match what mesh-radio firmware
/// expects on its USB serial console: 115200 8N1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialLineConfig {
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,
    #[serde(default)]
    pub parity: Parity,
    /// Read/write timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_baud_rate() -> u32 {
    115_200
}
fn default_data_bits() -> u8 {
    8
}
fn default_stop_bits() -> u8 {
    1
}
fn default_timeout_ms() -> u64 {
    1000
}

impl Default for SerialLineConfig {
    fn default() -> Self {
        Self {
            baud_rate: default_baud_rate(),
            data_bits: default_data_bits(),
            stop_bits: default_stop_bits(),
            parity: Parity::default(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl SerialLineConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Builder for `port` with these line settings applied. Data bit counts
    /// other than 5-7 mean 8, stop bit counts other than 2 mean 1.
    pub fn builder(&self, port: &str) -> serialport::SerialPortBuilder {
        let data_bits = match self.data_bits {
            5 => DataBits::Five,
            6 => DataBits::Six,
            7 => DataBits::Seven,
            _ => DataBits::Eight,
        };
        let stop_bits = if self.stop_bits == 2 {
            StopBits::Two
        } else {
            StopBits::One
        };

        serialport::new(port, self.baud_rate)
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .parity(self.parity.into())
            .timeout(self.timeout())
    }
}

impl From<Parity> for SpParity {
    fn from(p: Parity) -> Self {
        match p {
            Parity::None => SpParity::None,
            Parity::Odd => SpParity::Odd,
            Parity::Even => SpParity::Even,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_defaults_are_115200_8n1() {
        let line = SerialLineConfig::default();
        assert_eq!(line.baud_rate, 115_200);
        assert_eq!(line.data_bits, 8);
        assert_eq!(line.stop_bits, 1);
        assert_eq!(line.parity, Parity::None);
        assert_eq!(line.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_line_config_fills_defaults() {
        let line: SerialLineConfig =
            serde_json::from_str(r#"{ "baud_rate": 921600, "parity": "even" }"#).unwrap();
        assert_eq!(line.baud_rate, 921_600);
        assert_eq!(line.parity, Parity::Even);
        assert_eq!(line.data_bits, 8);
        assert_eq!(line.timeout_ms, 1000);
    }

    #[test]
    fn test_parity_into_serialport() {
        assert!(matches!(SpParity::from(Parity::None), SpParity::None));
        assert!(matches!(SpParity::from(Parity::Odd), SpParity::Odd));
        assert!(matches!(SpParity::from(Parity::Even), SpParity::Even));
    }

}
