// Serial bridge to the motor/sensor microcontroller
//
// Line-oriented ASCII protocol, one message per line terminated by '\n':
//   host -> device: "R"              request reflectance
//                   "V"              request wheel speeds
//                   "W <left> <right>"  run wheels (deg/s)
//                   "B"              brake both wheels
//   device -> host: "S <left> <right>"  reflectance, 0..100
//                   "V <left> <right>"  wheel speeds (deg/s)

use serialport::{self, SerialPort};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::debug;

use super::driver::{
    DriveError, ReflectancePair, ReflectanceSensors, Result, WheelActuators, degps_to_radps,
    radps_to_degps,
};
use super::kinematics::WheelVelocityPair;

/// Default serial configuration for the bridge
pub const DEFAULT_BAUDRATE: u32 = 115_200;
pub const DEFAULT_TIMEOUT_MS: u64 = 50;

/// Longest line accepted from the device
const MAX_LINE: usize = 64;

/// Serial link carrying both sensing and actuation
pub struct SerialBridge {
    port: Box<dyn SerialPort>,
}

impl SerialBridge {
    /// Open a new connection to the bridge
    pub fn open(port_name: &str) -> Result<Self> {
        Self::open_with_baudrate(port_name, DEFAULT_BAUDRATE)
    }

    /// Open with custom baudrate
    pub fn open_with_baudrate(port_name: &str, baudrate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baudrate)
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .open()?;

        Ok(Self::from_port(port))
    }

    /// Wrap an already opened port (its timeout bounds every reply)
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        Self { port }
    }

    fn send_line(&mut self, line: &str) -> Result<()> {
        debug!("bridge <- {}", line);
        self.port.write_all(line.as_bytes())?;
        self.port.write_all(b"\n")?;
        self.port.flush()?;
        Ok(())
    }

    fn read_byte(&mut self, what: &'static str) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte).map_err(|e| {
            if e.kind() == std::io::ErrorKind::TimedOut {
                DriveError::Timeout { what }
            } else {
                DriveError::Io(e)
            }
        })?;
        Ok(byte[0])
    }

    fn read_line(&mut self, what: &'static str) -> Result<String> {
        let mut line = Vec::with_capacity(MAX_LINE);

        loop {
            match self.read_byte(what)? {
                b'\n' => break,
                b'\r' => {}
                b => {
                    if line.len() == MAX_LINE {
                        // Drop the rest so the next reply starts on a line boundary
                        while !matches!(self.read_byte(what), Ok(b'\n') | Err(_)) {}
                        return Err(DriveError::Malformed {
                            line: String::from_utf8_lossy(&line).into_owned(),
                            reason: format!("line longer than {} bytes", MAX_LINE),
                        });
                    }
                    line.push(b);
                }
            }
        }

        let line = String::from_utf8_lossy(&line).into_owned();
        debug!("bridge -> {}", line);
        Ok(line)
    }

    fn request_pair(&mut self, request: &str, tag: char, what: &'static str) -> Result<(f64, f64)> {
        // Discard late replies to earlier requests
        self.port.clear(serialport::ClearBuffer::Input)?;
        self.send_line(request)?;
        let line = self.read_line(what)?;
        parse_pair(&line, tag)
    }
}

impl ReflectanceSensors for SerialBridge {
    fn read_reflectance(&mut self) -> Result<ReflectancePair> {
        let (left, right) = self.request_pair("R", 'S', "reflectance")?;
        Ok(ReflectancePair::new(left, right))
    }
}

impl WheelActuators for SerialBridge {
    fn command_wheels(&mut self, wheels: WheelVelocityPair) -> Result<()> {
        let line = format_wheel_command(wheels);
        self.send_line(&line)
    }

    fn read_wheel_speeds(&mut self) -> Result<WheelVelocityPair> {
        let (left, right) = self.request_pair("V", 'V', "wheel speeds")?;
        Ok(WheelVelocityPair::new(left, right).map(degps_to_radps))
    }

    fn brake(&mut self) -> Result<()> {
        self.send_line("B")
    }
}

/// Format a wheel command (rad/s in, deg/s on the wire)
fn format_wheel_command(wheels: WheelVelocityPair) -> String {
    let degps = wheels.map(radps_to_degps);
    format!("W {:.2} {:.2}", degps.left, degps.right)
}

/// Parse "<tag> <left> <right>"
fn parse_pair(line: &str, tag: char) -> Result<(f64, f64)> {
    let malformed = |reason: String| DriveError::Malformed {
        line: line.to_string(),
        reason,
    };

    let mut fields = line.split_whitespace();
    match fields.next() {
        Some(t) if t.len() == tag.len_utf8() && t.starts_with(tag) => {}
        Some(t) => return Err(malformed(format!("expected tag '{}', got '{}'", tag, t))),
        None => return Err(malformed("empty line".to_string())),
    }

    let mut value = |name: &str| -> Result<f64> {
        let field = fields
            .next()
            .ok_or_else(|| malformed(format!("missing {} value", name)))?;
        field
            .parse::<f64>()
            .map_err(|e| malformed(format!("bad {} value '{}': {}", name, field, e)))
    };

    let left = value("left")?;
    let right = value("right")?;

    if fields.next().is_some() {
        return Err(malformed("trailing fields".to_string()));
    }
    Ok((left, right))
}
