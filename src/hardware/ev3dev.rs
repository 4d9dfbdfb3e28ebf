//! ev3dev sysfs backend: tacho motors and the EV3 color sensor.

use crate::config::config;
use crate::hardware::hardware::{ColorReading, ColorSensor, DriveMotors, Hardware, HardwareError, MotorId};

use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const TACHO_MOTOR_CLASS: &str = "tacho-motor";
const LEGO_SENSOR_CLASS: &str = "lego-sensor";
const COLOR_MODE: &str = "COL-COLOR";

fn write_attribute(device: &Path, attribute: &str, value: &str) -> io::Result<()> {
    fs::write(device.join(attribute), value)
}

fn read_attribute(device: &Path, attribute: &str) -> io::Result<String> {
    Ok(fs::read_to_string(device.join(attribute))?.trim().to_string())
}

/// Finds the device directory of `class` whose `address` attribute equals `port`.
pub fn find_device(sysfs_root: &Path, class: &str, port: &str) -> io::Result<Option<PathBuf>> {
    let class_dir = sysfs_root.join(class);
    if !class_dir.is_dir() {
        return Ok(None);
    }
    for entry in fs::read_dir(class_dir)? {
        let device = entry?.path();
        match read_attribute(&device, "address") {
            Ok(address) if address == port => return Ok(Some(device)),
            Ok(_) => {}
            Err(e) => debug!("Skipping {}: {}", device.display(), e),
        }
    }
    Ok(None)
}

pub struct Ev3Motors {
    left: PathBuf,
    right: PathBuf,
}

impl Ev3Motors {
    pub fn new(left: PathBuf, right: PathBuf) -> Self {
        Self { left, right }
    }

    fn device(&self, motor: MotorId) -> &Path {
        match motor {
            MotorId::Left => &self.left,
            MotorId::Right => &self.right,
        }
    }
}

impl DriveMotors for Ev3Motors {
    fn set_power(&mut self, motor: MotorId, power: i8) -> Result<(), HardwareError> {
        let device = self.device(motor);
        write_attribute(device, "duty_cycle_sp", &power.clamp(-100, 100).to_string())?;
        write_attribute(device, "command", "run-direct")?;
        Ok(())
    }

    fn stop(&mut self, motor: MotorId) -> Result<(), HardwareError> {
        let device = self.device(motor);
        write_attribute(device, "stop_action", "coast")?;
        write_attribute(device, "command", "stop")?;
        Ok(())
    }
}

pub struct Ev3ColorSensor {
    device: PathBuf,
}

impl Ev3ColorSensor {
    /// Switches the sensor into color mode.
    pub fn new(device: PathBuf) -> io::Result<Self> {
        write_attribute(&device, "mode", COLOR_MODE)?;
        Ok(Self { device })
    }
}

impl ColorSensor for Ev3ColorSensor {
    fn read_color(&mut self) -> Result<ColorReading, HardwareError> {
        let value = read_attribute(&self.device, "value0")?;
        value
            .parse::<u8>()
            .ok()
            .and_then(ColorReading::from_code)
            .ok_or(HardwareError::UnknownColor(value))
    }
}

fn probe_motors(root: &Path) -> io::Result<Option<Ev3Motors>> {
    let left = find_device(root, TACHO_MOTOR_CLASS, config::LEFT_MOTOR_PORT)?;
    let right = find_device(root, TACHO_MOTOR_CLASS, config::RIGHT_MOTOR_PORT)?;
    Ok(left.zip(right).map(|(left, right)| Ev3Motors::new(left, right)))
}

fn probe_color_sensor(root: &Path) -> io::Result<Option<Ev3ColorSensor>> {
    match find_device(root, LEGO_SENSOR_CLASS, config::COLOR_SENSOR_PORT)? {
        Some(device) => Ev3ColorSensor::new(device).map(Some),
        None => Ok(None),
    }
}

pub fn probe(sysfs_root: &str) -> Hardware {
    let root = Path::new(sysfs_root);

    let drive: Option<Box<dyn DriveMotors>> = match probe_motors(root) {
        Ok(Some(motors)) => {
            info!("Found drive motors on {} and {}", config::LEFT_MOTOR_PORT, config::RIGHT_MOTOR_PORT);
            Some(Box::new(motors))
        }
        Ok(None) => {
            warn!("Drive motors not found on {} and {}", config::LEFT_MOTOR_PORT, config::RIGHT_MOTOR_PORT);
            None
        }
        Err(e) => {
            warn!("Could not probe drive motors: {}", e);
            None
        }
    };

    let sensor: Option<Box<dyn ColorSensor>> = match probe_color_sensor(root) {
        Ok(Some(sensor)) => {
            info!("Found color sensor on {}", config::COLOR_SENSOR_PORT);
            Some(Box::new(sensor))
        }
        Ok(None) => {
            warn!("Color sensor not found on {}", config::COLOR_SENSOR_PORT);
            None
        }
        Err(e) => {
            warn!("Could not probe color sensor: {}", e);
            None
        }
    };

    Hardware::new(drive, sensor)
}
