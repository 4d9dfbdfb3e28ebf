//! Hardware collaborators consumed by the robot controller.

use crate::config::config::{Config, HardwareKind};
use crate::hardware::{ev3dev, sim};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum MotorId {
    Left,
    Right,
}

impl MotorId {
    pub const ALL: [MotorId; 2] = [MotorId::Left, MotorId::Right];

    pub fn to_string(&self) -> String {
        match self {
            MotorId::Left => "left".to_string(),
            MotorId::Right => "right".to_string(),
        }
    }
}

/// Named color reported by the color sensor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ColorReading {
    None,
    Black,
    Blue,
    Green,
    Yellow,
    Red,
    White,
    Brown,
}

impl ColorReading {
    /// Decodes the numeric color code shared by the NXT Color20 and EV3 sensors.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ColorReading::None),
            1 => Some(ColorReading::Black),
            2 => Some(ColorReading::Blue),
            3 => Some(ColorReading::Green),
            4 => Some(ColorReading::Yellow),
            5 => Some(ColorReading::Red),
            6 => Some(ColorReading::White),
            7 => Some(ColorReading::Brown),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("unexpected color code `{0}`")]
    UnknownColor(String),
    #[error("{0}")]
    Fault(String),
}

/// The drive actuators. `stop` must succeed on an already stopped motor.
pub trait DriveMotors: Send {
    fn set_power(&mut self, motor: MotorId, power: i8) -> Result<(), HardwareError>;
    fn stop(&mut self, motor: MotorId) -> Result<(), HardwareError>;
}

pub trait ColorSensor: Send {
    fn read_color(&mut self) -> Result<ColorReading, HardwareError>;
}

/// Devices found at startup. A missing device stays `None` for the process lifetime.
#[derive(Default)]
pub struct Hardware {
    pub drive: Option<Box<dyn DriveMotors>>,
    pub sensor: Option<Box<dyn ColorSensor>>,
}

impl Hardware {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn new(drive: Option<Box<dyn DriveMotors>>, sensor: Option<Box<dyn ColorSensor>>) -> Self {
        Self { drive, sensor }
    }

    pub fn drive_ready(&self) -> bool {
        self.drive.is_some()
    }

    pub fn sensor_ready(&self) -> bool {
        self.sensor.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.drive_ready() && self.sensor_ready()
    }
}

pub fn probe(config: &Config) -> Hardware {
    let hardware = match config.hardware {
        HardwareKind::Sim => {
            let robot = sim::SimRobot::new();
            Hardware::new(Some(Box::new(robot.motors())), Some(Box::new(robot.color_sensor())))
        }
        HardwareKind::Ev3dev => ev3dev::probe(&config.sysfs_root),
        HardwareKind::Absent => Hardware::absent(),
    };

    if hardware.is_ready() {
        info!("Successfully connected to {:?} hardware", config.hardware);
    } else {
        warn!(
            "Could not initialize {:?} hardware (drive: {}, color sensor: {})",
            config.hardware,
            hardware.drive_ready(),
            hardware.sensor_ready()
        );
    }
    hardware
}
