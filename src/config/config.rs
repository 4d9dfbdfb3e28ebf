use std::time;

use log::LevelFilter;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub const DRIVE_POWER: i8 = 75;
pub const SEARCH_POWER: i8 = 50;

pub const DEFAULT_MOVE_DURATION: f64 = 1.0;
pub const SEARCH_TIMEOUT: time::Duration = time::Duration::from_secs(10);
pub const POLL_PERIOD: time::Duration = time::Duration::from_millis(100);

pub const ACCEPT_POLL_PERIOD: time::Duration = time::Duration::from_millis(25);
pub const CONNECTION_TIMEOUT: time::Duration = time::Duration::from_secs(5);
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

pub const SYSFS_ROOT: &str = "/sys/class";
pub const LEFT_MOTOR_PORT: &str = "ev3-ports:outA";
pub const RIGHT_MOTOR_PORT: &str = "ev3-ports:outB";
pub const COLOR_SENSOR_PORT: &str = "ev3-ports:in1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareKind {
    Ev3dev,
    Sim,
    Absent,
}

impl HardwareKind {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "ev3dev" | "ev3" => Some(HardwareKind::Ev3dev),
            "sim" => Some(HardwareKind::Sim),
            "none" => Some(HardwareKind::Absent),
            _ => None,
        }
    }
}

/// Fixed power levels and search timing for one deployment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveProfile {
    pub drive_power: i8,
    pub search_power: i8,
    pub search_timeout: time::Duration,
    pub poll_interval: time::Duration,
}

impl Default for DriveProfile {
    fn default() -> Self {
        Self {
            drive_power: DRIVE_POWER,
            search_power: SEARCH_POWER,
            search_timeout: SEARCH_TIMEOUT,
            poll_interval: POLL_PERIOD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub hardware: HardwareKind,
    pub profile: DriveProfile,
    pub sysfs_root: String,
    pub log_level: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            hardware: HardwareKind::Ev3dev,
            profile: DriveProfile::default(),
            sysfs_root: SYSFS_ROOT.to_string(),
            log_level: LevelFilter::Info,
        }
    }
}

impl Config {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown argument `{0}`")]
    UnknownArgument(String),
    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}
