//! Open-loop timed drive.

use crate::config::config::DriveProfile;
use crate::hardware::hardware::{DriveMotors, HardwareError, MotorId};
use crate::robot_controller::direction::Direction;
use crate::robot_controller::error::RobotError;
use crate::robot_controller::timer::{CancelToken, Interrupted};

use log::{info, warn};
use std::time::Duration;

pub(crate) enum DriveFailure {
    Hardware(HardwareError),
    Interrupted,
}

impl From<HardwareError> for DriveFailure {
    fn from(error: HardwareError) -> Self {
        DriveFailure::Hardware(error)
    }
}

impl From<Interrupted> for DriveFailure {
    fn from(_: Interrupted) -> Self {
        DriveFailure::Interrupted
    }
}

pub(crate) fn set_powers(drive: &mut dyn DriveMotors, left: i8, right: i8) -> Result<(), HardwareError> {
    drive.set_power(MotorId::Left, left)?;
    drive.set_power(MotorId::Right, right)?;
    Ok(())
}

pub(crate) fn stop_motors(drive: &mut dyn DriveMotors) -> Result<(), HardwareError> {
    drive.stop(MotorId::Left)?;
    drive.stop(MotorId::Right)?;
    Ok(())
}

/// Tries to stop both motors after a failure. Errors are logged and dropped.
pub(crate) fn stop_motors_best_effort(drive: &mut dyn DriveMotors) {
    for motor in MotorId::ALL {
        if let Err(e) = drive.stop(motor) {
            warn!("Failed to stop {} motor during cleanup: {}", motor.to_string(), e);
        }
    }
}

fn drive_for(
    drive: &mut dyn DriveMotors,
    direction: Direction,
    duration: Duration,
    profile: &DriveProfile,
    cancel: &CancelToken,
) -> Result<(), DriveFailure> {
    let (left, right) = direction.to_motor_powers(profile.drive_power);
    set_powers(drive, left, right)?;
    cancel.wait(duration)?;
    stop_motors(drive)?;
    Ok(())
}

/// Negative and NaN durations are rejected. Durations too long to represent
/// hold until cancelled.
fn hold_time(seconds: f64) -> Result<Duration, RobotError> {
    if seconds.is_nan() || seconds < 0.0 {
        return Err(RobotError::InvalidDuration(seconds));
    }
    Ok(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX))
}

/// Drives in `direction` for `seconds`, then stops. The motors are stopped on
/// every exit path, including failures.
pub fn drive(
    drive: Option<&mut (dyn DriveMotors + 'static)>,
    direction: Direction,
    seconds: f64,
    profile: &DriveProfile,
    cancel: &CancelToken,
) -> Result<(), RobotError> {
    let drive = drive.ok_or(RobotError::HardwareUnavailable("Robot hardware"))?;
    let duration = hold_time(seconds)?;

    info!("Moving {} for {:?}", direction.to_string(), duration);
    match drive_for(drive, direction, duration, profile, cancel) {
        Ok(()) => Ok(()),
        Err(DriveFailure::Hardware(e)) => {
            stop_motors_best_effort(drive);
            Err(RobotError::ActuationError(e))
        }
        Err(DriveFailure::Interrupted) => {
            stop_motors_best_effort(drive);
            Err(RobotError::Cancelled)
        }
    }
}
