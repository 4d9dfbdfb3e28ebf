//! Closed-loop search: drive forward until the target color is under the sensor.

use crate::config::config::DriveProfile;
use crate::hardware::hardware::{ColorSensor, DriveMotors};
use crate::robot_controller::direction::Target;
use crate::robot_controller::error::RobotError;
use crate::robot_controller::motion::{self, DriveFailure};
use crate::robot_controller::timer::CancelToken;

use log::{debug, info};
use std::time::Instant;

enum SearchOutcome {
    Reached,
    TimedOut,
}

fn search(
    drive: &mut dyn DriveMotors,
    sensor: &mut dyn ColorSensor,
    target: Target,
    profile: &DriveProfile,
    cancel: &CancelToken,
) -> Result<SearchOutcome, DriveFailure> {
    let wanted = target.color();
    let start = Instant::now();

    while start.elapsed() < profile.search_timeout {
        let color = sensor.read_color()?;
        debug!("Color sensor reads {:?}", color);
        if color == wanted {
            motion::stop_motors(drive)?;
            return Ok(SearchOutcome::Reached);
        }

        motion::set_powers(drive, profile.search_power, profile.search_power)?;
        cancel.wait(profile.poll_interval)?;
    }

    motion::stop_motors(drive)?;
    Ok(SearchOutcome::TimedOut)
}

/// Drives forward at search power until `target`'s color is seen or the search
/// timeout runs out. Both motors are stopped on return.
pub fn seek_color(
    drive: Option<&mut (dyn DriveMotors + 'static)>,
    sensor: Option<&mut (dyn ColorSensor + 'static)>,
    target: Target,
    profile: &DriveProfile,
    cancel: &CancelToken,
) -> Result<(), RobotError> {
    let sensor = sensor.ok_or(RobotError::HardwareUnavailable("Color sensor"))?;
    let drive = drive.ok_or(RobotError::HardwareUnavailable("Robot hardware"))?;

    info!("Searching for {} for up to {:?}", target.color_name(), profile.search_timeout);
    match search(drive, sensor, target, profile, cancel) {
        Ok(SearchOutcome::Reached) => {
            info!("Found {}", target.to_string());
            Ok(())
        }
        Ok(SearchOutcome::TimedOut) => Err(RobotError::NotFound(target.color_name())),
        Err(DriveFailure::Hardware(e)) => {
            motion::stop_motors_best_effort(drive);
            Err(RobotError::SensingError(e))
        }
        Err(DriveFailure::Interrupted) => {
            motion::stop_motors_best_effort(drive);
            Err(RobotError::Cancelled)
        }
    }
}
