use crate::config::config::DriveProfile;
use crate::hardware::hardware::Hardware;
use crate::robot_controller::direction::{Direction, Target};
use crate::robot_controller::error::RobotError;
use crate::robot_controller::motion;
use crate::robot_controller::parser::{self, Command};
use crate::robot_controller::seeker;
use crate::robot_controller::state::{Behaviour, RobotStatus, SharedStatus};
use crate::robot_controller::timer::CancelToken;

use log::{error, info};

/// The robot as seen by the dispatcher: devices, power profile and the shared
/// status it reports into.
pub struct Robot {
    hardware: Hardware,
    profile: DriveProfile,
    status: SharedStatus,
}

impl Robot {
    pub fn new(hardware: Hardware, profile: DriveProfile, status: SharedStatus) -> Self {
        Self {
            hardware,
            profile,
            status,
        }
    }

    pub fn interpret(&self, message: &str) -> Command {
        parser::parse(message)
    }

    pub fn execute_move(
        &mut self,
        direction: Direction,
        seconds: f64,
        cancel: &CancelToken,
    ) -> Result<(), RobotError> {
        self.status
            .lock()
            .set_active(Behaviour::Moving, format!("Moving {}", direction.to_string()));

        let result = motion::drive(
            self.hardware.drive.as_deref_mut(),
            direction,
            seconds,
            &self.profile,
            cancel,
        );
        self.finish(result, None)
    }

    pub fn execute_goto(&mut self, target: Target, cancel: &CancelToken) -> Result<(), RobotError> {
        self.status
            .lock()
            .set_active(Behaviour::Navigating, format!("Moving to {}", target.to_string()));

        let result = seeker::seek_color(
            self.hardware.drive.as_deref_mut(),
            self.hardware.sensor.as_deref_mut(),
            target,
            &self.profile,
            cancel,
        );
        self.finish(result, Some(target.to_string()))
    }

    /// Records a command that could not be interpreted.
    pub fn reject_unknown(&self) -> RobotError {
        self.status.lock().set_error();
        RobotError::UnknownCommand
    }

    pub fn current_status(&self) -> RobotStatus {
        self.status.snapshot()
    }

    fn finish(&self, result: Result<(), RobotError>, position: Option<String>) -> Result<(), RobotError> {
        match &result {
            Ok(()) => {
                info!("Command completed");
                self.status.lock().set_idle(position);
            }
            Err(e) => {
                error!("Command failed: {}", e);
                self.status.lock().set_error();
            }
        }
        result
    }
}
