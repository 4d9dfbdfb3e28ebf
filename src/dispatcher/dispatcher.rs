use crate::dispatcher::mcp_message::{self, CommandResult, ErrorResponse, McpMessage, McpResponse, ResponseContext};
use crate::robot_controller::error::RobotError;
use crate::robot_controller::parser::Command;
use crate::robot_controller::robot::Robot;
use crate::robot_controller::state::{RobotStatus, SharedStatus};
use crate::robot_controller::timer::{self, Canceller};

use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("No messages provided")]
    NoMessages,
    #[error("Unsupported message format")]
    UnsupportedMessage,
    #[error("Robot is busy with another command")]
    Busy,
    #[error("Server is shutting down")]
    ShuttingDown,
    #[error(transparent)]
    Robot(#[from] RobotError),
}

impl DispatchError {
    pub fn status_code(&self) -> u16 {
        match self {
            DispatchError::NoMessages | DispatchError::UnsupportedMessage => 400,
            DispatchError::Busy => 409,
            DispatchError::ShuttingDown => 503,
            DispatchError::Robot(e) => match e {
                RobotError::UnknownCommand | RobotError::InvalidDuration(_) => 400,
                RobotError::NotFound(_) => 404,
                RobotError::ActuationError(_) | RobotError::SensingError(_) => 500,
                RobotError::HardwareUnavailable(_) | RobotError::Cancelled => 503,
            },
        }
    }
}

/// Routes commands to the robot, one at a time.
pub struct Dispatcher {
    robot: Mutex<Robot>,
    status: SharedStatus,
    in_flight: Mutex<Option<Canceller>>,
    shutting_down: AtomicBool,
}

impl Dispatcher {
    pub fn new(robot: Robot, status: SharedStatus) -> Self {
        Self {
            robot: Mutex::new(robot),
            status,
            in_flight: Mutex::new(None),
            shutting_down: AtomicBool::new(false),
        }
    }

    fn in_flight(&self) -> MutexGuard<'_, Option<Canceller>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn handle_message(&self, message: &McpMessage) -> Result<McpResponse, DispatchError> {
        if self.shutting_down.load(Ordering::SeqCst) {
            return Err(DispatchError::ShuttingDown);
        }
        let last_message = message.messages.last().ok_or(DispatchError::NoMessages)?;
        let text = mcp_message::message_text(last_message).ok_or(DispatchError::UnsupportedMessage)?;

        let mut robot = match self.robot.try_lock() {
            Ok(robot) => robot,
            Err(TryLockError::WouldBlock) => return Err(DispatchError::Busy),
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };

        let command = robot.interpret(text);
        info!("Message {:?} parsed as {:?}", text, command);

        let (canceller, cancel) = timer::cancellation();
        *self.in_flight() = Some(canceller);
        if self.shutting_down.load(Ordering::SeqCst) {
            self.in_flight().take();
        }

        let result = match command {
            Command::Move { direction, duration } => robot
                .execute_move(direction, duration, &cancel)
                .map(|()| {
                    CommandResult::success(format!("Moved {} for {:?} seconds", direction.to_string(), duration))
                }),
            Command::GoTo { target } => robot
                .execute_goto(target, &cancel)
                .map(|()| CommandResult::success(format!("Reached {}", target.to_string()))),
            Command::Unknown => Err(robot.reject_unknown()),
        };
        self.in_flight().take();

        Ok(McpResponse {
            response: result?,
            context: ResponseContext {
                robot_status: robot.current_status(),
            },
        })
    }

    pub fn status(&self) -> RobotStatus {
        self.status.snapshot()
    }

    /// Cancels the command in flight, if any. The robot stops before it reports back.
    pub fn stop(&self) -> bool {
        match self.in_flight().take() {
            Some(canceller) => {
                info!("Cancelling command in flight");
                canceller.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancels the command in flight and rejects every later command. Returns
    /// once the cancelled command has stopped the robot.
    pub fn shutdown(&self) {
        if !self.shutting_down.swap(true, Ordering::SeqCst) {
            warn!("Shutting down dispatcher");
        }
        self.stop();
        drop(self.robot.lock().unwrap_or_else(PoisonError::into_inner));
    }

    pub fn error_response(&self, error: &DispatchError) -> ErrorResponse {
        ErrorResponse {
            detail: error.to_string(),
            context: Some(ResponseContext {
                robot_status: self.status(),
            }),
        }
    }
}
