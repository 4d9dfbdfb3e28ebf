use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Behaviour {
    Idle,
    Moving,
    Navigating,
    Error,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RobotStatus {
    pub status: Behaviour,
    pub position: Option<String>,
    pub current_action: Option<String>,
}

impl RobotStatus {
    pub fn init() -> Self {
        Self {
            status: Behaviour::Idle,
            position: None,
            current_action: None,
        }
    }
}

/// Current activity of the robot. Last writer wins.
#[derive(Debug)]
pub struct StatusTracker {
    status: RobotStatus,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            status: RobotStatus::init(),
        }
    }

    pub fn set_active(&mut self, behaviour: Behaviour, action: impl Into<String>) {
        self.status.status = behaviour;
        self.status.current_action = Some(action.into());
    }

    /// Back to idle. The position is only replaced when `position` is given.
    pub fn set_idle(&mut self, position: Option<String>) {
        self.status.status = Behaviour::Idle;
        self.status.current_action = None;
        if position.is_some() {
            self.status.position = position;
        }
    }

    pub fn set_error(&mut self) {
        self.status.status = Behaviour::Error;
        self.status.current_action = None;
    }

    pub fn snapshot(&self) -> RobotStatus {
        self.status.clone()
    }
}

/// The process-wide tracker, created at startup and handed to whoever needs it.
#[derive(Debug, Clone, Default)]
pub struct SharedStatus {
    tracker: Arc<Mutex<StatusTracker>>,
}

impl SharedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, StatusTracker> {
        self.tracker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> RobotStatus {
        self.lock().snapshot()
    }
}
