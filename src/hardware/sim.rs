//! In-memory robot used for tests and for running the server without a brick.

use crate::hardware::hardware::{ColorReading, ColorSensor, DriveMotors, HardwareError, MotorId};

use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MotorState {
    Stopped,
    Running(i8),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SimEvent {
    SetPower(MotorId, i8),
    Stop(MotorId),
    ReadColor(ColorReading),
}

#[derive(Debug)]
struct SimState {
    left: MotorState,
    right: MotorState,
    color: ColorReading,
    // (reads left, color reported once they are used up)
    color_after_reads: Option<(usize, ColorReading)>,
    power_writes: usize,
    fail_power_write: Option<usize>,
    fail_stops: bool,
    fail_reads: bool,
    events: Vec<SimEvent>,
}

impl SimState {
    fn motor_mut(&mut self, motor: MotorId) -> &mut MotorState {
        match motor {
            MotorId::Left => &mut self.left,
            MotorId::Right => &mut self.right,
        }
    }
}

/// Shared handle to one simulated robot. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct SimRobot {
    state: Arc<Mutex<SimState>>,
}

impl Default for SimRobot {
    fn default() -> Self {
        Self::new()
    }
}

impl SimRobot {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                left: MotorState::Stopped,
                right: MotorState::Stopped,
                color: ColorReading::White,
                color_after_reads: None,
                power_writes: 0,
                fail_power_write: None,
                fail_stops: false,
                fail_reads: false,
                events: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn motors(&self) -> SimMotors {
        SimMotors { robot: self.clone() }
    }

    pub fn color_sensor(&self) -> SimColorSensor {
        SimColorSensor { robot: self.clone() }
    }

    pub fn set_color(&self, color: ColorReading) {
        self.lock().color = color;
    }

    /// The sensor reports `color` from the read after the next `reads` reads on.
    pub fn set_color_after_reads(&self, reads: usize, color: ColorReading) {
        self.lock().color_after_reads = Some((reads, color));
    }

    /// Fails the `nth` power write (1-based, counted from now on).
    pub fn fail_power_write(&self, nth: usize) {
        let mut state = self.lock();
        state.fail_power_write = Some(state.power_writes + nth);
    }

    pub fn fail_stops(&self, fail: bool) {
        self.lock().fail_stops = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn motor(&self, motor: MotorId) -> MotorState {
        let mut state = self.lock();
        *state.motor_mut(motor)
    }

    pub fn is_stopped(&self) -> bool {
        MotorId::ALL
            .iter()
            .all(|motor| self.motor(*motor) == MotorState::Stopped)
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.lock().events.clone()
    }

    pub fn reads(&self) -> usize {
        self.lock()
            .events
            .iter()
            .filter(|event| matches!(event, SimEvent::ReadColor(_)))
            .count()
    }
}

pub struct SimMotors {
    robot: SimRobot,
}

impl DriveMotors for SimMotors {
    fn set_power(&mut self, motor: MotorId, power: i8) -> Result<(), HardwareError> {
        let mut state = self.robot.lock();
        state.power_writes += 1;
        if state.fail_power_write == Some(state.power_writes) {
            return Err(HardwareError::Fault(format!(
                "simulated write failure on {} motor",
                motor.to_string()
            )));
        }
        state.events.push(SimEvent::SetPower(motor, power));
        *state.motor_mut(motor) = if power == 0 {
            MotorState::Stopped
        } else {
            MotorState::Running(power)
        };
        debug!("sim: {} motor power {}", motor.to_string(), power);
        Ok(())
    }

    fn stop(&mut self, motor: MotorId) -> Result<(), HardwareError> {
        let mut state = self.robot.lock();
        if state.fail_stops {
            return Err(HardwareError::Fault(format!(
                "simulated stop failure on {} motor",
                motor.to_string()
            )));
        }
        state.events.push(SimEvent::Stop(motor));
        *state.motor_mut(motor) = MotorState::Stopped;
        Ok(())
    }
}

pub struct SimColorSensor {
    robot: SimRobot,
}

impl ColorSensor for SimColorSensor {
    fn read_color(&mut self) -> Result<ColorReading, HardwareError> {
        let mut state = self.robot.lock();
        if state.fail_reads {
            return Err(HardwareError::Fault("simulated color sensor failure".to_string()));
        }
        if let Some((reads_left, color)) = state.color_after_reads {
            if reads_left == 0 {
                state.color = color;
                state.color_after_reads = None;
            } else {
                state.color_after_reads = Some((reads_left - 1, color));
            }
        }
        let color = state.color;
        state.events.push(SimEvent::ReadColor(color));
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_is_idempotent() {
        let robot = SimRobot::new();
        let mut motors = robot.motors();
        motors.stop(MotorId::Left).unwrap();
        motors.stop(MotorId::Left).unwrap();
        assert!(robot.is_stopped());
    }

    #[test]
    fn injected_write_failure_hits_only_that_write() {
        let robot = SimRobot::new();
        let mut motors = robot.motors();
        robot.fail_power_write(2);

        assert!(motors.set_power(MotorId::Left, 50).is_ok());
        assert!(motors.set_power(MotorId::Right, 50).is_err());
        assert!(motors.set_power(MotorId::Right, 50).is_ok());
        assert_eq!(robot.motor(MotorId::Right), MotorState::Running(50));
    }

    #[test]
    fn color_changes_after_reads() {
        let robot = SimRobot::new();
        let mut sensor = robot.color_sensor();
        robot.set_color_after_reads(2, ColorReading::Red);

        assert_eq!(sensor.read_color().unwrap(), ColorReading::White);
        assert_eq!(sensor.read_color().unwrap(), ColorReading::White);
        assert_eq!(sensor.read_color().unwrap(), ColorReading::Red);
        assert_eq!(robot.reads(), 3);
    }
}
