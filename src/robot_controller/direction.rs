use crate::hardware::hardware::ColorReading;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    /// Parser scanning order.
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    /// (left, right) motor power for drive power `power`. Left and right pivot in place.
    pub fn to_motor_powers(&self, power: i8) -> (i8, i8) {
        match self {
            Direction::Forward => (power, power),
            Direction::Backward => (-power, -power),
            Direction::Left => (-power, power),
            Direction::Right => (power, -power),
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Direction::Forward => "forward".to_string(),
            Direction::Backward => "backward".to_string(),
            Direction::Left => "left".to_string(),
            Direction::Right => "right".to_string(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Target {
    RedCircle,
    GreenCircle,
}

impl Target {
    pub fn color_name(&self) -> &'static str {
        match self {
            Target::RedCircle => "red",
            Target::GreenCircle => "green",
        }
    }

    pub fn color(&self) -> ColorReading {
        match self {
            Target::RedCircle => ColorReading::Red,
            Target::GreenCircle => ColorReading::Green,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Target::RedCircle => "red-circle".to_string(),
            Target::GreenCircle => "green-circle".to_string(),
        }
    }
}
