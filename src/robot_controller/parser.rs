//! Free-text command parsing.

use crate::config::config;
use crate::robot_controller::direction::{Direction, Target};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Move { direction: Direction, duration: f64 },
    GoTo { target: Target },
    Unknown,
}

/// Turns a message into a command. Direction words are checked before targets,
/// so "go forward to the red circle" is a move.
pub fn parse(message: &str) -> Command {
    let message = message.to_lowercase();

    for direction in Direction::ALL {
        if message.contains(direction.to_string().as_str()) {
            let duration = numeric_duration(&message).unwrap_or(config::DEFAULT_MOVE_DURATION);
            return Command::Move { direction, duration };
        }
    }

    if message.contains("red") && message.contains("circle") {
        return Command::GoTo {
            target: Target::RedCircle,
        };
    }
    if message.contains("green") && message.contains("circle") {
        return Command::GoTo {
            target: Target::GreenCircle,
        };
    }

    Command::Unknown
}

/// True if `chars[at..]` starts with optional whitespace followed by the seconds
/// marker. "second", "sec" and "s" all begin with `s`.
fn seconds_marker_at(chars: &[char], mut at: usize) -> bool {
    while at < chars.len() && chars[at].is_whitespace() {
        at += 1;
    }
    chars.get(at) == Some(&'s')
}

/// Leftmost `<digits>[.<digits>]` followed by a seconds marker.
fn numeric_duration(message: &str) -> Option<f64> {
    let chars: Vec<char> = message.chars().collect();

    for start in 0..chars.len() {
        if !chars[start].is_ascii_digit() {
            continue;
        }
        let mut end = start;
        while end < chars.len() && chars[end].is_ascii_digit() {
            end += 1;
        }
        if end + 1 < chars.len() && chars[end] == '.' && chars[end + 1].is_ascii_digit() {
            end += 1;
            while end < chars.len() && chars[end].is_ascii_digit() {
                end += 1;
            }
        }
        if seconds_marker_at(&chars, end) {
            let number: String = chars[start..end].iter().collect();
            if let Ok(seconds) = number.parse::<f64>() {
                return Some(seconds);
            }
        }
    }
    None
}
