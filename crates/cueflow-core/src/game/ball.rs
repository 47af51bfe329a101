use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Foul values awarded to the opponent in snooker.
pub const SNOOKER_FOUL_VALUES: [u32; 4] = [4, 5, 6, 7];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallType {
    Red,
    Yellow,
    Green,
    Brown,
    Blue,
    Pink,
    Black,
}

impl BallType {
    pub const ALL: [BallType; 7] = [
        BallType::Red,
        BallType::Yellow,
        BallType::Green,
        BallType::Brown,
        BallType::Blue,
        BallType::Pink,
        BallType::Black,
    ];

    /// Points scored for potting this ball.
    pub fn value(self) -> u32 {
        match self {
            BallType::Red => 1,
            BallType::Yellow => 2,
            BallType::Green => 3,
            BallType::Brown => 4,
            BallType::Blue => 5,
            BallType::Pink => 6,
            BallType::Black => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BallType::Red => "Red",
            BallType::Yellow => "Yellow",
            BallType::Green => "Green",
            BallType::Brown => "Brown",
            BallType::Blue => "Blue",
            BallType::Pink => "Pink",
            BallType::Black => "Black",
        }
    }
}

impl fmt::Display for BallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BallType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BallType::ALL
            .into_iter()
            .find(|ball| ball.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "ball".into(),
                message: format!("unknown ball '{wanted}'"),
            })
    }
}

/// A foul value in the snooker range `4..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FoulPoints(u32);

impl FoulPoints {
    pub fn new(points: u32) -> Result<Self, ValidationError> {
        if SNOOKER_FOUL_VALUES.contains(&points) {
            Ok(Self(points))
        } else {
            Err(ValidationError::FoulOutOfRange(points))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for FoulPoints {
    type Error = ValidationError;

    fn try_from(points: u32) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<FoulPoints> for u32 {
    fn from(points: FoulPoints) -> Self {
        points.0
    }
}
