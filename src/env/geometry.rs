use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::{Result, DroneError};

/// A lattice-aligned cell coordinate in pixel units.
///
/// Every entity in the grid snaps to multiples of the block size, so two
/// points are the same cell exactly when they compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    /// Shift by one block along `heading`.
    pub fn step(self, heading: Heading, block_size: i32) -> Self {
        let (dx, dy) = heading.delta();
        Point::new(self.x + dx * block_size, self.y + dy * block_size)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    Right,
    Down,
    Left,
    Up,
}

impl Heading {
    /// Clockwise cyclic order used to resolve relative actions.
    pub const CLOCKWISE: [Heading; 4] = [Heading::Right, Heading::Down, Heading::Left, Heading::Up];

    fn clockwise_index(self) -> usize {
        match self {
            Heading::Right => 0,
            Heading::Down => 1,
            Heading::Left => 2,
            Heading::Up => 3,
        }
    }

    /// Heading obtained by applying a relative action to this one.
    pub fn turn(self, action: RelativeAction) -> Heading {
        let idx = (self.clockwise_index() + action.clockwise_offset()) % 4;
        Heading::CLOCKWISE[idx]
    }

    /// Unit displacement in screen coordinates (y grows downwards).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::Right => (1, 0),
            Heading::Left => (-1, 0),
            Heading::Up => (0, -1),
            Heading::Down => (0, 1),
        }
    }
}

/// One of the four moves available to the agent, relative to its heading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelativeAction {
    Straight,
    TurnRight,
    Reverse,
    TurnLeft,
}

impl RelativeAction {
    pub const COUNT: usize = 4;

    /// All actions in index order, matching the one-hot layout.
    pub const ALL: [RelativeAction; 4] = [
        RelativeAction::Straight,
        RelativeAction::TurnRight,
        RelativeAction::Reverse,
        RelativeAction::TurnLeft,
    ];

    pub fn index(self) -> usize {
        match self {
            RelativeAction::Straight => 0,
            RelativeAction::TurnRight => 1,
            RelativeAction::Reverse => 2,
            RelativeAction::TurnLeft => 3,
        }
    }

    fn clockwise_offset(self) -> usize {
        self.index()
    }

    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL.get(index).copied().ok_or_else(|| DroneError::InvalidAction {
            action: format!("index {} (expected < {})", index, Self::COUNT),
        })
    }

    /// Decode an external one-hot vector. Anything other than exactly one
    /// `1` among `0`s over four slots is rejected.
    pub fn from_one_hot(encoding: &[f32]) -> Result<Self> {
        let invalid = || DroneError::InvalidAction {
            action: format!("{:?}", encoding),
        };
        if encoding.len() != Self::COUNT {
            return Err(invalid());
        }
        let mut hot = None;
        for (i, &v) in encoding.iter().enumerate() {
            if v == 1.0 {
                if hot.is_some() {
                    return Err(invalid());
                }
                hot = Some(i);
            } else if v != 0.0 {
                return Err(invalid());
            }
        }
        hot.map(|i| Self::ALL[i]).ok_or_else(invalid)
    }

    pub fn one_hot(self) -> [f32; 4] {
        let mut encoding = [0.0; 4];
        encoding[self.index()] = 1.0;
        encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot_decoding() {
        for action in RelativeAction::ALL {
            assert_eq!(RelativeAction::from_one_hot(&action.one_hot()).unwrap(), action);
        }
        assert!(RelativeAction::from_one_hot(&[0.0, 0.0, 0.0, 0.0]).is_err());
        assert!(RelativeAction::from_one_hot(&[1.0, 1.0, 0.0, 0.0]).is_err());
        assert!(RelativeAction::from_one_hot(&[0.0, 0.5, 0.0, 0.0]).is_err());
        assert!(RelativeAction::from_one_hot(&[0.0, 1.0, 0.0]).is_err());
    }

    #[test]
    fn test_from_index_out_of_range() {
        assert!(matches!(
            RelativeAction::from_index(4),
            Err(DroneError::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_point_step() {
        let p = Point::new(100, 100);
        assert_eq!(p.step(Heading::Right, 20), Point::new(120, 100));
        assert_eq!(p.step(Heading::Up, 20), Point::new(100, 80));
    }
}
