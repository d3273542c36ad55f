use std::collections::HashSet;

use super::geometry::Point;

/// Boundary and obstacle predicate over a snapshot of the grid.
///
/// The oracle knows nothing about the drone, so it can answer for
/// hypothetical cells (feature lookahead) as well as the live footprint.
#[derive(Clone, Debug, Default)]
pub struct CollisionOracle {
    max_x: i32,
    max_y: i32,
    obstacles: HashSet<Point>,
}

impl CollisionOracle {
    pub fn new(width: i32, height: i32, block_size: i32, obstacles: HashSet<Point>) -> Self {
        CollisionOracle {
            max_x: width - block_size,
            max_y: height - block_size,
            obstacles,
        }
    }

    pub fn out_of_bounds(&self, point: &Point) -> bool {
        point.x < 0 || point.y < 0 || point.x > self.max_x || point.y > self.max_y
    }

    pub fn is_obstacle(&self, point: &Point) -> bool {
        self.obstacles.contains(point)
    }

    pub fn collides(&self, point: &Point) -> bool {
        self.out_of_bounds(point) || self.is_obstacle(point)
    }

    pub fn collides_any<'a, I>(&self, points: I) -> bool
    where
        I: IntoIterator<Item = &'a Point>,
    {
        points.into_iter().any(|p| self.collides(p))
    }

    pub fn obstacles(&self) -> &HashSet<Point> {
        &self.obstacles
    }
}
