use super::geometry::{Heading, Point};

/// Body template in block units, relative to the midpoint. The last entry is
/// the gripper.
const BODY: [(i32, i32); 13] = [
    (0, 0),
    (-1, 0),
    (-2, 0),
    (1, 0),
    (2, 0),
    (-1, -1),
    (1, -1),
    (-2, -1),
    (2, -1),
    (-3, -1),
    (3, -1),
    (0, 1),
    (0, 2),
];

const GRIPPER: usize = BODY.len() - 1;

/// Cells occupied by the drone, derived from a midpoint and a heading.
///
/// The airframe keeps its orientation regardless of heading; the heading is
/// carried so the footprint alone describes the agent pose.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footprint {
    midpoint: Point,
    heading: Heading,
    cells: [Point; BODY.len()],
}

impl Footprint {
    pub const LEN: usize = BODY.len();

    pub fn new(midpoint: Point, heading: Heading, block_size: i32) -> Self {
        let cells = BODY.map(|(dx, dy)| {
            Point::new(midpoint.x + dx * block_size, midpoint.y + dy * block_size)
        });
        Footprint { midpoint, heading, cells }
    }

    pub fn midpoint(&self) -> Point {
        self.midpoint
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    pub fn cells(&self) -> &[Point] {
        &self.cells
    }

    pub fn gripper(&self) -> Point {
        self.cells[GRIPPER]
    }

    pub fn contains(&self, point: &Point) -> bool {
        self.cells.contains(point)
    }

    /// Extent of the template in blocks: `(min_dx, max_dx, min_dy, max_dy)`.
    pub fn extent() -> (i32, i32, i32, i32) {
        BODY.iter().fold((0, 0, 0, 0), |(lx, hx, ly, hy), &(dx, dy)| {
            (lx.min(dx), hx.max(dx), ly.min(dy), hy.max(dy))
        })
    }

    /// Gripper offset from the midpoint in blocks.
    pub fn gripper_offset() -> (i32, i32) {
        BODY[GRIPPER]
    }
}
