use super::grid_world::GridWorld;
use super::geometry::Point;

/// Draw the world as text, one character per block.
///
/// `#` obstacle, `D` drone body, `G` gripper, `T` target, `.` free. A target
/// under the gripper shows as `G`.
pub fn render(world: &GridWorld) -> String {
    let config = world.config();
    let b = config.block_size;
    let (cols, rows) = (config.columns(), config.rows());

    let mut output = String::with_capacity(((cols + 1) * rows) as usize + 32);
    output.push_str(&format!("Score: {}  Steps: {}\n", world.score(), world.steps()));
    for row in 0..rows {
        for col in 0..cols {
            let cell = Point::new(col * b, row * b);
            let ch = if cell == world.gripper() {
                'G'
            } else if world.footprint().contains(&cell) {
                'D'
            } else if cell == world.target() {
                'T'
            } else if world.obstacles().contains(&cell) {
                '#'
            } else {
                '.'
            };
            output.push(ch);
        }
        output.push('\n');
    }
    output
}
