use crate::simulation::entity::{Entity, Point};

/// Size of the bordered box in cells. The border takes the outermost row and
/// column on each side, so balls live in `[1, width-2] x [1, height-2]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Pull `point` into the interior. Degenerate boxes (narrower than 3
    /// cells) collapse onto cell 1.
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: clamp_axis(point.x, self.width),
            y: clamp_axis(point.y, self.height),
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        (1..=self.width - 2).contains(&point.x) && (1..=self.height - 2).contains(&point.y)
    }
}

fn clamp_axis(pos: i32, dimension: i32) -> i32 {
    pos.min(dimension - 2).max(1)
}

/// Whether `pos` touches a wall after moving, so the velocity must flip
fn hits_wall(pos: i32, dimension: i32) -> bool {
    pos >= dimension - 2 || pos <= 1
}

/// Run one frame of physics for `entity` and return the position drawn this
/// frame.
///
/// The current position is clamped into `bounds`, recorded in the tail, then
/// moved one step and the velocity reflected on any axis that reached a wall.
/// The moved position is only clamped on the next call, so after the box
/// shrinks the ball is pulled back in one frame late.
pub fn advance(entity: &mut Entity, bounds: Bounds) -> Point {
    let drawn = bounds.clamp(entity.position);
    entity.tail.record(drawn);

    let mut next = drawn;
    next.x += entity.velocity.dx;
    next.y += entity.velocity.dy;

    if hits_wall(next.x, bounds.width) {
        entity.velocity.dx = -entity.velocity.dx;
    }
    if hits_wall(next.y, bounds.height) {
        entity.velocity.dy = -entity.velocity.dy;
    }

    entity.position = next;
    drawn
}
