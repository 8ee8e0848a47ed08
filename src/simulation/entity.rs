use crate::simulation::tail::Tail;

/// Cell coordinate relative to the top-left corner of the box (border included)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One-cell-per-frame step on each axis, each component is -1 or +1
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

/// 24-bit color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel to `percent` of its value, truncating.
    /// Percentages above 100 are treated as 100.
    pub fn scaled(self, percent: u8) -> Self {
        let percent = u16::from(percent.min(100));
        let scale = |channel: u8| (u16::from(channel) * percent / 100) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(color: Rgb) -> Self {
        ratatui::style::Color::Rgb(color.r, color.g, color.b)
    }
}

/// A bouncing ball
#[derive(Clone, Debug)]
pub struct Entity {
    pub position: Point,
    pub velocity: Velocity,
    pub color: Rgb,
    pub tail: Tail,
}

impl Entity {
    pub fn new(position: Point, velocity: Velocity, color: Rgb, tail_capacity: usize) -> Self {
        Self {
            position,
            velocity,
            color,
            tail: Tail::new(tail_capacity),
        }
    }

    /// Put a reused slot back in play with a fresh trajectory and no history
    pub fn respawn(&mut self, position: Point, velocity: Velocity) {
        self.position = position;
        self.velocity = velocity;
        self.tail.clear();
    }
}
