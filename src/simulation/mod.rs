mod entity;
mod physics;
mod population;
mod state;
mod tail;

pub use entity::{Entity, Point, Rgb, Velocity};
pub use physics::{advance, Bounds};
pub use population::Population;
pub use state::{SimulationState, Speed};
pub use tail::{intensity_percent, Tail};
