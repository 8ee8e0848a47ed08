use crate::simulation::Rgb;

/// Box title drawn into the top border
pub const TITLE: &str = " Bouncing Ball ";

// ============================================
// Entities
// ============================================

/// Number of prior head positions kept per ball in tail variants
pub const TAIL_CAPACITY: usize = 10;

/// Maximum number of simultaneously active balls
pub const POPULATION_CAPACITY: usize = 10;

/// Intensity step per tail slot, in percent of the base color
pub const TAIL_FADE_STEP: usize = 10;

/// One color per population slot, so active balls never share a color
pub const PALETTE: [Rgb; POPULATION_CAPACITY] = [
    Rgb::new(255, 255, 255), // white
    Rgb::new(255, 0, 0),     // red
    Rgb::new(0, 255, 0),     // lime
    Rgb::new(255, 255, 0),   // yellow
    Rgb::new(0, 255, 255),   // aqua
    Rgb::new(255, 0, 255),   // fuchsia
    Rgb::new(255, 165, 0),   // orange
    Rgb::new(30, 144, 255),  // dodger blue
    Rgb::new(255, 192, 203), // pink
    Rgb::new(160, 32, 240),  // purple
];

/// Rectangle used for spawning before the first frame has been drawn
pub const DEFAULT_BOUNDS_WIDTH: i32 = 80;
pub const DEFAULT_BOUNDS_HEIGHT: i32 = 24;

// ============================================
// Frame timing
// ============================================

/// Redraw interval in milliseconds at startup
pub const DEFAULT_SPEED_MS: u64 = 15;

/// Fastest allowed redraw interval
pub const MIN_SPEED_MS: u64 = 1;

/// Slowest allowed redraw interval
pub const MAX_SPEED_MS: u64 = 100;

/// Fixed redraw interval of the classic variant, which has no speed keys
pub const CLASSIC_REFRESH_MS: u64 = 25;

// ============================================
// Rendering
// ============================================

pub const CLASSIC_BALL_GLYPH: &str = "o";
pub const BALL_GLYPH: &str = "●";
pub const TAIL_GLYPH: &str = "•";

/// Status line color (lime)
pub const STATUS_COLOR: Rgb = Rgb::new(0, 255, 0);

/// Help line color (silver)
pub const HELP_COLOR: Rgb = Rgb::new(192, 192, 192);

// ============================================
// Logging
// ============================================

/// Log destination; the terminal owns stdout/stderr while the animation runs
pub const LOG_FILE: &str = "bounce.log";

/// Feature set of one bouncing-ball program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// One white ball, fixed refresh, coordinate readout
    Classic,
    /// One ball with adjustable refresh interval
    Speed,
    /// Up to ten colored balls with fading tails
    MultiBall,
    /// One ball with a fading tail
    Tail,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Speed => "speed",
            Variant::MultiBall => "multi-ball",
            Variant::Tail => "tail",
        }
    }

    /// Whether Up/Down change the redraw interval
    pub fn speed_control(self) -> bool {
        !matches!(self, Variant::Classic)
    }

    /// Whether +/- change the number of balls
    pub fn multi_ball(self) -> bool {
        matches!(self, Variant::MultiBall)
    }

    pub fn tail_capacity(self) -> usize {
        match self {
            Variant::MultiBall | Variant::Tail => TAIL_CAPACITY,
            Variant::Classic | Variant::Speed => 0,
        }
    }

    pub fn initial_speed_ms(self) -> u64 {
        if self.speed_control() {
            DEFAULT_SPEED_MS
        } else {
            CLASSIC_REFRESH_MS
        }
    }

    pub fn ball_glyph(self) -> &'static str {
        match self {
            Variant::Classic => CLASSIC_BALL_GLYPH,
            _ => BALL_GLYPH,
        }
    }

    /// Key bindings line shown under the status line
    pub fn help(self) -> Option<&'static str> {
        match self {
            Variant::Classic => None,
            Variant::Speed | Variant::Tail => Some("Up: faster - Down: slower - Esc: quit"),
            Variant::MultiBall => {
                Some("Up: faster - Down: slower - +: add ball - -: remove ball - Esc: quit")
            }
        }
    }
}
