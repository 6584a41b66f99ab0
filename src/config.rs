//! Screen, physics and obstacle constants.
//!
//! All tuning is expressed against a 1920x1080 reference screen and scaled
//! to whatever pixel buffer the terminal gives us.

pub const REFERENCE_WIDTH: f64 = 1920.0;
pub const REFERENCE_HEIGHT: f64 = 1080.0;

/// Nominal simulation rate. Speeds below are per frame at this rate.
pub const FRAME_RATE: u32 = 60;

const SPRITE_SCALE: f64 = 0.06;
const SPRITE_ASPECT: f64 = 0.75; // width / height of the ninja
const PLAYER_X_FRAC: f64 = 0.1;
const GRAVITY: f64 = 0.5;
const MAX_VELOCITY: f64 = 5.0;
const OBSTACLE_WIDTH: f64 = 111.0;
const OBSTACLE_SPEED: f64 = 4.0;
const GAP_FRAC: f64 = 0.2;
const MARGIN_FRAC: f64 = 0.2;
const SPAWN_FRAC: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub screen_width: f64,
    pub screen_height: f64,
    pub player_x: f64,
    pub player_width: f64,
    pub player_height: f64,
    /// Magnitude of the vertical acceleration, px/frame².
    pub gravity: f64,
    /// Velocity clamp, px/frame.
    pub max_velocity: f64,
    pub obstacle_width: f64,
    /// Leftward obstacle speed, px/frame.
    pub obstacle_speed: f64,
    pub gap_height: f64,
    /// Keep-out band at the top and bottom of the screen for gap placement.
    pub gap_margin: f64,
    /// A new pair spawns once the newest pair's x drops below this.
    pub spawn_threshold: f64,
}

impl Config {
    /// Full-HD tuning, unscaled.
    pub fn reference() -> Self {
        Self::scaled(REFERENCE_WIDTH, REFERENCE_HEIGHT, 0.0)
    }

    /// Tuning for a `w` x `h` pixel buffer. Sprites get a minimum size so
    /// they stay readable on small terminals.
    pub fn for_screen(w: usize, h: usize) -> Self {
        Self::scaled(w as f64, h as f64, 1.0)
    }

    fn scaled(w: f64, h: f64, min_px: f64) -> Self {
        let sx = w / REFERENCE_WIDTH;
        let sy = h / REFERENCE_HEIGHT;
        let player_height = (SPRITE_SCALE * h).max(4.0 * min_px);
        Config {
            screen_width: w,
            screen_height: h,
            player_x: PLAYER_X_FRAC * w,
            player_width: (player_height * SPRITE_ASPECT).max(3.0 * min_px),
            player_height,
            gravity: GRAVITY * sy,
            max_velocity: MAX_VELOCITY * sy,
            obstacle_width: (OBSTACLE_WIDTH * sx).max(3.0 * min_px),
            obstacle_speed: OBSTACLE_SPEED * sx,
            gap_height: GAP_FRAC * h,
            gap_margin: MARGIN_FRAC * h,
            spawn_threshold: SPAWN_FRAC * w,
        }
    }

    /// Inclusive range for a pair's `gap_top`.
    pub fn gap_top_range(&self) -> (f64, f64) {
        let lo = self.gap_margin;
        let hi = self.screen_height - self.gap_margin - self.gap_height;
        (lo, hi.max(lo))
    }

    /// Where a fresh player starts: vertically centered.
    pub fn player_start_y(&self) -> f64 {
        self.screen_height / 2.0 - self.player_height / 2.0
    }
}
