//! Player kinematics: constant acceleration, clamped velocity, and an
//! inelastic floor/ceiling.

use crate::collision::Rect;
use crate::config::Config;

/// Vertical state fed through [`integrate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertical {
    /// Top edge.
    pub y: f64,
    pub velocity: f64,
}

/// One fixed step: `v' = clamp(v + a)`, `y' = y + v'`, then clamp the body
/// of height `height` into `[0, screen_height]`, zeroing velocity on contact.
pub fn integrate(
    state: Vertical,
    acceleration: f64,
    max_velocity: f64,
    height: f64,
    screen_height: f64,
) -> Vertical {
    let velocity = (state.velocity + acceleration).clamp(-max_velocity, max_velocity);
    let y = state.y + velocity;

    if y <= 0.0 {
        Vertical { y: 0.0, velocity: 0.0 }
    } else if y + height >= screen_height {
        Vertical {
            y: screen_height - height,
            velocity: 0.0,
        }
    } else {
        Vertical { y, velocity }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub width: f64,
    pub height: f64,
    /// Draw upside-down. Physics only cares about the sign of `acceleration`.
    pub gravity_flipped: bool,
}

impl Player {
    pub fn new(config: &Config) -> Self {
        Player {
            x: config.player_x,
            y: config.player_start_y(),
            velocity: 0.0,
            acceleration: config.gravity,
            width: config.player_width,
            height: config.player_height,
            gravity_flipped: false,
        }
    }

    pub fn flip_gravity(&mut self) {
        self.acceleration = -self.acceleration;
        self.gravity_flipped = !self.gravity_flipped;
    }

    pub fn step(&mut self, config: &Config) {
        let next = integrate(
            Vertical {
                y: self.y,
                velocity: self.velocity,
            },
            self.acceleration,
            config.max_velocity,
            self.height,
            config.screen_height,
        );
        self.y = next.y;
        self.velocity = next.velocity;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Top edge at the ceiling or bottom edge at the floor.
    pub fn touches_edge(&self, screen_height: f64) -> bool {
        self.y <= 0.0 || self.y + self.height >= screen_height
    }
}
