//! Parallax scrolling for the decorative background layers.
//!
//! Layers scroll by elapsed wall time rather than by frame, so the
//! background keeps a steady pace even if a frame runs long.

use crate::config::{Config, FRAME_RATE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    FarClouds,
    NearClouds,
    Hills,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::FarClouds, Layer::NearClouds, Layer::Hills];

    /// Leftward speed in px/s.
    pub fn speed(self, config: &Config) -> f64 {
        match self {
            Layer::FarClouds => config.screen_width / 60.0,
            Layer::NearClouds => 2.0 * config.screen_width / 60.0,
            // Hills move with the obstacles.
            Layer::Hills => config.obstacle_speed * FRAME_RATE as f64,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Parallax {
    offsets: [f64; 3],
}

impl Parallax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance every layer by `dt` seconds, wrapping at the screen width.
    pub fn update(&mut self, config: &Config, dt: f64) {
        let width = config.screen_width.max(1.0);
        for (offset, layer) in self.offsets.iter_mut().zip(Layer::ALL) {
            *offset = (*offset + layer.speed(config) * dt).rem_euclid(width);
        }
    }

    /// How far `layer` has scrolled, in `[0, screen_width)`.
    pub fn offset(&self, layer: Layer) -> f64 {
        self.offsets[layer as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_layers_move_faster() {
        let config = Config::reference();
        let mut p = Parallax::new();
        p.update(&config, 0.5);
        assert!((p.offset(Layer::FarClouds) - 16.0).abs() < 1e-9);
        assert!((p.offset(Layer::NearClouds) - 32.0).abs() < 1e-9);
        assert!((p.offset(Layer::Hills) - 120.0).abs() < 1e-9);
    }

    #[test]
    fn offsets_wrap_at_screen_width() {
        let config = Config::for_screen(100, 60);
        let mut p = Parallax::new();
        for _ in 0..10_000 {
            p.update(&config, 1.0 / 60.0);
            for layer in Layer::ALL {
                let o = p.offset(layer);
                assert!((0.0..100.0).contains(&o));
            }
        }
    }
}
