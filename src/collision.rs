//! Axis-aligned bounding boxes and player/obstacle overlap.

use crate::obstacles::Obstacle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Strict overlap on both axes. Rectangles that only share an edge do
    /// not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// True if `player` overlaps any active obstacle. The stream never holds
/// more than a handful of pairs, so a linear scan is enough.
pub fn collides<'a>(player: &Rect, obstacles: impl IntoIterator<Item = &'a Obstacle>) -> bool {
    obstacles
        .into_iter()
        .any(|ob| player.intersects(&ob.rect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacles::{PairId, Side};

    fn obstacle_at(x: f64, y: f64, w: f64, h: f64) -> Obstacle {
        Obstacle {
            pair: PairId(0),
            side: Side::Top,
            x,
            y,
            width: w,
            height: h,
            passed: false,
        }
    }

    #[test]
    fn overlapping_rects_intersect() {
        let player = Rect::new(100.0, 100.0, 50.0, 50.0);
        assert!(player.intersects(&Rect::new(120.0, 110.0, 50.0, 50.0)));
        assert!(!player.intersects(&Rect::new(300.0, 110.0, 50.0, 50.0)));
    }

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(a.intersects(&Rect::new(9.999, 9.999, 10.0, 10.0)));
    }

    #[test]
    fn intersection_is_symmetric() {
        let a = Rect::new(5.0, 5.0, 20.0, 3.0);
        let b = Rect::new(10.0, 0.0, 2.0, 30.0);
        assert_eq!(a.intersects(&b), b.intersects(&a));
        assert!(a.intersects(&b));
    }

    #[test]
    fn collides_scans_every_obstacle() {
        let player = Rect::new(100.0, 100.0, 50.0, 50.0);
        let far = obstacle_at(300.0, 110.0, 50.0, 50.0);
        let near = obstacle_at(120.0, 110.0, 50.0, 50.0);
        assert!(!collides(&player, [&far]));
        assert!(collides(&player, [&far, &near]));
        assert!(!collides(&player, std::iter::empty::<&Obstacle>()));
    }
}
