//! The scrolling stream of obstacle pairs.
//!
//! Each pair is a top obstacle hanging from the ceiling and a bottom one
//! standing on the floor, with a fixed-height gap between them. Pairs enter
//! at the right edge, scroll left at a constant speed and are dropped once
//! they are fully off the left edge.

use rand::Rng;

use crate::collision::{self, Rect};
use crate::config::Config;

/// Sequential id shared by the two halves of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairId(pub u64);

impl PairId {
    /// The pair spawned right after this one.
    pub fn successor(self) -> PairId {
        PairId(self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pair: PairId,
    pub side: Side,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub passed: bool,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Default)]
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
    next_pair: u64,
    last_scored: Option<PairId>,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active obstacles, oldest first, top before bottom within a pair.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Id the next spawned pair will get.
    pub fn next_pair_id(&self) -> PairId {
        PairId(self.next_pair)
    }

    /// Push a new pair at the right edge with its gap top at `gap_top`.
    pub fn spawn_at(&mut self, config: &Config, gap_top: f64) -> PairId {
        let pair = PairId(self.next_pair);
        self.next_pair += 1;

        let gap_bottom = gap_top + config.gap_height;
        let x = config.screen_width;
        self.obstacles.push(Obstacle {
            pair,
            side: Side::Top,
            x,
            y: 0.0,
            width: config.obstacle_width,
            height: gap_top,
            passed: false,
        });
        self.obstacles.push(Obstacle {
            pair,
            side: Side::Bottom,
            x,
            y: gap_bottom,
            width: config.obstacle_width,
            height: config.screen_height - gap_bottom,
            passed: false,
        });
        pair
    }

    /// Spawn a pair with a gap placed uniformly inside the margins.
    pub fn spawn<R: Rng>(&mut self, config: &Config, rng: &mut R) -> PairId {
        let (lo, hi) = config.gap_top_range();
        let gap_top = if hi > lo {
            rng.random_range(lo..=hi)
        } else {
            lo
        };
        self.spawn_at(config, gap_top)
    }

    fn should_spawn(&self, config: &Config) -> bool {
        match self.obstacles.last() {
            None => true,
            Some(newest) => newest.x < config.spawn_threshold,
        }
    }

    /// Spawn if due, scroll everything left, drop what left the screen.
    pub fn update<R: Rng>(&mut self, config: &Config, rng: &mut R) {
        if self.should_spawn(config) {
            self.spawn(config, rng);
        }

        for ob in &mut self.obstacles {
            ob.x -= config.obstacle_speed;
        }

        self.obstacles.retain(|ob| ob.right() >= 0.0);
    }

    /// Mark obstacles the player has fully cleared and return how many
    /// pairs became fully passed this call. A pair counts once, ever.
    pub fn update_score(&mut self, player: &Rect) -> u32 {
        for ob in &mut self.obstacles {
            if !ob.passed && player.right() > ob.right() {
                ob.passed = true;
            }
        }

        let mut points = 0;
        let mut i = 0;
        while i < self.obstacles.len() {
            let pair = self.obstacles[i].pair;
            let mut all_passed = true;
            while i < self.obstacles.len() && self.obstacles[i].pair == pair {
                all_passed &= self.obstacles[i].passed;
                i += 1;
            }
            if all_passed && Some(pair) > self.last_scored {
                self.last_scored = Some(pair);
                points += 1;
            }
        }
        points
    }

    pub fn collides(&self, player: &Rect) -> bool {
        collision::collides(player, &self.obstacles)
    }

    /// Gap of a pair still on screen, as `(gap_top, gap_bottom)`.
    pub fn gap_of(&self, pair: PairId) -> Option<(f64, f64)> {
        let top = self
            .obstacles
            .iter()
            .find(|ob| ob.pair == pair && ob.side == Side::Top)?;
        let bottom = self
            .obstacles
            .iter()
            .find(|ob| ob.pair == pair && ob.side == Side::Bottom)?;
        Some((top.height, bottom.y))
    }

    /// Most recently scored pair, if any.
    pub fn last_scored(&self) -> Option<PairId> {
        self.last_scored
    }
}
