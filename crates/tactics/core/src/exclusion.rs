//! Exclusion areas: places a ship may not end a movement in.
//!
//! Three kinds of exclusion are combined:
//! - a hard border along the arena edges,
//! - a hard obstacle radius around every other ship,
//! - a soft obstacle radius (usually from the moving engine) that widens the
//!   hard one.

use crate::geometry::Location;
use crate::state::{Battle, ShipId};

#[derive(Clone, Debug, PartialEq)]
pub struct ExclusionAreas {
    min: Location,
    max: Location,
    active: bool,
    hard_border: f64,
    effective_obstacle: f64,
    obstacles: Vec<Location>,
}

impl ExclusionAreas {
    pub fn new(width: f64, height: f64, hard_border: f64, hard_obstacle: f64) -> Self {
        Self {
            min: Location::new(0.0, 0.0),
            max: Location::new(width - 1.0, height - 1.0),
            active: width > 0.0 && height > 0.0,
            hard_border,
            effective_obstacle: hard_obstacle,
            obstacles: Vec::new(),
        }
    }

    /// Exclusion areas of a battle, ignoring some ships (typically the mover).
    pub fn from_battle(battle: &Battle, ignore: &[ShipId], soft_distance: f64) -> Self {
        let config = &battle.config;
        let mut areas = Self::new(
            config.width,
            config.height,
            config.border,
            config.ship_separation,
        );
        let obstacles = battle
            .living_ships()
            .filter(|ship| !ignore.contains(&ship.id))
            .map(|ship| ship.location())
            .collect();
        areas.configure(obstacles, soft_distance);
        areas
    }

    pub fn configure(&mut self, obstacles: Vec<Location>, soft_distance: f64) {
        self.obstacles = obstacles;
        self.effective_obstacle = soft_distance.max(self.effective_obstacle);
    }

    pub fn effective_obstacle(&self) -> f64 {
        self.effective_obstacle
    }

    /// Furthest point on the `source -> location` segment outside every area.
    ///
    /// If `source` is already inside the nearest obstacle area, it is returned
    /// unchanged.
    pub fn stop_before(&self, location: Location, source: Location) -> Location {
        if !self.active {
            return location;
        }

        let mut target = location.kept_inside_rectangle(
            Location::new(self.min.x + self.hard_border, self.min.y + self.hard_border),
            Location::new(self.max.x - self.hard_border, self.max.y - self.hard_border),
            source,
        );

        let mut obstacles = self.obstacles.clone();
        obstacles.sort_by(|a, b| a.distance_to(source).total_cmp(&b.distance_to(source)));

        for obstacle in obstacles {
            let moved = target.moved_out_of_circle(obstacle, self.effective_obstacle, source);
            if moved != target && obstacle.distance_to(source) < self.effective_obstacle {
                target = source;
            } else {
                target = moved;
            }
        }

        target
    }
}
