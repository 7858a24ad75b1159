//! Arena geometry: locations, targets and line/circle helpers.

use core::fmt;

use crate::state::{Ship, ShipId};

const EPSILON: f64 = 10e-8;

/// A point in the arena, in km.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Location) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle in radians from this point to another.
    pub fn angle_to(&self, other: Location) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    pub fn is_in_range(&self, center: Location, radius: f64) -> bool {
        self.distance_to(center) <= radius
    }

    /// Clamp this point into a circle around `center`, along the center line.
    pub fn constrained_in_range(&self, center: Location, radius: f64) -> Location {
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= radius {
            *self
        } else {
            let factor = radius / length;
            Location::new(center.x + dx * factor, center.y + dy * factor)
        }
    }

    /// Push this point out of a circle, onto the circle intersection with the
    /// line coming from `source` that is nearest to `source`.
    pub fn moved_out_of_circle(&self, center: Location, radius: f64, source: Location) -> Location {
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length >= radius {
            return *self;
        }

        match intersect_line_circle(
            (source.x - center.x, source.y - center.y),
            (dx, dy),
            radius,
        ) {
            Some((x, y)) => Location::new(x + center.x, y + center.y),
            None => *self,
        }
    }

    /// Keep this point inside a rectangle, shortening the segment from `source`.
    pub fn kept_inside_rectangle(
        &self,
        min: Location,
        max: Location,
        source: Location,
    ) -> Location {
        let mut length = self.distance_to(source);
        let mut result = *self;
        if result.x < min.x {
            length *= (min.x - source.x) / (result.x - source.x);
            result = result.constrained_in_range(source, length);
        }
        if result.x > max.x {
            length *= (max.x - source.x) / (result.x - source.x);
            result = result.constrained_in_range(source, length);
        }
        if result.y < min.y {
            length *= (min.y - source.y) / (result.y - source.y);
            result = result.constrained_in_range(source, length);
        }
        if result.y > max.y {
            length *= (max.y - source.y) / (result.y - source.y);
            result = result.constrained_in_range(source, length);
        }
        result
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// A location plus a facing angle (radians).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl Placement {
    pub const fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }

    pub const fn location(&self) -> Location {
        Location::new(self.x, self.y)
    }
}

/// Intersection of the line through `p1` and `p2` with a circle of `radius`
/// centered at the origin. Returns the intersection nearest to `p1`.
fn intersect_line_circle(p1: (f64, f64), p2: (f64, f64), radius: f64) -> Option<(f64, f64)> {
    let (x1, y1) = p1;
    let (x2, y2) = p2;
    let a = y2 - y1;
    let b = -(x2 - x1);
    let c = -(a * x1 + b * y1);
    let norm = a * a + b * b;
    if norm == 0.0 {
        return None;
    }
    let x0 = -a * c / norm;
    let y0 = -b * c / norm;

    if c * c > radius * radius * norm + EPSILON {
        None
    } else if (c * c - radius * radius * norm).abs() < EPSILON {
        Some((x0, y0))
    } else {
        let d = radius * radius - c * c / norm;
        let mult = (d / norm).sqrt();
        let first = (x0 + b * mult, y0 - a * mult);
        let second = (x0 - b * mult, y0 + a * mult);
        let dist = |(x, y): (f64, f64)| ((x - x1) * (x - x1) + (y - y1) * (y - y1)).sqrt();
        if dist(second) < dist(first) {
            Some(second)
        } else {
            Some(first)
        }
    }
}

/// Target of an action: a point in space, or a ship captured with its
/// location at capture time.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Target {
    Location(Location),
    Ship { id: ShipId, at: Location },
}

impl Target {
    pub const fn at(x: f64, y: f64) -> Self {
        Self::Location(Location::new(x, y))
    }

    pub fn ship(ship: &Ship) -> Self {
        Self::Ship {
            id: ship.id,
            at: ship.location(),
        }
    }

    pub const fn location(&self) -> Location {
        match self {
            Self::Location(location) => *location,
            Self::Ship { at, .. } => *at,
        }
    }

    pub const fn ship_id(&self) -> Option<ShipId> {
        match self {
            Self::Location(_) => None,
            Self::Ship { id, .. } => Some(*id),
        }
    }

    pub const fn is_ship(&self) -> bool {
        matches!(self, Self::Ship { .. })
    }

    /// Drops the ship reference, keeping the captured location.
    pub const fn as_location(&self) -> Target {
        Self::Location(self.location())
    }

    pub fn distance_to(&self, other: Location) -> f64 {
        self.location().distance_to(other)
    }

    pub fn is_in_range(&self, center: Location, radius: f64) -> bool {
        self.location().is_in_range(center, radius)
    }

    /// Clamp into range. A ship target that has to move becomes a location.
    pub fn constrained_in_range(&self, center: Location, radius: f64) -> Target {
        let location = self.location();
        let constrained = location.constrained_in_range(center, radius);
        if constrained == location {
            *self
        } else {
            Target::Location(constrained)
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Location(location) => write!(f, "{location}"),
            Self::Ship { id, at } => write!(f, "ship {id} at {at}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Location, x: f64, y: f64) {
        assert!(
            (actual.x - x).abs() < 1e-6 && (actual.y - y).abs() < 1e-6,
            "expected ({x}, {y}), got {actual}"
        );
    }

    #[test]
    fn constrains_in_range() {
        let point = Location::new(10.0, 0.0);
        assert_eq!(point.constrained_in_range(Location::new(0.0, 0.0), 20.0), point);
        assert_close(point.constrained_in_range(Location::new(0.0, 0.0), 5.0), 5.0, 0.0);
    }

    #[test]
    fn moves_out_of_circle_toward_source() {
        let point = Location::new(100.0, 285.0);
        let moved = point.moved_out_of_circle(
            Location::new(100.0, 350.0),
            100.0,
            Location::new(100.0, 200.0),
        );
        assert_close(moved, 100.0, 250.0);

        let outside = Location::new(0.0, 0.0);
        assert_eq!(
            outside.moved_out_of_circle(Location::new(500.0, 500.0), 10.0, outside),
            outside
        );
    }

    #[test]
    fn keeps_inside_rectangle() {
        let source = Location::new(50.0, 50.0);
        let result = Location::new(150.0, 50.0).kept_inside_rectangle(
            Location::new(0.0, 0.0),
            Location::new(100.0, 100.0),
            source,
        );
        assert_close(result, 100.0, 50.0);

        let diagonal = Location::new(-50.0, 150.0).kept_inside_rectangle(
            Location::new(0.0, 0.0),
            Location::new(100.0, 100.0),
            source,
        );
        assert_close(diagonal, 0.0, 100.0);
    }

    #[test]
    fn ship_target_becomes_location_when_clamped() {
        let target = Target::Ship {
            id: ShipId(3),
            at: Location::new(0.0, 200.0),
        };
        let clamped = target.constrained_in_range(Location::new(0.0, 0.0), 100.0);
        assert!(!clamped.is_ship());
        assert_close(clamped.location(), 0.0, 100.0);

        let kept = target.constrained_in_range(Location::new(0.0, 0.0), 300.0);
        assert_eq!(kept.ship_id(), Some(ShipId(3)));
    }
}
