//! Distance-based proximity scores
//!
//! Links, hover boosts and click bursts all share one shape: a value that is
//! largest at zero distance, decays linearly, and bottoms out at a floor.

use serde::{Deserialize, Serialize};

use super::layout::Position;

/// Linear decay with a floor: `max(floor, peak - distance / radius)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Falloff {
    /// Score at zero distance
    pub peak: f64,
    /// Distance over which the score drops by one
    pub radius: f64,
    /// Lowest score
    pub floor: f64,
}

impl Falloff {
    pub fn new(peak: f64, radius: f64, floor: f64) -> Self {
        Self {
            peak,
            radius,
            floor,
        }
    }

    /// Score for a distance
    ///
    /// A non-positive radius collapses to `peak` at zero distance and `floor`
    /// everywhere else.
    pub fn score(&self, distance: f64) -> f64 {
        if self.radius <= 0.0 || !self.radius.is_finite() {
            return if distance <= 0.0 {
                self.peak.max(self.floor)
            } else {
                self.floor
            };
        }
        (self.peak - distance / self.radius).max(self.floor)
    }
}

/// Most recent pointer state in surface pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    /// Cleared when the pointer leaves the surface
    pub active: bool,
}

impl Pointer {
    /// Pointer position
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Distance from the pointer, or `None` while it is inactive
    pub fn distance_to(&self, point: &Position) -> Option<f64> {
        self.active.then(|| self.position().distance(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_at_zero_is_peak() {
        let falloff = Falloff::new(1.0, 400.0, 0.3);
        assert_eq!(falloff.score(0.0), 1.0);
    }

    #[test]
    fn test_score_strictly_decreasing_until_floor() {
        let falloff = Falloff::new(1.0, 400.0, 0.3);
        let mut previous = falloff.score(0.0);
        for step in 1..28 {
            let score = falloff.score(step as f64 * 10.0);
            assert!(score < previous, "{} should be below {}", score, previous);
            previous = score;
        }
    }

    #[test]
    fn test_score_never_below_floor() {
        let falloff = Falloff::new(1.0, 400.0, 0.3);
        assert_eq!(falloff.score(10_000.0), 0.3);
        assert_eq!(falloff.score(f64::INFINITY), 0.3);
    }

    #[test]
    fn test_zero_radius() {
        let falloff = Falloff::new(1.0, 0.0, 0.25);
        assert_eq!(falloff.score(0.0), 1.0);
        assert_eq!(falloff.score(0.5), 0.25);
    }

    #[test]
    fn test_pointer_distance_inactive() {
        let pointer = Pointer {
            x: 3.0,
            y: 4.0,
            active: false,
        };
        assert_eq!(pointer.distance_to(&Position::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_pointer_distance_active() {
        let pointer = Pointer {
            x: 3.0,
            y: 4.0,
            active: true,
        };
        assert_eq!(pointer.distance_to(&Position::new(0.0, 0.0)), Some(5.0));
    }
}
