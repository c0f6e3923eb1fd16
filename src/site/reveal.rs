//! One-shot section reveal tracking
//!
//! Sections start hidden and are revealed the first time any part of them
//! scrolls into view. Once revealed a section is no longer observed.

use std::collections::HashSet;

/// Visible fraction at which the browser reports a section
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// Class added to a revealed section
pub const VISIBLE_CLASS: &str = "visible";

/// Intersection report for one observed section
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    /// Section identifier
    pub target: String,
    pub is_intersecting: bool,
}

impl Intersection {
    pub fn new(target: impl Into<String>, is_intersecting: bool) -> Self {
        Self {
            target: target.into(),
            is_intersecting,
        }
    }
}

/// Tracks which sections are observed and which have been revealed
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    observed: Vec<String>,
    revealed: HashSet<String>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing a section; already revealed or observed sections are ignored
    pub fn observe(&mut self, target: impl Into<String>) {
        let target = target.into();
        if self.revealed.contains(&target) || self.observed.contains(&target) {
            return;
        }
        self.observed.push(target);
    }

    /// Feed a batch of intersection reports
    ///
    /// Returns the sections revealed by this batch in report order. Each is
    /// unobserved; later reports for it are ignored.
    pub fn process(&mut self, entries: &[Intersection]) -> Vec<String> {
        let mut newly = Vec::new();
        for entry in entries {
            if !entry.is_intersecting {
                continue;
            }
            let Some(index) = self.observed.iter().position(|t| *t == entry.target) else {
                continue;
            };
            let target = self.observed.remove(index);
            self.revealed.insert(target.clone());
            newly.push(target);
        }
        newly
    }

    pub fn is_visible(&self, target: &str) -> bool {
        self.revealed.contains(target)
    }

    pub fn is_observed(&self, target: &str) -> bool {
        self.observed.iter().any(|t| t == target)
    }

    /// Number of sections still waiting to be revealed
    pub fn pending(&self) -> usize {
        self.observed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveals_once_then_unobserves() {
        let mut tracker = RevealTracker::new();
        tracker.observe("about");
        let revealed = tracker.process(&[Intersection::new("about", true)]);
        assert_eq!(revealed, vec!["about"]);
        assert!(tracker.is_visible("about"));
        assert!(!tracker.is_observed("about"));

        // Scrolling away and back does nothing
        assert!(tracker.process(&[Intersection::new("about", false)]).is_empty());
        assert!(tracker.process(&[Intersection::new("about", true)]).is_empty());
        assert!(tracker.is_visible("about"));
    }

    #[test]
    fn test_not_intersecting_stays_hidden() {
        let mut tracker = RevealTracker::new();
        tracker.observe("pricing");
        assert!(tracker.process(&[Intersection::new("pricing", false)]).is_empty());
        assert!(!tracker.is_visible("pricing"));
        assert_eq!(tracker.pending(), 1);
    }

    #[test]
    fn test_tall_section_revealed_on_any_intersection() {
        // A section many viewports tall never shows a tenth of itself
        let mut tracker = RevealTracker::new();
        tracker.observe("gallery");
        assert_eq!(
            tracker.process(&[Intersection::new("gallery", true)]),
            vec!["gallery"]
        );
        assert!(tracker.is_visible("gallery"));
    }

    #[test]
    fn test_batch_order_preserved() {
        let mut tracker = RevealTracker::new();
        for id in ["a", "b", "c"] {
            tracker.observe(id);
        }
        let revealed = tracker.process(&[
            Intersection::new("c", true),
            Intersection::new("b", false),
            Intersection::new("a", true),
        ]);
        assert_eq!(revealed, vec!["c", "a"]);
        assert_eq!(tracker.pending(), 1);
    }

    #[test]
    fn test_unobserved_targets_ignored() {
        let mut tracker = RevealTracker::new();
        assert!(tracker.process(&[Intersection::new("ghost", true)]).is_empty());
        assert!(!tracker.is_visible("ghost"));
    }

    #[test]
    fn test_observe_after_reveal_is_ignored() {
        let mut tracker = RevealTracker::new();
        tracker.observe("team");
        tracker.observe("team");
        assert_eq!(tracker.pending(), 1);
        tracker.process(&[Intersection::new("team", true)]);
        tracker.observe("team");
        assert_eq!(tracker.pending(), 0);
    }
}
