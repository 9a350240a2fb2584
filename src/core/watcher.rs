//! Boundary-crossing detection over a stream of position samples.
//!
//! The tracker only reports transitions; it never clocks anyone in or out.

use crate::core::perimeter::PerimeterStore;
use crate::models::location::LatLng;
use crate::models::perimeter::Perimeter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryAlert {
    /// Left the work area with a shift still open.
    LeftWhileClockedIn,
    /// Entered the work area without an open shift.
    EnteredWhileClockedOut,
}

impl BoundaryAlert {
    pub fn message(&self) -> &'static str {
        match self {
            BoundaryAlert::LeftWhileClockedIn => {
                "Warning: you have left the work area! Please clock out."
            }
            BoundaryAlert::EnteredWhileClockedOut => {
                "You have entered the work area. Remember to clock in!"
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct BoundaryTracker {
    was_inside: Option<bool>,
}

impl BoundaryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn was_inside(&self) -> Option<bool> {
        self.was_inside
    }

    /// Feed one sample. The first sample only sets the baseline.
    pub fn observe(
        &mut self,
        perimeter: Option<&Perimeter>,
        sample: LatLng,
        clocked_in: bool,
    ) -> Option<BoundaryAlert> {
        let inside = PerimeterStore::contains(perimeter, sample).inside;
        let previous = self.was_inside.replace(inside);

        match previous {
            Some(before) if before != inside => match (inside, clocked_in) {
                (false, true) => Some(BoundaryAlert::LeftWhileClockedIn),
                (true, false) => Some(BoundaryAlert::EnteredWhileClockedOut),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn perimeter() -> Perimeter {
        Perimeter {
            id: 1,
            center: LatLng::new(0.0, 0.0),
            radius_km: 1.0,
            updated_at: Utc::now(),
        }
    }

    const INSIDE: LatLng = LatLng {
        latitude: 0.0,
        longitude: 0.001,
    };
    const OUTSIDE: LatLng = LatLng {
        latitude: 0.0,
        longitude: 0.05,
    };

    #[test]
    fn first_sample_is_only_a_baseline() {
        let p = perimeter();
        let mut t = BoundaryTracker::new();
        assert_eq!(t.observe(Some(&p), OUTSIDE, true), None);
        assert_eq!(t.was_inside(), Some(false));
    }

    #[test]
    fn leaving_while_clocked_in_alerts_once() {
        let p = perimeter();
        let mut t = BoundaryTracker::new();
        t.observe(Some(&p), INSIDE, true);
        assert_eq!(
            t.observe(Some(&p), OUTSIDE, true),
            Some(BoundaryAlert::LeftWhileClockedIn)
        );
        assert_eq!(t.observe(Some(&p), OUTSIDE, true), None);
    }

    #[test]
    fn entering_while_clocked_out_alerts() {
        let p = perimeter();
        let mut t = BoundaryTracker::new();
        t.observe(Some(&p), OUTSIDE, false);
        assert_eq!(
            t.observe(Some(&p), INSIDE, false),
            Some(BoundaryAlert::EnteredWhileClockedOut)
        );
    }

    #[test]
    fn crossings_matching_the_shift_state_are_silent() {
        let p = perimeter();
        let mut t = BoundaryTracker::new();
        t.observe(Some(&p), OUTSIDE, true);
        assert_eq!(t.observe(Some(&p), INSIDE, true), None);
        assert_eq!(t.observe(Some(&p), OUTSIDE, false), None);
    }

    #[test]
    fn no_perimeter_means_always_outside() {
        let mut t = BoundaryTracker::new();
        t.observe(None, INSIDE, true);
        assert_eq!(t.observe(None, OUTSIDE, true), None);
        assert_eq!(t.was_inside(), Some(false));
    }
}
