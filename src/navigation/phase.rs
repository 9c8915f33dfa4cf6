//! Episode phases.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase of a survey episode. Advanced only by the
/// [`NavigationController`](super::NavigationController).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Sweeping the domain and recording measurements
    Coverage,
    /// Fixed dwell, then the target is resolved
    Measuring,
    /// Fixed dwell before driving to the target
    Visualizing,
    /// Driving to the target
    Navigation,
    /// Terminal
    Done,
}

impl Phase {
    /// State name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Coverage => "Coverage",
            Phase::Measuring => "Measuring",
            Phase::Visualizing => "Visualizing",
            Phase::Navigation => "Navigation",
            Phase::Done => "Done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done)
    }

    /// Human-readable status line. `progress` is `(processed, total)` sweep
    /// waypoints and only shown during coverage.
    pub fn description(&self, progress: Option<(usize, usize)>) -> String {
        match (self, progress) {
            (Phase::Coverage, Some((done, total))) => {
                format!("COVERAGE: boustrophedon sweep ({}/{})", done, total)
            }
            (Phase::Coverage, None) => "COVERAGE: boustrophedon sweep".to_string(),
            (Phase::Measuring, _) => "MEASURING: processing field samples".to_string(),
            (Phase::Visualizing, _) => "VISUALIZING: building field map".to_string(),
            (Phase::Navigation, _) => "NAVIGATION: seeking weakest signal".to_string(),
            (Phase::Done, _) => "DONE".to_string(),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// Robot came within arrival tolerance of the target
    Arrived,
    /// Target cell is free but enclosed by obstacles
    Unreachable,
    /// Gradient descent ran out of escape kicks
    Converged,
    /// Route followed to its last waypoint
    RouteExhausted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_shows_progress() {
        assert_eq!(
            Phase::Coverage.description(Some((12, 324))),
            "COVERAGE: boustrophedon sweep (12/324)"
        );
        assert_eq!(
            Phase::Navigation.description(Some((1, 2))),
            "NAVIGATION: seeking weakest signal"
        );
    }

    #[test]
    fn test_terminal() {
        assert!(Phase::Done.is_terminal());
        assert!(!Phase::Visualizing.is_terminal());
        assert_eq!(Phase::Measuring.to_string(), "Measuring");
    }
}
