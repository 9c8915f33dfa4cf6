//! Events emitted by the navigation stack for renderers and loggers.

use crate::core::{GridCoord, WorldPoint};
use crate::pathfinding::PathFailure;

use super::phase::Phase;

/// Why a sweep waypoint was dropped without a measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Waypoint lies in an occupied cell
    InsideObstacle,
    /// Straight segment blocked and no detour exists
    NoDetour,
    /// Next motion step would enter an occupied cell
    StepBlocked,
}

/// Why navigation switched to reactive control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallbackReason {
    /// Route planning failed
    NoPath(PathFailure),
    /// Next route segment is blocked
    SegmentBlocked,
    /// Next route step would enter an occupied cell
    StepBlocked,
    /// Route planning failed for a reason other than a missing path
    PlanningError,
}

/// Something worth telling the outside world about.
#[derive(Clone, Debug, PartialEq)]
pub enum NavEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    /// A sweep or detour waypoint was reached and measured.
    WaypointReached {
        position: WorldPoint,
        value: f32,
        detour: bool,
    },
    WaypointSkipped {
        index: usize,
        position: WorldPoint,
        reason: SkipReason,
    },
    DetourPlanned {
        index: usize,
        waypoints: usize,
    },
    DetourFailed {
        index: usize,
        reason: PathFailure,
    },
    /// Navigation target fixed for the rest of the episode.
    TargetResolved {
        position: WorldPoint,
        value: f32,
        /// False when no measurement existed and the grid was scanned instead
        from_measurements: bool,
    },
    RoutePlanned {
        waypoints: usize,
        length: f32,
    },
    FallbackEngaged {
        reason: FallbackReason,
    },
    /// Final route waypoint reached; the episode ends.
    RouteExhausted,
    Arrived {
        position: WorldPoint,
        distance: f32,
    },
    /// Target cell is enclosed; the episode ends without arrival.
    TargetUnreachable {
        cell: GridCoord,
    },
    /// Gradient descent gave up after its escape budget.
    Converged {
        position: WorldPoint,
        value: f32,
    },
}
